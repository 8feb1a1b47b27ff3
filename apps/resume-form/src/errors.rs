use thiserror::Error;

use crate::messages;

/// Failures reported by the identity provider during registration, confirmation or login.
/// Surfaced to the user as message text, never retried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("An account with this identifier already exists: {0}")]
    IdentifierInUse(String),

    #[error("Password does not meet requirements: {0}")]
    WeakSecret(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Incorrect username or password: {0}")]
    InvalidCredentials(String),

    #[error("Account is not confirmed: {0}")]
    Unconfirmed(String),

    #[error("Invalid or expired confirmation code: {0}")]
    InvalidCode(String),

    #[error("Login requires an additional challenge: {0}")]
    ChallengeRequired(String),

    #[error("Identity provider error ({kind}): {message}")]
    Provider { kind: String, message: String },

    #[error("Could not reach the identity provider: {0}")]
    Transport(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Client-side storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage file could not be replaced: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Rejected edits to the resume form.
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Field name '{0}' is reserved for a repeatable section")]
    ReservedField(String),

    #[error("Section '{section}' has no field named '{field}'")]
    UnknownSectionField { section: String, field: String },

    #[error("Section '{section}' has no block at position {position}")]
    MissingBlock { section: String, position: usize },

    #[error("Section container '{0}' is not present on this form")]
    MissingContainer(String),
}

/// Failures of a resume submission. Every variant is terminal for the current
/// submission and leaves the form untouched.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Not authenticated: no identity token in storage")]
    MissingToken,

    #[error("Resume service returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resume service response could not be decoded: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SubmitError {
    /// Text shown in the inline message region.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::MissingToken => messages::NOT_AUTHENTICATED.to_string(),
            SubmitError::Remote { message, .. } => message.clone(),
            SubmitError::Network(_) | SubmitError::InvalidResponse(_) => {
                messages::NETWORK_FAILURE.to_string()
            }
            SubmitError::Storage(_) => messages::NOT_AUTHENTICATED.to_string(),
        }
    }
}
