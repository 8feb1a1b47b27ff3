//! Identity provider seam.
//!
//! The provider is an opaque capability: sign up, confirm, authenticate, sign out.
//! `CognitoIdentityProvider` is the production backend; tests plug in their own.

use async_trait::async_trait;

use crate::errors::AuthError;

pub mod cognito;

pub use cognito::CognitoIdentityProvider;

/// Handle returned by a successful sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredUser {
    pub username: String,
    /// Provider-side subject id, when the provider returns one.
    pub user_sub: Option<String>,
    pub confirmed: bool,
}

/// Tokens issued by a successful login.
#[derive(Clone, PartialEq)]
pub struct AuthTokens {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, identifier: &str, secret: &str) -> Result<RegisteredUser, AuthError>;

    async fn confirm_sign_up(&self, identifier: &str, code: &str) -> Result<(), AuthError>;

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<AuthTokens, AuthError>;

    /// Ends this client's session at the provider. `refresh_token` is whatever
    /// the client still holds; providers that sign out locally may ignore it.
    async fn sign_out(&self, identifier: &str, refresh_token: Option<&str>)
        -> Result<(), AuthError>;
}
