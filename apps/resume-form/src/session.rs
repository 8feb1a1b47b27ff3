//! Session Manager: wraps the identity provider and owns the client-side session keys.
//!
//! Presence of `idToken` is the only thing that makes a visitor "authenticated".
//! The page guard is advisory: the resume service validates the bearer token itself.

use tracing::{info, warn};

use crate::errors::{AuthError, StorageError};
use crate::identity::{IdentityProvider, RegisteredUser};
use crate::storage::{
    ClientStorage, ACCESS_TOKEN_KEY, ID_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS,
    USER_EMAIL_KEY,
};

/// Views the application can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Index,
    ResumeForm,
}

impl View {
    /// Views reachable without a stored identifier.
    pub fn is_public(self) -> bool {
        matches!(self, View::Login | View::Index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(View),
}

#[derive(Clone, PartialEq)]
pub struct Session {
    pub id_token: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_identifier: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_identifier", &self.user_identifier)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionManager<P, S> {
    provider: P,
    storage: S,
}

impl<P, S> SessionManager<P, S>
where
    P: IdentityProvider,
    S: ClientStorage,
{
    pub fn new(provider: P, storage: S) -> Self {
        Self { provider, storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<RegisteredUser, AuthError> {
        let user = self.provider.sign_up(identifier, secret).await?;
        info!(
            "Registered {} (confirmed: {})",
            user.username, user.confirmed
        );
        Ok(user)
    }

    pub async fn confirm_registration(&self, identifier: &str, code: &str) -> Result<(), AuthError> {
        self.provider.confirm_sign_up(identifier, code).await?;
        info!("Confirmed registration for {identifier}");
        Ok(())
    }

    /// Logs in and persists the tokens plus the identifier. Nothing is persisted
    /// when the provider or any storage write fails.
    pub async fn authenticate(
        &mut self,
        identifier: &str,
        secret: &str,
    ) -> Result<Session, AuthError> {
        let tokens = self.provider.authenticate(identifier, secret).await?;

        let writes = [
            (ID_TOKEN_KEY, tokens.id_token.as_str()),
            (ACCESS_TOKEN_KEY, tokens.access_token.as_str()),
            (REFRESH_TOKEN_KEY, tokens.refresh_token.as_str()),
            (USER_EMAIL_KEY, identifier),
        ];
        for (written, (key, value)) in writes.iter().enumerate() {
            if let Err(e) = self.storage.set(key, value) {
                for (key, _) in &writes[..written] {
                    if let Err(cleanup) = self.storage.remove(key) {
                        warn!("Could not roll back storage key {key}: {cleanup}");
                    }
                }
                return Err(e.into());
            }
        }

        info!("Authenticated {identifier}");
        Ok(Session {
            id_token: tokens.id_token,
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            user_identifier: Some(identifier.to_string()),
        })
    }

    /// Destroys the local session. The provider call is best-effort: its failure is
    /// logged, never returned, and storage is cleared regardless.
    pub async fn sign_out(&mut self) -> Result<Navigation, StorageError> {
        let identifier = self.user_identifier().unwrap_or_else(|e| {
            warn!("Could not read stored identifier during sign-out: {e}");
            None
        });

        if let Some(identifier) = identifier {
            let refresh_token = self.storage.get(REFRESH_TOKEN_KEY).unwrap_or(None);
            match self
                .provider
                .sign_out(&identifier, refresh_token.as_deref())
                .await
            {
                Ok(()) => info!("Signed out {identifier}"),
                Err(e) => warn!("Remote sign-out for {identifier} failed: {e}"),
            }
        }

        self.storage.clear()?;
        Ok(Navigation::Redirect(View::Login))
    }

    /// Called once per protected page load.
    pub fn guard_page(&self) -> Result<Navigation, StorageError> {
        if self.storage.get(ID_TOKEN_KEY)?.is_some() {
            Ok(Navigation::Stay)
        } else {
            Ok(Navigation::Redirect(View::Login))
        }
    }

    pub fn session_state(&self) -> Result<SessionState, StorageError> {
        let Some(id_token) = self.storage.get(ID_TOKEN_KEY)? else {
            return Ok(SessionState::Unauthenticated);
        };
        Ok(SessionState::Authenticated(Session {
            id_token,
            access_token: self.storage.get(ACCESS_TOKEN_KEY)?,
            refresh_token: self.storage.get(REFRESH_TOKEN_KEY)?,
            user_identifier: self.storage.get(USER_EMAIL_KEY)?,
        }))
    }

    pub fn id_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(ID_TOKEN_KEY)
    }

    pub fn user_identifier(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(USER_EMAIL_KEY)
    }

    /// True when none of the session keys remain.
    pub fn is_cleared(&self) -> Result<bool, StorageError> {
        for key in SESSION_KEYS {
            if self.storage.get(key)?.is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// The part of an identifier before `@`, or the whole identifier.
pub fn welcome_name(identifier: &str) -> &str {
    identifier.split('@').next().unwrap_or(identifier)
}
