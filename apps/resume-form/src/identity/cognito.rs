//! Cognito user-pool backend for `IdentityProvider`.
//!
//! Uses the public user-pool operations (SignUp, ConfirmSignUp, InitiateAuth,
//! RevokeToken), which only need the app client id. The SDK is loaded without a
//! credentials provider. Login uses the `USER_PASSWORD_AUTH` flow, which must be
//! enabled on the app client.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::operation::confirm_sign_up::ConfirmSignUpError;
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthError;
use aws_sdk_cognitoidentityprovider::operation::revoke_token::RevokeTokenError;
use aws_sdk_cognitoidentityprovider::operation::sign_up::SignUpError;
use aws_sdk_cognitoidentityprovider::types::AuthFlowType;
use aws_sdk_cognitoidentityprovider::Client;
use tracing::{debug, warn};

use super::{AuthTokens, IdentityProvider, RegisteredUser};
use crate::errors::AuthError;

#[derive(Clone, Debug)]
pub struct CognitoIdentityProvider {
    client: Client,
    client_id: String,
}

impl CognitoIdentityProvider {
    /// Builds a provider in the pool's region. `endpoint` overrides the regional
    /// endpoint (local emulators, tests).
    pub async fn new(
        user_pool_id: &str,
        client_id: impl Into<String>,
        endpoint: Option<&str>,
    ) -> Result<Self, AuthError> {
        let region = region_from_pool_id(user_pool_id).ok_or_else(|| {
            AuthError::InvalidParameter(format!(
                "user pool id '{user_pool_id}' does not start with a region"
            ))
        })?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled())
            .no_credentials();
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Ok(Self::from_client(Client::new(&sdk_config), client_id))
    }

    pub fn from_client(client: Client, client_id: impl Into<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.client.config().region().map(|r| r.as_ref())
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, identifier: &str, secret: &str) -> Result<RegisteredUser, AuthError> {
        let output = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(identifier)
            .password(secret)
            .send()
            .await
            .map_err(|e| sdk_error("SignUp", e, sign_up_error))?;

        debug!("Cognito SignUp succeeded");
        Ok(RegisteredUser {
            username: identifier.to_string(),
            user_sub: Some(output.user_sub().to_string()).filter(|s| !s.is_empty()),
            confirmed: output.user_confirmed(),
        })
    }

    async fn confirm_sign_up(&self, identifier: &str, code: &str) -> Result<(), AuthError> {
        self.client
            .confirm_sign_up()
            .client_id(&self.client_id)
            .username(identifier)
            .confirmation_code(code)
            .send()
            .await
            .map_err(|e| sdk_error("ConfirmSignUp", e, confirm_sign_up_error))?;

        debug!("Cognito ConfirmSignUp succeeded");
        Ok(())
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<AuthTokens, AuthError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", identifier)
            .auth_parameters("PASSWORD", secret)
            .send()
            .await
            .map_err(|e| sdk_error("InitiateAuth", e, initiate_auth_error))?;

        let tokens = output
            .authentication_result()
            .and_then(|result| Some((result.id_token()?, result.access_token()?, result)));

        match (tokens, output.challenge_name()) {
            (Some((id_token, access_token, result)), _) => Ok(AuthTokens {
                id_token: id_token.to_string(),
                access_token: access_token.to_string(),
                refresh_token: result.refresh_token().unwrap_or_default().to_string(),
            }),
            (None, Some(challenge)) => Err(AuthError::ChallengeRequired(challenge.as_str().to_string())),
            (None, None) => Err(AuthError::Provider {
                kind: "EmptyAuthenticationResult".to_string(),
                message: "login response carried neither tokens nor a challenge".to_string(),
            }),
        }
    }

    /// Revokes this client's refresh token, which ends only the session it
    /// belongs to. Sessions on other devices stay valid.
    async fn sign_out(
        &self,
        identifier: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
            debug!("No refresh token held for {identifier}; local sign-out only");
            return Ok(());
        };

        self.client
            .revoke_token()
            .client_id(&self.client_id)
            .token(refresh_token)
            .send()
            .await
            .map_err(|e| sdk_error("RevokeToken", e, revoke_token_error))?;

        debug!("Cognito RevokeToken succeeded");
        Ok(())
    }
}

/// `us-east-1_AbCdEf` → `us-east-1`.
pub fn region_from_pool_id(user_pool_id: &str) -> Option<&str> {
    let (region, rest) = user_pool_id.split_once('_')?;
    if region.is_empty() || rest.is_empty() {
        return None;
    }
    Some(region)
}

// ────────────────────────────────────────────────────────────────────────────
// Error mapping
// ────────────────────────────────────────────────────────────────────────────

/// Service errors go through the operation's mapper; everything else
/// (connection, timeout, unparseable response) is a transport failure.
fn sdk_error<E>(operation: &str, err: SdkError<E>, map: fn(E) -> AuthError) -> AuthError
where
    E: std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) => {
            let err = map(context.into_err());
            warn!("Cognito {operation} rejected: {err}");
            err
        }
        other => {
            let detail = DisplayErrorContext(&other).to_string();
            warn!("Cognito {operation} failed: {detail}");
            AuthError::Transport(detail)
        }
    }
}

fn message(err: &impl ProvideErrorMetadata) -> String {
    err.message().unwrap_or_default().to_string()
}

fn provider_error(err: &impl ProvideErrorMetadata) -> AuthError {
    AuthError::Provider {
        kind: err.code().unwrap_or("Unknown").to_string(),
        message: message(err),
    }
}

fn sign_up_error(err: SignUpError) -> AuthError {
    let text = message(&err);
    match err {
        SignUpError::UsernameExistsException(_) => AuthError::IdentifierInUse(text),
        SignUpError::InvalidPasswordException(_) => AuthError::WeakSecret(text),
        SignUpError::InvalidParameterException(_) => AuthError::InvalidParameter(text),
        other => provider_error(&other),
    }
}

fn confirm_sign_up_error(err: ConfirmSignUpError) -> AuthError {
    let text = message(&err);
    match err {
        ConfirmSignUpError::CodeMismatchException(_) | ConfirmSignUpError::ExpiredCodeException(_) => {
            AuthError::InvalidCode(text)
        }
        ConfirmSignUpError::UserNotFoundException(_)
        | ConfirmSignUpError::NotAuthorizedException(_) => AuthError::InvalidCredentials(text),
        ConfirmSignUpError::InvalidParameterException(_) => AuthError::InvalidParameter(text),
        other => provider_error(&other),
    }
}

fn initiate_auth_error(err: InitiateAuthError) -> AuthError {
    let text = message(&err);
    match err {
        InitiateAuthError::NotAuthorizedException(_)
        | InitiateAuthError::UserNotFoundException(_) => AuthError::InvalidCredentials(text),
        InitiateAuthError::UserNotConfirmedException(_) => AuthError::Unconfirmed(text),
        InitiateAuthError::InvalidParameterException(_) => AuthError::InvalidParameter(text),
        other => provider_error(&other),
    }
}

fn revoke_token_error(err: RevokeTokenError) -> AuthError {
    let text = message(&err);
    match err {
        RevokeTokenError::UnauthorizedException(_) => AuthError::InvalidCredentials(text),
        RevokeTokenError::InvalidParameterException(_) => AuthError::InvalidParameter(text),
        other => provider_error(&other),
    }
}
