use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_SESSION_STORE_PATH: &str = ".resume-form/session.json";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub resume_service_url: String,
    pub cognito_user_pool_id: String,
    pub cognito_client_id: String,
    /// Overrides the endpoint derived from the user pool region.
    pub cognito_endpoint: Option<String>,
    pub session_store_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is this over
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            resume_service_url: require("RESUME_SERVICE_URL")?,
            cognito_user_pool_id: require("COGNITO_USER_POOL_ID")?,
            cognito_client_id: require("COGNITO_CLIENT_ID")?,
            cognito_endpoint: lookup("COGNITO_ENDPOINT").filter(|v| !v.trim().is_empty()),
            session_store_path: lookup("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_STORE_PATH)),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
