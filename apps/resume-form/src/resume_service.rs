//! Resume service client: the only place the form talks to the remote generator.
//!
//! One POST per submission, bearer-authenticated with the identity token.
//! No retries and no timeout: every failure is terminal for that submission.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::SubmitError;
use crate::form::SubmissionPayload;
use crate::messages;

/// Body the service answers with, on success and failure alike.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub message: Option<String>,
    pub download_url: Option<String>,
    pub error: Option<String>,
}

/// What a successful submission shows the user.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub message: String,
    pub download_url: Option<String>,
}

#[async_trait]
pub trait ResumeService: Send + Sync {
    async fn submit(
        &self,
        id_token: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError>;
}

#[derive(Clone)]
pub struct ResumeServiceClient {
    client: Client,
    endpoint: String,
}

impl ResumeServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ResumeService for ResumeServiceClient {
    async fn submit(
        &self,
        id_token: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        debug!(
            "Submitting resume: {} education, {} experience, {} projects",
            payload.education.len(),
            payload.experience.len(),
            payload.projects.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(id_token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let result: ServiceResponse = serde_json::from_str(&body)?;
            debug!("Resume service accepted submission ({status})");
            return Ok(SubmissionReceipt {
                message: non_empty(result.message)
                    .unwrap_or_else(|| messages::DEFAULT_SUCCESS.to_string()),
                download_url: non_empty(result.download_url),
            });
        }

        let result = serde_json::from_str::<ServiceResponse>(&body).unwrap_or_default();
        error!("Resume service returned {}: {:?}", status, result.error);
        Err(SubmitError::Remote {
            status: status.as_u16(),
            message: non_empty(result.error).unwrap_or_else(|| messages::DEFAULT_FAILURE.to_string()),
        })
    }
}

/// Empty strings count as absent, like a falsy JSON value.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
