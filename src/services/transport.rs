use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::job::RunStatus;

/// Request payload for creating a new repair job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentRequest {
    pub repo_url: String,
    pub team_name: String,
    pub leader_name: String,
    pub retry_limit: u32,
}

/// Response from job creation: the id that seeds a watch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentResponse {
    pub job_id: String,
}

/// Abstract status source for the polling controller.
///
/// The monitor only needs "fetch status by id"; job creation lives on the
/// same trait because both hit the same backend and tests mock them together.
#[async_trait]
pub trait StatusTransport: Send + Sync {
    async fn get_status(&self, job_id: &str) -> Result<RunStatus, TransportError>;

    async fn run_agent(&self, request: &RunAgentRequest)
        -> Result<RunAgentResponse, TransportError>;
}

/// HTTP transport against the repair backend.
pub struct HttpStatusTransport {
    http: Client,
    base_url: String,
}

impl HttpStatusTransport {
    /// A trailing slash on the configured base URL is stripped so route
    /// composition never produces `//run-status`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StatusTransport for HttpStatusTransport {
    async fn get_status(&self, job_id: &str) -> Result<RunStatus, TransportError> {
        let url = format!("{}/run-status/{}", self.base_url, job_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_send_error)?
            .error_for_status()?;

        Ok(response.json::<RunStatus>().await?)
    }

    async fn run_agent(
        &self,
        request: &RunAgentRequest,
    ) -> Result<RunAgentResponse, TransportError> {
        let url = format!("{}/run-agent", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_send_error)?
            .error_for_status()?;

        Ok(response.json::<RunAgentResponse>().await?)
    }
}

/// An unreachable backend is reported as `Unavailable`; everything else
/// (bad status, decode failure) stays an HTTP error.
fn classify_send_error(error: reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::Unavailable(error.to_string())
    } else {
        TransportError::Http(error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
