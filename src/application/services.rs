use crate::domain::entities::{Request, Response};
use crate::domain::errors::CommandError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, CommandError>;
}

/// Application service that issues a request `attempts` times, one after
/// another, and keeps the most recent response.
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Every attempt is sent, whatever the outcome of the previous one. Any
    /// response counts as success, whatever its status, and the latest one
    /// wins. The last attempt's error is returned only when no attempt got
    /// a response.
    pub async fn execute(
        &self,
        request: &Request,
        attempts: usize,
    ) -> Result<Response, CommandError> {
        let mut last_response = None;
        let mut last_error = None;

        for attempt in 1..=attempts.max(1) {
            match self.http_client.send(request.clone()).await {
                Ok(response) => {
                    debug!(attempt, status = %response.status, "attempt succeeded");
                    last_response = Some(response);
                }
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "attempt failed");
                    last_error = Some(err);
                }
            }
        }

        match (last_response, last_error) {
            (Some(response), _) => Ok(response),
            (None, Some(err)) => Err(err),
            (None, None) => Err(CommandError::Transport {
                method: request.method.to_string(),
                url: request.url.as_str(),
                reason: "no attempt was made".to_string(),
            }),
        }
    }
}
