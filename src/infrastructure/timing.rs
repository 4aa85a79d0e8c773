use crate::application::services::HttpClient;
use crate::domain::entities::{Request, Response};
use crate::domain::errors::CommandError;
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

/// Wraps a client and logs how long every attempt took, whether it
/// succeeded or not.
pub struct TimingClient {
    inner: Box<dyn HttpClient>,
}

impl TimingClient {
    pub fn new(inner: Box<dyn HttpClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpClient for TimingClient {
    async fn send(&self, request: Request) -> Result<Response, CommandError> {
        let started = Instant::now();
        let result = self.inner.send(request).await;
        let elapsed = started.elapsed();

        let status = result
            .as_ref()
            .map(|response| response.status.as_u16())
            .unwrap_or_default();
        info!(
            target: "mync::timing",
            elapsed_ms = elapsed.as_millis() as u64,
            status,
            "request took {:?}",
            elapsed
        );

        result
    }
}
