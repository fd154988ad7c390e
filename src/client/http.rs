use async_trait::async_trait;
use serde_json::Value;

use super::{AssessmentTransport, RawResponse};
use crate::error::ApiError;

/// reqwest-backed transport. No timeout is configured; the remote endpoint
/// bounds latency.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssessmentTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
