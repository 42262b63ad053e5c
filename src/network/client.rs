// HTTP client for fetching peer chains

use crate::consensus::{ChainSource, FetchError, ReportedChain};
use std::time::Duration;

/// Fetches `GET http://{peer}/chain` with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpChainSource {
    client: reqwest::Client,
}

impl HttpChainSource {
    /// Create a new client
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ReportedChain, FetchError> {
        let url = format!("http://{}/chain", peer);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
