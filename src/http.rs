// src/http.rs
//
// Thin transport seam under the platform adapters. Keeping it a trait lets
// tests substitute canned responses for the network.

use std::time::Duration;

use async_trait::async_trait;

use crate::ingest::error::AdapterError;

const USER_AGENT: &str = concat!("post-ingest/", env!("CARGO_PKG_VERSION"));

/// The response surface adapters need: status plus body text. Non-success
/// statuses are not an error at this layer; adapters decide what they mean.
#[derive(Debug, Clone)]
pub struct HttpBody {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpBody, AdapterError>;
}

/// Production transport: one shared `reqwest::Client` with an explicit
/// request timeout, so a hung upstream cannot block a batch indefinitely.
pub struct ReqwestFetch {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestFetch {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    fn map_err(&self, e: reqwest::Error) -> AdapterError {
        if e.is_timeout() {
            AdapterError::Timeout(self.timeout_secs)
        } else {
            AdapterError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpBody, AdapterError> {
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }
        let resp = req.send().await.map_err(|e| self.map_err(e))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.map_err(e))?;
        tracing::debug!(url, status, bytes = body.len(), "http get");
        Ok(HttpBody { status, body })
    }
}
