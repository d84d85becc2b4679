// src/ingest/adapters/mod.rs
pub mod linkedin;
pub mod twitter;

use std::sync::Arc;

use async_trait::async_trait;

use crate::classify::{classify, Platform};
use crate::http::HttpFetch;
use crate::ingest::error::AdapterError;
use crate::ingest::types::FetchResult;

/// One adapter per supported platform. An adapter may try several strategies
/// internally; callers only see the final result.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;
    async fn fetch_excerpt(&self, url: &str) -> Result<FetchResult, AdapterError>;
}

/// Dispatch table: classifies the URL and hands it to the matching adapter.
pub struct AdapterSet {
    adapters: Vec<Box<dyn PlatformAdapter>>,
}

impl AdapterSet {
    /// The standard set: Twitter/X (API v2 when a bearer credential is
    /// configured, oEmbed otherwise or as fallback) and LinkedIn.
    pub fn standard(http: Arc<dyn HttpFetch>, twitter_bearer: Option<String>) -> Self {
        Self {
            adapters: vec![
                Box::new(twitter::TwitterAdapter::new(Arc::clone(&http), twitter_bearer)),
                Box::new(linkedin::LinkedInAdapter::new(http)),
            ],
        }
    }

    /// Fetch the canonical excerpt for one URL. URLs that classify to no
    /// known platform fail immediately, without a network call.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, AdapterError> {
        let platform = classify(url);
        match self.adapters.iter().find(|a| a.platform() == platform) {
            Some(adapter) => adapter.fetch_excerpt(url).await,
            None => Err(AdapterError::UnsupportedPlatform(url.to_string())),
        }
    }
}
