// src/ingest/error.rs
use thiserror::Error;

/// Failure of a single adapter call.
///
/// Item-scoped: the orchestrator converts these into per-item outcomes, so a
/// bad URL or a flaky upstream never aborts the rest of a batch.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The URL matches no known adapter. Never triggers a network call.
    #[error("unsupported platform for {0}")]
    UnsupportedPlatform(String),

    /// The URL classified fine but a required identifier could not be
    /// extracted from it.
    #[error("could not parse a post id from {0}")]
    UrlParseFailure(String),

    /// Non-success response from an external API.
    #[error("upstream error ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    /// Connection-level failure before any status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The meta-tag scrape reported an error.
    #[error("scrape failed: {0}")]
    ScrapeFailure(String),

    /// External call exceeded its bound.
    #[error("request timed out after {0}s")]
    Timeout(u64),
}
