// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

const ENV_BEARER: &str = "TWITTER_BEARER_TOKEN";
const ENV_STORE_PATH: &str = "POSTS_STORE_PATH";
const ENV_HTTP_TIMEOUT: &str = "INGEST_HTTP_TIMEOUT_SECS";

pub const DEFAULT_STORE_PATH: &str = "public/posts.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Environment-supplied configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enables the Twitter official-API strategy when present. Absence is
    /// not an error; it narrows the adapter to its embed-only path.
    pub twitter_bearer: Option<String>,
    pub store_path: PathBuf,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let twitter_bearer = std::env::var(ENV_BEARER)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let store_path = std::env::var(ENV_STORE_PATH)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        let http_timeout = match std::env::var(ENV_HTTP_TIMEOUT) {
            Ok(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %v,
                        "unparsable INGEST_HTTP_TIMEOUT_SECS, using default"
                    );
                    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Self {
            twitter_bearer,
            store_path,
            http_timeout,
        }
    }
}
