// src/classify.rs
use serde::{Deserialize, Serialize};
use url::Url;

/// Origin platform of a post URL, derived from the hostname.
///
/// The serialized tag doubles as the `source` field of persisted records.
/// Older store files written before the rename carry `"x"` for Twitter;
/// the alias keeps them readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "x")]
    Twitter,
    LinkedIn,
    #[default]
    Unknown,
}

impl Platform {
    /// Display label used when the caller supplies no title.
    pub fn default_title(&self) -> &'static str {
        match self {
            Platform::Twitter => "X Post",
            Platform::LinkedIn => "LinkedIn Post",
            Platform::Unknown => "Post",
        }
    }
}

const TWITTER_HOSTS: [&str; 4] = ["twitter.com", "www.twitter.com", "x.com", "www.x.com"];

/// Map a URL to its origin platform by hostname inspection.
///
/// Malformed URLs classify as `Unknown` rather than erroring; classification
/// only narrows adapter choice, it must never fail the pipeline.
pub fn classify(url: &str) -> Platform {
    let Ok(parsed) = Url::parse(url) else {
        return Platform::Unknown;
    };
    let Some(host) = parsed.host_str() else {
        return Platform::Unknown;
    };
    if TWITTER_HOSTS.contains(&host) {
        Platform::Twitter
    } else if host.ends_with("linkedin.com") {
        Platform::LinkedIn
    } else {
        Platform::Unknown
    }
}
