// src/ingest/adapters/twitter.rs
//
// Two strategies, tried in priority order: the official API v2 single-tweet
// endpoint (needs a bearer credential), then the public oEmbed endpoint.
// The order is data held by the adapter, not nested error handling.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::PlatformAdapter;
use crate::classify::Platform;
use crate::http::HttpFetch;
use crate::ingest::error::AdapterError;
use crate::ingest::types::{FetchMethod, FetchResult};
use crate::normalize::{decode_entities, extract_excerpt};

const API_BASE: &str = "https://api.twitter.com/2/tweets";
const OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

enum Strategy {
    ApiV2 { bearer: String },
    Oembed,
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::ApiV2 { .. } => "api_v2",
            Strategy::Oembed => "oembed",
        }
    }
}

pub struct TwitterAdapter {
    http: Arc<dyn HttpFetch>,
    strategies: Vec<Strategy>,
}

impl TwitterAdapter {
    /// Without a bearer credential the adapter narrows to its oEmbed-only
    /// path; that is not an error.
    pub fn new(http: Arc<dyn HttpFetch>, bearer: Option<String>) -> Self {
        let mut strategies = Vec::new();
        if let Some(bearer) = bearer {
            strategies.push(Strategy::ApiV2 { bearer });
        }
        strategies.push(Strategy::Oembed);
        Self { http, strategies }
    }

    async fn via_api(&self, bearer: &str, url: &str) -> Result<FetchResult, AdapterError> {
        let tweet_id =
            extract_post_id(url).ok_or_else(|| AdapterError::UrlParseFailure(url.to_string()))?;

        let mut api_url = Url::parse(API_BASE).expect("api base url");
        api_url
            .path_segments_mut()
            .expect("api base has a path")
            .push(&tweet_id);
        api_url
            .query_pairs_mut()
            .append_pair(
                "tweet.fields",
                "created_at,lang,public_metrics,entities,author_id",
            )
            .append_pair("expansions", "author_id")
            .append_pair("user.fields", "name,username,verified");

        let auth = [("authorization", format!("Bearer {bearer}"))];
        let resp = self.http.get(api_url.as_str(), &auth).await?;
        if resp.status != 200 {
            return Err(AdapterError::Upstream {
                status: resp.status,
                detail: upstream_detail(&resp.body),
            });
        }

        let raw: Value = serde_json::from_str(&resp.body).map_err(|e| AdapterError::Upstream {
            status: resp.status,
            detail: format!("unparsable tweet payload: {e}"),
        })?;
        let lookup: TweetLookup =
            serde_json::from_value(raw.clone()).map_err(|e| AdapterError::Upstream {
                status: resp.status,
                detail: format!("unexpected tweet payload shape: {e}"),
            })?;

        let author = lookup
            .data
            .author_id
            .as_deref()
            .and_then(|id| lookup.includes.users.iter().find(|u| u.id == id))
            .map(|u| format!("{} (@{})", u.name, u.username));

        Ok(FetchResult {
            platform: Platform::Twitter,
            method: FetchMethod::ApiV2,
            author,
            url: url.to_string(),
            raw,
            // API text carries entities but no markup; decode only.
            content: decode_entities(&lookup.data.text),
            warning: None,
        })
    }

    async fn via_oembed(&self, url: &str) -> Result<FetchResult, AdapterError> {
        let mut endpoint = Url::parse(OEMBED_ENDPOINT).expect("oembed endpoint url");
        endpoint.query_pairs_mut().append_pair("url", url);

        let resp = self.http.get(endpoint.as_str(), &[]).await?;
        if resp.status != 200 {
            return Err(AdapterError::Upstream {
                status: resp.status,
                detail: upstream_detail(&resp.body),
            });
        }

        let raw: Value = serde_json::from_str(&resp.body).map_err(|e| AdapterError::Upstream {
            status: resp.status,
            detail: format!("unparsable oembed payload: {e}"),
        })?;
        let payload: OembedPayload =
            serde_json::from_value(raw.clone()).map_err(|e| AdapterError::Upstream {
                status: resp.status,
                detail: format!("unexpected oembed payload shape: {e}"),
            })?;

        Ok(FetchResult {
            platform: Platform::Twitter,
            method: FetchMethod::Oembed,
            author: payload.author_name,
            url: url.to_string(),
            raw,
            content: extract_excerpt(&payload.html),
            warning: None,
        })
    }
}

#[async_trait]
impl PlatformAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch_excerpt(&self, url: &str) -> Result<FetchResult, AdapterError> {
        let mut failures: Vec<(&'static str, AdapterError)> = Vec::new();
        for strategy in &self.strategies {
            let attempt = match strategy {
                Strategy::ApiV2 { bearer } => self.via_api(bearer, url).await,
                Strategy::Oembed => self.via_oembed(url).await,
            };
            match attempt {
                Ok(mut result) => {
                    if let Some((failed, cause)) = failures.first() {
                        tracing::warn!(
                            url,
                            failed_strategy = *failed,
                            used_strategy = strategy.name(),
                            error = %cause,
                            "fell back after strategy failure"
                        );
                        result.warning = Some(format!("API failed: {cause}"));
                    }
                    return Ok(result);
                }
                Err(e) => failures.push((strategy.name(), e)),
            }
        }
        // The strategy list is never empty, so the last failure is the final
        // (embed) strategy's error.
        match failures.pop() {
            Some((_, e)) => Err(e),
            None => Err(AdapterError::UnsupportedPlatform(url.to_string())),
        }
    }
}

/// The numeric post id is the path segment following `status`, e.g.
/// `https://x.com/{user}/status/{id}`.
fn extract_post_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    segments.find(|s| *s == "status")?;
    segments.next().map(str::to_string)
}

/// Upstream error bodies are usually JSON with an `error` or `title` field;
/// surface that, or the whole body when the shape is unfamiliar.
fn upstream_detail(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        for key in ["error", "title"] {
            if let Some(s) = v.get(key).and_then(Value::as_str) {
                return s.to_string();
            }
        }
    }
    body.to_string()
}

#[derive(Debug, Deserialize)]
struct TweetLookup {
    data: Tweet,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[serde(default)]
    text: String,
    author_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    name: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct OembedPayload {
    #[serde(default)]
    html: String,
    author_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_follows_status_segment() {
        assert_eq!(
            extract_post_id("https://x.com/someone/status/1234567890").as_deref(),
            Some("1234567890")
        );
        assert_eq!(
            extract_post_id("https://twitter.com/a/status/42?s=20").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn missing_status_segment_yields_none() {
        assert_eq!(extract_post_id("https://x.com/someone"), None);
        assert_eq!(extract_post_id("https://x.com/someone/status"), None);
        assert_eq!(extract_post_id("not a url"), None);
    }

    #[test]
    fn upstream_detail_prefers_error_field() {
        assert_eq!(upstream_detail(r#"{"error":"rate limited"}"#), "rate limited");
        assert_eq!(upstream_detail(r#"{"title":"Too Many Requests"}"#), "Too Many Requests");
        assert_eq!(upstream_detail("plain body"), "plain body");
    }
}
