// src/ingest/adapters/linkedin.rs
//
// Single strategy: fetch the post page and read its Open Graph /
// Twitter-card meta tags. No fallback exists for LinkedIn; a failure here is
// terminal for that URL only.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::json;

use super::PlatformAdapter;
use crate::classify::Platform;
use crate::http::HttpFetch;
use crate::ingest::error::AdapterError;
use crate::ingest::types::{FetchMethod, FetchResult};
use crate::normalize::decode_entities;

pub struct LinkedInAdapter {
    http: Arc<dyn HttpFetch>,
}

impl LinkedInAdapter {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PlatformAdapter for LinkedInAdapter {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    async fn fetch_excerpt(&self, url: &str) -> Result<FetchResult, AdapterError> {
        let resp = match self.http.get(url, &[]).await {
            Ok(resp) => resp,
            // Timeouts keep their kind; everything else is a scrape failure.
            Err(AdapterError::Timeout(secs)) => return Err(AdapterError::Timeout(secs)),
            Err(e) => return Err(AdapterError::ScrapeFailure(e.to_string())),
        };
        if !(200..300).contains(&resp.status) {
            return Err(AdapterError::ScrapeFailure(format!(
                "meta scrape returned status {}",
                resp.status
            )));
        }

        let title = meta_content(&resp.body, "og:title")
            .or_else(|| meta_content(&resp.body, "twitter:title"))
            .unwrap_or_default();
        let description = meta_content(&resp.body, "og:description")
            .or_else(|| meta_content(&resp.body, "twitter:description"))
            .unwrap_or_default();

        let composed = [title.as_str(), description.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ");

        Ok(FetchResult {
            platform: Platform::LinkedIn,
            method: FetchMethod::OpenGraph,
            author: None,
            url: url.to_string(),
            raw: json!({ "title": title, "description": description }),
            content: decode_entities(&composed),
            warning: None,
        })
    }
}

/// Pull `content="..."` out of the first meta tag carrying the given
/// property/name key. Two steps so attribute order inside the tag does not
/// matter.
fn meta_content(html: &str, key: &str) -> Option<String> {
    static RE_CONTENT: OnceCell<Regex> = OnceCell::new();
    let re_content =
        RE_CONTENT.get_or_init(|| Regex::new(r#"(?is)content\s*=\s*["']([^"']*)["']"#).unwrap());

    let re_tag = Regex::new(&format!(
        r#"(?is)<meta\b[^>]*(?:property|name)\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(key)
    ))
    .ok()?;

    let tag = re_tag.find(html)?.as_str();
    re_content.captures(tag).map(|c| c[1].to_string())
}
