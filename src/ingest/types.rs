// src/ingest/types.rs
use serde::Serialize;
use serde_json::Value;

use crate::classify::Platform;

/// Which strategy produced a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMethod {
    ApiV2,
    Oembed,
    OpenGraph,
}

/// Canonical excerpt fetched for one post URL. Transient, never persisted;
/// the reconciler folds `content` into the store as the record's excerpt.
///
/// Serialized field order is the stdout contract of direct mode.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub platform: Platform,
    pub method: FetchMethod,
    pub author: Option<String>,
    pub url: String,
    /// Upstream payload as received, for operator inspection.
    pub raw: Value,
    /// Normalized excerpt text.
    pub content: String,
    /// Set when a fallback strategy had to step in after the preferred one
    /// failed; carries the preferred strategy's failure cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
