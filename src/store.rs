// src/store.rs
//
// The persisted, URL-keyed post store plus the reconciliation (upsert)
// rules. Persistence is whole-file replace; reconciliation is pure and
// in-memory so it can be tested without touching disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::classify::{classify, Platform};

/// Store I/O is invocation-fatal: without the store nothing can be
/// reconciled. Everything item-scoped lives in `AdapterError` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store serialization failure at {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One persisted post. Field declaration order is the on-disk order.
///
/// `id`, `date` and first-seen position are write-once; `source` follows the
/// current URL classification; `excerpt` is the only field routinely
/// overwritten by re-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub source: Platform,
    #[serde(default)]
    pub excerpt: String,
    /// Fields this pipeline does not own ride along untouched across a
    /// read-modify-write cycle.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Caller-supplied inputs for one reconciliation. Absent options mean "keep
/// what the store already has".
#[derive(Debug, Default, Clone)]
pub struct UpsertFields {
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: String,
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated { excerpt_changed: bool },
}

/// Insert-or-update keyed by exact `url` equality.
///
/// Insert appends to the end of the list, so first-seen order is preserved;
/// update mutates in place and never reorders. A freshly fetched excerpt
/// that degraded to empty is discarded unless `force` is set, so a
/// transient fetch failure cannot erase previously good content.
pub fn upsert(list: &mut Vec<PostRecord>, url: &str, fields: &UpsertFields) -> UpsertOutcome {
    let source = classify(url);
    match list.iter().position(|p| p.url == url) {
        Some(i) => {
            let existing = &mut list[i];
            // A populated id is never overwritten, not even by an explicit one.
            if existing.id.is_empty() {
                existing.id = fields.id.clone().unwrap_or_else(generated_id);
            }
            if let Some(date) = &fields.date {
                existing.date = date.clone();
            } else if existing.date.is_empty() {
                existing.date = now_iso();
            }
            if let Some(title) = &fields.title {
                existing.title = title.clone();
            }
            if existing.title.is_empty() {
                existing.title = source.default_title().to_string();
            }
            existing.source = source;

            let excerpt_changed = if fields.force || !fields.excerpt.is_empty() {
                let changed = existing.excerpt != fields.excerpt;
                existing.excerpt = fields.excerpt.clone();
                changed
            } else {
                false
            };
            UpsertOutcome::Updated { excerpt_changed }
        }
        None => {
            list.push(PostRecord {
                id: fields.id.clone().unwrap_or_else(generated_id),
                title: fields
                    .title
                    .clone()
                    .unwrap_or_else(|| source.default_title().to_string()),
                url: url.to_string(),
                date: fields.date.clone().unwrap_or_else(now_iso),
                source,
                excerpt: fields.excerpt.clone(),
                extra: serde_json::Map::new(),
            });
            UpsertOutcome::Inserted
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Millisecond-epoch fallback id. Fine for a single-operator tool, not
/// globally unique.
fn generated_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Persistence seam so reconciliation logic survives a future swap to a
/// datastore with row-level locking.
pub trait PostStore {
    fn load(&self) -> Result<Vec<PostRecord>, StoreError>;
    fn save(&self, posts: &[PostRecord]) -> Result<(), StoreError>;
}

/// Whole-file JSON store. Reads are permissive (missing or unparsable file
/// is an empty list); writes replace the file atomically via a sibling temp
/// file and rename.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PostStore for JsonFileStore {
    fn load(&self) -> Result<Vec<PostRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        match serde_json::from_str::<Vec<PostRecord>>(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unparsable store, starting from an empty list"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, posts: &[PostRecord]) -> Result<(), StoreError> {
        let mut body = serde_json::to_string_pretty(posts).map_err(|e| StoreError::Serialize {
            path: self.path.clone(),
            source: e,
        })?;
        body.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &body).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}
