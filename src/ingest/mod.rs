// src/ingest/mod.rs
pub mod adapters;
pub mod error;
pub mod types;

use crate::classify::{classify, Platform};
use crate::store::{upsert, PostStore, StoreError, UpsertFields, UpsertOutcome};
use adapters::AdapterSet;
use error::AdapterError;
use types::FetchResult;

/// Outcome for one input URL. Failures are data here, not control flow; a
/// broken or deleted post must not block the rest of a batch.
#[derive(Debug)]
pub struct IngestOutcome {
    pub url: String,
    pub result: Result<FetchResult, AdapterError>,
}

/// Fetch every URL, one at a time, in input order. The batch call itself
/// never fails; each item resolves to a success or a classified failure.
pub async fn ingest_batch(adapters: &AdapterSet, urls: &[String]) -> Vec<IngestOutcome> {
    let mut outcomes = Vec::with_capacity(urls.len());
    for url in urls {
        let result = adapters.fetch(url).await;
        if let Err(e) = &result {
            tracing::warn!(url = %url, error = %e, "ingest failed");
        }
        outcomes.push(IngestOutcome {
            url: url.clone(),
            result,
        });
    }
    outcomes
}

/// Re-ingest every record in the store whose URL maps to a known platform.
///
/// Records that classify `Unknown` (first-party posts with no external
/// source) are skipped. Per-record fetch failures are logged and excluded
/// from the count; the run completes regardless. Returns how many records
/// actually changed — an update counts only when the excerpt changed or
/// `force` was set.
pub async fn refresh_store<S: PostStore>(
    adapters: &AdapterSet,
    store: &S,
    force: bool,
) -> Result<usize, StoreError> {
    let mut list = store.load()?;

    let eligible: Vec<String> = list
        .iter()
        .filter(|rec| !rec.url.is_empty() && classify(&rec.url) != Platform::Unknown)
        .map(|rec| rec.url.clone())
        .collect();
    tracing::info!(total = list.len(), eligible = eligible.len(), "refreshing store");

    let mut updated = 0usize;
    for url in eligible {
        let fetched = match adapters.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "refresh failed, keeping previous excerpt");
                continue;
            }
        };
        let fields = UpsertFields {
            excerpt: fetched.content,
            force,
            ..Default::default()
        };
        if let UpsertOutcome::Updated { excerpt_changed } = upsert(&mut list, &url, &fields) {
            if excerpt_changed || force {
                updated += 1;
            }
        }
    }

    store.save(&list)?;
    Ok(updated)
}
