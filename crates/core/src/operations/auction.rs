//! Auction snapshot fetch
//!
//! The auction resource answers with a manifest of dated snapshot files
//! rather than the data itself. Every snapshot newer than the caller's
//! watermark is downloaded from its absolute URL (no bearer token) and
//! returned as `{ "lastModified": n, "data": <payload> }`, in manifest order.

use armory_domain::{ArmoryError, Result};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::request::RequestExecutor;

#[derive(Debug, Deserialize)]
struct SnapshotManifest {
    files: Vec<SnapshotFile>,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    url: String,
    #[serde(rename = "lastModified")]
    last_modified: i64,
}

/// Download every snapshot in `manifest` newer than `watermark`.
///
/// Downloads run concurrently; the first failure fails the whole fetch.
///
/// # Errors
/// - `ArmoryError::Decode` if the manifest has no `files` array or an entry
///   lacks `url`/`lastModified`
/// - Any error from the follow-up downloads
#[instrument(skip(executor, manifest))]
pub async fn fetch_snapshots(
    executor: &RequestExecutor,
    manifest: Value,
    watermark: i64,
) -> Result<Value> {
    let manifest: SnapshotManifest = serde_json::from_value(manifest)
        .map_err(|e| ArmoryError::Decode(format!("invalid auction manifest: {e}")))?;

    let newer: Vec<_> =
        manifest.files.into_iter().filter(|file| file.last_modified > watermark).collect();
    debug!(snapshots = newer.len(), "Fetching auction snapshots");

    let downloads = newer.iter().map(|file| async move {
        let data = executor.fetch_unauthenticated(&file.url).await?;
        Ok::<_, ArmoryError>(json!({ "lastModified": file.last_modified, "data": data }))
    });

    try_join_all(downloads).await.map(Value::Array)
}
