//! Snapshot storage for analyzed batches.
//!
//! [`SnapshotStore`] is the seam to an object store. The pipeline only
//! writes through it best-effort: a failed save is logged and counted,
//! never returned to the caller.
//!
//! [`FsSnapshotStore`] keeps one directory per bucket under a root
//! directory, one pretty-printed JSON file per blob:
//!
//! ```text
//! {root}/{bucket}/comments_{video_id}_{YYYYmmdd_HHMMSS}.json
//! {root}/{bucket}/videos_data_{YYYYmmdd_HHMMSS}.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::telemetry;
use crate::types::{AnalyzedComment, Video};
use crate::{Result, SentimeterError};

/// Size and modification time of a stored blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobInfo {
    pub name: String,
    pub size: u64,
    pub updated: Option<DateTime<Utc>>,
}

/// Object-store seam for analysis snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Bucket the store writes to.
    fn bucket(&self) -> &str;

    /// Save the analyzed comments of one video. Returns the blob name.
    async fn save_comments(&self, video_id: &str, comments: &[AnalyzedComment]) -> Result<String>;

    /// Save a list of videos. Returns the blob name.
    async fn save_videos(&self, videos: &[Video]) -> Result<String>;

    /// Load a blob as JSON.
    async fn load(&self, blob: &str) -> Result<serde_json::Value>;

    /// List blob names, optionally filtered by prefix, sorted by name.
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    async fn metadata(&self, blob: &str) -> Result<BlobInfo>;

    async fn delete(&self, blob: &str) -> Result<()>;
}

/// Filesystem-backed snapshot store.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    bucket: String,
    dir: PathBuf,
}

impl FsSnapshotStore {
    /// Open a bucket under `root`, creating its directory if needed.
    pub async fn open(root: impl AsRef<Path>, bucket: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        validate_name(&bucket)?;
        let dir = root.as_ref().join(&bucket);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            SentimeterError::Storage(format!("Failed to create bucket {bucket}: {e}"))
        })?;
        debug!(bucket = %bucket, dir = ?dir, "snapshot bucket ready");
        Ok(Self { bucket, dir })
    }

    /// Like [`open`](Self::open), but a bucket that cannot be opened is
    /// logged and counted as a snapshot failure instead of returned.
    pub async fn open_best_effort(
        root: impl AsRef<Path>,
        bucket: impl Into<String>,
    ) -> Option<Self> {
        match Self::open(root, bucket).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "snapshot storage unavailable, results will not be saved");
                metrics::counter!(telemetry::SNAPSHOT_FAILURES_TOTAL).increment(1);
                None
            }
        }
    }

    fn blob_path(&self, blob: &str) -> Result<PathBuf> {
        validate_name(blob)?;
        Ok(self.dir.join(blob))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, blob: &str, value: &T) -> Result<()> {
        let path = self.blob_path(blob)?;
        let json = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| SentimeterError::Storage(format!("Failed to write {blob}: {e}")))
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn save_comments(&self, video_id: &str, comments: &[AnalyzedComment]) -> Result<String> {
        if video_id.trim().is_empty() || comments.is_empty() {
            return Err(SentimeterError::InvalidInput(
                "missing video id or comments".to_string(),
            ));
        }
        let blob = format!("comments_{video_id}_{}.json", timestamp());
        self.write_json(&blob, comments).await?;
        info!(
            bucket = %self.bucket,
            blob = %blob,
            count = comments.len(),
            "saved comment snapshot"
        );
        Ok(blob)
    }

    async fn save_videos(&self, videos: &[Video]) -> Result<String> {
        if videos.is_empty() {
            return Err(SentimeterError::InvalidInput("no videos to save".to_string()));
        }
        let blob = format!("videos_data_{}.json", timestamp());
        self.write_json(&blob, videos).await?;
        info!(bucket = %self.bucket, blob = %blob, count = videos.len(), "saved video snapshot");
        Ok(blob)
    }

    async fn load(&self, blob: &str) -> Result<serde_json::Value> {
        let path = self.blob_path(blob)?;
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SentimeterError::Storage(format!(
                    "{blob} not found in bucket {}",
                    self.bucket
                )));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&content)
            .map_err(|e| SentimeterError::DataError(format!("Invalid JSON in {blob}: {e}")))
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if prefix.is_none_or(|p| name.starts_with(p)) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn metadata(&self, blob: &str) -> Result<BlobInfo> {
        let path = self.blob_path(blob)?;
        let meta = tokio::fs::metadata(&path).await?;
        Ok(BlobInfo {
            name: blob.to_string(),
            size: meta.len(),
            updated: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    async fn delete(&self, blob: &str) -> Result<()> {
        let path = self.blob_path(blob)?;
        tokio::fs::remove_file(&path).await?;
        info!(bucket = %self.bucket, blob = %blob, "deleted snapshot");
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Bucket and blob names are single path components.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(SentimeterError::InvalidInput(format!(
            "invalid bucket or blob name: {name:?}"
        )));
    }
    Ok(())
}
