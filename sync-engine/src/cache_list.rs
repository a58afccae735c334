//! # Cache List Store
//!
//! Persists the set of known-remote paths between runs so subsequent syncs
//! can skip listing the bucket.
//!
//! ## Overview
//!
//! The list is a JSON array of local-space paths (no prefix) at a configured
//! file path. Reads are best-effort: a missing or corrupt file degrades to a
//! live bucket listing with a warning, never a failed sync. When a remote
//! cache key is configured, the file is also fetched before the run and
//! mirrored to the bucket after it, so machines that have never synced still
//! start from a warm list.

use std::sync::Arc;

use bytes::Bytes;
use store_traits::{ObjectMetadata, ObjectStore, PutRequest};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

pub struct CacheListStore {
    config: Arc<SyncConfig>,
    store: Arc<dyn ObjectStore>,
}

impl CacheListStore {
    pub fn new(config: Arc<SyncConfig>, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Pulls the bucket-hosted copy of the cache list over the local file.
    ///
    /// Fetch errors are downgraded to warnings; the caller falls back to
    /// whatever the local file holds, or a live listing.
    pub async fn fetch_remote(&self) -> Result<()> {
        let (Some(local_path), Some(remote_key)) =
            (&self.config.cache_list_path, &self.config.remote_cache_key)
        else {
            return Ok(());
        };

        match self.store.get(&self.config.bucket, remote_key).await {
            Ok(Some(body)) => {
                std::fs::write(local_path, &body)?;
                debug!(key = %remote_key, "Fetched remote cache list");
            }
            Ok(None) => {
                debug!(key = %remote_key, "No remote cache list yet");
            }
            Err(error) => {
                warn!(key = %remote_key, %error, "Failed to fetch remote cache list");
            }
        }

        Ok(())
    }

    /// Loads the previously persisted path list, or `None` when absent or
    /// unparseable.
    pub fn load(&self) -> Option<Vec<String>> {
        let path = self.config.cache_list_path.as_ref()?;

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                debug!(path = %path.display(), %error, "No usable cache list");
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(paths) => Some(paths),
            Err(error) => {
                warn!(path = %path.display(), %error, "Cache list is corrupt; ignoring it");
                None
            }
        }
    }

    /// Writes the union of this run's uploads and the previously known
    /// paths, then mirrors the file to the bucket when configured.
    pub async fn persist(&self, uploaded: &[String], previous: &[String]) -> Result<()> {
        let Some(local_path) = &self.config.cache_list_path else {
            return Ok(());
        };

        let mut merged: Vec<String> = previous.to_vec();
        for path in uploaded {
            if !merged.contains(path) {
                merged.push(path.clone());
            }
        }
        merged.sort();

        let body = serde_json::to_vec_pretty(&merged)
            .map_err(|e| SyncError::Cache(format!("failed to encode cache list: {}", e)))?;
        std::fs::write(local_path, &body)?;
        info!(
            path = %local_path.display(),
            entries = merged.len(),
            "Persisted cache list"
        );

        if let Some(remote_key) = &self.config.remote_cache_key {
            let request = PutRequest {
                key: remote_key.clone(),
                body: Bytes::from(body),
                metadata: ObjectMetadata {
                    content_type: Some("application/json".to_string()),
                    ..ObjectMetadata::default()
                },
            };
            self.store
                .put(&self.config.bucket, request)
                .await
                .map_err(|e| SyncError::Cache(format!("failed to mirror cache list: {}", e)))?;
            debug!(key = %remote_key, "Mirrored cache list to bucket");
        }

        Ok(())
    }
}
