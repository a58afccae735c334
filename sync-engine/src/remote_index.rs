//! # Remote Index
//!
//! Answers "what does the bucket already hold?" for the diff phase.
//!
//! ## Overview
//!
//! The index resolves in one of three ways according to the configured
//! remote-file mode:
//!
//! - `Ignore`: nothing is known; every local file re-uploads
//! - `Compare`/`Keep`: the persisted cache list when usable, otherwise a
//!   live bucket listing
//!
//! Listing keys pass through [`SyncConfig::strip_key`] so that foreign keys
//! outside the configured prefix never enter the index and can never be
//! scheduled for deletion.

use std::collections::BTreeSet;
use std::sync::Arc;

use store_traits::{ObjectStore, StoreError};
use tracing::{debug, info};

use crate::cache_list::CacheListStore;
use crate::config::{ExistingRemoteFiles, SyncConfig};
use crate::error::{Result, SyncError};

pub struct RemoteIndex {
    config: Arc<SyncConfig>,
    store: Arc<dyn ObjectStore>,
}

impl RemoteIndex {
    pub fn new(config: Arc<SyncConfig>, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Resolves the set of remote paths the diff should treat as present.
    ///
    /// Paths are local-space (prefix stripped).
    pub async fn resolve(&self, cache: &CacheListStore) -> Result<BTreeSet<String>> {
        if self.config.existing_remote_files == ExistingRemoteFiles::Ignore {
            debug!("Remote files ignored; treating the bucket as empty");
            return Ok(BTreeSet::new());
        }

        cache.fetch_remote().await?;
        if let Some(paths) = cache.load() {
            info!(entries = paths.len(), "Using persisted cache list as the remote index");
            return Ok(paths.into_iter().collect());
        }

        let listed = self.live_list().await?;
        info!(entries = listed.len(), "Using live bucket listing as the remote index");
        Ok(listed)
    }

    /// Lists the bucket and strips the configured prefix, dropping foreign
    /// keys. Always hits the store, never the cache.
    pub async fn live_list(&self) -> Result<BTreeSet<String>> {
        let keys = self
            .store
            .list(&self.config.bucket)
            .await
            .map_err(|e| match e {
                StoreError::BucketNotFound(bucket) => SyncError::BucketNotFound { bucket },
                other => SyncError::Provider(format!("failed to list bucket: {}", other)),
            })?;

        Ok(keys
            .iter()
            .filter_map(|key| self.config.strip_key(key))
            .collect())
    }
}
