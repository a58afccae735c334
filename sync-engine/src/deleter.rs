//! # Deletion Coordinator
//!
//! Removes remote objects with no surviving local counterpart.
//!
//! ## Overview
//!
//! The coordinator receives local-space paths already vetted by the diff
//! phase (never ignored or always-upload paths), reapplies the remote
//! prefix, and issues deletes. Providers that advertise bulk deletion get
//! batches of at most [`BULK_DELETE_BATCH_SIZE`] keys; everything else is
//! deleted one key at a time.

use std::collections::BTreeSet;
use std::sync::Arc;

use store_traits::ObjectStore;
use tracing::{info, instrument};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// Largest batch a single bulk-delete request may carry.
pub const BULK_DELETE_BATCH_SIZE: usize = 500;

pub struct DeletionCoordinator {
    config: Arc<SyncConfig>,
    store: Arc<dyn ObjectStore>,
}

impl DeletionCoordinator {
    pub fn new(config: Arc<SyncConfig>, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Deletes the given local-space paths from the bucket, returning the
    /// remote keys removed.
    #[instrument(skip_all, fields(count = paths.len()))]
    pub async fn execute(&self, paths: &BTreeSet<String>) -> Result<Vec<String>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = paths.iter().map(|p| self.config.remote_key(p)).collect();

        if self.store.supports_bulk_delete() {
            for batch in keys.chunks(BULK_DELETE_BATCH_SIZE) {
                info!(batch = batch.len(), "Bulk deleting remote objects");
                self.store
                    .bulk_delete(&self.config.bucket, batch)
                    .await
                    .map_err(|e| SyncError::Deletion(e.to_string()))?;
            }
        } else {
            for key in &keys {
                info!(key = %key, "Deleting remote object");
                self.store
                    .delete(&self.config.bucket, key)
                    .await
                    .map_err(|e| SyncError::Deletion(format!("{}: {}", key, e)))?;
            }
        }

        Ok(keys)
    }
}
