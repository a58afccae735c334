//! # Sync Coordinator
//!
//! Drives one full sync run end to end.
//!
//! ## Overview
//!
//! A run proceeds in phases:
//!
//! 1. Verify the bucket exists
//! 2. Resolve the local file set and the remote index
//! 3. Diff into an upload set and plan each transfer
//! 4. Compute the deletion set (compare mode only, against a live listing)
//! 5. Execute uploads
//! 6. Delete stale remote objects
//! 7. Persist the cache list
//! 8. Request CDN invalidation when configured
//!
//! Any phase error aborts the run; the phases are ordered so an abort never
//! deletes an object whose replacement failed to upload. The deletion
//! listing is taken before the upload phase, and planned upload paths are
//! subtracted from the deletion set, so an object written this run can
//! never be scheduled as stale by the same run.
//!
//! ## Usage
//!
//! ```ignore
//! let coordinator = SyncCoordinator::new(config, store).with_cdn(cdn);
//! let report = coordinator.sync().await?;
//! println!("uploaded {} objects", report.uploaded.len());
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use store_traits::{CdnClient, ObjectStore};
use tracing::{info, instrument};

use crate::cache_list::CacheListStore;
use crate::cdn::CdnInvalidator;
use crate::config::{ExistingRemoteFiles, SyncConfig};
use crate::deleter::DeletionCoordinator;
use crate::diff::DiffEngine;
use crate::error::{Result, SyncError};
use crate::policy::TransferPolicy;
use crate::remote_index::RemoteIndex;
use crate::resolver::FileSetResolver;
use crate::uploader::UploadCoordinator;

/// Outcome of a completed sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Remote keys written this run
    pub uploaded: Vec<String>,
    /// Remote keys removed this run
    pub deleted: Vec<String>,
    /// Provider id of the CDN invalidation request, when one was made
    pub invalidation_id: Option<String>,
}

pub struct SyncCoordinator {
    config: Arc<SyncConfig>,
    store: Arc<dyn ObjectStore>,
    cdn: Option<Arc<dyn CdnClient>>,
}

impl SyncCoordinator {
    pub fn new(config: Arc<SyncConfig>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config,
            store,
            cdn: None,
        }
    }

    pub fn with_cdn(mut self, client: Arc<dyn CdnClient>) -> Self {
        self.cdn = Some(client);
        self
    }

    /// Runs one sync and reports what changed.
    #[instrument(skip_all, fields(bucket = %self.config.bucket))]
    pub async fn sync(&self) -> Result<SyncReport> {
        if !self
            .store
            .bucket_exists(&self.config.bucket)
            .await
            .map_err(|e| SyncError::Provider(format!("bucket check failed: {}", e)))?
        {
            return Err(SyncError::BucketNotFound {
                bucket: self.config.bucket.clone(),
            });
        }

        info!("Phase 1: Resolving local file set");
        let local = FileSetResolver::from_config(&self.config).resolve()?;

        info!("Phase 2: Resolving remote index");
        let cache = CacheListStore::new(self.config.clone(), self.store.clone());
        let index = RemoteIndex::new(self.config.clone(), self.store.clone());
        let remote = index.resolve(&cache).await?;

        info!(
            local = local.len(),
            remote = remote.len(),
            "Phase 3: Computing upload set"
        );
        let diff = DiffEngine::new(&self.config.asset_root);
        let upload_set = diff.compute_upload_set(
            &local,
            &remote,
            &self.config.ignored,
            &self.config.always_upload,
        );

        let policy = TransferPolicy::new(self.config.clone());
        let mut planned_paths = Vec::new();
        let mut specs = Vec::new();
        for path in &upload_set {
            if let Some(spec) = policy.plan_transfer(path)? {
                planned_paths.push(path.clone());
                specs.push(spec);
            }
        }

        let mut deleted_paths = BTreeSet::new();
        if self.config.existing_remote_files == ExistingRemoteFiles::Compare {
            info!("Phase 4: Computing deletion set");
            // Deletion decisions always come from a live listing; the cached
            // index may be missing objects another writer uploaded. The
            // listing is taken before the upload phase, and planned paths
            // are protected explicitly: the upload set can name paths the
            // resolver never saw (canonical aliases of manifest-sourced
            // fingerprinted files), and those must not read as stale.
            let remote_live = index.live_list().await?;
            deleted_paths = diff.compute_deletion_set(
                &remote_live,
                &local,
                &self.config.ignored,
                &self.config.always_upload,
            );
            deleted_paths.retain(|path| !upload_set.contains(path));
        }

        info!(count = specs.len(), "Phase 5: Uploading");
        let uploaded: Vec<String> = specs.iter().map(|spec| spec.key.clone()).collect();
        UploadCoordinator::new(self.store.clone(), self.config.bucket.clone())
            .with_concurrency(self.config.concurrent_uploads)
            .execute(specs)
            .await?;

        info!(count = deleted_paths.len(), "Phase 6: Deleting stale remote objects");
        let deleted = DeletionCoordinator::new(self.config.clone(), self.store.clone())
            .execute(&deleted_paths)
            .await?;

        if self.config.existing_remote_files != ExistingRemoteFiles::Ignore {
            info!("Phase 7: Persisting cache list");
            let previous: Vec<String> = remote
                .iter()
                .filter(|path| !deleted_paths.contains(*path))
                .cloned()
                .collect();
            cache.persist(&planned_paths, &previous).await?;
        }

        let mut invalidation_id = None;
        if let (Some(client), Some(distribution_id)) =
            (&self.cdn, &self.config.cdn_distribution_id)
        {
            info!("Phase 8: Requesting CDN invalidation");
            invalidation_id = CdnInvalidator::new(
                client.clone(),
                distribution_id.clone(),
                self.config.invalidation_paths.clone(),
            )
            .invalidate()
            .await?;
        }

        info!(
            uploaded = uploaded.len(),
            deleted = deleted.len(),
            "Sync complete"
        );
        Ok(SyncReport {
            uploaded,
            deleted,
            invalidation_id,
        })
    }
}
