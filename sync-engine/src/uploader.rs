//! # Upload Coordinator
//!
//! Executes a batch of planned transfers against the object store.
//!
//! ## Overview
//!
//! With no concurrency limit configured, uploads run sequentially in planning
//! order. With a limit of N, at most `min(N, batch size)` workers pull specs
//! from a shared cursor; the first failure raises a stop flag, in-flight
//! uploads finish, no new ones start, and the first error is returned.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use store_traits::{ObjectStore, PutRequest};
use tracing::{error, info, instrument};

use crate::error::{Result, SyncError};
use crate::policy::TransferSpec;

#[derive(Clone)]
pub struct UploadCoordinator {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    concurrency: Option<usize>,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            concurrency: None,
        }
    }

    /// Caps the number of in-flight uploads. `None` means sequential.
    pub fn with_concurrency(mut self, max_workers: Option<usize>) -> Self {
        self.concurrency = max_workers;
        self
    }

    /// Uploads every spec, returning the first error encountered.
    #[instrument(skip_all, fields(count = specs.len()))]
    pub async fn execute(&self, specs: Vec<TransferSpec>) -> Result<()> {
        if specs.is_empty() {
            return Ok(());
        }

        match self.concurrency {
            Some(max_workers) => self.execute_concurrent(specs, max_workers).await,
            None => {
                for spec in &specs {
                    self.upload_one(spec).await?;
                }
                Ok(())
            }
        }
    }

    async fn execute_concurrent(&self, specs: Vec<TransferSpec>, max_workers: usize) -> Result<()> {
        let workers = max_workers.min(specs.len());
        let specs = Arc::new(specs);
        let next = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let coordinator = self.clone();
            let specs = specs.clone();
            let next = next.clone();
            let failed = failed.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if failed.load(Ordering::Acquire) {
                        return Ok(());
                    }
                    let Some(spec) = specs.get(next.fetch_add(1, Ordering::Relaxed)) else {
                        return Ok(());
                    };
                    if let Err(e) = coordinator.upload_one(spec).await {
                        failed.store(true, Ordering::Release);
                        return Err(e);
                    }
                }
            }));
        }

        let mut first_error = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(join_error) => {
                    error!(%join_error, "Upload worker panicked");
                    if first_error.is_none() {
                        first_error = Some(SyncError::WorkerPanic);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn upload_one(&self, spec: &TransferSpec) -> Result<()> {
        let body = tokio::fs::read(&spec.body_path).await.map_err(|e| {
            SyncError::Upload {
                key: spec.key.clone(),
                message: format!("failed to read {}: {}", spec.body_path.display(), e),
            }
        })?;

        info!(
            key = %spec.key,
            bytes = body.len(),
            content_type = spec.content_type.as_deref().unwrap_or("-"),
            encoding = spec.content_encoding.as_deref().unwrap_or("-"),
            "Uploading"
        );

        let request = PutRequest {
            key: spec.key.clone(),
            body: Bytes::from(body),
            metadata: spec.metadata(),
        };
        self.store
            .put(&self.bucket, request)
            .await
            .map_err(|e| SyncError::Upload {
                key: spec.key.clone(),
                message: e.to_string(),
            })
    }
}
