//! # CDN Invalidation
//!
//! Issues a cache invalidation for the configured paths after a sync that
//! changed the bucket, via the provider-agnostic
//! [`CdnClient`](store_traits::CdnClient) trait.

use std::sync::Arc;

use store_traits::CdnClient;
use tracing::{debug, info};

use crate::error::{Result, SyncError};

pub struct CdnInvalidator {
    client: Arc<dyn CdnClient>,
    distribution_id: String,
    paths: Vec<String>,
}

impl CdnInvalidator {
    pub fn new(
        client: Arc<dyn CdnClient>,
        distribution_id: impl Into<String>,
        paths: Vec<String>,
    ) -> Self {
        Self {
            client,
            distribution_id: distribution_id.into(),
            paths,
        }
    }

    /// Requests the invalidation, returning the provider's request id, or
    /// `None` when no paths are configured.
    pub async fn invalidate(&self) -> Result<Option<String>> {
        if self.paths.is_empty() {
            debug!("No invalidation paths configured; skipping CDN invalidation");
            return Ok(None);
        }

        let request_id = self
            .client
            .invalidate(&self.distribution_id, &self.paths)
            .await
            .map_err(|e| SyncError::Invalidation(e.to_string()))?;

        info!(
            distribution = %self.distribution_id,
            paths = self.paths.len(),
            request = %request_id,
            "Requested CDN invalidation"
        );
        Ok(Some(request_id))
    }
}
