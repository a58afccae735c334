//! CDN Abstraction
//!
//! Optional collaborator for invalidating cached paths on a CDN distribution
//! after a sync completes.

use async_trait::async_trait;

use crate::error::Result;

/// CDN invalidation trait
///
/// Implementations submit an invalidation request for the given paths and
/// return the provider's invalidation identifier.
#[async_trait]
pub trait CdnClient: Send + Sync {
    /// Invalidate the given paths on a distribution.
    async fn invalidate(&self, distribution_id: &str, paths: &[String]) -> Result<String>;
}
