//! Object Storage Abstraction
//!
//! Provides the provider-agnostic trait for bucket listing, uploads, and
//! deletions, plus the metadata record attached to every uploaded object.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;

use crate::error::{Result, StoreError};

/// Headers and storage options attached to an uploaded object.
///
/// Entries in `extra` are provider-specific raw headers; they take precedence
/// over the typed fields when a key collides, so caller-supplied custom
/// headers always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Media type of the body, e.g. `text/css`
    pub content_type: Option<String>,

    /// Transfer encoding of the body, e.g. `gzip`
    pub content_encoding: Option<String>,

    /// `Cache-Control` header value
    pub cache_control: Option<String>,

    /// `Expires` header value (RFC 2822 timestamp)
    pub expires: Option<String>,

    /// Provider storage class, e.g. `REDUCED_REDUNDANCY`
    pub storage_class: Option<String>,

    /// Explicit canned ACL; overrides `public_read` when set
    pub acl: Option<String>,

    /// Request public-read access when no explicit ACL is given
    pub public_read: bool,

    /// Additional raw headers
    pub extra: BTreeMap<String, String>,
}

/// A single upload request, consumed exactly once by [`ObjectStore::put`].
#[derive(Debug, Clone)]
pub struct PutRequest {
    /// Full remote object key (prefix already applied)
    pub key: String,

    /// Object body
    pub body: Bytes,

    /// Headers and storage options
    pub metadata: ObjectMetadata,
}

/// Remote object storage trait
///
/// Abstracts the object-store wire protocol. Implementations must be safe for
/// concurrent use: the engine issues `put` calls from multiple worker tasks
/// against one shared handle.
///
/// # Example
///
/// ```ignore
/// use store_traits::{ObjectStore, PutRequest, ObjectMetadata};
///
/// async fn upload(store: &dyn ObjectStore, body: bytes::Bytes) -> store_traits::Result<()> {
///     store
///         .put(
///             "my-bucket",
///             PutRequest {
///                 key: "assets/app.css".to_string(),
///                 body,
///                 metadata: ObjectMetadata::default(),
///             },
///         )
///         .await
/// }
/// ```
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object key in the bucket.
    async fn list(&self, bucket: &str) -> Result<Vec<String>>;

    /// Fetch an object body, or `None` if the key does not exist.
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>>;

    /// Upload one object.
    async fn put(&self, bucket: &str, request: PutRequest) -> Result<()>;

    /// Delete one object by key.
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete many objects in one call.
    ///
    /// Only invoked when [`supports_bulk_delete`](Self::supports_bulk_delete)
    /// returns `true`; the default implementation reports the capability as
    /// unavailable.
    async fn bulk_delete(&self, _bucket: &str, _keys: &[String]) -> Result<()> {
        Err(StoreError::NotSupported("bulk_delete".to_string()))
    }

    /// Whether the provider accepts bulk deletion requests.
    fn supports_bulk_delete(&self) -> bool {
        false
    }

    /// Check whether the bucket exists and is reachable.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;
}
