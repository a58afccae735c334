//! # Store Traits
//!
//! Provider-agnostic abstractions for remote object storage and CDN APIs.
//!
//! ## Overview
//!
//! The sync engine never speaks a wire protocol itself. Concrete storage
//! providers (S3-compatible stores, GCS, Azure Blob, test doubles) implement
//! [`ObjectStore`] and are injected as `Arc<dyn ObjectStore>`; CDN providers
//! implement [`CdnClient`]. The engine only depends on the contracts in this
//! crate.
//!
//! ## Components
//!
//! - **Object storage** (`storage`): [`ObjectStore`] trait plus the
//!   [`PutRequest`]/[`ObjectMetadata`] upload types
//! - **CDN** (`cdn`): [`CdnClient`] trait for path invalidation
//! - **Errors** (`error`): [`StoreError`] shared by all provider calls

pub mod cdn;
pub mod error;
pub mod storage;

pub use cdn::CdnClient;
pub use error::{Result, StoreError};
pub use storage::{ObjectMetadata, ObjectStore, PutRequest};
