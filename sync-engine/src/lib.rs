//! # Asset Sync Engine
//!
//! One-way synchronization of a compiled asset directory into an object
//! storage bucket.
//!
//! ## Overview
//!
//! The engine resolves the local file set, diffs it against what the bucket
//! already holds, and uploads only the difference with the right content
//! type, encoding, and cache headers. Stale remote objects can be deleted,
//! the known-remote set is cached between runs, and a CDN invalidation can
//! be requested once the bucket has changed.
//!
//! ## Components
//!
//! - **Configuration** (`config`): Builder-validated sync settings
//! - **File Set Resolver** (`resolver`): Manifest- or scan-based local enumeration
//! - **Remote Index** (`remote_index`): Cached or live view of the bucket
//! - **Diff Engine** (`diff`): Upload and deletion set computation
//! - **Transfer Policy** (`policy`): MIME, cache, gzip, and header decisions
//! - **Upload Coordinator** (`uploader`): Sequential or bounded-concurrent uploads
//! - **Deletion Coordinator** (`deleter`): Single or batched bulk deletes
//! - **Cache List Store** (`cache_list`): Persisted remote-path list
//! - **Sync Coordinator** (`coordinator`): Full-run orchestration

pub mod cache_list;
pub mod cdn;
pub mod config;
pub mod coordinator;
pub mod deleter;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod policy;
pub mod remote_index;
pub mod resolver;
pub mod uploader;

pub use cache_list::CacheListStore;
pub use cdn::CdnInvalidator;
pub use config::{
    ExistingRemoteFiles, HeaderRule, NameFilter, SyncConfig, SyncConfigBuilder,
};
pub use coordinator::{SyncCoordinator, SyncReport};
pub use deleter::{DeletionCoordinator, BULK_DELETE_BATCH_SIZE};
pub use diff::DiffEngine;
pub use error::{Result, SyncError};
pub use policy::{TransferPolicy, TransferSpec, ONE_YEAR_SECS};
pub use remote_index::RemoteIndex;
pub use resolver::FileSetResolver;
pub use uploader::UploadCoordinator;
