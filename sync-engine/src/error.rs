use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Bucket not found: {bucket}")]
    BucketNotFound { bucket: String },

    #[error("Storage provider error: {0}")]
    Provider(String),

    #[error("Upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("Deletion of stale remote files failed: {0}")]
    Deletion(String),

    #[error("CDN invalidation failed: {0}")]
    Invalidation(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("File list cache error: {0}")]
    Cache(String),

    #[error("Invalid filter pattern {pattern}: {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload worker panicked")]
    WorkerPanic,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
