use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Store capability not available: {0}")]
    NotSupported(String),

    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    #[error("Provider rejected request: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
