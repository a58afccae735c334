//! # Sync Runtime
//!
//! Shared runtime infrastructure for the asset sync workspace: logging
//! bootstrap built on `tracing-subscriber`.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
