//! Workspace umbrella crate.
//!
//! Re-exports the individual workspace crates so host applications can depend
//! on `assetsync` alone instead of wiring `store-traits`, `sync-engine`, and
//! `sync-runtime` individually.

pub use store_traits as traits;
pub use sync_engine as engine;
pub use sync_runtime as runtime;
