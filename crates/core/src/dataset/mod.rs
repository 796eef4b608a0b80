//! Dataset loading and in-memory access.

/// Dataset fetch/parse from disk or HTTP.
pub mod loader;
/// Write-once in-memory store with lookup operations.
pub mod store;

pub use loader::{DatasetLoader, DatasetSource, LoadError};
pub use store::DatasetStore;
