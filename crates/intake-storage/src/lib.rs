//! Intake Storage Library
//!
//! This crate provides the filesystem collaborator of the validation
//! pipeline: the `UploadStore` trait and its local filesystem implementation.
//!
//! # Existence probing
//!
//! Name collisions are detected case-insensitively. A destination that
//! differs from an existing file only by letter case counts as taken, so a
//! name chosen on a case-sensitive host stays unique when the directory is
//! later copied to a case-insensitive one.

#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{StorageError, StorageResult, UploadStore};
