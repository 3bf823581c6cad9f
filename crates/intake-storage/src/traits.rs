//! Upload store abstraction trait
//!
//! This module defines the `UploadStore` trait the validation pipeline uses
//! for every filesystem interaction: existence probing, upload directory
//! resolution and the final relocation of an accepted upload.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Setting permissions failed: {0}")]
    PermissionsFailed(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem collaborator of the validation pipeline
///
/// Implementations must be usable from concurrent validation runs. No
/// locking happens between an existence probe and a later move, so two runs
/// may race to the same destination name.
pub trait UploadStore: Send + Sync {
    /// Whether `path` exists, comparing its final component against the
    /// directory listing without regard to letter case
    fn exists_case_insensitive(&self, path: &Path) -> bool;

    /// Resolve `dir` to an absolute path of an existing directory
    fn resolve_upload_dir(&self, dir: &Path) -> StorageResult<PathBuf>;

    /// Move the temporary upload at `source` to `destination`
    fn move_upload(&self, source: &Path, destination: &Path) -> StorageResult<()>;

    /// Apply permission bits (`0o775` style) to `path`
    fn set_permissions(&self, path: &Path, mode: u32) -> StorageResult<()>;
}
