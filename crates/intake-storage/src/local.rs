use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::{StorageError, StorageResult, UploadStore};

/// Local filesystem upload store
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    /// Copy-then-delete for moves the kernel cannot do with a rename
    /// (different mount points)
    fn copy_and_remove(source: &Path, destination: &Path) -> StorageResult<()> {
        fs::copy(source, destination).map_err(|e| {
            StorageError::MoveFailed(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                e
            ))
        })?;

        if let Err(e) = fs::remove_file(source) {
            tracing::warn!(
                error = %e,
                source = %source.display(),
                "Upload copied but temporary file could not be removed"
            );
        }
        Ok(())
    }
}

impl UploadStore for LocalStorage {
    fn exists_case_insensitive(&self, path: &Path) -> bool {
        if path.exists() {
            return true;
        }

        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return false;
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let wanted = name.to_string_lossy().to_lowercase();

        let Ok(entries) = fs::read_dir(parent) else {
            return false;
        };
        entries
            .flatten()
            .any(|entry| entry.file_name().to_string_lossy().to_lowercase() == wanted)
    }

    fn resolve_upload_dir(&self, dir: &Path) -> StorageResult<PathBuf> {
        let canonical = dir.canonicalize().map_err(|e| {
            StorageError::NotFound(format!("{}: {}", dir.display(), e))
        })?;

        if !canonical.is_dir() {
            return Err(StorageError::NotADirectory(canonical.display().to_string()));
        }
        Ok(canonical)
    }

    fn move_upload(&self, source: &Path, destination: &Path) -> StorageResult<()> {
        if !source.is_file() {
            return Err(StorageError::NotFound(source.display().to_string()));
        }

        if let Err(e) = fs::rename(source, destination) {
            tracing::debug!(
                error = %e,
                source = %source.display(),
                "Rename failed, falling back to copy"
            );
            Self::copy_and_remove(source, destination)?;
        }

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            "Upload relocated"
        );
        Ok(())
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, mode: u32) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
            StorageError::PermissionsFailed(format!("{:o} on {}: {}", mode, path.display(), e))
        })
    }

    #[cfg(not(unix))]
    fn set_permissions(&self, path: &Path, mode: u32) -> StorageResult<()> {
        tracing::debug!(
            path = %path.display(),
            mode = %format!("{:o}", mode),
            "Permission bits are not supported on this platform"
        );
        Ok(())
    }
}
