use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use intake_core::{UploadDescriptor, ValidationConfig};

/// Content type assumed when none is given on the command line
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Describe a local file the way a multipart runtime would describe an upload
///
/// The file itself plays the temporary upload; `declared_name` defaults to its
/// own file name.
pub fn upload_from_path(
    path: &Path,
    declared_name: Option<&str>,
    content_type: &str,
    field: &str,
) -> io::Result<UploadDescriptor> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }

    let name = match declared_name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    Ok(UploadDescriptor::new(
        field,
        path,
        name,
        metadata.len(),
        content_type,
    ))
}

/// Read a JSON policy file, or the default policy when no path is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ValidationConfig> {
    let Some(path) = path else {
        return Ok(ValidationConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file {}", path.display()))?;
    ValidationConfig::from_json(&json)
        .with_context(|| format!("Invalid policy file {}", path.display()))
}

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so that stdout only carries the report.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn upload_from_path_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let upload = upload_from_path(&path, None, DEFAULT_CONTENT_TYPE, "file").unwrap();
        assert_eq!(upload.original_filename, "Report.PDF");
        assert_eq!(upload.size, 8);
        assert_eq!(upload.field_name, "file");
        assert!(upload.error.is_none());
    }

    #[test]
    fn upload_from_path_declared_name_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("php81A2");
        fs::write(&path, b"x").unwrap();

        let upload = upload_from_path(&path, Some("avatar.png"), "image/png", "avatar").unwrap();
        assert_eq!(upload.original_filename, "avatar.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.field_name, "avatar");
    }

    #[test]
    fn upload_from_path_rejects_directories() {
        let dir = tempdir().unwrap();
        assert!(upload_from_path(dir.path(), None, DEFAULT_CONTENT_TYPE, "file").is_err());
        let missing = dir.path().join("missing");
        assert!(upload_from_path(&missing, None, DEFAULT_CONTENT_TYPE, "file").is_err());
    }

    #[test]
    fn load_config_default_and_file() {
        assert_eq!(load_config(None).unwrap().max_file_size, 128_000);

        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, r#"{"maxFileSize": 4096, "allowedFileTypes": "images"}"#).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().max_file_size, 4096);

        fs::write(&path, r#"{"allowedFileTypes": "spreadsheets"}"#).unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("spreadsheets"));
    }
}
