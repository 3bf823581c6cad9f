//! Validation outcome types

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Every way an upload can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidFileExtension,
    FileUploadSizeTooLarge,
    FileSizeTooLarge,
    FileSizeZero,
    InvalidImageDimensions,
    #[serde(rename = "IMAGE_DIMENSIONS_OOB")]
    ImageDimensionsOutOfBounds,
    InvalidFilename,
    FilenameTooLong,
    MoveUploadedFileFailed,
    FileUploadPartial,
    NoFileUploaded,
    MissingTemporaryFolder,
    FailedWriteToDisk,
    UnknownError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 14] = [
        ErrorKind::InvalidFileExtension,
        ErrorKind::FileUploadSizeTooLarge,
        ErrorKind::FileSizeTooLarge,
        ErrorKind::FileSizeZero,
        ErrorKind::InvalidImageDimensions,
        ErrorKind::ImageDimensionsOutOfBounds,
        ErrorKind::InvalidFilename,
        ErrorKind::FilenameTooLong,
        ErrorKind::MoveUploadedFileFailed,
        ErrorKind::FileUploadPartial,
        ErrorKind::NoFileUploaded,
        ErrorKind::MissingTemporaryFolder,
        ErrorKind::FailedWriteToDisk,
        ErrorKind::UnknownError,
    ];

    /// Machine-readable code, identical to the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFileExtension => "INVALID_FILE_EXTENSION",
            ErrorKind::FileUploadSizeTooLarge => "FILE_UPLOAD_SIZE_TOO_LARGE",
            ErrorKind::FileSizeTooLarge => "FILE_SIZE_TOO_LARGE",
            ErrorKind::FileSizeZero => "FILE_SIZE_ZERO",
            ErrorKind::InvalidImageDimensions => "INVALID_IMAGE_DIMENSIONS",
            ErrorKind::ImageDimensionsOutOfBounds => "IMAGE_DIMENSIONS_OOB",
            ErrorKind::InvalidFilename => "INVALID_FILENAME",
            ErrorKind::FilenameTooLong => "FILENAME_TOO_LONG",
            ErrorKind::MoveUploadedFileFailed => "MOVE_UPLOADED_FILE_FAILED",
            ErrorKind::FileUploadPartial => "FILE_UPLOAD_PARTIAL",
            ErrorKind::NoFileUploaded => "NO_FILE_UPLOADED",
            ErrorKind::MissingTemporaryFolder => "MISSING_TEMPORARY_FOLDER",
            ErrorKind::FailedWriteToDisk => "FAILED_WRITE_TO_DISK",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// One recorded validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: ErrorKind,
    pub message: String,
}

/// Validation failures in check order, at most one per kind
///
/// Serializes as a JSON object from kind code to message, preserving order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    issues: Vec<ValidationIssue>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind` unless it is already present; returns whether it was added
    pub fn insert(&mut self, kind: ErrorKind, message: impl Into<String>) -> bool {
        if self.contains(kind) {
            return false;
        }
        self.issues.push(ValidationIssue {
            kind,
            message: message.into(),
        });
        true
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }

    pub fn get(&self, kind: ErrorKind) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.kind == kind)
            .map(|issue| issue.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.issues.iter().map(|issue| issue.kind).collect()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.message.as_str())
    }
}

impl Serialize for ErrorList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.issues.len()))?;
        for issue in &self.issues {
            map.serialize_entry(issue.kind.code(), &issue.message)?;
        }
        map.end()
    }
}

/// Everything one validation run learned about an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub errors: ErrorList,
    /// Lowercase, without the leading dot
    pub file_extension: String,
    /// Name before sanitization: the declared name or the configured override
    pub filename_raw: String,
    /// Prefixed, sanitized and truncated base name, no path, no extension
    pub filename_base: String,
    /// Base name plus counter and dimension suffixes
    pub filename: String,
    /// `filename` plus "." plus extension
    pub filename_full: String,
    /// `-{w}x{h}` for images when dimension suffixing is enabled
    pub filename_img_modifier: String,
    /// `(n)` appended to make the name unique
    pub filename_count_modifier: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_height: Option<u32>,
    /// Absolute, slash-terminated destination directory
    pub upload_dir: String,
    pub is_image_upload: bool,
    /// True whenever the runtime stored bytes, valid or not
    pub upload_exists: bool,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.contains(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_kind_wins() {
        let mut errors = ErrorList::new();
        assert!(errors.insert(ErrorKind::FileSizeZero, "first"));
        assert!(!errors.insert(ErrorKind::FileSizeZero, "second"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(ErrorKind::FileSizeZero), Some("first"));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut errors = ErrorList::new();
        errors.insert(ErrorKind::InvalidFilename, "b");
        errors.insert(ErrorKind::InvalidFileExtension, "a");
        errors.insert(ErrorKind::FilenameTooLong, "c");
        assert_eq!(
            errors.kinds(),
            vec![
                ErrorKind::InvalidFilename,
                ErrorKind::InvalidFileExtension,
                ErrorKind::FilenameTooLong
            ]
        );

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(
            json,
            r#"{"INVALID_FILENAME":"b","INVALID_FILE_EXTENSION":"a","FILENAME_TOO_LONG":"c"}"#
        );
    }

    #[test]
    fn test_codes_match_serialized_names() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_result_serialization_skips_missing_dimensions() {
        let result = ValidationResult {
            file_extension: "txt".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["fileExtension"], "txt");
        assert!(value.get("imgWidth").is_none());
        assert_eq!(value["errors"], serde_json::json!({}));
    }
}
