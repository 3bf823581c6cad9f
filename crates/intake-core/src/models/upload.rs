//! Upload descriptors as handed over by the HTTP runtime

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Transport-level outcome of a single upload
///
/// Codes follow the widely used multipart upload convention: 0 success,
/// 1 server size limit, 2 form size limit, 3 partial, 4 nothing submitted,
/// 6 no temporary directory, 7 write failure. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum TransportError {
    #[default]
    None,
    SizeExceededByServer,
    SizeExceededByForm,
    Partial,
    NoneSubmitted,
    MissingTempDir,
    WriteFailed,
    Other(u16),
}

impl TransportError {
    pub fn code(&self) -> u16 {
        match self {
            TransportError::None => 0,
            TransportError::SizeExceededByServer => 1,
            TransportError::SizeExceededByForm => 2,
            TransportError::Partial => 3,
            TransportError::NoneSubmitted => 4,
            TransportError::MissingTempDir => 6,
            TransportError::WriteFailed => 7,
            TransportError::Other(code) => *code,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TransportError::None)
    }
}

impl From<u16> for TransportError {
    fn from(code: u16) -> Self {
        match code {
            0 => TransportError::None,
            1 => TransportError::SizeExceededByServer,
            2 => TransportError::SizeExceededByForm,
            3 => TransportError::Partial,
            4 => TransportError::NoneSubmitted,
            6 => TransportError::MissingTempDir,
            7 => TransportError::WriteFailed,
            other => TransportError::Other(other),
        }
    }
}

impl From<TransportError> for u16 {
    fn from(error: TransportError) -> Self {
        error.code()
    }
}

/// One uploaded file, read-only for the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDescriptor {
    pub field_name: String,
    /// Where the runtime stored the bytes; `None` when nothing arrived
    pub temp_path: Option<PathBuf>,
    /// Filename as declared by the client
    pub original_filename: String,
    /// Size in bytes as reported by the runtime
    pub size: u64,
    /// Content type as declared by the client
    pub content_type: String,
    pub error: TransportError,
}

impl UploadDescriptor {
    /// Descriptor for a file that arrived intact
    pub fn new(
        field_name: impl Into<String>,
        temp_path: impl Into<PathBuf>,
        original_filename: impl Into<String>,
        size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            temp_path: Some(temp_path.into()),
            original_filename: original_filename.into(),
            size,
            content_type: content_type.into(),
            error: TransportError::None,
        }
    }

    /// Descriptor for a field whose upload failed in transport
    pub fn failed(field_name: impl Into<String>, error: TransportError) -> Self {
        Self {
            field_name: field_name.into(),
            temp_path: None,
            original_filename: String::new(),
            size: 0,
            content_type: String::new(),
            error,
        }
    }

    /// Whether the runtime stored any bytes for this field
    pub fn has_temp_file(&self) -> bool {
        self.temp_path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }
}

/// The upload-bearing part of one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Uploaded fields in submission order
    pub files: Vec<UploadDescriptor>,
    /// Client-declared maximum size, honored only when it is a plain digit string
    pub max_file_size_hint: Option<String>,
}

impl UploadRequest {
    pub fn single(descriptor: UploadDescriptor) -> Self {
        Self {
            files: vec![descriptor],
            max_file_size_hint: None,
        }
    }

    pub fn with_max_file_size_hint(mut self, hint: impl Into<String>) -> Self {
        self.max_file_size_hint = Some(hint.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&UploadDescriptor> {
        self.files.iter().find(|f| f.field_name == name)
    }

    pub fn first(&self) -> Option<&UploadDescriptor> {
        self.files.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_codes() {
        assert_eq!(TransportError::from(0), TransportError::None);
        assert_eq!(TransportError::from(2), TransportError::SizeExceededByForm);
        assert_eq!(TransportError::from(5), TransportError::Other(5));
        assert_eq!(TransportError::from(8), TransportError::Other(8));
        assert_eq!(TransportError::WriteFailed.code(), 7);
        assert_eq!(TransportError::Other(42).code(), 42);
    }

    #[test]
    fn test_transport_error_serializes_as_code() {
        let json = serde_json::to_string(&TransportError::Partial).unwrap();
        assert_eq!(json, "3");
        let parsed: TransportError = serde_json::from_str("6").unwrap();
        assert_eq!(parsed, TransportError::MissingTempDir);
    }

    #[test]
    fn test_has_temp_file() {
        let upload = UploadDescriptor::new("file", "/tmp/php123", "a.png", 10, "image/png");
        assert!(upload.has_temp_file());

        let failed = UploadDescriptor::failed("file", TransportError::NoneSubmitted);
        assert!(!failed.has_temp_file());

        let mut empty = upload.clone();
        empty.temp_path = Some(PathBuf::new());
        assert!(!empty.has_temp_file());
    }

    #[test]
    fn test_request_field_lookup() {
        let request = UploadRequest {
            files: vec![
                UploadDescriptor::failed("cover", TransportError::NoneSubmitted),
                UploadDescriptor::new("avatar", "/tmp/x", "me.png", 10, "image/png"),
            ],
            max_file_size_hint: None,
        };
        assert_eq!(request.first().unwrap().field_name, "cover");
        assert_eq!(request.field("avatar").unwrap().original_filename, "me.png");
        assert!(request.field("missing").is_none());
    }
}
