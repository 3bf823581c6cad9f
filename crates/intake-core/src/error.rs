//! Error types module
//!
//! `IntakeError` covers configuration and usage mistakes: a bad policy, a
//! missing upload directory, a field name the request does not carry. These
//! abort a validation run. End-user upload problems are never reported through
//! this type; they are accumulated as `ErrorKind` entries on the
//! `ValidationResult`.

use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for caller mistakes the host should notice
    Warn,
    /// Error level - for deployment problems
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File validation for type '{0}' not supported")]
    UnknownFileCategory(String),

    #[error("Invalid upload directory {}: the path is not a directory or does not exist", .0.display())]
    InvalidUploadDir(PathBuf),

    #[error("Field '{0}' was provided but cannot be found in the request")]
    FieldNotFound(String),

    #[error("Unable to establish a file type/extension for '{0}'")]
    MissingExtension(String),

    #[error("The temporary upload {} could not be found on the server", .0.display())]
    TempFileMissing(PathBuf),

    #[error("No free filename for '{base}' after {attempts} attempts")]
    NameSpaceExhausted { base: String, attempts: u32 },
}

/// Result type for Intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

impl IntakeError {
    /// Machine-readable error code (e.g., "INVALID_CONFIG")
    pub fn error_code(&self) -> &'static str {
        match self {
            IntakeError::InvalidConfig(_) => "INVALID_CONFIG",
            IntakeError::UnknownFileCategory(_) => "UNKNOWN_FILE_CATEGORY",
            IntakeError::InvalidUploadDir(_) => "INVALID_UPLOAD_DIR",
            IntakeError::FieldNotFound(_) => "FIELD_NOT_FOUND",
            IntakeError::MissingExtension(_) => "MISSING_EXTENSION",
            IntakeError::TempFileMissing(_) => "TEMP_FILE_MISSING",
            IntakeError::NameSpaceExhausted { .. } => "NAME_SPACE_EXHAUSTED",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            IntakeError::FieldNotFound(_) | IntakeError::MissingExtension(_) => LogLevel::Warn,
            IntakeError::InvalidConfig(_)
            | IntakeError::UnknownFileCategory(_)
            | IntakeError::InvalidUploadDir(_)
            | IntakeError::TempFileMissing(_)
            | IntakeError::NameSpaceExhausted { .. } => LogLevel::Error,
        }
    }

    /// Emit this error on the tracing channel at its own level
    pub fn log(&self) {
        match self.log_level() {
            LogLevel::Warn => tracing::warn!(code = self.error_code(), "{}", self),
            LogLevel::Error => tracing::error!(code = self.error_code(), "{}", self),
        }
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        IntakeError::InvalidConfig(format!("JSON parsing error: {}", err))
    }
}
