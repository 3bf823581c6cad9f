//! Intake Core Library
//!
//! This crate provides the domain types, error types, policy configuration,
//! localized messages and filename rules shared by every Intake component.

pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod render;
pub mod units;
pub mod validation;

// Re-export commonly used types
pub use config::{
    AllowedFileTypes, EnvLimits, FileCategory, Locale, ValidationConfig, ValidationPolicy,
};
pub use error::{IntakeError, IntakeResult, LogLevel};
pub use messages::{ErrorCatalog, MessageParams};
pub use models::{
    ErrorKind, ErrorList, TransportError, UploadDescriptor, UploadRequest, ValidationResult,
};
pub use render::ErrorFormat;
pub use units::{format_bytes, parse_shorthand};
