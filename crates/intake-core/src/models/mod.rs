//! Domain models

pub mod result;
pub mod upload;

pub use result::{ErrorKind, ErrorList, ValidationIssue, ValidationResult};
pub use upload::{TransportError, UploadDescriptor, UploadRequest};
