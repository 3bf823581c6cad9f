//! Intake Processing Library
//!
//! This crate turns an untrusted upload descriptor into a validation report
//! and a safe destination filename:
//! - Filename normalization (slug)
//! - Effective size limit aggregation (limits)
//! - Collision-free naming under a length budget (collision)
//! - Image dimension probing (image)
//! - The ordered validation pipeline (validator)

pub mod collision;
pub mod image;
pub mod limits;
pub mod slug;
pub mod validator;

// Re-export commonly used types
pub use collision::{resolve_collision, NameParts, ResolvedName};
pub use self::image::{DimensionProbe, ImageDimensionProbe};
pub use limits::effective_max_file_size;
pub use slug::{normalize, normalize_with_separator};
pub use validator::UploadValidator;
