//! Image inspection module
//!
//! Uploads are never decoded in full: only the header is read to learn the
//! pixel dimensions.

pub mod dimensions;

pub use dimensions::{DimensionProbe, ImageDimensionProbe};
