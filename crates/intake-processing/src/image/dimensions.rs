use std::path::Path;

use ::image::ImageReader;

/// Reads pixel dimensions from an uploaded file
pub trait DimensionProbe: Send + Sync {
    /// `(width, height)`, or `None` when the content is not a readable image
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)>;
}

/// Probe backed by the `image` crate; the format is sniffed from content,
/// never from the declared filename
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDimensionProbe;

impl DimensionProbe for ImageDimensionProbe {
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)> {
        let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "Failed to open upload");
                return None;
            }
        };

        reader.format()?;
        match reader.into_dimensions() {
            Ok(dimensions) => Some(dimensions),
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "Unreadable image header");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ImageFormat, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_png_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload.tmp");
        RgbImage::new(64, 48)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert_eq!(ImageDimensionProbe.dimensions(&path), Some((64, 48)));
    }

    #[test]
    fn test_non_image_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"just some text, not a picture").unwrap();

        assert_eq!(ImageDimensionProbe.dimensions(&path), None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(ImageDimensionProbe.dimensions(&dir.path().join("gone")), None);
    }
}
