//! Fixtures for pipeline tests: a scratch upload directory and temporary
//! uploads written the way a multipart runtime would leave them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use intake_core::{EnvLimits, UploadDescriptor, ValidationConfig};
use intake_processing::UploadValidator;
use tempfile::TempDir;

pub struct Scratch {
    /// Where the runtime parks uploads
    pub temp: TempDir,
    /// Destination directory of the policy
    pub uploads: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().unwrap(),
            uploads: tempfile::tempdir().unwrap(),
        }
    }

    pub fn validator(&self, config: ValidationConfig) -> UploadValidator {
        let policy = ValidationConfig {
            upload_dir: self.uploads.path().to_path_buf(),
            ..config
        }
        .into_policy()
        .unwrap();
        UploadValidator::new(policy, EnvLimits::new(2_097_152, 8_388_608))
    }

    /// Write raw bytes as a temporary upload
    pub fn bytes_upload(
        &self,
        declared_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> UploadDescriptor {
        let path = self.next_temp_path();
        fs::write(&path, bytes).unwrap();
        UploadDescriptor::new("file", path, declared_name, bytes.len() as u64, content_type)
    }

    /// Write a PNG of the given size as a temporary upload
    pub fn png_upload(&self, declared_name: &str, width: u32, height: u32) -> UploadDescriptor {
        let path = self.next_temp_path();
        RgbImage::new(width, height)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        let size = fs::metadata(&path).unwrap().len();
        UploadDescriptor::new("file", path, declared_name, size, "image/png")
    }

    /// Create an existing file in the upload directory
    pub fn existing(&self, name: &str) -> PathBuf {
        let path = self.uploads.path().join(name);
        fs::write(&path, b"taken").unwrap();
        path
    }

    pub fn stored(&self, name: &str) -> PathBuf {
        self.uploads.path().join(name)
    }

    fn next_temp_path(&self) -> PathBuf {
        let count = fs::read_dir(self.temp.path()).unwrap().count();
        self.temp.path().join(format!("php{:04}", count))
    }
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
