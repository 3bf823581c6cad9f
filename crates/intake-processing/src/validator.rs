//! Upload validation pipeline
//!
//! `UploadValidator::validate` runs the checks in a fixed order and reports
//! every failure it finds instead of stopping at the first one. Checks that
//! need data an earlier step could not produce are skipped.
//!
//! Usage mistakes (a field name the request does not carry, a missing
//! extension, a vanished temporary file, an invalid upload directory) abort
//! the run with an `IntakeError`.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use intake_core::validation::is_valid_base_name;
use intake_core::{
    EnvLimits, ErrorCatalog, ErrorKind, FileCategory, IntakeError, IntakeResult, MessageParams,
    TransportError, UploadDescriptor, UploadRequest, ValidationPolicy, ValidationResult,
};
use intake_storage::{LocalStorage, UploadStore};

use crate::collision::{char_len, resolve_collision, truncate_chars, NameParts};
use crate::image::{DimensionProbe, ImageDimensionProbe};
use crate::limits::effective_max_file_size;
use crate::slug::normalize;

/// Validates uploads against one policy
pub struct UploadValidator {
    policy: ValidationPolicy,
    limits: EnvLimits,
    store: Box<dyn UploadStore>,
    probe: Box<dyn DimensionProbe>,
}

/// Per-run state shared by the individual checks
struct Run<'a> {
    upload: &'a UploadDescriptor,
    catalog: ErrorCatalog,
    max_file_size: Option<u64>,
    upload_dir: PathBuf,
    result: ValidationResult,
}

impl UploadValidator {
    /// Validator on the local filesystem with header-based image probing
    pub fn new(policy: ValidationPolicy, limits: EnvLimits) -> Self {
        Self {
            policy,
            limits,
            store: Box::new(LocalStorage::new()),
            probe: Box::new(ImageDimensionProbe),
        }
    }

    pub fn with_store(mut self, store: impl UploadStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_probe(mut self, probe: impl DimensionProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate the configured field of `request`, or its first upload
    ///
    /// A request without any upload yields an empty, valid result.
    pub fn validate(&self, request: &UploadRequest) -> IntakeResult<ValidationResult> {
        self.run(request).inspect_err(|e| e.log())
    }

    fn run(&self, request: &UploadRequest) -> IntakeResult<ValidationResult> {
        let upload = match &self.policy.field_name {
            Some(name) => request
                .field(name)
                .ok_or_else(|| IntakeError::FieldNotFound(name.clone()))?,
            None => match request.first() {
                Some(upload) => {
                    tracing::debug!(
                        field = %upload.field_name,
                        "No field configured, using first upload"
                    );
                    upload
                }
                None => {
                    tracing::debug!("Request carries no uploads");
                    return Ok(ValidationResult::default());
                }
            },
        };
        let upload_dir = self.resolve_upload_dir()?;

        let mut run = Run {
            upload,
            catalog: ErrorCatalog::new(self.policy.locale),
            max_file_size: effective_max_file_size(
                &self.limits,
                self.policy.max_file_size,
                request.max_file_size_hint.as_deref(),
            ),
            result: ValidationResult {
                upload_dir: dir_string(&upload_dir),
                upload_exists: upload.has_temp_file(),
                mime_type: upload.content_type.clone(),
                ..Default::default()
            },
            upload_dir,
        };

        match &upload.temp_path {
            Some(temp_path) if upload.error.is_none() && upload.has_temp_file() => {
                if !self.store.exists_case_insensitive(temp_path) {
                    return Err(IntakeError::TempFileMissing(temp_path.clone()));
                }
                self.check_content(&mut run, temp_path)?;
            }
            _ => self.classify_transport_error(&mut run),
        }

        if self.policy.move_file && run.result.is_valid() {
            let temp_path = upload.temp_path.as_deref().filter(|_| upload.has_temp_file());
            if let Some(temp_path) = temp_path {
                self.relocate(&mut run, temp_path);
            }
        }

        tracing::debug!(
            field = %upload.field_name,
            errors = run.result.errors.len(),
            filename = %run.result.filename_full,
            "Upload validated"
        );
        Ok(run.result)
    }

    fn resolve_upload_dir(&self) -> IntakeResult<PathBuf> {
        self.store
            .resolve_upload_dir(&self.policy.upload_dir)
            .map_err(|e| {
                tracing::debug!(error = %e, "Upload directory rejected");
                IntakeError::InvalidUploadDir(self.policy.upload_dir.clone())
            })
    }

    fn check_content(&self, run: &mut Run<'_>, temp_path: &Path) -> IntakeResult<()> {
        let upload = run.upload;
        let extension = extract_extension(&upload.original_filename)?;
        run.result.file_extension = extension.clone();

        if !self.policy.allows_extension(&extension) {
            let params = MessageParams {
                allowed_extensions: &self.policy.allowed_extensions,
                ..Default::default()
            };
            self.record(run, ErrorKind::InvalidFileExtension, &params);
        }

        self.check_size(run);

        if upload.size > 0 {
            self.check_dimensions(run, temp_path, &extension);
        }

        self.build_filename(run, &extension)?;

        if self.policy.filename_validate {
            self.check_filename(run);
        }
        Ok(())
    }

    fn check_size(&self, run: &mut Run<'_>) {
        let size = run.upload.size;
        match run.max_file_size {
            Some(max) if size > max => {
                let params = MessageParams {
                    max_file_size: max,
                    file_size: size,
                    ..Default::default()
                };
                self.record(run, ErrorKind::FileUploadSizeTooLarge, &params);
            }
            _ if size < 1 => {
                self.record(run, ErrorKind::FileSizeZero, &MessageParams::default());
            }
            _ => {}
        }
    }

    fn check_dimensions(&self, run: &mut Run<'_>, temp_path: &Path, extension: &str) {
        match self.probe.dimensions(temp_path) {
            Some((width, height)) => {
                run.result.is_image_upload = true;
                run.result.img_width = Some(width);
                run.result.img_height = Some(height);

                if !self.policy.bounds.contains(width, height) {
                    let params = MessageParams {
                        bounds: Some(self.policy.bounds),
                        image_width: width,
                        image_height: height,
                        ..Default::default()
                    };
                    self.record(run, ErrorKind::ImageDimensionsOutOfBounds, &params);
                }
            }
            None if FileCategory::is_image_extension(extension) => {
                self.record(run, ErrorKind::InvalidImageDimensions, &MessageParams::default());
            }
            None => {}
        }
    }

    fn build_filename(&self, run: &mut Run<'_>, extension: &str) -> IntakeResult<()> {
        let raw = match &self.policy.filename {
            Some(name) => format!("{}.{}", name, extension),
            None => run.upload.original_filename.clone(),
        };

        let mut base = format!(
            "{}{}",
            self.policy.filename_prefix,
            strip_extension(basename(&raw), extension)
        );
        if self.policy.filename_sanitize {
            base = normalize(&base);
        }
        run.result.filename_raw = raw;

        let suffix = match (run.result.img_width, run.result.img_height) {
            (Some(width), Some(height)) if self.policy.filename_img_dimensions => {
                format!("-{}x{}", width, height)
            }
            _ => String::new(),
        };

        let parts = NameParts {
            base: &base,
            suffix: &suffix,
            extension,
        };
        let base = truncate_chars(&base, parts.budget(self.policy.filename_max_length));
        let parts = NameParts { base, ..parts };

        let resolved = resolve_collision(
            &run.upload_dir,
            &parts,
            self.policy.filename_max_length,
            self.policy.overwrite,
            |path| self.store.exists_case_insensitive(path),
        )?;

        let filename = format!("{}{}{}", resolved.base, resolved.counter, suffix);
        run.result.filename_full = format!("{}.{}", filename, extension);
        run.result.filename = filename;
        run.result.filename_base = resolved.base;
        run.result.filename_count_modifier = resolved.counter;
        run.result.filename_img_modifier = suffix;
        Ok(())
    }

    fn check_filename(&self, run: &mut Run<'_>) {
        if !is_valid_base_name(&run.result.filename_base) {
            self.record(run, ErrorKind::InvalidFilename, &MessageParams::default());
        }

        let length = char_len(&run.result.filename_full);
        if length > self.policy.filename_max_length {
            let params = MessageParams {
                filename_max_length: self.policy.filename_max_length,
                filename_length: length,
                ..Default::default()
            };
            self.record(run, ErrorKind::FilenameTooLong, &params);
        }
    }

    fn classify_transport_error(&self, run: &mut Run<'_>) {
        let error = run.upload.error;
        let kind = match error {
            TransportError::SizeExceededByServer | TransportError::SizeExceededByForm => {
                ErrorKind::FileSizeTooLarge
            }
            TransportError::Partial => ErrorKind::FileUploadPartial,
            TransportError::NoneSubmitted if self.policy.upload_is_required => {
                ErrorKind::NoFileUploaded
            }
            TransportError::NoneSubmitted => {
                tracing::debug!(field = %run.upload.field_name, "Optional upload not submitted");
                return;
            }
            TransportError::MissingTempDir => ErrorKind::MissingTemporaryFolder,
            TransportError::WriteFailed => ErrorKind::FailedWriteToDisk,
            TransportError::None | TransportError::Other(_) => ErrorKind::UnknownError,
        };

        let params = MessageParams {
            max_file_size: run.max_file_size.unwrap_or(0),
            transport_code: error.code(),
            ..Default::default()
        };
        self.record(run, kind, &params);
    }

    fn relocate(&self, run: &mut Run<'_>, temp_path: &Path) {
        let destination = run.upload_dir.join(&run.result.filename_full);

        if let Err(e) = self.store.move_upload(temp_path, &destination) {
            tracing::warn!(
                error = %e,
                destination = %destination.display(),
                "Failed to move upload"
            );
            self.record(run, ErrorKind::MoveUploadedFileFailed, &MessageParams::default());
            return;
        }

        if let Err(e) = self
            .store
            .set_permissions(&destination, self.policy.file_permissions)
        {
            tracing::warn!(
                error = %e,
                destination = %destination.display(),
                "Upload moved but permissions could not be set"
            );
        }
    }

    fn record(&self, run: &mut Run<'_>, kind: ErrorKind, params: &MessageParams<'_>) {
        tracing::debug!(
            field = %run.upload.field_name,
            code = kind.code(),
            "Validation check failed"
        );
        let message = run
            .catalog
            .render(kind, &self.policy.field_label, params);
        run.result.errors.insert(kind, message);
    }
}

/// Final path component, splitting on both `/` and `\`
fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Lowercased text after the last `.` of the declared name
///
/// A name ending in `.` has an empty extension, which no policy allows.
/// Only a name without any `.` is a usage error.
fn extract_extension(original_filename: &str) -> IntakeResult<String> {
    match basename(original_filename).rsplit_once('.') {
        Some((_, extension)) => Ok(extension.to_lowercase()),
        None => Err(IntakeError::MissingExtension(original_filename.to_string())),
    }
}

/// `name` without a trailing `.extension`, compared case-insensitively
///
/// A dotfile such as `.txt` is kept whole rather than reduced to nothing.
fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    match name.rsplit_once('.') {
        Some((stem, tail)) if !stem.is_empty() && tail.to_lowercase() == extension => stem,
        _ => name,
    }
}

fn dir_string(dir: &Path) -> String {
    let mut out = dir.display().to_string();
    if !out.ends_with(MAIN_SEPARATOR) {
        out.push(MAIN_SEPARATOR);
    }
    out
}
