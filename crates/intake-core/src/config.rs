//! Configuration module
//!
//! `ValidationConfig` is the user-facing policy, deserializable from JSON with
//! every field optional. `ValidationConfig::into_policy` applies the merge-time
//! invariants once and yields the immutable `ValidationPolicy` the pipeline
//! runs against. `EnvLimits` holds the transport ceilings of the host.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FILENAME_MAX_LENGTH, DEFAULT_FILE_PERMISSIONS, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MAX_IMG_HEIGHT, DEFAULT_MAX_IMG_WIDTH, DEFAULT_MIN_IMG_HEIGHT, DEFAULT_MIN_IMG_WIDTH,
    DEFAULT_POST_MAX_SIZE, DEFAULT_UPLOAD_MAX_FILESIZE, MIN_FILENAME_MAX_LENGTH,
};
use crate::error::{IntakeError, IntakeResult};
use crate::units::parse_shorthand;

/// Named groups of file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Documents,
    Videos,
    Music,
}

impl FileCategory {
    pub const ALL: [FileCategory; 4] = [
        FileCategory::Images,
        FileCategory::Documents,
        FileCategory::Videos,
        FileCategory::Music,
    ];

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Images => &["gif", "png", "jpg", "jpeg"],
            FileCategory::Documents => &["doc", "docx", "txt", "xls", "ppt", "pdf"],
            FileCategory::Videos => &["avi", "mov", "wmv", "flv", "mp4", "ogg", "webm"],
            FileCategory::Music => &["mp3", "wmv"],
        }
    }

    /// Whether `extension` (lowercase, no dot) belongs to the image category
    pub fn is_image_extension(extension: &str) -> bool {
        FileCategory::Images.extensions().contains(&extension)
    }
}

impl FromStr for FileCategory {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "images" => Ok(FileCategory::Images),
            "documents" => Ok(FileCategory::Documents),
            "videos" => Ok(FileCategory::Videos),
            "music" => Ok(FileCategory::Music),
            _ => Err(IntakeError::UnknownFileCategory(s.to_string())),
        }
    }
}

impl Display for FileCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileCategory::Images => write!(f, "images"),
            FileCategory::Documents => write!(f, "documents"),
            FileCategory::Videos => write!(f, "videos"),
            FileCategory::Music => write!(f, "music"),
        }
    }
}

/// Which extensions an upload may carry
///
/// In JSON a string names a category and an array is a literal extension
/// list. An empty array means every known category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawAllowedFileTypes")]
pub enum AllowedFileTypes {
    #[default]
    All,
    Category(FileCategory),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllowedFileTypes {
    Name(String),
    List(Vec<String>),
}

impl TryFrom<RawAllowedFileTypes> for AllowedFileTypes {
    type Error = IntakeError;

    fn try_from(raw: RawAllowedFileTypes) -> Result<Self, Self::Error> {
        match raw {
            RawAllowedFileTypes::Name(name) => name.parse().map(AllowedFileTypes::Category),
            RawAllowedFileTypes::List(list) => Ok(AllowedFileTypes::from_list(list)),
        }
    }
}

impl AllowedFileTypes {
    pub fn from_list<I, S>(list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = list
            .into_iter()
            .map(|s| s.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if extensions.is_empty() {
            AllowedFileTypes::All
        } else {
            AllowedFileTypes::List(extensions)
        }
    }

    /// Expand into the concrete extension set, in declaration order
    pub fn resolve(&self) -> Vec<String> {
        match self {
            AllowedFileTypes::All => FileCategory::ALL
                .iter()
                .flat_map(|category| category.extensions().iter())
                .map(|ext| ext.to_string())
                .collect(),
            AllowedFileTypes::Category(category) => {
                category.extensions().iter().map(|ext| ext.to_string()).collect()
            }
            AllowedFileTypes::List(list) => list.clone(),
        }
    }
}

/// Message locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Resolve a locale code, falling back to English for unsupported values
    pub fn resolve(code: &str) -> Locale {
        match code.parse() {
            Ok(locale) => locale,
            Err(_) => {
                tracing::warn!(
                    locale = %code,
                    "Locale not supported - reverting to english"
                );
                Locale::En
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    /// Letter appended to byte counts ("B" / "o" for octet)
    pub fn byte_unit(&self) -> &'static str {
        match self {
            Locale::En => "B",
            Locale::Fr => "o",
        }
    }

    pub fn thousands_separator(&self) -> char {
        match self {
            Locale::En => ',',
            Locale::Fr => ' ',
        }
    }
}

impl FromStr for Locale {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            _ => Err(IntakeError::InvalidConfig(format!(
                "Unsupported locale: {}",
                s
            ))),
        }
    }
}

/// User-supplied validation policy
///
/// Every field is optional in JSON (camelCase keys); omitted fields take the
/// documented defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Which upload to validate; the first one in the request when absent
    pub field_name: Option<String>,
    /// Prefix inserted into every rendered message ("Avatar: ...")
    pub field_label: String,
    pub locale: String,
    pub allowed_file_types: AllowedFileTypes,
    /// Policy ceiling in bytes; zero or negative disables it
    pub max_file_size: i64,
    pub upload_is_required: bool,
    pub min_img_width: u32,
    pub min_img_height: u32,
    pub max_img_width: u32,
    pub max_img_height: u32,
    pub move_file: bool,
    pub overwrite: bool,
    pub upload_dir: PathBuf,
    pub file_permissions: u32,
    /// Base filename override; the extension still comes from the upload
    pub filename: Option<String>,
    pub filename_img_dimensions: bool,
    pub filename_max_length: usize,
    pub filename_prefix: String,
    pub filename_sanitize: bool,
    pub filename_validate: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            field_name: None,
            field_label: String::new(),
            locale: Locale::En.code().to_string(),
            allowed_file_types: AllowedFileTypes::All,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            upload_is_required: false,
            min_img_width: DEFAULT_MIN_IMG_WIDTH,
            min_img_height: DEFAULT_MIN_IMG_HEIGHT,
            max_img_width: DEFAULT_MAX_IMG_WIDTH,
            max_img_height: DEFAULT_MAX_IMG_HEIGHT,
            move_file: false,
            overwrite: false,
            upload_dir: env::temp_dir(),
            file_permissions: DEFAULT_FILE_PERMISSIONS,
            filename: None,
            filename_img_dimensions: false,
            filename_max_length: DEFAULT_FILENAME_MAX_LENGTH,
            filename_prefix: String::new(),
            filename_sanitize: true,
            filename_validate: true,
        }
    }
}

impl ValidationConfig {
    pub fn from_json(json: &str) -> IntakeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the merge-time invariants and freeze the policy
    pub fn into_policy(self) -> IntakeResult<ValidationPolicy> {
        if self.file_permissions > 0o7777 {
            return Err(IntakeError::InvalidConfig(format!(
                "filePermissions {:o} is not a valid permission mask",
                self.file_permissions
            )));
        }

        let locale = Locale::resolve(&self.locale);

        let (min_img_width, max_img_width) = ordered(self.min_img_width, self.max_img_width);
        let (min_img_height, max_img_height) = ordered(self.min_img_height, self.max_img_height);

        let allowed_extensions = self.allowed_file_types.resolve();
        if allowed_extensions.is_empty() {
            return Err(IntakeError::InvalidConfig(
                "allowedFileTypes resolved to an empty set".to_string(),
            ));
        }

        Ok(ValidationPolicy {
            field_name: non_empty(self.field_name),
            field_label: self.field_label,
            locale,
            allowed_extensions,
            max_file_size: (self.max_file_size > 0).then_some(self.max_file_size as u64),
            upload_is_required: self.upload_is_required,
            bounds: DimensionBounds {
                min_width: min_img_width,
                max_width: max_img_width,
                min_height: min_img_height,
                max_height: max_img_height,
            },
            move_file: self.move_file,
            overwrite: self.overwrite,
            upload_dir: self.upload_dir,
            file_permissions: self.file_permissions,
            filename: non_empty(self.filename),
            filename_img_dimensions: self.filename_img_dimensions,
            filename_max_length: self.filename_max_length.max(MIN_FILENAME_MAX_LENGTH),
            filename_prefix: self.filename_prefix,
            filename_sanitize: self.filename_sanitize,
            filename_validate: self.filename_validate,
        })
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Inclusive image dimension bounds, always with `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionBounds {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl DimensionBounds {
    pub fn contains(&self, width: u32, height: u32) -> bool {
        (self.min_width..=self.max_width).contains(&width)
            && (self.min_height..=self.max_height).contains(&height)
    }
}

/// Validated, immutable policy used by one or more pipeline runs
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub field_name: Option<String>,
    pub field_label: String,
    pub locale: Locale,
    /// Lowercase extensions without the leading dot, never empty
    pub allowed_extensions: Vec<String>,
    /// `None` when the policy sets no ceiling of its own
    pub max_file_size: Option<u64>,
    pub upload_is_required: bool,
    pub bounds: DimensionBounds,
    pub move_file: bool,
    pub overwrite: bool,
    pub upload_dir: PathBuf,
    pub file_permissions: u32,
    pub filename: Option<String>,
    pub filename_img_dimensions: bool,
    pub filename_max_length: usize,
    pub filename_prefix: String,
    pub filename_sanitize: bool,
    pub filename_validate: bool,
}

impl ValidationPolicy {
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|ext| ext == extension)
    }
}

/// Upload ceilings imposed by the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvLimits {
    /// Maximum size of a single uploaded file
    pub upload_max_filesize: Option<u64>,
    /// Maximum size of a whole request body
    pub post_max_size: Option<u64>,
}

impl EnvLimits {
    pub fn new(upload_max_filesize: u64, post_max_size: u64) -> Self {
        Self {
            upload_max_filesize: Some(upload_max_filesize),
            post_max_size: Some(post_max_size),
        }
    }

    /// No transport ceilings; only the policy and the client hint apply
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Read `INTAKE_UPLOAD_MAX_FILESIZE` and `INTAKE_POST_MAX_SIZE` (shorthand sizes)
    pub fn from_env() -> IntakeResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            upload_max_filesize: Some(read_size_var(
                "INTAKE_UPLOAD_MAX_FILESIZE",
                DEFAULT_UPLOAD_MAX_FILESIZE,
            )?),
            post_max_size: Some(read_size_var(
                "INTAKE_POST_MAX_SIZE",
                DEFAULT_POST_MAX_SIZE,
            )?),
        })
    }
}

fn read_size_var(name: &str, default: &str) -> IntakeResult<u64> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_shorthand(&raw).ok_or_else(|| {
        IntakeError::InvalidConfig(format!(
            "{} must be a byte count such as 2M, 512K or 1048576 (got '{}')",
            name, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = ValidationConfig::default().into_policy().unwrap();
        assert_eq!(policy.locale, Locale::En);
        assert_eq!(policy.max_file_size, Some(128_000));
        assert_eq!(policy.filename_max_length, 150);
        assert_eq!(policy.file_permissions, 0o775);
        assert!(policy.filename_sanitize);
        assert!(policy.filename_validate);
        assert!(!policy.overwrite);
        assert_eq!(policy.upload_dir, env::temp_dir());
    }

    #[test]
    fn test_filename_max_length_is_clamped() {
        for requested in [0, 1, 10, 19] {
            let config = ValidationConfig {
                filename_max_length: requested,
                ..Default::default()
            };
            assert_eq!(config.into_policy().unwrap().filename_max_length, 20);
        }

        let config = ValidationConfig {
            filename_max_length: 21,
            ..Default::default()
        };
        assert_eq!(config.into_policy().unwrap().filename_max_length, 21);
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let config = ValidationConfig {
            min_img_width: 1600,
            max_img_width: 1200,
            min_img_height: 900,
            max_img_height: 10,
            ..Default::default()
        };
        let bounds = config.into_policy().unwrap().bounds;
        assert_eq!((bounds.min_width, bounds.max_width), (1200, 1600));
        assert_eq!((bounds.min_height, bounds.max_height), (10, 900));
    }

    #[test]
    fn test_non_positive_max_file_size_disables_ceiling() {
        for value in [0, -1] {
            let config = ValidationConfig {
                max_file_size: value,
                ..Default::default()
            };
            assert_eq!(config.into_policy().unwrap().max_file_size, None);
        }
    }

    #[test]
    fn test_allowed_types_union_of_categories() {
        let all = AllowedFileTypes::All.resolve();
        assert!(all.contains(&"jpg".to_string()));
        assert!(all.contains(&"pdf".to_string()));
        assert!(all.contains(&"webm".to_string()));
        assert!(all.contains(&"mp3".to_string()));
        assert!(!all.contains(&"exe".to_string()));
    }

    #[test]
    fn test_allowed_types_from_json() {
        let config = ValidationConfig::from_json(r#"{"allowedFileTypes": "images"}"#).unwrap();
        assert_eq!(
            config.allowed_file_types,
            AllowedFileTypes::Category(FileCategory::Images)
        );

        let config =
            ValidationConfig::from_json(r#"{"allowedFileTypes": ["PNG", ".Svg"]}"#).unwrap();
        assert_eq!(
            config.allowed_file_types.resolve(),
            vec!["png".to_string(), "svg".to_string()]
        );

        let config = ValidationConfig::from_json(r#"{"allowedFileTypes": []}"#).unwrap();
        assert_eq!(config.allowed_file_types, AllowedFileTypes::All);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = ValidationConfig::from_json(r#"{"allowedFileTypes": "spreadsheets"}"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("spreadsheets"));
    }

    #[test]
    fn test_camel_case_keys() {
        let config = ValidationConfig::from_json(
            r#"{"fieldName": "avatar", "maxImgWidth": 640, "filenameImgDimensions": true, "locale": "fr"}"#,
        )
        .unwrap();
        let policy = config.into_policy().unwrap();
        assert_eq!(policy.field_name.as_deref(), Some("avatar"));
        assert_eq!(policy.bounds.max_width, 640);
        assert!(policy.filename_img_dimensions);
        assert_eq!(policy.locale, Locale::Fr);
    }

    #[test]
    fn test_unsupported_locale_falls_back() {
        let config = ValidationConfig {
            locale: "de".to_string(),
            ..Default::default()
        };
        assert_eq!(config.into_policy().unwrap().locale, Locale::En);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let config = ValidationConfig {
            field_name: Some(String::new()),
            filename: Some("  ".to_string()),
            ..Default::default()
        };
        let policy = config.into_policy().unwrap();
        assert!(policy.field_name.is_none());
        assert!(policy.filename.is_none());
    }

    #[test]
    fn test_invalid_permissions() {
        let config = ValidationConfig {
            file_permissions: 0o17777,
            ..Default::default()
        };
        assert!(config.into_policy().is_err());
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds = DimensionBounds {
            min_width: 10,
            max_width: 20,
            min_height: 5,
            max_height: 5,
        };
        assert!(bounds.contains(10, 5));
        assert!(bounds.contains(20, 5));
        assert!(!bounds.contains(21, 5));
        assert!(!bounds.contains(15, 6));
    }
}
