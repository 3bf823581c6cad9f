//! Policy defaults and fixed limits

/// Default policy ceiling for a single upload, in bytes
pub const DEFAULT_MAX_FILE_SIZE: i64 = 128_000;

pub const DEFAULT_MIN_IMG_WIDTH: u32 = 1;
pub const DEFAULT_MIN_IMG_HEIGHT: u32 = 1;
pub const DEFAULT_MAX_IMG_WIDTH: u32 = 5000;
pub const DEFAULT_MAX_IMG_HEIGHT: u32 = 5000;

/// Permission bits applied to relocated uploads
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o775;

pub const DEFAULT_FILENAME_MAX_LENGTH: usize = 150;

/// Lower bound for `filename_max_length`; smaller values are clamped up to it
pub const MIN_FILENAME_MAX_LENGTH: usize = 20;

/// Separator used by the filename normalizer in place of whitespace runs
pub const DEFAULT_WHITESPACE_SEPARATOR: char = '-';

/// Environment defaults, in shorthand notation
pub const DEFAULT_UPLOAD_MAX_FILESIZE: &str = "2M";
pub const DEFAULT_POST_MAX_SIZE: &str = "8M";

/// Upper bound on counter values tried while looking for a free filename
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;
