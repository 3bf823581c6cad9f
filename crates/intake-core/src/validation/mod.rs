//! Validation modules

pub mod filename;

pub use filename::{
    contains_traversal, is_valid_base_name, remove_invisible_characters, sanitize_filename,
    strip_slashes,
};
