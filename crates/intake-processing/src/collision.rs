//! Collision-free filename resolution
//!
//! Finds a base name that, assembled as `base + counter + suffix + "." +
//! extension`, is absent from the target directory and fits the length
//! budget. The existence check is injected so the search can run against
//! any store, or none at all in tests.

use std::path::Path;

use intake_core::constants::MAX_COLLISION_ATTEMPTS;
use intake_core::{IntakeError, IntakeResult};

/// The fixed parts of a filename around the base
#[derive(Debug, Clone, Copy)]
pub struct NameParts<'a> {
    pub base: &'a str,
    /// Dimension suffix (`-640x480`) or empty
    pub suffix: &'a str,
    /// Without the leading dot
    pub extension: &'a str,
}

impl NameParts<'_> {
    /// Code points left for `base + counter`
    pub fn budget(&self, max_total_length: usize) -> usize {
        max_total_length.saturating_sub(char_len(self.suffix) + 1 + char_len(self.extension))
    }

    fn file_name(&self, base: &str, counter: &str) -> String {
        format!("{}{}{}.{}", base, counter, self.suffix, self.extension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub base: String,
    /// `(n)` or empty when the first candidate was free
    pub counter: String,
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keep at most `max` code points
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Resolve a free name in `directory`
///
/// With `overwrite_allowed` the base is returned unchanged and nothing is
/// probed. Otherwise the base is truncated to the budget and counters
/// `(1)`, `(2)`, ... are tried until `exists` reports a free name, cutting
/// the base further whenever a longer counter needs the room.
pub fn resolve_collision<F>(
    directory: &Path,
    parts: &NameParts<'_>,
    max_total_length: usize,
    overwrite_allowed: bool,
    mut exists: F,
) -> IntakeResult<ResolvedName>
where
    F: FnMut(&Path) -> bool,
{
    if overwrite_allowed {
        return Ok(ResolvedName {
            base: parts.base.to_string(),
            counter: String::new(),
        });
    }

    let budget = parts.budget(max_total_length);
    let mut base = truncate_chars(parts.base, budget);

    if !exists(&directory.join(parts.file_name(base, ""))) {
        return Ok(ResolvedName {
            base: base.to_string(),
            counter: String::new(),
        });
    }

    for n in 1..=MAX_COLLISION_ATTEMPTS {
        let counter = format!("({})", n);
        let room = budget.saturating_sub(char_len(&counter));
        if char_len(base) > room {
            base = truncate_chars(base, room);
        }

        let candidate = directory.join(parts.file_name(base, &counter));
        if !exists(&candidate) {
            tracing::debug!(
                base = %base,
                counter = %counter,
                "Resolved filename collision"
            );
            return Ok(ResolvedName {
                base: base.to_string(),
                counter,
            });
        }
    }

    Err(IntakeError::NameSpaceExhausted {
        base: parts.base.to_string(),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}
