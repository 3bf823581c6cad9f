//! Filename validation module
//!
//! Provides the rules a destination filename must satisfy and two general
//! purpose cleaners for strings that end up in filesystem paths:
//! - Base name pattern: starts with a letter or digit, then only letters,
//!   digits, underscores, parentheses, hyphens and periods
//! - Path traversal detection (`..`)
//! - Invisible control character removal
//! - Dangerous token removal

use std::sync::LazyLock;

use regex::Regex;

static BASE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_)(\-.]*$").expect("base name pattern is a valid regex")
});

static ENCODED_CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%0[0-8bcef]|%1[0-9a-f]").expect("encoded control pattern is a valid regex")
});

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]+").expect("control pattern is a valid regex")
});

/// Tokens removed by `sanitize_filename`, applied in this order
const DANGEROUS_TOKENS: &[&str] = &[
    "../", "<!--", "-->", "<", ">", "'", "\"", "&", "$", "#", "{", "}", "[", "]", "=", ";", "?",
    "%20", "%22", "%3c", "%253c", "%3e", "%0e", "%28", "%29", "%2528", "%26", "%24", "%3f",
    "%3b", "%3d",
];

/// Whether `base` is acceptable as the base part of a stored filename
///
/// The check runs on the base name alone (no counter, dimensions or
/// extension) and rejects anything containing `..`.
pub fn is_valid_base_name(base: &str) -> bool {
    BASE_NAME_PATTERN.is_match(base) && !contains_traversal(base)
}

pub fn contains_traversal(name: &str) -> bool {
    name.contains("..")
}

/// Remove control characters that could be sandwiched between printable ones
///
/// Strips 0x00-0x08, 0x0B, 0x0C, 0x0E-0x1F and 0x7F, keeping tab, newline and
/// carriage return. With `url_encoded`, the percent-encoded forms of the same
/// range are removed too. Removal repeats until the string is stable so that
/// nested encodings cannot reassemble.
pub fn remove_invisible_characters(input: &str, url_encoded: bool) -> String {
    let mut current = input.to_string();
    loop {
        let mut next = current.clone();
        if url_encoded {
            next = ENCODED_CONTROL_CHARS.replace_all(&next, "").into_owned();
        }
        next = CONTROL_CHARS.replace_all(&next, "").into_owned();

        if next == current {
            return current;
        }
        current = next;
    }
}

/// Strip traversal sequences and markup/shell-significant tokens from a name
///
/// With `relative_path` set, `/` and `./` are kept so that a relative path
/// survives; otherwise every slash is removed.
pub fn sanitize_filename(input: &str, relative_path: bool) -> String {
    let mut out = remove_invisible_characters(input, false);

    for token in DANGEROUS_TOKENS {
        out = out.replace(token, "");
    }
    if !relative_path {
        out = out.replace("./", "").replace('/', "");
    }

    strip_slashes(&out)
}

/// Undo backslash escaping: `\x` becomes `x`, `\\` becomes `\`
pub fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
