//! Filename normalization
//!
//! Turns a human-entered base name into a lowercase slug built only from
//! `[a-z0-9_()-]` and the whitespace separator. Steps run in a fixed order:
//!
//! 1. trim, undo backslash escaping
//! 2. lowercase
//! 3. drop tab, newline, carriage return, NUL and vertical tab
//! 4. collapse whitespace runs into the separator
//! 5. strip trailing characters outside the allowed set
//! 6. transliterate accented letters and a few symbols, per code point
//! 7. drop what is still outside the allowed set
//!
//! Step 5 runs before transliteration, so a trailing accented letter is
//! stripped rather than transliterated (`café` becomes `caf`).

use std::sync::LazyLock;

use intake_core::constants::DEFAULT_WHITESPACE_SEPARATOR;
use intake_core::validation::strip_slashes;
use regex::Regex;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

/// Normalize with the default `-` separator
pub fn normalize(input: &str) -> String {
    normalize_with_separator(input, DEFAULT_WHITESPACE_SEPARATOR)
}

pub fn normalize_with_separator(input: &str, separator: char) -> String {
    let unescaped = strip_slashes(input.trim());
    let lowered = unescaped.to_lowercase();

    let cleaned: String = lowered
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r' | '\0' | '\x0B'))
        .collect();

    let collapsed = WHITESPACE_RUNS.replace_all(&cleaned, separator.to_string().as_str());
    let stripped = collapsed.trim_end_matches(|c: char| !is_slug_char(c));

    let mut transliterated = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match transliterate(c) {
            Some(replacement) => transliterated.push_str(replacement),
            None => transliterated.push(c),
        }
    }

    retain_slug_chars(&transliterated, separator)
}

fn is_slug_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '(' | ')' | '-')
}

/// Drop disallowed code points; a separator that would follow another one
/// only because of a dropped character is dropped too
fn retain_slug_chars(input: &str, separator: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut dropped = false;

    for c in input.chars() {
        if c != separator && !is_slug_char(c) {
            dropped = true;
            continue;
        }
        if c == separator && dropped && out.ends_with(separator) {
            dropped = false;
            continue;
        }
        out.push(c);
        dropped = false;
    }
    out
}

/// Replacement for one lowercase code point
fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' => "a",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ñ' => "n",
        'ç' => "c",
        'æ' => "ae",
        'œ' => "oe",
        'β' => "b",
        '&' => "and",
        '@' => "at",
        '.' => "_",
        _ => return None,
    };
    Some(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_slug_charset(slug: &str) {
        assert!(
            slug.chars().all(is_slug_char),
            "unexpected character in {:?}",
            slug
        );
    }

    #[test]
    fn test_accented_title() {
        let slug = normalize("Café — Déjà Vu.JPG");
        assert_eq!(slug, "cafe-deja-vu_jpg");
        assert_slug_charset(&slug);
    }

    #[test]
    fn test_whitespace_collapses_to_separator() {
        assert_eq!(normalize("  My   Holiday\tPhoto  "), "my-holidayphoto");
        assert_eq!(normalize("My Holiday Photo"), "my-holiday-photo");
        assert_eq!(normalize_with_separator("My Holiday", '_'), "my_holiday");
    }

    #[test]
    fn test_symbols_and_ligatures() {
        assert_eq!(normalize("Tom & Jerry"), "tom-and-jerry");
        assert_eq!(normalize("me@home"), "meathome");
        assert_eq!(normalize("Cœur Ænigma"), "coeur-aenigma");
        assert_eq!(normalize("v1.2.3"), "v1_2_3");
    }

    #[test]
    fn test_trailing_junk_is_stripped() {
        assert_eq!(normalize("report!!!"), "report");
        assert_eq!(normalize("draft (2)"), "draft-(2)");
        // Stripped before transliteration
        assert_eq!(normalize("café"), "caf");
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(normalize(r"O\'Reilly book"), "oreilly-book");
    }

    #[test]
    fn test_multibyte_input() {
        let slug = normalize("Žluťoučký kůň 日本 ü");
        assert_slug_charset(&slug);
        assert_eq!(slug, "luouky-k-");
    }

    #[test]
    fn test_empty_and_unrepresentable() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("日本語"), "");
    }
}
