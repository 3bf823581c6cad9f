//! Byte count formatting and shorthand parsing
//!
//! `format_bytes` renders sizes for messages. Powers of two are scaled to
//! the largest binary unit that keeps an integral value (`128 KB`, `2 MB`);
//! any other count is printed in full with thousands grouping (`128,000 B`).
//! Powers of two below a kilobyte, and zero, carry the unit with no space
//! (`512B`, `0B`).
//! `parse_shorthand` reads environment limits written as `2M`, `512k`, `1G`.

use crate::config::Locale;

pub const BYTES_PER_KB: u64 = 1024;
pub const BYTES_PER_MB: u64 = 1024 * BYTES_PER_KB;
pub const BYTES_PER_GB: u64 = 1024 * BYTES_PER_MB;

const UNITS: [&str; 3] = ["K", "M", "G"];

/// Render a byte count for the given locale
pub fn format_bytes(bytes: u64, locale: Locale) -> String {
    let unit_letter = locale.byte_unit();

    if bytes == 0 || bytes.is_power_of_two() {
        let mut value = bytes;
        let mut unit = "";
        for candidate in UNITS {
            if value < 1024 {
                break;
            }
            value /= 1024;
            unit = candidate;
        }
        if unit.is_empty() {
            format!("{}{}", value, unit_letter)
        } else {
            format!("{} {}{}", value, unit, unit_letter)
        }
    } else {
        format!(
            "{} {}",
            group_thousands(bytes, locale.thousands_separator()),
            unit_letter
        )
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Parse a shorthand size (`"2M"`, `"512k"`, `"1G"`, `"4096"`) into bytes
///
/// The unit suffix is case-insensitive. Returns `None` for empty input,
/// a non-numeric body, or a value that overflows `u64`.
pub fn parse_shorthand(value: &str) -> Option<u64> {
    let value = value.trim();
    let last = value.chars().last()?;

    let (digits, multiplier) = match last.to_ascii_lowercase() {
        'g' => (&value[..value.len() - 1], BYTES_PER_GB),
        'm' => (&value[..value.len() - 1], BYTES_PER_MB),
        'k' => (&value[..value.len() - 1], BYTES_PER_KB),
        _ => (value, 1),
    };

    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers_of_two_are_scaled() {
        assert_eq!(format_bytes(1024, Locale::En), "1 KB");
        assert_eq!(format_bytes(128 * BYTES_PER_KB, Locale::En), "128 KB");
        assert_eq!(format_bytes(2 * BYTES_PER_MB, Locale::En), "2 MB");
        assert_eq!(format_bytes(BYTES_PER_GB, Locale::En), "1 GB");
    }

    #[test]
    fn test_scaling_stops_at_gigabytes() {
        assert_eq!(format_bytes(1024 * BYTES_PER_GB, Locale::En), "1024 GB");
    }

    #[test]
    fn test_small_powers_of_two_stay_in_bytes() {
        assert_eq!(format_bytes(512, Locale::En), "512B");
        assert_eq!(format_bytes(1, Locale::En), "1B");
        assert_eq!(format_bytes(0, Locale::En), "0B");
        assert_eq!(format_bytes(64, Locale::Fr), "64o");
    }

    #[test]
    fn test_scaled_values_reverse_exactly() {
        for exp in 10..=40u32 {
            let bytes = 1u64 << exp;
            let rendered = format_bytes(bytes, Locale::En);
            let (number, unit) = rendered.split_once(' ').unwrap();
            let multiplier = match unit {
                "KB" => BYTES_PER_KB,
                "MB" => BYTES_PER_MB,
                "GB" => BYTES_PER_GB,
                other => panic!("unexpected unit {other}"),
            };
            assert_eq!(number.parse::<u64>().unwrap() * multiplier, bytes);
        }
    }

    #[test]
    fn test_other_counts_are_grouped() {
        assert_eq!(format_bytes(128_000, Locale::En), "128,000 B");
        assert_eq!(format_bytes(1_234_567, Locale::En), "1,234,567 B");
        assert_eq!(format_bytes(999, Locale::En), "999 B");
    }

    #[test]
    fn test_french_units_and_grouping() {
        assert_eq!(format_bytes(2 * BYTES_PER_MB, Locale::Fr), "2 Mo");
        assert_eq!(format_bytes(128_000, Locale::Fr), "128 000 o");
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(parse_shorthand("2M"), Some(2 * BYTES_PER_MB));
        assert_eq!(parse_shorthand("8m"), Some(8 * BYTES_PER_MB));
        assert_eq!(parse_shorthand("512K"), Some(512 * BYTES_PER_KB));
        assert_eq!(parse_shorthand("1G"), Some(BYTES_PER_GB));
        assert_eq!(parse_shorthand(" 4096 "), Some(4096));
    }

    #[test]
    fn test_parse_shorthand_rejects_garbage() {
        assert_eq!(parse_shorthand(""), None);
        assert_eq!(parse_shorthand("M"), None);
        assert_eq!(parse_shorthand("lots"), None);
        assert_eq!(parse_shorthand("-1K"), None);
        assert_eq!(parse_shorthand("99999999999999G"), None);
    }
}
