//! Effective upload size limit

use intake_core::EnvLimits;

/// Smallest of every ceiling that applies to this upload
///
/// The candidates are the host limits, the policy ceiling and the client
/// hint. The hint only counts when it is a plain non-negative integer; since
/// the minimum wins, a client can lower the limit but never raise it.
/// Returns `None` when no ceiling is present at all.
pub fn effective_max_file_size(
    env: &EnvLimits,
    policy_max: Option<u64>,
    hint: Option<&str>,
) -> Option<u64> {
    let hint = hint.and_then(parse_hint);

    [env.upload_max_filesize, env.post_max_size, policy_max, hint]
        .into_iter()
        .flatten()
        .min()
}

fn parse_hint(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        tracing::debug!(hint = %raw, "Ignoring non-numeric max file size hint");
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_of_all_present_values() {
        let env = EnvLimits::new(2_097_152, 8_388_608);
        assert_eq!(effective_max_file_size(&env, Some(128_000), None), Some(128_000));
        assert_eq!(effective_max_file_size(&env, None, None), Some(2_097_152));
        assert_eq!(
            effective_max_file_size(&env, Some(128_000), Some("5000")),
            Some(5000)
        );
    }

    #[test]
    fn test_hint_cannot_raise_the_limit() {
        let env = EnvLimits::new(1000, 1000);
        assert_eq!(
            effective_max_file_size(&env, None, Some("99999999")),
            Some(1000)
        );
    }

    #[test]
    fn test_malformed_hints_are_ignored() {
        let env = EnvLimits::unlimited();
        for hint in ["", "-5", "12abc", "1e6", "3.5"] {
            assert_eq!(effective_max_file_size(&env, Some(10), Some(hint)), Some(10));
        }
    }

    #[test]
    fn test_no_ceiling() {
        assert_eq!(effective_max_file_size(&EnvLimits::unlimited(), None, None), None);
    }
}
