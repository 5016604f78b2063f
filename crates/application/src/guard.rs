use domain::PreconditionFailed;

/// Optimistic-concurrency check on the `expected` state token.
///
/// The guard only compares; it takes no lock. The owning state store
/// must apply the comparison and the subsequent transition as a single
/// compare-and-swap, otherwise two racing commands can both pass here
/// and still both apply.
pub struct PreconditionGuard;

impl PreconditionGuard {
    pub fn check(
        expected: Option<&str>,
        current: Option<&str>,
    ) -> Result<(), PreconditionFailed> {
        let Some(want) = expected else {
            // Unconditional command
            return Ok(());
        };

        match current {
            Some(have) if have == want => Ok(()),
            _ => Err(PreconditionFailed {
                expected: want.to_string(),
                actual: current.map(str::to_string),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_expected_token_always_passes() {
        assert!(PreconditionGuard::check(None, Some("v7")).is_ok());
        assert!(PreconditionGuard::check(None, None).is_ok());
    }

    #[test]
    fn test_matching_token_passes() {
        assert!(PreconditionGuard::check(Some("v3"), Some("v3")).is_ok());
    }

    #[test]
    fn test_stale_token_fails_with_both_sides() {
        let err = PreconditionGuard::check(Some("v3"), Some("v4")).unwrap_err();
        assert_eq!(
            err,
            PreconditionFailed {
                expected: "v3".to_string(),
                actual: Some("v4".to_string()),
            }
        );
    }

    #[test]
    fn test_device_without_token_fails_a_conditional_command() {
        let err = PreconditionGuard::check(Some("v3"), None).unwrap_err();
        assert_eq!(err.actual, None);
    }

    #[test]
    fn test_comparison_is_exact() {
        // Tokens are opaque; near-misses are still mismatches
        assert!(PreconditionGuard::check(Some("v3"), Some("V3")).is_err());
        assert!(PreconditionGuard::check(Some("v3"), Some("v3 ")).is_err());
    }
}
