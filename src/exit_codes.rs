//! Exit code constants for the bsrs CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown target, unreadable input)
//! - 2: Configuration not found or invalid
//! - 3: Template missing or malformed
//! - 4: Interactive selection aborted
//! - 5: Template references a key the configuration does not provide
//! - 6: Output artifact could not be written
//! - 7: Report did not pass the quality check

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an unknown phase/theme/step target.
pub const USER_ERROR: i32 = 1;

/// Project or system configuration is missing or fails validation.
pub const CONFIG_FAILURE: i32 = 2;

/// A declared phase has no template, or a template has invalid syntax.
pub const TEMPLATE_FAILURE: i32 = 3;

/// Interactive selection ran out of attempts or input.
pub const SELECTION_ABORTED: i32 = 4;

/// Substitution hit a placeholder with no matching configuration key.
pub const UNRESOLVED_PLACEHOLDER: i32 = 5;

/// Writing an output artifact failed.
pub const OUTPUT_FAILURE: i32 = 6;

/// A checked report scored below the pass threshold.
pub const QUALITY_FAILURE: i32 = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            CONFIG_FAILURE,
            TEMPLATE_FAILURE,
            SELECTION_ABORTED,
            UNRESOLVED_PLACEHOLDER,
            OUTPUT_FAILURE,
            QUALITY_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn only_success_is_zero() {
        assert_eq!(SUCCESS, 0);
        assert!(USER_ERROR > 0);
        assert!(QUALITY_FAILURE > 0);
    }
}
