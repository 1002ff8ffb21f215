//! Exit code constants for the ensure-unique CLI.
//!
//! A protected process that ran reports its own exit code unchanged. The
//! codes below are what the tool itself reports when it did not get that far,
//! chosen from the `sysexits.h` range so they stay clear of the small codes
//! jobs usually return:
//! - 0: Success
//! - 1: Protected process ended with a code that cannot be surfaced
//! - 64: User error (bad args, invalid config)
//! - 69: Lock store unavailable or refused the request
//! - 73: Lock maintenance command failed
//! - 75: Skipped, another invocation holds the lock
//! - 127: Protected process could not be started

use std::process::ExitCode;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Protected process ended with a code outside the representable range.
pub const FAILURE: i32 = 1;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 64;

/// Infrastructure failure talking to the lock store.
pub const STORE_FAILURE: i32 = 69;

/// Lock maintenance (`lock clear`) could not be performed.
pub const LOCK_FAILURE: i32 = 73;

/// The run was skipped because the job is already running elsewhere.
pub const ALREADY_RUNNING: i32 = 75;

/// The protected process could not be started.
pub const LAUNCH_FAILURE: i32 = 127;

/// Narrow a process-style exit code to the byte a process can report.
///
/// Codes outside `0..=255` (possible on Windows) collapse to [`FAILURE`] so
/// a failing job never reads as a success after truncation.
pub fn surfaced_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(FAILURE as u8)
}

/// Convert a process-style exit code into the value returned from `main`.
pub fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from(surfaced_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            FAILURE,
            USER_ERROR,
            STORE_FAILURE,
            LOCK_FAILURE,
            ALREADY_RUNNING,
            LAUNCH_FAILURE,
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
    fn exit_codes_fit_in_a_byte() {
        for code in [USER_ERROR, STORE_FAILURE, LOCK_FAILURE, ALREADY_RUNNING, LAUNCH_FAILURE] {
            assert!(u8::try_from(code).is_ok());
        }
    }

    #[test]
    fn surfaced_code_passes_through_byte_range() {
        assert_eq!(surfaced_code(0), 0);
        assert_eq!(surfaced_code(3), 3);
        assert_eq!(surfaced_code(255), 255);
    }

    #[test]
    fn surfaced_code_collapses_out_of_range_codes() {
        assert_eq!(surfaced_code(-1), FAILURE as u8);
        assert_eq!(surfaced_code(256), FAILURE as u8);
    }
}
