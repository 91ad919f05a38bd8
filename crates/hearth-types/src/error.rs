//! Unified error interface for hearth.
//!
//! Every hearth error enum implements [`ErrorCode`] so that callers can
//! branch on a stable machine-readable code instead of matching display
//! strings, and so retry logic can ask whether a failure is worth retrying.
//!
//! # Code format
//!
//! - UPPER_SNAKE_CASE
//! - Prefixed with the owning layer: `COMPONENT_`, `RUNTIME_`
//! - Stable once defined (changing a code is a breaking change)
//!
//! # Example
//!
//! ```
//! use hearth_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum SensorError {
//!     NotCalibrated,
//!     BusTimeout,
//! }
//!
//! impl ErrorCode for SensorError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotCalibrated => "SENSOR_NOT_CALIBRATED",
//!             Self::BusTimeout => "SENSOR_BUS_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::BusTimeout)
//!     }
//! }
//!
//! let err = SensorError::BusTimeout;
//! assert_eq!(err.code(), "SENSOR_BUS_TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error code with recoverability information.
///
/// An error is recoverable when retrying the failed operation may succeed
/// (transient conditions: a peripheral not yet powered, a full buffer).
/// It is not recoverable when retrying cannot help (duplicate names,
/// dependency cycles, invalid declarations).
pub trait ErrorCode {
    /// Returns the stable, UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code follows hearth conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and starts with
/// `expected_prefix`.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts [`assert_error_code`] for every variant in `errors`.
///
/// Use with an all-variants list to keep coverage exhaustive when variants
/// are added.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
