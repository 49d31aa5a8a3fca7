use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` if the value exceeds
/// `MAX_SAFE_U64_INT`.
///
/// # Example
/// ```
/// use finlite::util::num::{MAX_SAFE_U64_INT, usize_to_f64_checked};
///
/// assert_eq!(usize_to_f64_checked(100).unwrap(), 100.0);
/// assert!(usize_to_f64_checked((MAX_SAFE_U64_INT + 1) as usize).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64_checked(value: usize) -> EvalResult<f64> {
    if value as u64 > MAX_SAFE_U64_INT {
        return Err(RuntimeError::invalid_argument(format!("{value} is too large to represent exactly")));
    }
    Ok(value as f64)
}

/// Converts an `f64` to a `usize` if the value is finite, non-negative and
/// whole.
///
/// Used for list indices, periods and repetition counts, all of which the
/// language spells as ordinary numbers.
///
/// # Parameters
/// - `value`: The number to convert.
/// - `what`: What the number is used as, for the error message.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` for non-finite, negative,
/// out-of-range or fractional values.
///
/// # Example
/// ```
/// use finlite::util::num::f64_to_usize_checked;
///
/// assert_eq!(f64_to_usize_checked(7.0, "index").unwrap(), 7);
/// assert!(f64_to_usize_checked(-1.0, "index").is_err());
/// assert!(f64_to_usize_checked(1.5, "index").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_usize_checked(value: f64, what: &str) -> EvalResult<usize> {
    if !value.is_finite() || value < 0.0 || value > MAX_SAFE_U64_INT as f64 {
        return Err(RuntimeError::invalid_argument(format!("{what} must be a non-negative whole number, got {value}")));
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::invalid_argument(format!("{what} must be a whole number, got {value}")));
    }
    usize::try_from(value as u64).map_err(|_| RuntimeError::invalid_argument(format!("{what} is too large: {value}")))
}

/// Converts an `f64` to an `i32` if the value is finite, whole and in range.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` otherwise.
///
/// # Example
/// ```
/// use finlite::util::num::f64_to_i32_checked;
///
/// assert_eq!(f64_to_i32_checked(-2.0, "digits").unwrap(), -2);
/// assert!(f64_to_i32_checked(1e12, "digits").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i32_checked(value: f64, what: &str) -> EvalResult<i32> {
    if !value.is_finite() || value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(RuntimeError::invalid_argument(format!("{what} must be a whole number, got {value}")));
    }
    Ok(value as i32)
}
