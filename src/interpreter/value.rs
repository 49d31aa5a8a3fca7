/// The runtime value algebra.
///
/// Defines `Value`, the closed set of kinds an expression can evaluate to,
/// along with truthiness, structural equality and the canonical string form
/// used by `print`.
pub mod core;

/// Finance value types.
///
/// Money, rates, percentages, time periods, portfolios, tables, cashflows and
/// ledgers. Every type with an invariant is built through a constructor that
/// checks it, so an invalid instance never exists.
pub mod finance;

/// Explicit conversions between value kinds.
///
/// Each function names the direction it converts in and the range it checks;
/// operators never coerce implicitly.
pub mod coerce;

/// The callable contract shared by builtins and user functions.
pub mod callable;

/// Formats a number the way the language prints it.
///
/// Uses the shortest decimal that round-trips, with no trailing `.0` on
/// whole values. Negative zero prints as `0`.
///
/// # Example
/// ```
/// use finlite::interpreter::value::format_number;
///
/// assert_eq!(format_number(5.0), "5");
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(1_000_000.0), "1000000");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Formats a number with exactly `decimals` fractional digits.
///
/// # Example
/// ```
/// use finlite::interpreter::value::format_fixed;
///
/// assert_eq!(format_fixed(12.5, 2), "12.50");
/// ```
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        return formatted[1..].to_string();
    }
    formatted
}
