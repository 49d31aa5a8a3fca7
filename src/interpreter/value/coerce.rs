use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::{Binding, Value, type_name},
            finance::Rate,
        },
    },
    util::num::f64_to_usize_checked,
};

fn mismatch(expected: &str, what: &str, found: &Binding) -> RuntimeError {
    RuntimeError::type_mismatch(format!("{what} must be {expected}, found {}", type_name(found)))
}

/// Extracts a plain number. No other kind converts.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for anything but `Number`.
pub fn as_number(value: &Binding, what: &str) -> EvalResult<f64> {
    match value {
        Some(Value::Number(n)) => Ok(*n),
        other => Err(mismatch("a number", what, other)),
    }
}

/// Extracts a string.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for anything but `String`.
pub fn as_str<'a>(value: &'a Binding, what: &str) -> EvalResult<&'a str> {
    match value {
        Some(Value::String(text)) => Ok(text),
        other => Err(mismatch("a string", what, other)),
    }
}

/// Extracts a whole, non-negative number, such as a period count.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for non-numbers and
/// `RuntimeError::InvalidArgument` for fractional or negative numbers.
pub fn as_count(value: &Binding, what: &str) -> EvalResult<usize> {
    f64_to_usize_checked(as_number(value, what)?, what)
}

/// Converts a rate-like value to a fraction in `[0, 1]`.
///
/// - `Rate` passes through.
/// - `Percentage` is divided by 100.
/// - `Number` is taken as a fraction and must lie in `[0, 1]`.
///
/// # Errors
/// Returns `RuntimeError::InvalidValue` for a number outside `[0, 1]`, and
/// `RuntimeError::TypeMismatch` for other kinds.
///
/// # Example
/// ```
/// use finlite::interpreter::value::{
///     coerce::to_rate_value,
///     core::Value,
///     finance::Percentage,
/// };
///
/// let pct = Some(Value::Percentage(Percentage::new(8.0).unwrap()));
/// assert_eq!(to_rate_value(&pct, "rate").unwrap(), 0.08);
/// assert_eq!(to_rate_value(&Some(Value::Number(0.05)), "rate").unwrap(), 0.05);
/// assert!(to_rate_value(&Some(Value::Number(5.0)), "rate").is_err());
/// ```
pub fn to_rate_value(value: &Binding, what: &str) -> EvalResult<f64> {
    match value {
        Some(Value::Rate(rate)) => Ok(rate.value()),
        Some(Value::Percentage(percentage)) => Ok(percentage.to_rate().value()),
        Some(Value::Number(n)) => Ok(Rate::new(*n)?.value()),
        other => Err(mismatch("a rate, percentage or number", what, other)),
    }
}

/// Converts an amount to a plain number: `Number` as is, `Money` by its
/// amount. The currency is dropped.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for other kinds.
pub fn to_amount(value: &Binding, what: &str) -> EvalResult<f64> {
    match value {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::Money(money)) => Ok(money.amount()),
        other => Err(mismatch("a number or money", what, other)),
    }
}

/// Converts a series to numbers.
///
/// Accepts a `List` of amounts or a `Cashflow`. Used by the finance forms
/// and the statistics builtins.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for other kinds or for a list
/// element that is not an amount.
///
/// # Example
/// ```
/// use finlite::interpreter::value::{coerce::to_number_list, core::Value};
///
/// let list = Some(Value::from(vec![1.0, 2.5]));
/// assert_eq!(to_number_list(&list, "values").unwrap(), vec![1.0, 2.5]);
/// assert!(to_number_list(&Some(Value::from("x")), "values").is_err());
/// ```
pub fn to_number_list(value: &Binding, what: &str) -> EvalResult<Vec<f64>> {
    match value {
        Some(Value::List(elements)) => elements.iter()
                                               .map(|element| to_amount(element, &format!("element of {what}")))
                                               .collect(),
        Some(Value::Cashflow(cashflow)) => Ok(cashflow.flows.clone()),
        other => Err(mismatch("a list of numbers or a cashflow", what, other)),
    }
}

/// Extracts the elements of a list.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for anything but `List`.
pub fn as_list<'a>(value: &'a Binding, what: &str) -> EvalResult<&'a [Binding]> {
    match value {
        Some(Value::List(elements)) => Ok(elements),
        other => Err(mismatch("a list", what, other)),
    }
}
