use ordered_float::OrderedFloat;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            coerce::{as_number, as_str, to_amount, to_number_list},
            core::{Binding, Value, format_binding, type_name},
            finance::{Currency, Ledger, Money, Percentage, Rate, TimePeriod, TimeUnit},
        },
    },
    util::num::{f64_to_i32_checked, usize_to_f64_checked},
};

fn count_mismatch(name: &str, expected: usize, found: usize) -> RuntimeError {
    RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                          expected,
                                          found,
                                          line: None }
}

/// Checks the argument count of a variadic builtin.
fn check_count(name: &str, args: &[Binding], min: usize, max: usize) -> EvalResult<()> {
    let found = args.len();
    if found < min || found > max {
        return Err(count_mismatch(name, if found < min { min } else { max }, found));
    }
    Ok(())
}

/// The argument of a one-argument builtin.
fn single<'a>(name: &str, args: &'a [Binding]) -> EvalResult<&'a Binding> {
    match args {
        [value] => Ok(value),
        _ => Err(count_mismatch(name, 1, args.len())),
    }
}

/// The arguments of a two-argument builtin.
fn pair<'a>(name: &str, args: &'a [Binding]) -> EvalResult<(&'a Binding, &'a Binding)> {
    match args {
        [first, second] => Ok((first, second)),
        _ => Err(count_mismatch(name, 2, args.len())),
    }
}

/// Collects the numbers a statistics builtin works on.
///
/// A single list or cashflow argument is taken as the series; otherwise
/// every argument is one element.
fn series(name: &str, args: &[Binding]) -> EvalResult<Vec<f64>> {
    match args {
        [] => Err(RuntimeError::ArgumentCountMismatch { name:     name.to_string(),
                                                        expected: 1,
                                                        found:    0,
                                                        line:     None, }),
        [single @ Some(Value::List(_) | Value::Cashflow(_))] => to_number_list(single, name),
        values => values.iter().map(|value| to_amount(value, name)).collect(),
    }
}

fn non_empty(name: &str, values: Vec<f64>) -> EvalResult<Vec<f64>> {
    if values.is_empty() {
        return Err(RuntimeError::invalid_argument(format!("{name} of an empty series")));
    }
    Ok(values)
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by_key(|v| OrderedFloat(*v));
    values
}

fn numeric(value: f64) -> EvalResult<Binding> {
    Ok(Some(Value::Number(value)))
}

/// Returns the number of elements of a list, cashflow, ledger or table, the
/// number of assets of a portfolio, or the number of characters of a string.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for values without a length.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::len, value::core::Value};
///
/// let r = len(&[Some(Value::from(vec![1.0, 2.0, 3.0]))]).unwrap();
/// assert_eq!(r, Some(Value::Number(3.0)));
///
/// let r = len(&[Some(Value::from("héllo"))]).unwrap();
/// assert_eq!(r, Some(Value::Number(5.0)));
/// ```
pub fn len(args: &[Binding]) -> EvalResult<Binding> {
    let count = match single("len", args)? {
        Some(Value::List(elements)) => elements.len(),
        Some(Value::String(text)) => text.chars().count(),
        Some(Value::Cashflow(cashflow)) => cashflow.flows.len(),
        Some(Value::Ledger(ledger)) => ledger.entries.len(),
        Some(Value::Table(table)) => table.row_count(),
        Some(Value::Portfolio(portfolio)) => portfolio.assets().len(),
        other => {
            return Err(RuntimeError::type_mismatch(format!("len is not defined for {}", type_name(other))));
        },
    };
    numeric(usize_to_f64_checked(count)?)
}

/// Adds up a series.
///
/// Accepts either one list (or cashflow) or any number of amounts.
///
/// # Errors
/// - `RuntimeError::ArgumentCountMismatch` with no arguments.
/// - `RuntimeError::TypeMismatch` for an element that is not an amount.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::sum, value::core::Value};
///
/// let list = Some(Value::from(vec![1.0, 2.0, 3.5]));
/// assert_eq!(sum(&[list]).unwrap(), Some(Value::Number(6.5)));
///
/// let args = [Some(Value::Number(2.0)), Some(Value::Number(3.0))];
/// assert_eq!(sum(&args).unwrap(), Some(Value::Number(5.0)));
/// ```
pub fn sum(args: &[Binding]) -> EvalResult<Binding> {
    numeric(series("sum", args)?.iter().sum())
}

/// Arithmetic mean of a series.
///
/// # Errors
/// As [`sum`], plus `RuntimeError::InvalidArgument` for an empty series.
pub fn avg(args: &[Binding]) -> EvalResult<Binding> {
    let values = non_empty("avg", series("avg", args)?)?;
    let count = usize_to_f64_checked(values.len())?;
    numeric(values.iter().sum::<f64>() / count)
}

/// Smallest element of a series.
///
/// # Errors
/// As [`avg`].
pub fn min(args: &[Binding]) -> EvalResult<Binding> {
    let values = non_empty("min", series("min", args)?)?;
    numeric(values.into_iter().fold(f64::INFINITY, f64::min))
}

/// Largest element of a series.
///
/// # Errors
/// As [`avg`].
pub fn max(args: &[Binding]) -> EvalResult<Binding> {
    let values = non_empty("max", series("max", args)?)?;
    numeric(values.into_iter().fold(f64::NEG_INFINITY, f64::max))
}

/// Absolute value of a number.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` for a non-number.
pub fn abs(args: &[Binding]) -> EvalResult<Binding> {
    numeric(as_number(single("abs", args)?, "abs argument")?.abs())
}

/// Rounds a number to `digits` decimal places, half away from zero.
///
/// `digits` defaults to 0 and may be negative to round to tens, hundreds and
/// so on.
///
/// # Errors
/// - `RuntimeError::ArgumentCountMismatch` unless called with 1 or 2
///   arguments.
/// - `RuntimeError::InvalidArgument` for fractional `digits`.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::round, value::core::Value};
///
/// let r = round(&[Some(Value::Number(2.345)), Some(Value::Number(1.0))]).unwrap();
/// assert_eq!(r, Some(Value::Number(2.3)));
///
/// let r = round(&[Some(Value::Number(1250.0)), Some(Value::Number(-2.0))]).unwrap();
/// assert_eq!(r, Some(Value::Number(1300.0)));
/// ```
pub fn round(args: &[Binding]) -> EvalResult<Binding> {
    check_count("round", args, 1, 2)?;
    let value = as_number(&args[0], "round argument")?;
    let digits = match args.get(1) {
        Some(digits) => f64_to_i32_checked(as_number(digits, "digits")?, "digits")?,
        None => 0,
    };
    let scale = 10f64.powi(digits);
    numeric((value * scale).round() / scale)
}

/// Square root of a non-negative number.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` for a negative number.
pub fn sqrt(args: &[Binding]) -> EvalResult<Binding> {
    let value = as_number(single("sqrt", args)?, "sqrt argument")?;
    if value < 0.0 {
        return Err(RuntimeError::invalid_argument(format!("sqrt of negative number {value}")));
    }
    numeric(value.sqrt())
}

/// `base ^ exponent`, with the same checks as the operator.
///
/// # Errors
/// See [`Context::eval_scalar_op`].
pub fn pow(args: &[Binding]) -> EvalResult<Binding> {
    let (base, exponent) = pair("pow", args)?;
    Context::eval_scalar_op(BinaryOperator::Pow, base, exponent).map(Some)
}

/// Median of a series; the mean of the two middle elements for an even
/// count.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` for an empty series.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::median, value::core::Value};
///
/// let r = median(&[Some(Value::from(vec![5.0, 1.0, 3.0, 2.0]))]).unwrap();
/// assert_eq!(r, Some(Value::Number(2.5)));
/// ```
pub fn median(args: &[Binding]) -> EvalResult<Binding> {
    let values = sorted(non_empty("median", to_number_list(single("median", args)?, "median argument")?)?);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        numeric(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        numeric(values[mid])
    }
}

/// Returns a new list with the numbers of a series in ascending order.
pub fn sort(args: &[Binding]) -> EvalResult<Binding> {
    let values = sorted(to_number_list(single("sort", args)?, "sort argument")?);
    Ok(Some(Value::from(values)))
}

/// Historical percentile of a series, interpolating linearly between the
/// closest ranks.
///
/// `p` is given on the 0 to 100 scale.
///
/// # Errors
/// Returns `RuntimeError::InvalidArgument` for an empty series or a `p`
/// outside `[0, 100]`.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::percentile, value::core::Value};
///
/// let returns = Some(Value::from(vec![10.0, 20.0, 30.0, 40.0, 50.0]));
///
/// let r = percentile(&[returns.clone(), Some(Value::Number(50.0))]).unwrap();
/// assert_eq!(r, Some(Value::Number(30.0)));
///
/// let r = percentile(&[returns, Some(Value::Number(10.0))]).unwrap();
/// assert_eq!(r, Some(Value::Number(14.0)));
/// ```
pub fn percentile(args: &[Binding]) -> EvalResult<Binding> {
    let (series, p) = pair("percentile", args)?;
    let values = sorted(non_empty("percentile", to_number_list(series, "percentile series")?)?);
    let p = as_number(p, "percentile")?;
    if !(0.0..=100.0).contains(&p) {
        return Err(RuntimeError::invalid_argument(format!("percentile must be between 0 and 100, got {p}")));
    }

    let last = values.len() - 1;
    let rank = p / 100.0 * usize_to_f64_checked(last)?;
    let mut lower = 0;
    while lower < last && usize_to_f64_checked(lower + 1)? <= rank {
        lower += 1;
    }
    let upper = (lower + 1).min(last);
    let fraction = rank - usize_to_f64_checked(lower)?;
    numeric((values[upper] - values[lower]).mul_add(fraction, values[lower]))
}

/// The canonical string of any value.
pub fn str_fn(args: &[Binding]) -> EvalResult<Binding> {
    Ok(Some(Value::from(format_binding(single("str", args)?))))
}

/// Converts to a plain number.
///
/// - `Number` passes through.
/// - `String` is parsed after trimming whitespace.
/// - `Bool` gives 1 or 0.
/// - `Money` gives its amount; `Rate` and `Percentage` their stored value.
///
/// # Errors
/// - `RuntimeError::InvalidArgument` for text that is not a finite number.
/// - `RuntimeError::TypeMismatch` for other kinds.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::number, value::core::Value};
///
/// let r = number(&[Some(Value::from(" 42.5 "))]).unwrap();
/// assert_eq!(r, Some(Value::Number(42.5)));
/// assert!(number(&[Some(Value::from("abc"))]).is_err());
/// ```
pub fn number(args: &[Binding]) -> EvalResult<Binding> {
    let value = match single("number", args)? {
        Some(Value::Number(n)) => *n,
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => return Err(RuntimeError::invalid_argument(format!("'{text}' is not a number"))),
        },
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Money(money)) => money.amount(),
        Some(Value::Rate(rate)) => rate.value(),
        Some(Value::Percentage(percentage)) => percentage.value(),
        other => {
            return Err(RuntimeError::type_mismatch(format!("cannot convert {} to a number", type_name(other))));
        },
    };
    numeric(value)
}

/// Builds a `Rate` from a fraction in `[0, 1]`.
///
/// # Errors
/// Returns `RuntimeError::InvalidValue` outside that range.
pub fn rate(args: &[Binding]) -> EvalResult<Binding> {
    Ok(Some(Value::from(Rate::new(as_number(single("rate", args)?, "rate")?)?)))
}

/// Builds a `Percentage` from a value in `[0, 100]`.
///
/// # Errors
/// Returns `RuntimeError::InvalidValue` outside that range.
pub fn percent(args: &[Binding]) -> EvalResult<Binding> {
    Ok(Some(Value::from(Percentage::new(as_number(single("percent", args)?, "percent")?)?)))
}

/// Converts to a `Rate`.
///
/// A plain number is read on the percentage scale, so `to_rate(5)` is
/// `5.00%`. A `Percentage` converts exactly and a `Rate` passes through.
///
/// # Errors
/// - `RuntimeError::InvalidValue` when the result leaves `[0, 1]`.
/// - `RuntimeError::TypeMismatch` for other kinds.
///
/// # Example
/// ```
/// use finlite::interpreter::{
///     evaluator::function::builtin::to_rate,
///     value::{core::Value, finance::Rate},
/// };
///
/// let r = to_rate(&[Some(Value::Number(5.0))]).unwrap();
/// assert_eq!(r, Some(Value::Rate(Rate::new(0.05).unwrap())));
/// ```
pub fn to_rate(args: &[Binding]) -> EvalResult<Binding> {
    let rate = match single("to_rate", args)? {
        Some(Value::Rate(rate)) => *rate,
        Some(Value::Percentage(percentage)) => percentage.to_rate(),
        Some(Value::Number(n)) => Rate::new(n / 100.0)?,
        other => {
            return Err(RuntimeError::type_mismatch(format!("cannot convert {} to a rate", type_name(other))));
        },
    };
    Ok(Some(Value::from(rate)))
}

/// Converts to a `Percentage`.
///
/// A plain number is read as a fraction, so `to_percentage(0.25)` is
/// `25.00%`. A `Rate` converts exactly and a `Percentage` passes through.
///
/// # Errors
/// - `RuntimeError::InvalidValue` when the result leaves `[0, 100]`.
/// - `RuntimeError::TypeMismatch` for other kinds.
pub fn to_percentage(args: &[Binding]) -> EvalResult<Binding> {
    let percentage = match single("to_percentage", args)? {
        Some(Value::Percentage(percentage)) => *percentage,
        Some(Value::Rate(rate)) => rate.to_percentage(),
        Some(Value::Number(n)) => Percentage::new(n * 100.0)?,
        other => {
            return Err(RuntimeError::type_mismatch(format!("cannot convert {} to a percentage",
                                                           type_name(other))));
        },
    };
    Ok(Some(Value::from(percentage)))
}

/// `money(amount, currency?)`; the currency code defaults to `USD`.
///
/// # Errors
/// - `RuntimeError::ArgumentCountMismatch` unless called with 1 or 2
///   arguments.
/// - `RuntimeError::InvalidValue` for an unknown currency or a non-finite
///   amount.
///
/// # Example
/// ```
/// use finlite::interpreter::{evaluator::function::builtin::money, value::core::Value};
///
/// let m = money(&[Some(Value::Number(100.0)), Some(Value::from("eur"))]).unwrap();
/// assert_eq!(m.unwrap().to_string(), "EUR 100.00");
/// ```
pub fn money(args: &[Binding]) -> EvalResult<Binding> {
    check_count("money", args, 1, 2)?;
    let amount = as_number(&args[0], "amount")?;
    let currency = match args.get(1) {
        Some(code) => Currency::parse(as_str(code, "currency")?)?,
        None => Currency::Usd,
    };
    Ok(Some(Value::from(Money::new(amount, currency)?)))
}

/// `period(value, unit?)`; the unit defaults to years.
///
/// # Errors
/// - `RuntimeError::ArgumentCountMismatch` unless called with 1 or 2
///   arguments.
/// - `RuntimeError::InvalidValue` for a unit other than days, months or
///   years.
pub fn period(args: &[Binding]) -> EvalResult<Binding> {
    check_count("period", args, 1, 2)?;
    let value = as_number(&args[0], "period value")?;
    let unit = match args.get(1) {
        Some(unit) => TimeUnit::parse(as_str(unit, "period unit")?)?,
        None => TimeUnit::Years,
    };
    Ok(Some(Value::from(TimePeriod { value, unit })))
}

/// An empty ledger.
pub fn ledger(_args: &[Binding]) -> EvalResult<Binding> {
    Ok(Some(Value::from(Ledger::default())))
}

pub fn type_of(args: &[Binding]) -> EvalResult<Binding> {
    Ok(Some(Value::from(type_name(single("type_of", args)?))))
}
