/// Builtin function implementations.
///
/// Numeric helpers, series statistics and the constructors and conversions
/// for the finance value types. Every builtin is a plain function over
/// evaluated arguments.
pub mod builtin;

/// Call dispatch.
///
/// Holds the builtin table, registers it in the global scope, evaluates call
/// expressions and runs user-defined functions.
pub mod core;

/// Finance forms.
///
/// Evaluates `npv`, `irr`, `pv`, `fv`, `wacc`, `capm`, `var`, `sma`, `ema`,
/// `amortize` and the `cashflow`, `portfolio` and `table` literals.
pub mod finance;
