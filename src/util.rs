/// Numeric conversion helpers.
///
/// Script numbers are all `f64`, but indices, periods and repeat counts are
/// used as integers. These helpers convert between the two without silent
/// truncation and report a `RuntimeError` when a value does not fit.
pub mod num;

/// Stack growth for the recursive parser and evaluator.
pub mod stack;
