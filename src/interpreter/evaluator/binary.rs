/// Operator dispatch.
///
/// Evaluates both operands, except for `and`/`or` which short-circuit, and
/// routes the operation to the handler for its operator family.
pub mod core;

/// Arithmetic on numbers and string concatenation.
pub mod scalar;

/// Ordering comparisons and structural equality.
pub mod comparison;

/// Short-circuiting `and` and `or`.
pub mod logic;
