/// Core evaluation logic and context management.
///
/// Contains the runtime context, statement execution and the expression
/// dispatcher, together with the control-flow signal used for `return`.
pub mod core;

/// Unary operator evaluation.
///
/// Numeric negation and logical not.
pub mod unary;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, string concatenation, comparisons, structural
/// equality and the short-circuiting logical operators.
pub mod binary;

/// `while`, `for` and `foreach` loops.
///
/// Bounds and iterables are evaluated once; every iteration runs in a fresh
/// child scope.
pub mod loops;

/// Indexing, slicing and field access.
pub mod utils;

/// Scenarios, simulations and ledger entries.
///
/// Executes the finance statements that are not plain expressions.
pub mod scenario;

/// Function evaluation.
///
/// Handles builtin and user-defined function calls, argument checking, and
/// the finance forms.
pub mod function;
