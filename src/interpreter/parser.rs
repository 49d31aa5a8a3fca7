/// Parser entry points and the assignment level.
///
/// Holds the program loop with its error collection, and the top of the
/// expression grammar.
pub mod core;

/// Prefix operators, exponentiation, postfix operators and primaries.
pub mod unary;

/// Binary operator parsing.
///
/// Implements every left-associative precedence level from logical OR down to
/// multiplication.
pub mod binary;

/// Block bodies.
///
/// Parses statement sequences that run until a closing keyword, treating
/// indentation as layout.
pub mod block;

/// Statement parsing and statement-level error recovery.
pub mod statement;

/// Finance forms.
///
/// Parses `npv(...)`, `table(...)` and the other built-in forms, matching
/// positional and named arguments against each form's signature and
/// rejecting missing, unknown or repeated arguments before evaluation.
pub mod finance;

/// Helpers shared by the parsing functions: lookahead, expected-token checks,
/// comma-separated lists and error construction.
pub mod utils;

pub use self::core::{ParseResult, parse, parse_expression};
