//! # finlite
//!
//! finlite is an interpreter for FinLite, a small indentation-aware scripting
//! language for financial calculations, written in Rust.
//! It scans, parses and evaluates scripts with support for lexical scopes,
//! closures, ledgers, portfolios, cashflows, tables and time-value-of-money
//! formulas.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::path::Path;

use crate::{
    ast::Stmt,
    interpreter::{lexer::scan_with_diagnostics, parser::parse},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` enums that represent the
/// syntactic structure of a script as a tree. The AST is built by the parser
/// and walked by the evaluator and the printer.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs,
///   including the finance forms and statements.
/// - Attaches source lines to AST nodes for error reporting.
/// - Provides a deterministic textual dump for debugging.
pub mod ast;
/// Provides unified error types for scanning, parsing and evaluation.
///
/// This module defines all errors that can be raised while running a script.
/// Every error carries the source line it was found on, when known, and
/// prints as `Error on line N: ...`.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator,
///   scope chain, value construction).
/// - Aggregates the diagnostics of one pass into a `ScriptError`.
/// - Implements `std::error::Error` with source chaining.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, the scope chain, value
/// representations and evaluation to provide a complete runtime for FinLite
/// scripts.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, environment, evaluator
///   and value types.
/// - Provides entry points for scanning, parsing and executing user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Interactive read-eval-print loop.
///
/// Buffers lines until a complete source unit has been entered and runs each
/// unit in one long-lived context.
pub mod repl;
/// General utilities for safe numeric conversion.
///
/// Conversions between `usize`, `i32` and `f64` that fail instead of
/// silently losing data. Indices, counts and digit arguments all arrive as
/// script numbers and pass through here.
pub mod util;

pub use error::ScriptError;
pub use interpreter::evaluator::core::Context;

/// Scans and parses `source`.
///
/// # Errors
/// Returns `ScriptError::Syntax` with every lexical and parse diagnostic of
/// the pass if there was at least one.
///
/// # Example
/// ```
/// use finlite::{ScriptError, parse_source};
///
/// assert_eq!(parse_source("let x = 1\nprint x\n").unwrap().len(), 2);
///
/// match parse_source("let = 1\nprint )\n") {
///     Err(ScriptError::Syntax { parse, .. }) => assert_eq!(parse.len(), 2),
///     other => panic!("expected syntax errors, got {other:?}"),
/// }
/// ```
pub fn parse_source(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    let (tokens, lexical) = scan_with_diagnostics(source);
    let (program, parse) = parse(&tokens);
    if !lexical.is_empty() || !parse.is_empty() {
        return Err(ScriptError::Syntax { lexical, parse });
    }
    Ok(program)
}

/// Runs `source` in `context`.
///
/// Nothing is executed unless the whole source scans and parses cleanly.
/// Definitions stay in `context`, so a later call sees them.
///
/// # Errors
/// - `ScriptError::Syntax` with every diagnostic of the pass.
/// - `ScriptError::Runtime` with the first runtime error.
///
/// # Example
/// ```
/// use finlite::{Context, ScriptError, run_source};
///
/// let mut context = Context::with_output(Box::new(Vec::new()));
///
/// run_source("let rate = 0.05\n", &mut context).unwrap();
/// run_source("let growth = 1 + rate\n", &mut context).unwrap();
///
/// let err = run_source("print 1 / 0\n", &mut context).unwrap_err();
/// assert!(matches!(err, ScriptError::Runtime(_)));
/// assert_eq!(err.to_string(), "Error on line 1: Division by zero.");
/// ```
pub fn run_source(source: &str, context: &mut Context) -> Result<(), ScriptError> {
    let program = parse_source(source)?;
    context.execute(&program)?;
    Ok(())
}

/// Reads a script file and runs it in a fresh context that prints to
/// standard output.
///
/// # Errors
/// `ScriptError::Io` if the file cannot be read, otherwise as
/// [`run_source`].
pub fn run_file(path: impl AsRef<Path>) -> Result<(), ScriptError> {
    let source = std::fs::read_to_string(path)?;
    run_source(&source, &mut Context::new())
}
