/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// corresponding to a language element such as a number, date, string,
/// identifier, keyword or operator. Indentation changes at the start of a
/// line become `INDENT` and `DEDENT` tokens.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with kind, lexeme,
///   literal and source line.
/// - Tracks indentation levels and emits layout tokens.
/// - Reports lexical errors without stopping, marking the bad span with an
///   `ERROR` token.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// statements and expressions. Finance forms check their named arguments
/// while parsing.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar, reporting errors with line and lexeme.
/// - Recovers at statement boundaries so one pass reports every error.
pub mod parser;
/// The scope chain.
///
/// Reference-counted scopes with a parent link and a depth, shared with the
/// closures that capture them.
pub mod environment;
/// The value module defines the runtime data types for evaluation.
///
/// Numbers, strings, booleans and lists, the finance types with their
/// construction-time invariants, callables, and the explicit coercions
/// between them.
///
/// # Responsibilities
/// - Defines the `Value` enum and the canonical string of every kind.
/// - Validates Rate, Percentage, Money, Portfolio, Table and ledger values
///   when they are built.
/// - Provides narrow, documented conversions for builtins and finance forms.
pub mod value;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks statements and expressions against a scope chain,
/// writes printed values to its output sink and reports runtime errors with
/// their source line.
///
/// # Responsibilities
/// - Executes statements, including blocks, loops, functions and scenarios.
/// - Evaluates expressions, operators, calls and finance forms.
/// - Reports runtime errors such as division by zero or type mismatches.
pub mod evaluator;
