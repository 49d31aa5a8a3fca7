use std::iter::Peekable;

use crate::{
    ast::{Expr, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_logical_or,
            statement::{check_return_placement, parse_declaration},
            utils::{Nesting, peek_kind, peek_line, skip_layout},
        },
    },
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole program.
///
/// Parsing does not stop at the first error. A statement that fails to parse
/// is recorded as `Stmt::Error` and the parser resumes at the next statement
/// boundary, so every independent syntax error in the source is reported in
/// one pass.
///
/// # Parameters
/// - `tokens`: The output of [`scan`](crate::interpreter::lexer::scan).
///
/// # Returns
/// The statements in source order and every error found, sorted by line.
///
/// # Example
/// ```
/// use finlite::interpreter::{lexer::scan, parser::parse};
///
/// let (program, errors) = parse(&scan("let x = 1\nlet = 2\nprint )\n"));
/// assert_eq!(program.len(), 3);
/// assert_eq!(errors.len(), 2);
/// ```
#[must_use]
pub fn parse(tokens: &[Token]) -> (Vec<Stmt>, Vec<ParseError>) {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    loop {
        skip_layout(&mut iter);
        if peek_kind(&mut iter) == TokenKind::Eof {
            break;
        }
        statements.push(parse_declaration(&mut iter, &mut errors));
    }

    check_return_placement(&statements, false, &mut errors);
    errors.sort_by_key(ParseError::line);
    (statements, errors)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, assignment, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := assignment`
///
/// # Errors
/// Returns `ParseError::NestingTooDeep` when expressions nest past
/// [`MAX_NESTING_DEPTH`](super::utils::MAX_NESTING_DEPTH) levels.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = Nesting::enter(peek_line(tokens))?;
    ensure_sufficient_stack(|| parse_assignment(tokens))
}

/// Parses a right-associative assignment.
///
/// The left-hand side is parsed as an ordinary expression first; only a bare
/// variable reference is a valid target.
///
/// Grammar: `assignment := logical_or ("=" assignment)?`
///
/// # Errors
/// Returns `ParseError::InvalidAssignmentTarget` when the left-hand side is
/// anything but a variable.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let target = parse_logical_or(tokens)?;

    let Some(equals) = tokens.next_if(|token| token.kind == TokenKind::Equal) else {
        return Ok(target);
    };
    let value = {
        let _nesting = Nesting::enter(equals.line)?;
        parse_assignment(tokens)?
    };

    match target {
        Expr::Variable { name, line } => Ok(Expr::Assign { name,
                                                           value: Box::new(value),
                                                           line }),
        _ => Err(ParseError::InvalidAssignmentTarget { token: equals.lexeme.clone(),
                                                       line:  equals.line, }),
    }
}
