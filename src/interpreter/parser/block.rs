use std::iter::Peekable;

use crate::{
    ast::Stmt,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            statement::parse_declaration,
            utils::{Nesting, peek_kind, peek_line, skip_layout},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses the statements of a block body.
///
/// The body runs until one of the `closers` is the next token; the closer is
/// left for the caller to consume. Indentation inside the body is layout only,
/// so the indented and the flat spelling of a block parse the same.
///
/// Statements that fail to parse are recorded in `errors` and replaced by
/// `Stmt::Error`, which keeps one bad line from swallowing the rest of the
/// block.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the block header.
/// - `errors`: Sink for statement-level parse errors.
/// - `closers`: Token kinds that end the body.
/// - `context`: The construct being parsed, for error messages.
///
/// # Errors
/// - `ParseError::UnexpectedEndOfInput` if input ends before a closer.
/// - `ParseError::NestingTooDeep` if blocks nest too deeply.
pub fn parse_body<'a, I>(tokens: &mut Peekable<I>,
                         errors: &mut Vec<ParseError>,
                         closers: &[TokenKind],
                         context: &str)
                         -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = Nesting::enter(peek_line(tokens))?;
    let mut statements = Vec::new();

    loop {
        skip_layout(tokens);
        let kind = peek_kind(tokens);

        if closers.contains(&kind) {
            return Ok(statements);
        }
        if kind == TokenKind::Eof {
            return Err(ParseError::UnexpectedEndOfInput { context: format!("'{context}' block, expected 'end'"),
                                                          line:    peek_line(tokens), });
        }

        statements.push(ensure_sufficient_stack(|| parse_declaration(tokens, errors)));
    }
}
