use std::{cell::Cell, iter::Peekable};

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Deepest nesting of expressions and blocks the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// One level of parser nesting, released when dropped.
///
/// Taken by every production that recurses into a nested expression or
/// block, so the depth is restored on error paths too.
pub(in crate::interpreter::parser) struct Nesting;

impl Nesting {
    /// Enters one more level of nesting.
    ///
    /// # Errors
    /// Returns `ParseError::NestingTooDeep` past [`MAX_NESTING_DEPTH`].
    pub(in crate::interpreter::parser) fn enter(line: usize) -> ParseResult<Self> {
        let depth = NESTING.get();
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { line });
        }
        NESTING.set(depth + 1);
        Ok(Self)
    }
}

impl Drop for Nesting {
    fn drop(&mut self) {
        NESTING.set(NESTING.get().saturating_sub(1));
    }
}

/// Gets the kind of the next token, treating a drained stream as `Eof`.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Gets the line of the next token, or `0` when the stream is drained.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(0, |token| token.line)
}

/// Looks one token past the next one.
pub(in crate::interpreter::parser) fn peek_second<'a, I>(tokens: &Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    ahead.peek().map_or(TokenKind::Eof, |token| token.kind)
}

/// Consumes the next token if it has the given kind.
pub(in crate::interpreter::parser) fn match_kind<'a, I>(tokens: &mut Peekable<I>, kind: TokenKind) -> Option<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next_if(|token| token.kind == kind)
}

/// Consumes a token of the given kind or fails.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the required token.
/// - `kind`: The required kind.
/// - `expected`: How the token is described in the error, e.g. `'then'`.
///
/// # Errors
/// Returns a `ParseError` describing what was found instead.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    if let Some(token) = match_kind(tokens, kind) {
        return Ok(token);
    }
    Err(expected_error(tokens.peek().copied(), expected))
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `TokenKind::Identifier`. Keywords are never
/// identifiers, but contextual words such as `npv` are.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, TokenKind::Identifier, expected).map(|token| token.lexeme.clone())
}

/// Whether the next token is an identifier spelled like `word`, ignoring case.
pub(in crate::interpreter::parser) fn check_word<'a, I>(tokens: &mut Peekable<I>, word: &str) -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.peek()
          .is_some_and(|token| token.kind == TokenKind::Identifier && token.lexeme.eq_ignore_ascii_case(word))
}

/// Skips newlines and indentation changes.
///
/// Statement lists and bracketed lists treat these as layout only.
pub(in crate::interpreter::parser) fn skip_layout<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while tokens.next_if(|token| matches!(token.kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent))
                .is_some()
    {}
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals, call arguments, parameter lists
/// and finance forms. Layout tokens between items are ignored, so a list may
/// span several lines. An immediately encountered closing token produces an
/// empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned after the opening token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The kind that terminates the list (e.g., `]` or `)`).
/// - `context`: What is being parsed, for error messages.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token is
/// encountered, or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    mut parse_item: impl FnMut(&mut Peekable<I>) -> ParseResult<T>,
    closing: TokenKind,
    context: &str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    skip_layout(tokens);
    if match_kind(tokens, closing).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        skip_layout(tokens);
        if match_kind(tokens, TokenKind::Comma).is_some() {
            skip_layout(tokens);
            continue;
        }
        if match_kind(tokens, closing).is_some() {
            return Ok(items);
        }
        return Err(expected_error(tokens.peek().copied(), &format!("',' or {} in {context}", describe_kind(closing))));
    }
}

/// Builds the error for a token that does not start or continue `context`.
pub(in crate::interpreter::parser) fn unexpected(token: Option<&Token>, context: &str) -> ParseError {
    match token {
        None => ParseError::UnexpectedEndOfInput { context: context.to_string(),
                                                   line:    0, },
        Some(token) => match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEndOfInput { context: context.to_string(),
                                                                 line:    token.line, },
            TokenKind::Error => ParseError::LexicalError { token: token.lexeme.clone(),
                                                           line:  token.line, },
            _ => ParseError::UnexpectedToken { token:   describe(token),
                                               context: context.to_string(),
                                               line:    token.line, },
        },
    }
}

/// Builds the error for a missing required token.
pub(in crate::interpreter::parser) fn expected_error(found: Option<&Token>, expected: &str) -> ParseError {
    match found {
        Some(token) if token.kind == TokenKind::Error => ParseError::LexicalError { token: token.lexeme.clone(),
                                                                                    line:  token.line, },
        Some(token) if token.kind != TokenKind::Eof => ParseError::ExpectedToken { expected: expected.to_string(),
                                                                                   found:    describe(token),
                                                                                   line:     token.line, },
        other => ParseError::UnexpectedEndOfInput { context: expected.to_string(),
                                                    line:    other.map_or(0, |token| token.line), },
    }
}

/// The lexeme of a token, or a name for layout tokens that have none.
pub(in crate::interpreter::parser) fn describe(token: &Token) -> String {
    if token.lexeme.is_empty() {
        describe_kind(token.kind).to_string()
    } else {
        token.lexeme.clone()
    }
}

const fn describe_kind(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Newline => "newline",
        TokenKind::Indent => "indent",
        TokenKind::Dedent => "dedent",
        TokenKind::Eof => "end of input",
        TokenKind::RightParen => "')'",
        TokenKind::RightBracket => "']'",
        _ => "token",
    }
}
