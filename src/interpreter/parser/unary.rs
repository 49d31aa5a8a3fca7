use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{Token, TokenKind, TokenLiteral},
        parser::{
            core::{ParseResult, parse_expression},
            finance::{is_finance_form, parse_finance_form},
            utils::{Nesting, expect, match_kind, parse_comma_separated, parse_identifier, unexpected},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!` and `not` (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`. They bind looser than `^`, so `-2 ^ 2` is `-(2 ^ 2)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "!" | "not") unary
///            | power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let op = match tokens.peek().map(|token| token.kind) {
        Some(TokenKind::Minus) => UnaryOperator::Negate,
        Some(TokenKind::Bang | TokenKind::Not) => UnaryOperator::Not,
        _ => return parse_power(tokens),
    };
    let line = tokens.next().map_or(0, |token| token.line);
    let _nesting = Nesting::enter(line)?;
    let operand = ensure_sufficient_stack(|| parse_unary(tokens))?;

    Ok(Expr::Unary { op,
                     operand: Box::new(operand),
                     line })
}

/// Parses exponentiation expressions.
///
/// Exponentiation is right-associative: `a ^ b ^ c` parses as `a ^ (b ^ c)`.
/// The exponent may carry its own sign, as in `2 ^ -1`.
///
/// The rule is: `power := postfix ("^" unary)?`
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let base = parse_primary(tokens)?;
    let base = parse_postfix(tokens, base)?;

    let Some(caret) = match_kind(tokens, TokenKind::Caret) else {
        return Ok(base);
    };
    let _nesting = Nesting::enter(caret.line)?;
    let exponent = ensure_sufficient_stack(|| parse_unary(tokens))?;

    Ok(Expr::Binary { left:  Box::new(base),
                      op:    BinaryOperator::Pow,
                      right: Box::new(exponent),
                      line:  caret.line, })
}

/// Applies postfix operators to an already parsed expression.
///
/// Handles, in any order and any number of times:
/// - calls `f(a, b)`
/// - subscripts `xs[i]` and slices `xs[i:j]`
/// - column and field access `t.name`
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    loop {
        if let Some(paren) = match_kind(tokens, TokenKind::LeftParen) {
            let arguments =
                parse_comma_separated(tokens, parse_expression, TokenKind::RightParen, "call arguments")?;
            expr = Expr::Call { callee: Box::new(expr),
                                arguments,
                                line: paren.line };
        } else if let Some(bracket) = match_kind(tokens, TokenKind::LeftBracket) {
            let index = parse_expression(tokens)?;
            let end = match match_kind(tokens, TokenKind::Colon) {
                Some(_) => Some(Box::new(parse_expression(tokens)?)),
                None => None,
            };
            expect(tokens, TokenKind::RightBracket, "']' after index")?;
            expr = Expr::Subscript { container: Box::new(expr),
                                     index: Box::new(index),
                                     end,
                                     line: bracket.line };
        } else if let Some(dot) = match_kind(tokens, TokenKind::Dot) {
            let name = parse_identifier(tokens, "field name after '.'")?;
            expr = Expr::ColumnAccess { object: Box::new(expr),
                                        name,
                                        line: dot.line };
        } else {
            return Ok(expr);
        }
    }
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - number, string, date, boolean and `null` literals
/// - identifiers
/// - finance forms such as `npv(...)` or `table(...)`
/// - parenthesized expressions
/// - list literals (`[ ... ]`)
///
/// # Errors
/// Returns a `ParseError` for any token that cannot start an expression.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(unexpected(None, "expression"));
    };
    let line = token.line;

    let literal = match (&token.kind, &token.literal) {
        (TokenKind::Number, Some(TokenLiteral::Number(n))) => Some(LiteralValue::Number(*n)),
        (TokenKind::String, Some(TokenLiteral::Text(text))) => Some(LiteralValue::Text(text.clone())),
        (TokenKind::Date, Some(TokenLiteral::Date(date))) => Some(LiteralValue::Text(date.clone())),
        (TokenKind::True, _) => Some(LiteralValue::Bool(true)),
        (TokenKind::False, _) => Some(LiteralValue::Bool(false)),
        (TokenKind::Null, _) => Some(LiteralValue::Null),
        _ => None,
    };
    if let Some(value) = literal {
        tokens.next();
        return Ok(Expr::Literal { value, line });
    }

    match token.kind {
        TokenKind::Identifier => {
            tokens.next();
            if is_finance_form(&token.lexeme)
               && let Some(paren) = match_kind(tokens, TokenKind::LeftParen)
            {
                let form = parse_finance_form(tokens, &token.lexeme, paren.line)?;
                return Ok(Expr::Finance { form, line });
            }
            Ok(Expr::Variable { name: token.lexeme.clone(),
                                line })
        },
        TokenKind::LeftParen => {
            tokens.next();
            let inner = parse_expression(tokens)?;
            expect(tokens, TokenKind::RightParen, "')' after expression")?;
            Ok(Expr::Grouping { inner: Box::new(inner),
                                line })
        },
        TokenKind::LeftBracket => {
            tokens.next();
            let elements = parse_comma_separated(tokens, parse_expression, TokenKind::RightBracket, "list")?;
            Ok(Expr::ListLiteral { elements, line })
        },
        _ => Err(unexpected(Some(token), "expression")),
    }
}
