use std::{iter::Peekable, rc::Rc};

use tracing::debug;

use crate::{
    ast::{ElseIf, FunctionDecl, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_body,
            core::{ParseResult, parse_expression},
            finance::parse_signature,
            utils::{
                check_word, expect, expected_error, match_kind, parse_comma_separated, parse_identifier, peek_kind,
                peek_line, peek_second,
            },
        },
    },
};

/// Parses one statement, recovering from errors.
///
/// On failure the error is pushed to `errors`, tokens are skipped up to the
/// next statement boundary, and `Stmt::Error` takes the statement's place.
/// At least one token is always consumed, so callers looping on this cannot
/// spin.
pub(in crate::interpreter::parser) fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                                                               errors: &mut Vec<ParseError>)
                                                               -> Stmt
    where I: Iterator<Item = &'a Token> + Clone
{
    let start = tokens.peek().map(|token| std::ptr::from_ref::<Token>(token));
    let line = peek_line(tokens);

    match parse_terminated(tokens, errors) {
        Ok(stmt) => stmt,
        Err(error) => {
            debug!(line = error.line(), "skipping to next statement after: {error}");
            errors.push(error);
            synchronize(tokens, start);
            Stmt::Error { line }
        },
    }
}

/// A statement followed by a statement boundary.
fn parse_terminated<'a, I>(tokens: &mut Peekable<I>, errors: &mut Vec<ParseError>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let stmt = parse_statement(tokens, errors)?;

    match peek_kind(tokens) {
        TokenKind::Newline
        | TokenKind::Dedent
        | TokenKind::Eof
        | TokenKind::End
        | TokenKind::Else
        | TokenKind::Elseif => Ok(stmt),
        _ => Err(expected_error(tokens.peek().copied(), "end of statement")),
    }
}

/// Discards tokens up to the next statement boundary.
///
/// A newline is consumed; a block closer or a statement keyword is left in
/// place so the enclosing block can still close or the next statement can
/// still parse.
fn synchronize<'a, I>(tokens: &mut Peekable<I>, start: Option<*const Token>)
    where I: Iterator<Item = &'a Token>
{
    if let Some(token) = tokens.peek()
       && start == Some(std::ptr::from_ref::<Token>(token))
       && token.kind != TokenKind::Eof
    {
        tokens.next();
    }

    while let Some(kind) = tokens.peek().map(|token| token.kind) {
        match kind {
            TokenKind::Newline => {
                tokens.next();
                return;
            },
            TokenKind::Eof | TokenKind::Dedent | TokenKind::End | TokenKind::Else | TokenKind::Elseif => return,
            kind if starts_statement(kind) => return,
            _ => {
                tokens.next();
            },
        }
    }
}

const fn starts_statement(kind: TokenKind) -> bool {
    matches!(kind,
             TokenKind::Let
             | TokenKind::Set
             | TokenKind::Print
             | TokenKind::Log
             | TokenKind::If
             | TokenKind::While
             | TokenKind::For
             | TokenKind::Foreach
             | TokenKind::Fn
             | TokenKind::Return
             | TokenKind::Block
             | TokenKind::Scenario
             | TokenKind::Run
             | TokenKind::Simulate
             | TokenKind::Entry)
}

/// Parses a single statement.
///
/// A statement may be one of:
/// - `let`, `set`, `print`, `log`
/// - `if`, `while`, `for`, `foreach`, `block`
/// - `fn` and `return`
/// - `scenario`, `run`, `simulate`
/// - `portfolio NAME(...)` and `entry NAME(...)`
/// - an expression used as a statement.
fn parse_statement<'a, I>(tokens: &mut Peekable<I>, errors: &mut Vec<ParseError>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let line = peek_line(tokens);

    let stmt = match peek_kind(tokens) {
        TokenKind::Let => {
            tokens.next();
            let name = parse_identifier(tokens, "variable name after 'let'")?;
            let initializer = match match_kind(tokens, TokenKind::Equal) {
                Some(_) => Some(parse_expression(tokens)?),
                None => None,
            };
            Stmt::Let { name,
                        initializer,
                        line }
        },
        TokenKind::Set => {
            tokens.next();
            let name = parse_identifier(tokens, "variable name after 'set'")?;
            expect(tokens, TokenKind::Equal, "'=' after variable name")?;
            let value = parse_expression(tokens)?;
            Stmt::Set { name, value, line }
        },
        TokenKind::Print => {
            tokens.next();
            Stmt::Print { expr: parse_expression(tokens)?,
                          line }
        },
        TokenKind::Log => {
            tokens.next();
            Stmt::Log { expr: parse_expression(tokens)?,
                        line }
        },
        TokenKind::If => {
            tokens.next();
            parse_if(tokens, errors, line)?
        },
        TokenKind::While => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_closed_body(tokens, errors, "while")?;
            Stmt::While { condition,
                          body,
                          line }
        },
        TokenKind::For => {
            tokens.next();
            parse_for(tokens, errors, line)?
        },
        TokenKind::Foreach => {
            tokens.next();
            let var = parse_identifier(tokens, "loop variable after 'foreach'")?;
            expect(tokens, TokenKind::In, "'in' after loop variable")?;
            let iterable = parse_expression(tokens)?;
            let body = parse_closed_body(tokens, errors, "foreach")?;
            Stmt::ForEach { var,
                            iterable,
                            body,
                            line }
        },
        TokenKind::Block => {
            tokens.next();
            Stmt::Block { statements: parse_closed_body(tokens, errors, "block")?,
                          line }
        },
        TokenKind::Fn => {
            tokens.next();
            parse_function(tokens, errors, line)?
        },
        TokenKind::Return => {
            tokens.next();
            let value = match peek_kind(tokens) {
                TokenKind::Newline
                | TokenKind::Dedent
                | TokenKind::Eof
                | TokenKind::End
                | TokenKind::Else
                | TokenKind::Elseif => None,
                _ => Some(parse_expression(tokens)?),
            };
            Stmt::Return { value, line }
        },
        TokenKind::Scenario => {
            tokens.next();
            let name = parse_identifier(tokens, "scenario name")?;
            let body = parse_closed_body(tokens, errors, "scenario")?;
            Stmt::Scenario { name,
                             body: Rc::from(body),
                             line }
        },
        TokenKind::Run => {
            tokens.next();
            Stmt::Run { name: parse_identifier(tokens, "scenario name after 'run'")?,
                        line }
        },
        TokenKind::Simulate => {
            tokens.next();
            let name = parse_identifier(tokens, "scenario name after 'simulate'")?;
            if !check_word(tokens, "times") {
                return Err(expected_error(tokens.peek().copied(), "'times' after scenario name"));
            }
            tokens.next();
            let times = parse_expression(tokens)?;
            Stmt::Simulate { name, times, line }
        },
        TokenKind::Entry => {
            tokens.next();
            parse_ledger_entry(tokens, line)?
        },
        TokenKind::Identifier
            if check_word(tokens, "portfolio") && peek_second(tokens) == TokenKind::Identifier =>
        {
            tokens.next();
            parse_portfolio(tokens, line)?
        },
        _ => Stmt::Expression { expr: parse_expression(tokens)?,
                                line },
    };

    Ok(stmt)
}

/// Parses the rest of an `if` statement after the `if` keyword.
///
/// Syntax:
/// ```text
///     if <condition> then
///         <statements>
///     elseif <condition> then
///         <statements>
///     else
///         <statements>
///     end
/// ```
/// Any number of `elseif` branches may appear. `end` is mandatory.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, errors: &mut Vec<ParseError>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let branch_closers = [TokenKind::Elseif, TokenKind::Else, TokenKind::End];

    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::Then, "'then' after if condition")?;
    let then_branch = parse_body(tokens, errors, &branch_closers, "if")?;

    let mut elseifs = Vec::new();
    while match_kind(tokens, TokenKind::Elseif).is_some() {
        let condition = parse_expression(tokens)?;
        expect(tokens, TokenKind::Then, "'then' after elseif condition")?;
        let body = parse_body(tokens, errors, &branch_closers, "elseif")?;
        elseifs.push(ElseIf { condition, body });
    }

    let else_branch = match match_kind(tokens, TokenKind::Else) {
        Some(_) => Some(parse_body(tokens, errors, &[TokenKind::End], "else")?),
        None => None,
    };
    expect(tokens, TokenKind::End, "'end' to close 'if'")?;

    Ok(Stmt::If { condition,
                  then_branch,
                  elseifs,
                  else_branch,
                  line })
}

/// Parses `for NAME from START to END (step STEP)? BODY end`.
fn parse_for<'a, I>(tokens: &mut Peekable<I>, errors: &mut Vec<ParseError>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let var = parse_identifier(tokens, "loop variable after 'for'")?;
    expect(tokens, TokenKind::From, "'from' after loop variable")?;
    let start = parse_expression(tokens)?;
    expect(tokens, TokenKind::To, "'to' after start value")?;
    let end = parse_expression(tokens)?;
    let step = match match_kind(tokens, TokenKind::Step) {
        Some(_) => Some(parse_expression(tokens)?),
        None => None,
    };
    let body = parse_closed_body(tokens, errors, "for")?;

    Ok(Stmt::For { var,
                   start,
                   end,
                   step,
                   body,
                   line })
}

/// Parses `fn NAME(p1, p2, ...) BODY end`.
fn parse_function<'a, I>(tokens: &mut Peekable<I>, errors: &mut Vec<ParseError>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = parse_identifier(tokens, "function name after 'fn'")?;
    expect(tokens, TokenKind::LeftParen, "'(' after function name")?;
    let params = parse_comma_separated(tokens,
                                       |tokens| parse_identifier(tokens, "parameter name"),
                                       TokenKind::RightParen,
                                       "parameter list")?;
    let body = parse_closed_body(tokens, errors, "fn")?;

    Ok(Stmt::Function(Rc::new(FunctionDecl { name,
                                             params,
                                             body,
                                             line })))
}

/// Parses `portfolio NAME(assets: ..., weights: ...)` after `portfolio`.
fn parse_portfolio<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = parse_identifier(tokens, "portfolio name")?;
    let paren = expect(tokens, TokenKind::LeftParen, "'(' after portfolio name")?;
    let mut slots = parse_signature(tokens, "portfolio", paren.line)?;

    Ok(Stmt::Portfolio { name,
                         assets: slots.take_required(0)?,
                         weights: slots.take_required(1)?,
                         line })
}

/// Parses `entry LEDGER(date: ..., debit: ..., credit: ..., description: ...)`
/// after `entry`.
fn parse_ledger_entry<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a Token> + Clone
{
    let ledger = parse_identifier(tokens, "ledger name after 'entry'")?;
    let paren = expect(tokens, TokenKind::LeftParen, "'(' after ledger name")?;
    let mut slots = parse_signature(tokens, "entry", paren.line)?;

    let date = slots.take_required(0)?;
    let debit = slots.take(1);
    let credit = slots.take(2);
    let description = slots.take_required(3)?;
    if debit.is_none() && credit.is_none() {
        return Err(ParseError::Arity { form:    "entry".to_string(),
                                       details: "Needs a debit or a credit".to_string(),
                                       line:    paren.line, });
    }

    Ok(Stmt::LedgerEntry { ledger,
                           date,
                           debit,
                           credit,
                           description,
                           line })
}

/// A body closed by `end`, which is consumed.
fn parse_closed_body<'a, I>(tokens: &mut Peekable<I>,
                            errors: &mut Vec<ParseError>,
                            context: &str)
                            -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let body = parse_body(tokens, errors, &[TokenKind::End], context)?;
    expect(tokens, TokenKind::End, &format!("'end' to close '{context}'"))?;
    Ok(body)
}

/// Reports every `return` that is not inside a function or scenario body.
pub(in crate::interpreter::parser) fn check_return_placement(statements: &[Stmt],
                                                             in_function: bool,
                                                             errors: &mut Vec<ParseError>) {
    for stmt in statements {
        match stmt {
            Stmt::Return { line, .. } if !in_function => {
                errors.push(ParseError::ReturnOutsideFunction { line: *line });
            },
            Stmt::Function(decl) => check_return_placement(&decl.body, true, errors),
            Stmt::Scenario { body, .. } => check_return_placement(body, true, errors),
            Stmt::Block { statements, .. } => check_return_placement(statements, in_function, errors),
            Stmt::While { body, .. } | Stmt::For { body, .. } | Stmt::ForEach { body, .. } => {
                check_return_placement(body, in_function, errors);
            },
            Stmt::If { then_branch,
                       elseifs,
                       else_branch,
                       .. } => {
                check_return_placement(then_branch, in_function, errors);
                for branch in elseifs {
                    check_return_placement(&branch.body, in_function, errors);
                }
                if let Some(branch) = else_branch {
                    check_return_placement(branch, in_function, errors);
                }
            },
            _ => {},
        }
    }
}
