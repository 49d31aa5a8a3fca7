use std::iter::Peekable;

use crate::{
    ast::{Expr, FinanceExpr},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{match_kind, parse_comma_separated, peek_second},
        },
    },
};

/// Forms that take a fixed set of named arguments, in positional order.
///
/// Which of them are required is decided when the form is built.
const SIGNATURES: &[(&str, &[&str])] =
    &[("npv", &["rate", "cashflows"]),
      ("irr", &["cashflows", "guess"]),
      ("pv", &["rate", "nper", "pmt", "fv"]),
      ("fv", &["rate", "nper", "pmt", "pv"]),
      ("wacc", &["equity_weight", "debt_weight", "cost_of_equity", "cost_of_debt", "tax_rate"]),
      ("capm", &["risk_free", "beta", "market_return"]),
      ("var", &["returns", "confidence", "value"]),
      ("sma", &["values", "period"]),
      ("ema", &["values", "period"]),
      ("amortize", &["principal", "rate", "periods"]),
      ("portfolio", &["assets", "weights"]),
      ("entry", &["date", "debit", "credit", "description"])];

/// Whether `word` names a finance form when followed by `(`.
#[must_use]
pub fn is_finance_form(word: &str) -> bool {
    let word = word.to_ascii_lowercase();
    word == "cashflow" || word == "table" || SIGNATURES.iter().any(|(name, _)| *name == word)
}

/// One argument as written: `name: expr` or a bare `expr`.
struct Argument {
    name: Option<(String, usize)>,
    expr: Expr,
}

/// Arguments sorted into the slots of a signature.
pub(in crate::interpreter::parser) struct Slots {
    form:  &'static str,
    names: &'static [&'static str],
    slots: Vec<Option<Expr>>,
    line:  usize,
}

impl Slots {
    /// Takes a required argument.
    fn required(&mut self, index: usize) -> ParseResult<Box<Expr>> {
        self.optional(index).ok_or_else(|| {
                                ParseError::Arity { form:    self.form.to_string(),
                                                    details: format!("Missing required argument '{}'",
                                                                     self.names[index]),
                                                    line:    self.line, }
                            })
    }

    /// Takes an optional argument.
    fn optional(&mut self, index: usize) -> Option<Box<Expr>> {
        self.slots.get_mut(index).and_then(Option::take).map(Box::new)
    }

    /// Takes an optional argument without boxing it.
    pub(in crate::interpreter::parser) fn take(&mut self, index: usize) -> Option<Expr> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Takes a required argument without boxing it.
    pub(in crate::interpreter::parser) fn take_required(&mut self, index: usize) -> ParseResult<Expr> {
        self.required(index).map(|expr| *expr)
    }
}

/// Parses the argument list of a finance form.
///
/// The opening parenthesis has already been consumed.
///
/// # Parameters
/// - `tokens`: Token stream positioned after `(`.
/// - `word`: The form name as written.
/// - `line`: Line of the opening parenthesis.
///
/// # Errors
/// Returns `ParseError::Arity`, `UnknownArgument` or `DuplicateArgument` when
/// the arguments do not fit the form, or any error from the argument
/// expressions.
pub fn parse_finance_form<'a, I>(tokens: &mut Peekable<I>, word: &str, line: usize) -> ParseResult<FinanceExpr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let word = word.to_ascii_lowercase();
    match word.as_str() {
        "cashflow" => parse_cashflow(tokens, line),
        "table" => parse_table(tokens, line),
        _ => {
            let mut slots = parse_signature(tokens, &word, line)?;
            build(&word, &mut slots)
        },
    }
}

/// Parses arguments against the signature of `form` and checks them.
///
/// Positional arguments fill slots in order; named arguments fill the slot of
/// that name. Required arguments are checked when they are taken.
pub(in crate::interpreter::parser) fn parse_signature<'a, I>(tokens: &mut Peekable<I>,
                                                             form: &str,
                                                             line: usize)
                                                             -> ParseResult<Slots>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(&(form, names)) = SIGNATURES.iter().find(|(name, _)| *name == form) else {
        return Err(ParseError::UnexpectedToken { token: form.to_string(),
                                                 context: "finance form".to_string(),
                                                 line });
    };

    let arguments = parse_arguments(tokens, form)?;
    let mut slots: Vec<Option<Expr>> = vec![None; names.len()];
    let mut position = 0;

    for Argument { name, expr } in arguments {
        let index = match name {
            Some((name, name_line)) => {
                let lowered = name.to_ascii_lowercase();
                names.iter()
                     .position(|candidate| *candidate == lowered)
                     .ok_or(ParseError::UnknownArgument { form: form.to_string(),
                                                          name,
                                                          line: name_line })?
            },
            None => {
                position += 1;
                position - 1
            },
        };
        let Some(slot) = slots.get_mut(index) else {
            return Err(ParseError::Arity { form: form.to_string(),
                                           details: format!("Takes at most {} argument(s)", names.len()),
                                           line });
        };
        if slot.is_some() {
            return Err(ParseError::DuplicateArgument { form: form.to_string(),
                                                       name: names[index].to_string(),
                                                       line });
        }
        *slot = Some(expr);
    }

    Ok(Slots { form,
               names,
               slots,
               line })
}

fn build(form: &str, slots: &mut Slots) -> ParseResult<FinanceExpr> {
    let expr = match form {
        "npv" => FinanceExpr::Npv { rate:      slots.required(0)?,
                                    cashflows: slots.required(1)?, },
        "irr" => FinanceExpr::Irr { cashflows: slots.required(0)?,
                                    guess:     slots.optional(1), },
        "pv" => FinanceExpr::Pv { rate: slots.required(0)?,
                                  nper: slots.required(1)?,
                                  pmt:  slots.optional(2),
                                  fv:   slots.optional(3), },
        "fv" => FinanceExpr::Fv { rate: slots.required(0)?,
                                  nper: slots.required(1)?,
                                  pmt:  slots.optional(2),
                                  pv:   slots.optional(3), },
        "wacc" => FinanceExpr::Wacc { equity_weight:  slots.required(0)?,
                                      debt_weight:    slots.required(1)?,
                                      cost_of_equity: slots.required(2)?,
                                      cost_of_debt:   slots.required(3)?,
                                      tax_rate:       slots.required(4)?, },
        "capm" => FinanceExpr::Capm { risk_free:     slots.required(0)?,
                                      beta:          slots.required(1)?,
                                      market_return: slots.required(2)?, },
        "var" => FinanceExpr::Var { returns:    slots.required(0)?,
                                    confidence: slots.required(1)?,
                                    value:      slots.optional(2), },
        "sma" => FinanceExpr::Sma { values: slots.required(0)?,
                                    period: slots.required(1)?, },
        "ema" => FinanceExpr::Ema { values: slots.required(0)?,
                                    period: slots.required(1)?, },
        "amortize" => FinanceExpr::Amortize { principal: slots.required(0)?,
                                              rate:      slots.required(1)?,
                                              periods:   slots.required(2)?, },
        "portfolio" => FinanceExpr::Portfolio { assets:  slots.required(0)?,
                                                weights: slots.required(1)?, },
        _ => {
            return Err(ParseError::UnexpectedToken { token:   form.to_string(),
                                                     context: "expression".to_string(),
                                                     line:    slots.line, });
        },
    };
    Ok(expr)
}

/// `cashflow(f0, f1, ...)`: one or more positional flows.
fn parse_cashflow<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<FinanceExpr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut flows = Vec::new();
    for Argument { name, expr } in parse_arguments(tokens, "cashflow")? {
        if let Some((name, line)) = name {
            return Err(ParseError::UnknownArgument { form: "cashflow".to_string(),
                                                     name,
                                                     line });
        }
        flows.push(expr);
    }
    if flows.is_empty() {
        return Err(ParseError::Arity { form: "cashflow".to_string(),
                                       details: "Needs at least one flow".to_string(),
                                       line });
    }
    Ok(FinanceExpr::Cashflow { flows })
}

/// `table(name: [...], ...)`: one or more named columns.
fn parse_table<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<FinanceExpr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut columns: Vec<(String, Expr)> = Vec::new();
    for Argument { name, expr } in parse_arguments(tokens, "table")? {
        let Some((name, name_line)) = name else {
            return Err(ParseError::Arity { form: "table".to_string(),
                                           details: "Columns must be named".to_string(),
                                           line });
        };
        if columns.iter().any(|(existing, _)| *existing == name) {
            return Err(ParseError::DuplicateArgument { form: "table".to_string(),
                                                       name,
                                                       line: name_line });
        }
        columns.push((name, expr));
    }
    if columns.is_empty() {
        return Err(ParseError::Arity { form: "table".to_string(),
                                       details: "Needs at least one column".to_string(),
                                       line });
    }
    Ok(FinanceExpr::Table { columns })
}

fn parse_arguments<'a, I>(tokens: &mut Peekable<I>, form: &str) -> ParseResult<Vec<Argument>>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_comma_separated(tokens, parse_argument, TokenKind::RightParen, &format!("'{form}' arguments"))
}

/// `name: expr` or `expr`.
fn parse_argument<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Argument>
    where I: Iterator<Item = &'a Token> + Clone
{
    let named = tokens.peek().is_some_and(|token| token.kind == TokenKind::Identifier)
                && peek_second(tokens) == TokenKind::Colon;
    let name = if named {
        let name = tokens.next().map(|token| (token.lexeme.clone(), token.line));
        match_kind(tokens, TokenKind::Colon);
        name
    } else {
        None
    };
    let expr = parse_expression(tokens)?;
    Ok(Argument { name, expr })
}
