use logos::{FilterResult, Lexer, Logos};

use crate::error::LexErrorKind;

/// The context-free part of the token grammar.
///
/// Everything that can be decided by looking at the characters alone lives
/// here. Indentation, keyword folding and line numbers are layered on top by
/// the scanner in the parent module.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
pub(super) enum RawToken {
    /// A number or a `YYYY-MM-DD` date; both start with a digit run.
    #[regex(r"[0-9]+", numeric)]
    Numeric(Numeric),
    /// A double-quoted or triple-quoted string, already decoded.
    #[token("\"\"\"", triple_quoted)]
    #[token("\"", double_quoted)]
    Text(String),
    /// Identifiers and keywords. Any Unicode letter may start a word. Keywords
    /// are told apart later because the match is case-insensitive.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Word,
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    LineComment,
    /// `/* Block comments. */` Never produced; skipped or reported.
    #[token("/*", block_comment)]
    BlockComment,
    /// `\n`
    #[token("\n")]
    Newline,
    /// `(`
    #[token("(")]
    LeftParen,
    /// `)`
    #[token(")")]
    RightParen,
    /// `[`
    #[token("[")]
    LeftBracket,
    /// `]`
    #[token("]")]
    RightBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `:`
    #[token(":")]
    Colon,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `=`
    #[token("=")]
    Equal,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
}

/// Payload of a token that starts with a digit.
#[derive(Debug, PartialEq, Clone)]
pub(super) enum Numeric {
    Number(f64),
    Date(String),
}

/// Extends a digit run into a full number or date literal.
///
/// The regex only matches the leading digits; grouping separators, the
/// fractional part and the date tail are consumed here because they depend on
/// what follows them. A comma only groups when exactly three digits follow,
/// so `[1,2]` is still a two-element list. An exponent (`1.5e-3`) is taken
/// only when at least one digit follows the `e` and its sign.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer positioned after the digit run.
///
/// # Returns
/// - `Ok(Numeric::Date)` when the run is four digits followed by `-dd-dd`.
/// - `Ok(Numeric::Number)` otherwise, with separators removed.
fn numeric(lex: &mut Lexer<RawToken>) -> Result<Numeric, LexErrorKind> {
    let mut digits = lex.slice().to_string();
    let rest = lex.remainder().as_bytes();

    if digits.len() == 4 && is_date_tail(rest) {
        lex.bump(6);
        return Ok(Numeric::Date(lex.slice().to_string()));
    }

    let mut used = take_groups(rest, &mut digits, true);

    if rest.get(used) == Some(&b'.') && rest.get(used + 1).is_some_and(u8::is_ascii_digit) {
        digits.push('.');
        used += 1;
        used += take_run(&rest[used..], &mut digits);
        used += take_groups(&rest[used..], &mut digits, false);
    }

    used += take_exponent(&rest[used..], &mut digits);

    lex.bump(used);
    digits.parse()
          .map(Numeric::Number)
          .map_err(|_| LexErrorKind::UnexpectedCharacter)
}

/// `-dd-dd`, with no further digit glued to the end.
fn is_date_tail(rest: &[u8]) -> bool {
    rest.len() >= 6
    && rest[0] == b'-'
    && rest[1].is_ascii_digit()
    && rest[2].is_ascii_digit()
    && rest[3] == b'-'
    && rest[4].is_ascii_digit()
    && rest[5].is_ascii_digit()
    && !rest.get(6).is_some_and(u8::is_ascii_digit)
}

/// Consumes `e[+-]ddd` if it is there, leaving `1e` or `2em` alone.
fn take_exponent(rest: &[u8], out: &mut String) -> usize {
    if !matches!(rest.first(), Some(b'e' | b'E')) {
        return 0;
    }
    let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
    let digits = rest[1 + sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || rest.get(1 + sign + digits).is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_') {
        return 0;
    }
    out.extend(rest[..1 + sign + digits].iter().map(|&b| char::from(b)));
    1 + sign + digits
}

/// Copies a run of digits into `out` and returns how many bytes it used.
fn take_run(rest: &[u8], out: &mut String) -> usize {
    let len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    out.extend(rest[..len].iter().map(|&b| char::from(b)));
    len
}

/// Consumes `_digits` groups, and `,ddd` groups when `commas` is set.
fn take_groups(rest: &[u8], out: &mut String, commas: bool) -> usize {
    let mut used = 0;
    loop {
        match rest.get(used) {
            Some(b'_') if rest.get(used + 1).is_some_and(u8::is_ascii_digit) => {
                used += 1;
                used += take_run(&rest[used..], out);
            },
            Some(b',') if commas && is_thousands_group(&rest[used + 1..]) => {
                used += 1;
                used += take_run(&rest[used..], out);
            },
            _ => return used,
        }
    }
}

fn is_thousands_group(rest: &[u8]) -> bool {
    rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) && !rest.get(3).is_some_and(u8::is_ascii_digit)
}

/// Scans a double-quoted string body and decodes its escapes.
///
/// A quote preceded by a backslash does not end the string, and since `\\`
/// is consumed as a pair, a quote after an even run of backslashes does.
fn double_quoted(lex: &mut Lexer<RawToken>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut text = String::new();
    let mut chars = rest.char_indices();
    let mut closed_at = None;

    while let Some((at, c)) = chars.next() {
        match c {
            '"' => {
                closed_at = Some(at);
                break;
            },
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, '"')) => text.push('"'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                },
                None => break,
            },
            _ => text.push(c),
        }
    }

    if let Some(at) = closed_at {
        lex.bump(at + 1);
        Ok(text)
    } else {
        lex.bump(rest.len());
        Err(LexErrorKind::UnterminatedString)
    }
}

/// Scans a raw triple-quoted string, which may span lines.
fn triple_quoted(lex: &mut Lexer<RawToken>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    if let Some(end) = rest.find("\"\"\"") {
        let text = rest[..end].to_string();
        lex.bump(end + 3);
        Ok(text)
    } else {
        lex.bump(rest.len());
        Err(LexErrorKind::UnterminatedString)
    }
}

/// Skips a non-nesting block comment.
fn block_comment(lex: &mut Lexer<RawToken>) -> FilterResult<(), LexErrorKind> {
    let rest = lex.remainder();
    if let Some(end) = rest.find("*/") {
        lex.bump(end + 2);
        FilterResult::Skip
    } else {
        lex.bump(rest.len());
        FilterResult::Error(LexErrorKind::UnterminatedComment)
    }
}
