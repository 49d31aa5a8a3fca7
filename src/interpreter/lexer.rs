/// The context-free token grammar, derived with `logos`.
mod raw;

use logos::Logos;
use tracing::warn;

use self::raw::{Numeric, RawToken};
use crate::error::{LexError, LexErrorKind};

/// The kind of a token.
///
/// Keywords are matched case-insensitively; the finance words (`npv`,
/// `portfolio`, `times`, ...) are not keywords and arrive as
/// [`TokenKind::Identifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation.
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Colon,
    // Operators.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    AndAnd,
    OrOr,
    // Literals.
    Identifier,
    String,
    Number,
    Date,
    // Keywords.
    Let,
    Set,
    If,
    Then,
    Else,
    Elseif,
    End,
    Print,
    Log,
    True,
    False,
    Null,
    From,
    To,
    Step,
    And,
    Or,
    Not,
    While,
    For,
    Foreach,
    Return,
    Fn,
    In,
    Block,
    Scenario,
    Simulate,
    Run,
    Entry,
    // Layout.
    Newline,
    Indent,
    Dedent,
    Error,
    Eof,
}

impl TokenKind {
    /// Looks up a word in the keyword table, ignoring case.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::lexer::TokenKind;
    ///
    /// assert_eq!(TokenKind::keyword("ElseIf"), Some(TokenKind::Elseif));
    /// assert_eq!(TokenKind::keyword("npv"), None);
    /// ```
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "let" => Self::Let,
            "set" => Self::Set,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "elseif" => Self::Elseif,
            "end" => Self::End,
            "print" => Self::Print,
            "log" => Self::Log,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            "from" => Self::From,
            "to" => Self::To,
            "step" => Self::Step,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "while" => Self::While,
            "for" => Self::For,
            "foreach" => Self::Foreach,
            "return" => Self::Return,
            "fn" => Self::Fn,
            "in" => Self::In,
            "block" => Self::Block,
            "scenario" => Self::Scenario,
            "simulate" => Self::Simulate,
            "run" => Self::Run,
            "entry" => Self::Entry,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this kind opens a block that `end` closes.
    #[must_use]
    pub const fn opens_block(self) -> bool {
        matches!(self,
                 Self::If | Self::While | Self::For | Self::Foreach | Self::Block | Self::Fn | Self::Scenario)
    }
}

/// The typed value some tokens carry next to their lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenLiteral {
    /// A number with grouping separators removed.
    Number(f64),
    /// A decoded string.
    Text(String),
    /// A `YYYY-MM-DD` date.
    Date(String),
    /// The indentation level an `Indent` token opened.
    Indent(usize),
}

/// A classified lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is.
    pub kind:    TokenKind,
    /// The exact source text. Empty for layout tokens.
    pub lexeme:  String,
    /// The literal value, for numbers, strings, dates and indents.
    pub literal: Option<TokenLiteral>,
    /// The source line the token starts on, counting from 1.
    pub line:    usize,
}

impl Token {
    fn layout(kind: TokenKind, line: usize) -> Self {
        Self { kind,
               lexeme: String::new(),
               literal: None,
               line }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>4} {:?}", self.line, self.kind)?;
        if !self.lexeme.is_empty() {
            write!(f, " {:?}", self.lexeme)?;
        }
        match &self.literal {
            Some(TokenLiteral::Number(value)) => write!(f, " {value}"),
            Some(TokenLiteral::Indent(level)) => write!(f, " {level}"),
            Some(TokenLiteral::Text(_) | TokenLiteral::Date(_)) | None => Ok(()),
        }
    }
}

/// Scans source text into tokens.
///
/// Diagnostics are logged and dropped; use [`scan_with_diagnostics`] to keep
/// them. The result always ends with an `Eof` token.
///
/// # Example
/// ```
/// use finlite::interpreter::lexer::{TokenKind, scan};
///
/// let kinds: Vec<_> = scan("let x = 1_000\n").iter().map(|t| t.kind).collect();
/// assert_eq!(kinds,
///            [TokenKind::Let,
///             TokenKind::Identifier,
///             TokenKind::Equal,
///             TokenKind::Number,
///             TokenKind::Newline,
///             TokenKind::Eof]);
/// ```
#[must_use]
pub fn scan(source: &str) -> Vec<Token> {
    scan_with_diagnostics(source).0
}

/// Scans source text into tokens and returns every diagnostic found.
///
/// Scanning never stops early. Bad spans become `Error` tokens and
/// indentation problems are reported without a token of their own.
#[must_use]
pub fn scan_with_diagnostics(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut scanner = Scanner::new(source);
    scanner.run();
    (scanner.tokens, scanner.errors)
}

/// Layout pass over the raw token stream.
struct Scanner<'s> {
    source:        &'s str,
    tokens:        Vec<Token>,
    errors:        Vec<LexError>,
    /// Open indentation levels. The implicit base level 0 is not stored.
    indents:       Vec<usize>,
    at_line_start: bool,
    /// Byte offset where the current logical line began.
    line_start:    usize,
    line:          usize,
    /// Byte offset up to which `line` has been counted.
    counted:       usize,
}

impl<'s> Scanner<'s> {
    const fn new(source: &'s str) -> Self {
        Self { source,
               tokens: Vec::new(),
               errors: Vec::new(),
               indents: Vec::new(),
               at_line_start: true,
               line_start: 0,
               line: 1,
               counted: 0 }
    }

    fn run(&mut self) {
        let source = self.source;
        let mut lexer = RawToken::lexer(source);

        while let Some(raw) = lexer.next() {
            let span = lexer.span();
            self.advance_to(span.start);
            let lexeme = &source[span.clone()];

            if raw == Ok(RawToken::Newline) {
                self.push(Token::layout(TokenKind::Newline, self.line));
                self.at_line_start = true;
                self.line_start = span.end;
                continue;
            }

            if self.at_line_start {
                self.at_line_start = false;
                self.indent_to();
            }

            let token = match raw {
                Ok(raw) => self.classify(raw, lexeme),
                Err(kind) => {
                    self.report(kind, lexeme);
                    Token { kind:    TokenKind::Error,
                            lexeme:  lexeme.to_string(),
                            literal: None,
                            line:    self.line, }
                },
            };
            self.push(token);
        }

        self.advance_to(source.len());
        if self.tokens.last().is_some_and(|t| t.kind != TokenKind::Newline) {
            self.push(Token::layout(TokenKind::Newline, self.line));
        }
        for _ in self.indents.drain(..) {
            self.tokens.push(Token::layout(TokenKind::Dedent, self.line));
        }
        self.tokens.push(Token::layout(TokenKind::Eof, self.line));
    }

    /// Counts newlines up to `offset` so every token knows its line.
    fn advance_to(&mut self, offset: usize) {
        if offset > self.counted {
            self.line += self.source[self.counted..offset].matches('\n').count();
            self.counted = offset;
        }
    }

    /// Emits `Indent`/`Dedent` tokens for the first token of a line.
    ///
    /// The level counts the leading spaces (1) and tabs (4) of the physical
    /// line the logical line began on, so a block comment spanning lines
    /// before the first token does not move it. `\r` and form feeds count 0.
    fn indent_to(&mut self) {
        let level = self.source[self.line_start..].chars()
                                                  .take_while(|c| matches!(c, ' ' | '\t' | '\r' | '\x0c'))
                                                  .map(|c| match c {
                                                      ' ' => 1,
                                                      '\t' => 4,
                                                      _ => 0,
                                                  })
                                                  .sum::<usize>();
        let current = self.indents.last().copied().unwrap_or(0);

        if level > current {
            self.indents.push(level);
            self.push(Token { kind:    TokenKind::Indent,
                              lexeme:  String::new(),
                              literal: Some(TokenLiteral::Indent(level)),
                              line:    self.line, });
            return;
        }

        while self.indents.last().is_some_and(|&open| open > level) {
            self.indents.pop();
            self.push(Token::layout(TokenKind::Dedent, self.line));
        }
        if self.indents.last().copied().unwrap_or(0) != level {
            self.report(LexErrorKind::InconsistentIndentation, "");
        }
    }

    fn classify(&self, raw: RawToken, lexeme: &str) -> Token {
        let (kind, literal) = match raw {
            RawToken::Numeric(Numeric::Number(value)) => (TokenKind::Number, Some(TokenLiteral::Number(value))),
            RawToken::Numeric(Numeric::Date(date)) => (TokenKind::Date, Some(TokenLiteral::Date(date))),
            RawToken::Text(text) => (TokenKind::String, Some(TokenLiteral::Text(text))),
            RawToken::Word => (TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier), None),
            RawToken::LeftParen => (TokenKind::LeftParen, None),
            RawToken::RightParen => (TokenKind::RightParen, None),
            RawToken::LeftBracket => (TokenKind::LeftBracket, None),
            RawToken::RightBracket => (TokenKind::RightBracket, None),
            RawToken::Comma => (TokenKind::Comma, None),
            RawToken::Dot => (TokenKind::Dot, None),
            RawToken::Colon => (TokenKind::Colon, None),
            RawToken::Plus => (TokenKind::Plus, None),
            RawToken::Minus => (TokenKind::Minus, None),
            RawToken::Star => (TokenKind::Star, None),
            RawToken::Slash => (TokenKind::Slash, None),
            RawToken::Percent => (TokenKind::Percent, None),
            RawToken::Caret => (TokenKind::Caret, None),
            RawToken::Equal => (TokenKind::Equal, None),
            RawToken::EqualEqual => (TokenKind::EqualEqual, None),
            RawToken::Bang => (TokenKind::Bang, None),
            RawToken::BangEqual => (TokenKind::BangEqual, None),
            RawToken::Less => (TokenKind::Less, None),
            RawToken::LessEqual => (TokenKind::LessEqual, None),
            RawToken::Greater => (TokenKind::Greater, None),
            RawToken::GreaterEqual => (TokenKind::GreaterEqual, None),
            RawToken::AndAnd => (TokenKind::AndAnd, None),
            RawToken::OrOr => (TokenKind::OrOr, None),
            // Comments are filtered inside the raw lexer and newlines are
            // handled before classification.
            RawToken::LineComment | RawToken::BlockComment | RawToken::Newline => (TokenKind::Error, None),
        };

        Token { kind,
                lexeme: lexeme.to_string(),
                literal,
                line: self.line }
    }

    fn report(&mut self, kind: LexErrorKind, lexeme: &str) {
        let error = LexError::new(kind, self.line, lexeme);
        warn!(line = self.line, "{error}");
        self.errors.push(error);
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}
