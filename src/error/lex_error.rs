/// The category of a lexical diagnostic.
///
/// Doubles as the error type of the raw `logos` grammar, which is why it
/// implements `Default`: any input the raw grammar cannot match at all is an
/// unexpected character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    /// A character that starts no token, such as `@` or a lone `&`.
    #[default]
    UnexpectedCharacter,
    /// A double- or triple-quoted string reached end of input.
    UnterminatedString,
    /// A `/* ... */` comment reached end of input.
    UnterminatedComment,
    /// A dedent landed on a column that matches no open indentation level.
    InconsistentIndentation,
}

/// A lexical diagnostic.
///
/// Scanning never stops on these. Each one is logged as it is found and an
/// `Error` token marks the offending span (except for indentation problems,
/// which have no span of their own).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// What went wrong.
    pub kind:   LexErrorKind,
    /// The source line where the problem starts.
    pub line:   usize,
    /// The offending source text (may be empty).
    pub lexeme: String,
}

impl LexError {
    /// Creates a diagnostic of the given kind.
    #[must_use]
    pub fn new(kind: LexErrorKind, line: usize, lexeme: impl Into<String>) -> Self {
        Self { kind,
               line,
               lexeme: lexeme.into() }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self.line;
        match self.kind {
            LexErrorKind::UnexpectedCharacter => {
                write!(f, "Error on line {line}: Unexpected character '{}'.", self.lexeme)
            },
            LexErrorKind::UnterminatedString => {
                write!(f, "Error on line {line}: Unterminated string literal.")
            },
            LexErrorKind::UnterminatedComment => {
                write!(f, "Error on line {line}: Unterminated block comment.")
            },
            LexErrorKind::InconsistentIndentation => {
                write!(f, "Error on line {line}: Inconsistent indentation.")
            },
        }
    }
}

impl std::error::Error for LexError {}
