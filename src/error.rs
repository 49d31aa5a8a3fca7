/// Lexical errors.
///
/// Problems found while turning source text into tokens: stray characters,
/// unterminated strings and comments, and indentation that does not line up.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree:
/// unexpected tokens, malformed finance forms, invalid assignment targets and
/// misplaced `return` statements.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// undefined variables, type mismatches, division by zero or finance values
/// that violate their invariants.
pub mod runtime_error;
/// Scope chain errors.
pub mod scope_error;
/// Value construction errors.
pub mod value_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use scope_error::ScopeError;
pub use value_error::ValueError;

/// Everything that can go wrong when running a script end to end.
#[derive(Debug)]
pub enum ScriptError {
    /// The source did not scan or parse cleanly. Nothing was executed.
    Syntax {
        /// Every lexical diagnostic from the pass.
        lexical: Vec<LexError>,
        /// Every parse diagnostic from the pass.
        parse:   Vec<ParseError>,
    },
    /// Execution started and stopped at this error.
    Runtime(RuntimeError),
    /// The script could not be read.
    Io(std::io::Error),
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax { lexical, parse } => {
                let mut first = true;
                for message in lexical.iter()
                                      .map(ToString::to_string)
                                      .chain(parse.iter().map(ToString::to_string))
                {
                    if !first {
                        writeln!(f)?;
                    }
                    first = false;
                    write!(f, "{message}")?;
                }
                Ok(())
            },
            Self::Runtime(error) => write!(f, "{error}"),
            Self::Io(error) => write!(f, "Could not read script: {error}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax { .. } => None,
            Self::Runtime(error) => Some(error),
            Self::Io(error) => Some(error),
        }
    }
}

impl From<RuntimeError> for ScriptError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
