#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while building the syntax tree.
///
/// Every variant records the line and the lexeme of the token the parser was
/// looking at, so several independent errors from one pass can be reported
/// side by side.
pub enum ParseError {
    /// Found a token that cannot start or continue the current construct.
    UnexpectedToken {
        /// The offending lexeme.
        token:   String,
        /// What the parser was trying to read.
        context: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A specific token was required but something else was found.
    ExpectedToken {
        /// Description of the required token, e.g. `'then'`.
        expected: String,
        /// The lexeme actually found.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input in the middle of a construct.
    UnexpectedEndOfInput {
        /// What the parser was trying to read.
        context: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The left-hand side of `=` is not a variable reference.
    InvalidAssignmentTarget {
        /// The `=` lexeme.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A finance form is missing a required argument or has too many.
    Arity {
        /// The form, e.g. `pv`.
        form:    String,
        /// Details about the violation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A named argument that the finance form does not accept.
    UnknownArgument {
        /// The form, e.g. `npv`.
        form: String,
        /// The argument name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The same argument was supplied twice.
    DuplicateArgument {
        /// The form, e.g. `fv`.
        form: String,
        /// The argument name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `return` outside of a function or scenario body.
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Expressions or blocks nested past the parser's limit.
    NestingTooDeep {
        /// The source line where the limit was hit.
        line: usize,
    },
    /// The scanner produced an `Error` token here.
    LexicalError {
        /// The offending lexeme.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// Gets the line the error was reported on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::ExpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::InvalidAssignmentTarget { line, .. }
            | Self::Arity { line, .. }
            | Self::UnknownArgument { line, .. }
            | Self::DuplicateArgument { line, .. }
            | Self::ReturnOutsideFunction { line }
            | Self::NestingTooDeep { line }
            | Self::LexicalError { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token,
                                    context,
                                    line, } => {
                write!(f, "Error on line {line} at '{token}': Unexpected token while parsing {context}.")
            },
            Self::ExpectedToken { expected,
                                  found,
                                  line, } => {
                write!(f, "Error on line {line} at '{found}': Expected {expected}.")
            },
            Self::UnexpectedEndOfInput { context, line } => {
                write!(f, "Error on line {line} at end: Unexpected end of input while parsing {context}.")
            },
            Self::InvalidAssignmentTarget { token, line } => {
                write!(f, "Error on line {line} at '{token}': Invalid assignment target.")
            },
            Self::Arity { form, details, line } => {
                write!(f, "Error on line {line} at '{form}': {details}.")
            },
            Self::UnknownArgument { form, name, line } => {
                write!(f, "Error on line {line} at '{name}': '{form}' has no argument named '{name}'.")
            },
            Self::DuplicateArgument { form, name, line } => {
                write!(f, "Error on line {line} at '{name}': Argument '{name}' of '{form}' given twice.")
            },
            Self::ReturnOutsideFunction { line } => {
                write!(f, "Error on line {line} at 'return': Cannot return from top-level code.")
            },
            Self::NestingTooDeep { line } => write!(f, "Error on line {line}: Expression nested too deeply."),
            Self::LexicalError { token, line } => {
                write!(f, "Error on line {line} at '{token}': Invalid token.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
