use super::{ScopeError, ValueError};

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation.
///
/// The line is optional because errors raised by builtins and by the value
/// layer do not know where they were called from. The evaluator fills it in
/// with [`RuntimeError::at`] on the way out of the expression that failed.
pub enum RuntimeError {
    /// Read or assigned a name that no enclosing scope defines.
    UndefinedVariable {
        /// The name of the variable.
        name:  String,
        /// Depth of the scope the lookup started from.
        depth: usize,
        /// The source line where the error occurred.
        line:  Option<usize>,
    },
    /// An operator or builtin received values of the wrong kind.
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    Option<usize>,
    },
    /// A numeric operator received a non-number.
    OperandMustBeNumber {
        /// The operator lexeme.
        operator: String,
        /// The source line where the error occurred.
        line:     Option<usize>,
    },
    /// Division or remainder by exactly zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: Option<usize>,
    },
    /// Tried to call something that is not a function.
    NotCallable {
        /// The kind of the value that was called.
        found: String,
        /// The source line where the error occurred.
        line:  Option<usize>,
    },
    /// A function was called with the wrong number of arguments.
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// The declared arity.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     Option<usize>,
    },
    /// A finance value could not be constructed.
    InvalidValue {
        /// The violated invariant.
        source: ValueError,
        /// The source line where the error occurred.
        line:   Option<usize>,
    },
    /// Tried to index past the end of a sequence.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the sequence.
        len:   usize,
        /// The source line where the error occurred.
        line:  Option<usize>,
    },
    /// An argument had the right kind but an unusable value.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    Option<usize>,
    },
    /// A `for` loop with a step of zero.
    InvalidLoopStep {
        /// The source line where the error occurred.
        line: Option<usize>,
    },
    /// Function calls nested deeper than the interpreter allows.
    StackOverflow {
        /// The call depth limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  Option<usize>,
    },
    /// A depth-addressed scope lookup went past the root.
    ScopeDepth {
        /// The requested depth.
        requested: usize,
        /// Depth of the scope the lookup started from.
        depth:     usize,
        /// The source line where the error occurred.
        line:      Option<usize>,
    },
    /// Writing to the output sink failed.
    Output {
        /// The underlying I/O error message.
        details: String,
        /// The source line where the error occurred.
        line:    Option<usize>,
    },
}

impl RuntimeError {
    /// Attaches a source line to an error that does not have one yet.
    ///
    /// Errors that already carry a line keep it, so the innermost location
    /// wins.
    ///
    /// # Example
    /// ```
    /// use finlite::error::RuntimeError;
    ///
    /// let err = RuntimeError::DivisionByZero { line: None }.at(3).at(9);
    /// assert_eq!(err.line(), Some(3));
    /// ```
    #[must_use]
    pub fn at(mut self, at: usize) -> Self {
        let slot = match &mut self {
            Self::UndefinedVariable { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::OperandMustBeNumber { line, .. }
            | Self::DivisionByZero { line }
            | Self::NotCallable { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::InvalidLoopStep { line }
            | Self::StackOverflow { line, .. }
            | Self::ScopeDepth { line, .. }
            | Self::Output { line, .. } => line,
        };
        if slot.is_none() {
            *slot = Some(at);
        }
        self
    }

    /// Gets the source line, if one has been attached.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::OperandMustBeNumber { line, .. }
            | Self::DivisionByZero { line }
            | Self::NotCallable { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::InvalidLoopStep { line }
            | Self::StackOverflow { line, .. }
            | Self::ScopeDepth { line, .. }
            | Self::Output { line, .. } => *line,
        }
    }

    pub(crate) fn type_mismatch(details: impl Into<String>) -> Self {
        Self::TypeMismatch { details: details.into(),
                             line:    None, }
    }

    pub(crate) fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument { details: details.into(),
                                line:    None, }
    }
}

impl From<ValueError> for RuntimeError {
    fn from(source: ValueError) -> Self {
        Self::InvalidValue { source,
                             line: None }
    }
}

impl From<ScopeError> for RuntimeError {
    fn from(error: ScopeError) -> Self {
        match error {
            ScopeError::Undefined { name, depth } => Self::UndefinedVariable { name,
                                                                               depth,
                                                                               line: None },
            ScopeError::DepthOutOfRange { requested, depth } => Self::ScopeDepth { requested,
                                                                                   depth,
                                                                                   line: None },
            ScopeError::NoParent { name } => Self::UndefinedVariable { name,
                                                                       depth: 0,
                                                                       line: None },
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line() {
            Some(line) => write!(f, "Error on line {line}: ")?,
            None => write!(f, "Error: ")?,
        }

        match self {
            Self::UndefinedVariable { name, depth, .. } => {
                write!(f, "Undefined variable '{name}' (scope depth {depth}).")
            },
            Self::TypeMismatch { details, .. } => write!(f, "Type mismatch: {details}."),
            Self::OperandMustBeNumber { operator, .. } => {
                write!(f, "Operands of '{operator}' must be numbers.")
            },
            Self::DivisionByZero { .. } => write!(f, "Division by zero."),
            Self::NotCallable { found, .. } => write!(f, "Can only call functions, found {found}."),
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          .. } => write!(f,
                                                         "'{name}' expects {expected} argument(s) but got {found}."),
            Self::InvalidValue { source, .. } => write!(f, "{source}."),
            Self::IndexOutOfBounds { index, len, .. } => {
                write!(f, "Index {index} out of bounds for length {len}.")
            },
            Self::InvalidArgument { details, .. } => write!(f, "Invalid argument: {details}."),
            Self::InvalidLoopStep { .. } => write!(f, "Loop step cannot be zero."),
            Self::StackOverflow { limit, .. } => {
                write!(f, "Stack overflow: call depth exceeded {limit}.")
            },
            Self::ScopeDepth { requested, depth, .. } => write!(f,
                                                                "Scope depth {requested} is not reachable from depth {depth}."),
            Self::Output { details, .. } => write!(f, "Could not write output: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
            _ => None,
        }
    }
}
