/// Failures of the scope chain itself.
///
/// These carry no source line; the evaluator converts them into
/// [`RuntimeError`](super::RuntimeError) and attaches one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// No scope on the chain binds the name.
    Undefined {
        /// The name that was looked up.
        name:  String,
        /// Depth of the scope the search started from.
        depth: usize,
    },
    /// A depth-addressed lookup asked for a scope deeper than the current one.
    DepthOutOfRange {
        /// The requested depth.
        requested: usize,
        /// Depth of the scope the lookup started from.
        depth:     usize,
    },
    /// A parent lookup was made from the root scope.
    NoParent {
        /// The name that was looked up.
        name: String,
    },
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined { name, depth } => {
                write!(f, "Undefined variable '{name}' (scope depth {depth})")
            },
            Self::DepthOutOfRange { requested, depth } => {
                write!(f, "Scope depth {requested} is not reachable from depth {depth}")
            },
            Self::NoParent { name } => write!(f, "Cannot look up '{name}' above the global scope"),
        }
    }
}

impl std::error::Error for ScopeError {}
