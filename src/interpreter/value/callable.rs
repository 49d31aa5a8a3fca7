use std::rc::Rc;

use crate::{
    ast::FunctionDecl,
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        value::core::Binding,
    },
};

/// How many arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// Any number; the callable checks its own arguments.
    Variadic,
}

impl Arity {
    /// The arity as an integer, `-1` meaning variadic.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::callable::Arity;
    ///
    /// assert_eq!(Arity::Exact(2).as_isize(), 2);
    /// assert_eq!(Arity::Variadic.as_isize(), -1);
    /// ```
    #[must_use]
    pub fn as_isize(self) -> isize {
        match self {
            Self::Exact(n) => isize::try_from(n).unwrap_or(isize::MAX),
            Self::Variadic => -1,
        }
    }

    /// Checks an argument count against this arity.
    ///
    /// # Errors
    /// Returns `RuntimeError::ArgumentCountMismatch` for an exact arity that
    /// does not match `found`.
    pub fn check(self, name: &str, found: usize) -> EvalResult<()> {
        match self {
            Self::Exact(expected) if expected != found => {
                Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                          expected,
                                                          found,
                                                          line: None })
            },
            _ => Ok(()),
        }
    }
}

/// Anything a script can call.
///
/// The evaluator checks [`Callable::arity`] before calling, so `call` sees
/// exactly the declared number of arguments unless the arity is variadic.
pub trait Callable: std::fmt::Debug {
    /// The name the callable is printed with.
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    /// `"builtin"` or `"fn"`, for the canonical string.
    fn kind(&self) -> &'static str {
        "builtin"
    }

    /// Invokes the callable with evaluated arguments.
    ///
    /// # Errors
    /// Any runtime error raised by the callable.
    fn call(&self, context: &mut Context, arguments: Vec<Binding>) -> EvalResult<Binding>;
}

/// Signature of a native function body.
pub type NativeFn = fn(&[Binding]) -> EvalResult<Binding>;

/// A function implemented in Rust.
///
/// # Example
/// ```
/// use finlite::interpreter::{
///     evaluator::core::Context,
///     value::{
///         callable::{Arity, Callable, NativeFunction},
///         core::Value,
///     },
/// };
///
/// let double = NativeFunction::new("double", Arity::Exact(1), |args| match &args[0] {
///     Some(Value::Number(n)) => Ok(Some(Value::Number(n * 2.0))),
///     _ => Ok(None),
/// });
///
/// let mut ctx = Context::with_output(Box::new(Vec::new()));
/// let result = double.call(&mut ctx, vec![Some(Value::Number(21.0))]).unwrap();
/// assert_eq!(result, Some(Value::Number(42.0)));
/// ```
#[derive(Debug, Clone)]
pub struct NativeFunction {
    name:  &'static str,
    arity: Arity,
    func:  NativeFn,
}

impl NativeFunction {
    #[must_use]
    pub const fn new(name: &'static str, arity: Arity, func: NativeFn) -> Self {
        Self { name, arity, func }
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, _context: &mut Context, arguments: Vec<Binding>) -> EvalResult<Binding> {
        (self.func)(&arguments)
    }
}

/// A function declared with `fn`, closed over the scope it was declared in.
#[derive(Debug, Clone)]
pub struct UserFunction {
    /// The declaration, shared with the syntax tree.
    pub decl:    Rc<FunctionDecl>,
    /// The scope the declaration was executed in.
    pub closure: Environment,
}
