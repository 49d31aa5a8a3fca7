use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::{
            core::{Context, EvalResult, Flow, MAX_CALL_DEPTH},
            function::builtin,
        },
        value::{
            callable::{Arity, Callable, NativeFunction, UserFunction},
            core::{Binding, Value, type_name},
        },
    },
};

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table registered into every new context),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[NativeFunction] = &[
            $(
                NativeFunction::new($name, $arity, $func),
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "len"           => { arity: Arity::Exact(1), func: builtin::len },
    "sum"           => { arity: Arity::Variadic, func: builtin::sum },
    "avg"           => { arity: Arity::Variadic, func: builtin::avg },
    "min"           => { arity: Arity::Variadic, func: builtin::min },
    "max"           => { arity: Arity::Variadic, func: builtin::max },
    "abs"           => { arity: Arity::Exact(1), func: builtin::abs },
    "round"         => { arity: Arity::Variadic, func: builtin::round },
    "sqrt"          => { arity: Arity::Exact(1), func: builtin::sqrt },
    "pow"           => { arity: Arity::Exact(2), func: builtin::pow },
    "median"        => { arity: Arity::Exact(1), func: builtin::median },
    "sort"          => { arity: Arity::Exact(1), func: builtin::sort },
    "percentile"    => { arity: Arity::Exact(2), func: builtin::percentile },
    "str"           => { arity: Arity::Exact(1), func: builtin::str_fn },
    "number"        => { arity: Arity::Exact(1), func: builtin::number },
    "rate"          => { arity: Arity::Exact(1), func: builtin::rate },
    "percent"       => { arity: Arity::Exact(1), func: builtin::percent },
    "to_rate"       => { arity: Arity::Exact(1), func: builtin::to_rate },
    "to_percentage" => { arity: Arity::Exact(1), func: builtin::to_percentage },
    "money"         => { arity: Arity::Variadic, func: builtin::money },
    "period"        => { arity: Arity::Variadic, func: builtin::period },
    "ledger"        => { arity: Arity::Exact(0), func: builtin::ledger },
    "type_of"       => { arity: Arity::Exact(1), func: builtin::type_of },
}

/// Binds every builtin in `globals` under its own name.
///
/// Builtins are ordinary bindings: a script may shadow or reassign them.
pub fn register_builtins(globals: &Environment) {
    for builtin in BUILTIN_TABLE {
        globals.define(builtin.name(), Some(Value::Function(Rc::new(builtin.clone()))));
    }
}

impl Context {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the arguments from left to right.
    /// The argument count is checked against the callee's arity before the
    /// call is made.
    ///
    /// # Parameters
    /// - `callee`: Expression producing the function.
    /// - `arguments`: Argument expressions.
    /// - `env`: Scope the call is evaluated in.
    ///
    /// # Returns
    /// The function result; `None` if it returned nothing.
    ///
    /// # Errors
    /// - `RuntimeError::NotCallable` if the callee is not a function.
    /// - `RuntimeError::ArgumentCountMismatch` on an arity mismatch.
    /// - Any error raised by the function itself.
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Expr], env: &Environment) -> EvalResult<Binding> {
        let function = match self.evaluate(callee, env)? {
            Some(Value::Function(function)) => function,
            other => {
                return Err(RuntimeError::NotCallable { found: type_name(&other).to_string(),
                                                       line:  None, });
            },
        };

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument, env)?);
        }

        function.arity().check(function.name(), values.len())?;
        trace!(name = function.name(), kind = function.kind(), depth = self.call_depth, "call");
        function.call(self, values)
    }
}

impl Callable for UserFunction {
    fn name(&self) -> &str {
        &self.decl.name
    }

    fn arity(&self) -> Arity {
        Arity::Exact(self.decl.params.len())
    }

    fn kind(&self) -> &'static str {
        "fn"
    }

    /// Runs the body in a fresh child of the captured scope with the
    /// parameters bound.
    ///
    /// The call depth is restored on every exit path, including errors.
    fn call(&self, context: &mut Context, arguments: Vec<Binding>) -> EvalResult<Binding> {
        if context.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow { limit: MAX_CALL_DEPTH,
                                                     line:  None, });
        }

        let scope = self.closure.create_child();
        for (param, value) in self.decl.params.iter().zip(arguments) {
            scope.define(param.clone(), value);
        }

        context.call_depth += 1;
        let flow = context.execute_block(&self.decl.body, &scope);
        context.call_depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(None),
        }
    }
}
