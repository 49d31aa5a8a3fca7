use std::{io::Write, rc::Rc};

use tracing::info;

use crate::{
    ast::{Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::function::core::register_builtins,
        value::{
            callable::{Callable, UserFunction},
            core::{Binding, Value, format_binding, from_literal, is_truthy},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Deepest nesting of function calls before evaluation fails with
/// `RuntimeError::StackOverflow`.
pub const MAX_CALL_DEPTH: usize = 256;

/// How a statement finished.
///
/// Statement executors forward `Return` unchanged until it reaches the call
/// that ran the function or scenario body.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the enclosing function or scenario with this value.
    Return(Binding),
}

/// Stores the runtime evaluation context.
///
/// Holds the global scope, where builtins live and top-level statements
/// define their names, the sink `print` writes to, and the current function
/// call depth. Nested scopes are not stored here: every executor receives
/// the [`Environment`] it runs in, and a scope is released as soon as the
/// last handle to it is dropped.
///
/// ## Usage
///
/// A `Context` is created once and reused across inputs. Definitions made by
/// one call to [`Context::execute`] are visible to the next.
///
/// ```
/// use finlite::{
///     interpreter::{evaluator::core::Context, lexer::scan, parser::parse},
/// };
///
/// let mut context = Context::with_output(Box::new(Vec::new()));
///
/// let (program, errors) = parse(&scan("let rate = 0.05\n"));
/// assert!(errors.is_empty());
/// context.execute(&program).unwrap();
///
/// assert!(context.globals().is_defined("rate"));
/// ```
pub struct Context {
    globals:               Environment,
    output:                Box<dyn Write>,
    pub(crate) call_depth: usize,
}

impl Context {
    /// Creates a context that prints to standard output, with every builtin
    /// registered in the global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// Creates a context that prints to `output`.
    #[must_use]
    pub fn with_output(output: Box<dyn Write>) -> Self {
        let globals = Environment::new();
        register_builtins(&globals);
        Self { globals,
               output,
               call_depth: 0 }
    }

    /// Registers an external function in the global scope under its own
    /// name, replacing any binding of that name.
    pub fn define_native(&mut self, function: Rc<dyn Callable>) {
        self.globals.define(function.name().to_string(), Some(Value::Function(function)));
    }

    /// The global scope.
    #[must_use]
    pub const fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Executes a program in the global scope.
    ///
    /// Stops at the first runtime error. Statements that already ran keep
    /// their effects.
    ///
    /// # Errors
    /// Returns the first `RuntimeError` raised, with its source line.
    pub fn execute(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        let globals = self.globals.clone();
        for statement in statements {
            self.execute_stmt(statement, &globals)?;
        }
        self.output.flush().map_err(|err| RuntimeError::Output { details: err.to_string(),
                                                                 line:    None, })
    }

    /// Executes `statements` in order in `env`, stopping early on `return`.
    ///
    /// The caller decides the scope: blocks and loop iterations pass a fresh
    /// child, which is dropped on every exit path when this returns.
    ///
    /// # Errors
    /// Returns the first `RuntimeError` raised by a statement.
    pub fn execute_block(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.execute_stmt(statement, env)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement in `env`.
    ///
    /// # Errors
    /// Any `RuntimeError` raised while executing; errors without a line get
    /// the statement's line.
    pub fn execute_stmt(&mut self, statement: &Stmt, env: &Environment) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec(statement, env)).map_err(|err| err.at(statement.line_number()))
    }

    fn exec(&mut self, statement: &Stmt, env: &Environment) -> EvalResult<Flow> {
        match statement {
            Stmt::Let { name, initializer, .. } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => None,
                };
                env.define(name.clone(), value);
            },
            Stmt::Set { name, value, .. } => {
                let value = self.evaluate(value, env)?;
                env.assign(name, value)?;
            },
            Stmt::Print { expr, .. } => {
                let value = self.evaluate(expr, env)?;
                self.emit(&value)?;
            },
            Stmt::Log { expr, line } => {
                let value = self.evaluate(expr, env)?;
                info!(target: "finlite::script", line, "{}", format_binding(&value));
            },
            Stmt::Expression { expr, .. } => {
                let value = self.evaluate(expr, env)?;
                if !matches!(expr, Expr::Assign { .. }) {
                    self.emit(&value)?;
                }
            },
            Stmt::Block { statements, .. } => return self.execute_block(statements, &env.create_child()),
            Stmt::If { condition,
                       then_branch,
                       elseifs,
                       else_branch,
                       .. } => {
                if is_truthy(&self.evaluate(condition, env)?) {
                    return self.execute_block(then_branch, &env.create_child());
                }
                for branch in elseifs {
                    if is_truthy(&self.evaluate(&branch.condition, env)?) {
                        return self.execute_block(&branch.body, &env.create_child());
                    }
                }
                if let Some(body) = else_branch {
                    return self.execute_block(body, &env.create_child());
                }
            },
            Stmt::While { condition, body, .. } => return self.exec_while(condition, body, env),
            Stmt::For { var,
                        start,
                        end,
                        step,
                        body,
                        .. } => return self.exec_for(var, start, end, step.as_ref(), body, env),
            Stmt::ForEach { var, iterable, body, .. } => return self.exec_foreach(var, iterable, body, env),
            Stmt::Function(decl) => {
                let function = UserFunction { decl:    Rc::clone(decl),
                                              closure: env.clone(), };
                env.define(decl.name.clone(), Some(Value::Function(Rc::new(function))));
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => None,
                };
                return Ok(Flow::Return(value));
            },
            Stmt::Error { .. } => {
                return Err(RuntimeError::invalid_argument("cannot execute a statement that failed to parse"));
            },
            Stmt::Scenario { name, body, .. } => Self::exec_scenario(name, body, env),
            Stmt::Run { name, .. } => self.exec_run(name, env)?,
            Stmt::Simulate { name, times, .. } => self.exec_simulate(name, times, env)?,
            Stmt::Portfolio { name,
                              assets,
                              weights,
                              .. } => {
                let portfolio = self.build_portfolio(assets, weights, env)?;
                env.define(name.clone(), Some(portfolio));
            },
            Stmt::LedgerEntry { ledger,
                                date,
                                debit,
                                credit,
                                description,
                                .. } => {
                self.exec_ledger_entry(ledger, date, debit.as_ref(), credit.as_ref(), description, env)?;
            },
        }
        Ok(Flow::Normal)
    }

    /// Evaluates an expression in `env`.
    ///
    /// `None` is `null`. Only assignment expressions change bindings.
    ///
    /// # Errors
    /// Any `RuntimeError` raised while evaluating; errors without a line get
    /// the expression's line.
    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Binding> {
        ensure_sufficient_stack(|| self.eval(expr, env)).map_err(|err| err.at(expr.line_number()))
    }

    fn eval(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Binding> {
        match expr {
            Expr::Literal { value, .. } => Ok(from_literal(value)),
            Expr::Variable { name, .. } => Ok(env.get(name)?),
            Expr::Grouping { inner, .. } => self.evaluate(inner, env),
            Expr::Unary { op, operand, .. } => {
                let value = self.evaluate(operand, env)?;
                Self::eval_unary(*op, &value).map(Some)
            },
            Expr::Binary { left, op, right, .. } => self.eval_binary_op(left, *op, right, env),
            Expr::Call { callee, arguments, .. } => self.eval_call(callee, arguments, env),
            Expr::ListLiteral { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(element, env)?);
                }
                Ok(Some(Value::from(values)))
            },
            Expr::Subscript { container,
                              index,
                              end,
                              .. } => {
                let container = self.evaluate(container, env)?;
                let index = self.evaluate(index, env)?;
                match end {
                    Some(end) => {
                        let end = self.evaluate(end, env)?;
                        Self::slice(&container, &index, &end)
                    },
                    None => Self::subscript(&container, &index),
                }
            },
            Expr::Assign { name, value, .. } => {
                let value = self.evaluate(value, env)?;
                Ok(env.assign(name, value)?)
            },
            Expr::ColumnAccess { object, name, .. } => {
                let object = self.evaluate(object, env)?;
                Self::column_access(&object, name)
            },
            Expr::Finance { form, .. } => self.eval_finance(form, env),
        }
    }

    /// Writes the canonical string of `value` and a newline to the output.
    pub(crate) fn emit(&mut self, value: &Binding) -> EvalResult<()> {
        writeln!(self.output, "{}", format_binding(value)).map_err(|err| RuntimeError::Output { details:
                                                                                                    err.to_string(),
                                                                                                line:    None, })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
