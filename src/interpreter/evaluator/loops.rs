use crate::{
    ast::{Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult, Flow},
        value::{
            coerce::as_number,
            core::{Binding, Value, is_truthy, type_name},
        },
    },
    util::num::{f64_to_usize_checked, usize_to_f64_checked},
};

impl Context {
    /// Executes a `while` loop.
    ///
    /// The condition is re-evaluated in `env` before every iteration and the
    /// body runs in a fresh child scope each time.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &[Stmt], env: &Environment) -> EvalResult<Flow> {
        while is_truthy(&self.evaluate(condition, env)?) {
            if let Flow::Return(value) = self.execute_block(body, &env.create_child())? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a counted `for` loop.
    ///
    /// `start`, `end` and `step` are evaluated once, before the first
    /// iteration, and must be numbers. The end bound is inclusive. A negative
    /// step counts down.
    ///
    /// The loop variable is bound in a fresh child scope per iteration, so
    /// assigning to it inside the body does not affect the count. Values are
    /// computed as `start + k * step` to avoid accumulating rounding error.
    ///
    /// # Errors
    /// - `RuntimeError::InvalidLoopStep` for a step of zero.
    /// - `RuntimeError::TypeMismatch` for a non-numeric bound or step.
    /// - `RuntimeError::InvalidArgument` for a non-finite bound or step.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::{evaluator::core::Context, lexer::scan, parser::parse};
    ///
    /// let (program, _) = parse(&scan("let total = 0\nfor i from 10 to 1 step -3\n  set total = total + i\nend\n"));
    /// let mut context = Context::with_output(Box::new(Vec::new()));
    /// context.execute(&program).unwrap();
    ///
    /// // 10 + 7 + 4 + 1
    /// assert_eq!(context.globals().get("total").unwrap(), Some(22.0.into()));
    /// ```
    pub(crate) fn exec_for(&mut self,
                           var: &str,
                           start: &Expr,
                           end: &Expr,
                           step: Option<&Expr>,
                           body: &[Stmt],
                           env: &Environment)
                           -> EvalResult<Flow> {
        let start = as_number(&self.evaluate(start, env)?, "'for' start")?;
        let end = as_number(&self.evaluate(end, env)?, "'for' end")?;
        let step = match step {
            Some(step) => as_number(&self.evaluate(step, env)?, "'for' step")?,
            None => 1.0,
        };

        if step == 0.0 {
            return Err(RuntimeError::InvalidLoopStep { line: None });
        }
        if !start.is_finite() || !end.is_finite() || !step.is_finite() {
            return Err(RuntimeError::invalid_argument("'for' bounds and step must be finite"));
        }

        let span = (end - start) / step;
        if span < 0.0 {
            return Ok(Flow::Normal);
        }
        let iterations = f64_to_usize_checked(span.floor(), "'for' iteration count")?;

        for k in 0..=iterations {
            let value = start + usize_to_f64_checked(k)? * step;
            let scope = env.create_child();
            scope.define(var, Some(Value::Number(value)));
            if let Flow::Return(value) = self.execute_block(body, &scope)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `foreach` loop.
    ///
    /// The iterable is evaluated once. Lists yield their elements, cashflows
    /// their flows, ledgers their entries, tables their rows (each as a list)
    /// and strings their characters.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeMismatch` for any other kind.
    pub(crate) fn exec_foreach(&mut self,
                               var: &str,
                               iterable: &Expr,
                               body: &[Stmt],
                               env: &Environment)
                               -> EvalResult<Flow> {
        let iterable = self.evaluate(iterable, env)?;

        for item in Self::items(&iterable)? {
            let scope = env.create_child();
            scope.define(var, item);
            if let Flow::Return(value) = self.execute_block(body, &scope)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn items(iterable: &Binding) -> EvalResult<Vec<Binding>> {
        let items = match iterable {
            Some(Value::List(elements)) => elements.to_vec(),
            Some(Value::Cashflow(cashflow)) => cashflow.flows.iter().map(|flow| Some(Value::Number(*flow))).collect(),
            Some(Value::Ledger(ledger)) => ledger.entries
                                                 .iter()
                                                 .map(|entry| Some(Value::from(entry.clone())))
                                                 .collect(),
            Some(Value::Table(table)) => (0..table.row_count()).filter_map(|index| table.row(index))
                                                               .map(|row| Some(Value::from(row)))
                                                               .collect(),
            Some(Value::String(text)) => text.chars().map(|c| Some(Value::from(c.to_string()))).collect(),
            other => {
                return Err(RuntimeError::type_mismatch(format!("cannot iterate over {}", type_name(other))));
            },
        };
        Ok(items)
    }
}
