use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        value::{
            coerce::{as_count, to_amount},
            core::{Binding, BlockValue, Value, format_binding, type_name},
            finance::{Ledger, LedgerEntry},
        },
    },
    util::num::usize_to_f64_checked,
};

impl Context {
    /// Binds `name` to a deferred block in `env`. Nothing runs yet.
    pub(crate) fn exec_scenario(name: &str, body: &Rc<[Stmt]>, env: &Environment) {
        let block = BlockValue { name: name.to_string(),
                                 body: Rc::clone(body), };
        env.define(name, Some(Value::Block(Rc::new(block))));
    }

    /// Runs the block bound to `name` once, in a child of `env`.
    ///
    /// # Errors
    /// - `RuntimeError::UndefinedVariable` if `name` is unbound.
    /// - `RuntimeError::TypeMismatch` if it is bound to something other than
    ///   a block.
    pub(crate) fn exec_run(&mut self, name: &str, env: &Environment) -> EvalResult<()> {
        let block = Self::lookup_block(name, env)?;
        self.run_block(&block, env.create_child())
    }

    /// Runs the block bound to `name` `times` times.
    ///
    /// Each run gets its own child of `env` with `trial` bound to the run
    /// number, starting at 1.
    ///
    /// # Errors
    /// As [`Context::exec_run`], plus `RuntimeError::InvalidArgument` if
    /// `times` is not a whole non-negative number.
    pub(crate) fn exec_simulate(&mut self, name: &str, times: &Expr, env: &Environment) -> EvalResult<()> {
        let block = Self::lookup_block(name, env)?;
        let times = as_count(&self.evaluate(times, env)?, "'simulate' count")?;

        for trial in 1..=times {
            let scope = env.create_child();
            scope.define("trial", Some(Value::Number(usize_to_f64_checked(trial)?)));
            self.run_block(&block, scope)?;
        }
        Ok(())
    }

    fn lookup_block(name: &str, env: &Environment) -> EvalResult<Rc<BlockValue>> {
        match env.get(name)? {
            Some(Value::Block(block)) => Ok(block),
            other => Err(RuntimeError::type_mismatch(format!("'{name}' must be a scenario, found {}",
                                                             type_name(&other)))),
        }
    }

    /// Executes a block body. A `return` inside it ends the run early.
    fn run_block(&mut self, block: &BlockValue, scope: Environment) -> EvalResult<()> {
        trace!(scenario = %block.name, depth = scope.depth(), "run scenario");
        self.execute_block(&block.body, &scope)?;
        Ok(())
    }

    /// Records a ledger entry.
    ///
    /// The entry is appended to the ledger bound to `ledger`, searching
    /// outward from `env` and rebinding it where it was found. If no scope
    /// binds the name, a new ledger holding just this entry is defined in
    /// `env`.
    ///
    /// # Errors
    /// - `RuntimeError::TypeMismatch` if `ledger` is bound to a non-ledger,
    ///   or if an amount is neither a number nor money.
    /// - `RuntimeError::InvalidValue` for a negative amount or an entry with
    ///   neither amount.
    pub(crate) fn exec_ledger_entry(&mut self,
                                    ledger: &str,
                                    date: &Expr,
                                    debit: Option<&Expr>,
                                    credit: Option<&Expr>,
                                    description: &Expr,
                                    env: &Environment)
                                    -> EvalResult<()> {
        let date = format_binding(&self.evaluate(date, env)?);
        let debit = self.optional_amount(debit, "debit", env)?;
        let credit = self.optional_amount(credit, "credit", env)?;
        let description = format_binding(&self.evaluate(description, env)?);
        let entry = LedgerEntry::new(date, debit, credit, description)?;

        if !env.is_defined(ledger) {
            env.define(ledger, Some(Value::from(Ledger::default().with_entry(entry))));
            return Ok(());
        }
        match env.get(ledger)? {
            Some(Value::Ledger(existing)) => {
                env.assign(ledger, Some(Value::from(existing.with_entry(entry))))?;
                Ok(())
            },
            other => Err(RuntimeError::type_mismatch(format!("'{ledger}' must be a ledger, found {}",
                                                             type_name(&other)))),
        }
    }

    fn optional_amount(&mut self, expr: Option<&Expr>, what: &str, env: &Environment) -> EvalResult<Option<f64>> {
        let Some(expr) = expr else {
            return Ok(None);
        };
        let value: Binding = self.evaluate(expr, env)?;
        if value.is_none() {
            return Ok(None);
        }
        to_amount(&value, what).map(Some)
    }
}
