use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        value::core::{Value, is_truthy},
    },
};

impl Context {
    /// Evaluates `and` or `or` with short-circuiting.
    ///
    /// The right operand is evaluated only when the left one does not decide
    /// the result. Operands may be of any kind; the result is the `Bool` of
    /// their truthiness.
    ///
    /// # Parameters
    /// - `op`: `And` or `Or`.
    /// - `left`: Left operand expression.
    /// - `right`: Right operand expression, possibly never evaluated.
    /// - `env`: Scope the operands are evaluated in.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean.
    pub(crate) fn eval_logic(&mut self,
                             op: BinaryOperator,
                             left: &Expr,
                             right: &Expr,
                             env: &Environment)
                             -> EvalResult<Value> {
        let left = is_truthy(&self.evaluate(left, env)?);
        let decided = match op {
            BinaryOperator::Or => left,
            _ => !left,
        };
        if decided {
            return Ok(Value::Bool(left));
        }
        Ok(Value::Bool(is_truthy(&self.evaluate(right, env)?)))
    }
}
