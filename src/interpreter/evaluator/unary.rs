use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Binding, Value, is_truthy},
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation. Only plain numbers negate.
    /// - `Not`: logical negation of the operand's truthiness, so it accepts
    ///   any value including `null`.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Errors
    /// Returns `RuntimeError::OperandMustBeNumber` when negating a non-number.
    ///
    /// # Example
    /// ```
    /// use finlite::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Some(Value::Number(5.0))).unwrap();
    /// assert_eq!(v, Value::Number(-5.0));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &None).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Negate, &Some(Value::from("x"))).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Binding) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Some(Value::Number(n)) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::OperandMustBeNumber { operator: op.to_string(),
                                                             line:     None, }),
            },
            UnaryOperator::Not => Ok(Value::Bool(!is_truthy(value))),
        }
    }
}
