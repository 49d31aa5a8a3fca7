use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Binding, Value},
    },
};

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `==` and `!=` use structural equality on any kinds: two `null`s are
    /// equal, `null` and a value are not, and values of different kinds are
    /// never equal. The ordering operators take two numbers.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Errors
    /// Returns `RuntimeError::OperandMustBeNumber` when an ordering operator
    /// gets a non-number.
    ///
    /// # Example
    /// ```
    /// use finlite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Some(Value::Number(3.0));
    /// let b = Some(Value::Number(5.0));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &a, &b);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let nulls = Context::eval_comparison(BinaryOperator::Equal, &None, &None);
    /// assert_eq!(nulls.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator, left: &Binding, right: &Binding) -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        if op == Equal {
            return Ok(Value::Bool(left == right));
        }
        if op == NotEqual {
            return Ok(Value::Bool(left != right));
        }

        let (Some(Value::Number(a)), Some(Value::Number(b))) = (left, right) else {
            return Err(RuntimeError::OperandMustBeNumber { operator: op.to_string(),
                                                           line:     None, });
        };

        Ok(Value::Bool(match op {
                           Less => a < b,
                           Greater => a > b,
                           LessEqual => a <= b,
                           GreaterEqual => a >= b,
                           _ => {
                               return Err(RuntimeError::type_mismatch(format!("'{op}' is not a comparison operator")));
                           },
                       }))
    }
}
