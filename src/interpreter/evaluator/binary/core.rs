use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        value::core::{Binding, Value, is_truthy},
    },
};

impl Context {
    /// Evaluates a binary expression in `env`.
    ///
    /// `and` and `or` are handed to `eval_logic` unevaluated so the right
    /// operand runs only when needed. Every other operator evaluates left
    /// then right and calls [`Context::eval_binary`].
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `op`: Operator.
    /// - `right`: Right operand.
    /// - `env`: Scope the operands are evaluated in.
    ///
    /// # Returns
    /// The evaluated result.
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 env: &Environment)
                                 -> EvalResult<Binding> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_logic(op, left, right, env).map(Some);
        }
        let left = self.evaluate(left, env)?;
        let right = self.evaluate(right, env)?;
        Self::eval_binary(op, &left, &right).map(Some)
    }

    /// Evaluates a binary operation between two values.
    ///
    /// Arithmetic goes to `eval_scalar_op`; ordering and equality go to
    /// `eval_comparison`. Logical operators evaluate eagerly here on the
    /// operands' truthiness; expressions reach them through
    /// `eval_binary_op`, which short-circuits.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Errors
    /// Any error from the handler, such as a type mismatch or division by
    /// zero.
    ///
    /// # Example
    /// ```
    /// use finlite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Some(Value::Number(3.0));
    /// let right = Some(Value::Number(4.0));
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right);
    /// assert_eq!(result.unwrap(), Value::Number(7.0));
    ///
    /// let text = Context::eval_binary(BinaryOperator::Add, &Some(Value::from("a")), &Some(Value::from("b")));
    /// assert_eq!(text.unwrap(), Value::from("ab"));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Binding, right: &Binding) -> EvalResult<Value> {
        use BinaryOperator::{Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Pow, Sub};

        match op {
            Add | Sub | Mul | Div | Mod | Pow => Self::eval_scalar_op(op, left, right),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => Self::eval_comparison(op, left, right),
            And => Ok(Value::Bool(is_truthy(left) && is_truthy(right))),
            Or => Ok(Value::Bool(is_truthy(left) || is_truthy(right))),
        }
    }
}
