use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Binding, Value, type_name},
    },
};

impl Context {
    /// Evaluates an arithmetic operation.
    ///
    /// `+` adds two numbers or concatenates two strings. `-`, `*`, `/`, `%`
    /// and `^` take two numbers. Finance values never take part in operator
    /// arithmetic; they are converted explicitly with builtins such as
    /// `number` or `to_rate`.
    ///
    /// Division and remainder by exactly zero fail instead of producing an
    /// infinity or NaN, and so does a power with no real result.
    ///
    /// # Parameters
    /// - `op`: The arithmetic operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the computed value.
    ///
    /// # Errors
    /// - `RuntimeError::TypeMismatch` for `+` on any other pair of kinds.
    /// - `RuntimeError::OperandMustBeNumber` for the other operators.
    /// - `RuntimeError::DivisionByZero` for `/` or `%` by zero.
    ///
    /// # Example
    /// ```
    /// use finlite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let x = Some(Value::Number(1.5));
    /// let y = Some(Value::Number(2.0));
    ///
    /// let result = Context::eval_scalar_op(BinaryOperator::Mul, &x, &y).unwrap();
    /// assert_eq!(result, Value::Number(3.0));
    ///
    /// let zero = Some(Value::Number(0.0));
    /// assert!(Context::eval_scalar_op(BinaryOperator::Div, &x, &zero).is_err());
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator, left: &Binding, right: &Binding) -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mod, Mul, Pow, Sub};

        if op == Add {
            return match (left, right) {
                (Some(Value::Number(a)), Some(Value::Number(b))) => Ok(Value::Number(a + b)),
                (Some(Value::String(a)), Some(Value::String(b))) => Ok(Value::from(format!("{a}{b}"))),
                _ => Err(RuntimeError::type_mismatch(format!("cannot add {} and {}",
                                                             type_name(left),
                                                             type_name(right)))),
            };
        }

        let (Some(Value::Number(a)), Some(Value::Number(b))) = (left, right) else {
            return Err(RuntimeError::OperandMustBeNumber { operator: op.to_string(),
                                                           line:     None, });
        };
        let (a, b) = (*a, *b);

        let result = match op {
            Sub => a - b,
            Mul => a * b,
            Div | Mod if b == 0.0 => return Err(RuntimeError::DivisionByZero { line: None }),
            Div => a / b,
            Mod => a % b,
            Pow => {
                let result = a.powf(b);
                if result.is_nan() || (result.is_infinite() && a.is_finite() && b.is_finite()) {
                    return Err(RuntimeError::invalid_argument(format!("{a} ^ {b} has no finite real result")));
                }
                result
            },
            _ => {
                return Err(RuntimeError::type_mismatch(format!("'{op}' is not an arithmetic operator")));
            },
        };
        Ok(Value::Number(result))
    }
}
