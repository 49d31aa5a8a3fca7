use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            coerce::as_number,
            core::{Binding, Value, type_name},
            finance::Cashflow,
        },
    },
    util::num::f64_to_usize_checked,
};

/// Fetches `items[index]`, failing with `IndexOutOfBounds`.
fn element<T: Clone>(items: &[T], index: usize) -> EvalResult<T> {
    items.get(index)
         .cloned()
         .ok_or(RuntimeError::IndexOutOfBounds { index,
                                                 len: items.len(),
                                                 line: None })
}

/// Checks `start..end` against a sequence of length `len`.
fn slice_bounds(start: usize, end: usize, len: usize) -> EvalResult<std::ops::Range<usize>> {
    if end > len {
        return Err(RuntimeError::IndexOutOfBounds { index: end,
                                                    len,
                                                    line: None });
    }
    if start > end {
        return Err(RuntimeError::invalid_argument(format!("slice start {start} is after its end {end}")));
    }
    Ok(start..end)
}

fn index_of(index: &Binding) -> EvalResult<usize> {
    f64_to_usize_checked(as_number(index, "index")?, "index")
}

fn no_field(object: &Binding, name: &str) -> RuntimeError {
    RuntimeError::invalid_argument(format!("{} has no field '{name}'", type_name(object)))
}

impl Context {
    /// Evaluates `container[index]`.
    ///
    /// Lists, cashflows, ledgers and strings are indexed from zero by a whole
    /// number; a string yields a one-character string. Tables are indexed by
    /// column name and yield the column as a list.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` past the end.
    /// - `RuntimeError::InvalidArgument` for a fractional or negative index,
    ///   or an unknown column.
    /// - `RuntimeError::TypeMismatch` for a container that cannot be indexed.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Some(Value::from(vec![10.0, 20.0, 30.0]));
    ///
    /// let v = Context::subscript(&list, &Some(Value::Number(1.0))).unwrap();
    /// assert_eq!(v, Some(Value::Number(20.0)));
    ///
    /// assert!(Context::subscript(&list, &Some(Value::Number(3.0))).is_err());
    /// assert!(Context::subscript(&list, &Some(Value::Number(0.5))).is_err());
    /// ```
    pub fn subscript(container: &Binding, index: &Binding) -> EvalResult<Binding> {
        match container {
            Some(Value::List(elements)) => element(elements, index_of(index)?),
            Some(Value::Cashflow(cashflow)) => Ok(Some(Value::Number(element(&cashflow.flows, index_of(index)?)?))),
            Some(Value::Ledger(ledger)) => Ok(Some(Value::from(element(&ledger.entries, index_of(index)?)?))),
            Some(Value::String(text)) => {
                let chars: Vec<char> = text.chars().collect();
                Ok(Some(Value::from(element(&chars, index_of(index)?)?.to_string())))
            },
            Some(Value::Table(table)) => {
                let Some(Value::String(name)) = index else {
                    return Err(RuntimeError::type_mismatch(format!("table index must be a column name, found {}",
                                                                   type_name(index))));
                };
                table.column(name)
                     .map(|cells| Some(Value::from(cells.to_vec())))
                     .ok_or_else(|| RuntimeError::invalid_argument(format!("unknown column '{name}'")))
            },
            other => Err(RuntimeError::type_mismatch(format!("cannot index {}", type_name(other)))),
        }
    }

    /// Evaluates `container[start:end]`, with `end` exclusive.
    ///
    /// Lists, cashflows and strings can be sliced; the result has the same
    /// kind as the container.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` if `end` is past the end.
    /// - `RuntimeError::InvalidArgument` if `start > end` or either bound is
    ///   not a whole non-negative number.
    /// - `RuntimeError::TypeMismatch` for other containers.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let text = Some(Value::from("finance"));
    /// let v = Context::slice(&text, &Some(Value::Number(0.0)), &Some(Value::Number(3.0))).unwrap();
    /// assert_eq!(v, Some(Value::from("fin")));
    /// ```
    pub fn slice(container: &Binding, start: &Binding, end: &Binding) -> EvalResult<Binding> {
        let start = index_of(start)?;
        let end = index_of(end)?;

        match container {
            Some(Value::List(elements)) => {
                let range = slice_bounds(start, end, elements.len())?;
                Ok(Some(Value::from(elements[range].to_vec())))
            },
            Some(Value::Cashflow(cashflow)) => {
                let range = slice_bounds(start, end, cashflow.flows.len())?;
                let flows = cashflow.flows[range].to_vec();
                Ok(Some(Value::from(Cashflow { flows })))
            },
            Some(Value::String(text)) => {
                let chars: Vec<char> = text.chars().collect();
                let range = slice_bounds(start, end, chars.len())?;
                Ok(Some(Value::from(chars[range].iter().collect::<String>())))
            },
            other => Err(RuntimeError::type_mismatch(format!("cannot slice {}", type_name(other)))),
        }
    }

    /// Evaluates `object.name`.
    ///
    /// | kind         | fields                                        |
    /// |--------------|-----------------------------------------------|
    /// | table        | any column name                               |
    /// | portfolio    | `assets`, `weights`                           |
    /// | money        | `amount`, `currency`                          |
    /// | period       | `value`, `unit`, `days`, `years`              |
    /// | ledger_entry | `date`, `debit`, `credit`, `description`      |
    /// | ledger       | `entries`, `balance`                          |
    /// | cashflow     | `flows`                                       |
    ///
    /// # Errors
    /// Returns `RuntimeError::InvalidArgument` for an unknown field and
    /// `RuntimeError::TypeMismatch` for kinds without fields.
    pub fn column_access(object: &Binding, name: &str) -> EvalResult<Binding> {
        let value = match (object, name) {
            (Some(Value::Table(table)), _) => {
                return table.column(name)
                            .map(|cells| Some(Value::from(cells.to_vec())))
                            .ok_or_else(|| RuntimeError::invalid_argument(format!("unknown column '{name}'")));
            },
            (Some(Value::Portfolio(portfolio)), "assets") => Value::from(portfolio.assets().to_vec()),
            (Some(Value::Portfolio(portfolio)), "weights") => Value::from(portfolio.weights().to_vec()),
            (Some(Value::Money(money)), "amount") => Value::Number(money.amount()),
            (Some(Value::Money(money)), "currency") => Value::from(money.currency().code()),
            (Some(Value::TimePeriod(period)), "value") => Value::Number(period.value),
            (Some(Value::TimePeriod(period)), "unit") => Value::from(period.unit.name()),
            (Some(Value::TimePeriod(period)), "days") => Value::Number(period.to_days()),
            (Some(Value::TimePeriod(period)), "years") => Value::Number(period.to_years()),
            (Some(Value::LedgerEntry(entry)), "date") => Value::from(entry.date()),
            (Some(Value::LedgerEntry(entry)), "debit") => return Ok(entry.debit().map(Value::Number)),
            (Some(Value::LedgerEntry(entry)), "credit") => return Ok(entry.credit().map(Value::Number)),
            (Some(Value::LedgerEntry(entry)), "description") => Value::from(entry.description()),
            (Some(Value::Ledger(ledger)), "entries") => Value::from(ledger.entries
                                                                          .iter()
                                                                          .map(|entry| Some(Value::from(entry.clone())))
                                                                          .collect::<Vec<_>>()),
            (Some(Value::Ledger(ledger)), "balance") => Value::Number(ledger.balance()),
            (Some(Value::Cashflow(cashflow)), "flows") => Value::from(cashflow.flows.clone()),
            (Some(
                Value::Portfolio(_)
                | Value::Money(_)
                | Value::TimePeriod(_)
                | Value::LedgerEntry(_)
                | Value::Ledger(_)
                | Value::Cashflow(_),
            ),
             _) => return Err(no_field(object, name)),
            _ => {
                return Err(RuntimeError::type_mismatch(format!("{} has no fields", type_name(object))));
            },
        };
        Ok(Some(value))
    }
}
