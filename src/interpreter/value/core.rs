use std::rc::Rc;

use crate::{
    ast::{LiteralValue, Stmt},
    interpreter::value::{
        callable::Callable,
        finance::{Cashflow, Ledger, LedgerEntry, Money, Percentage, Portfolio, Rate, Table, TimePeriod},
        format_number,
    },
};

/// What a variable holds or an expression yields. `None` is `null`.
pub type Binding = Option<Value>;

/// Represents a runtime value in the interpreter.
///
/// The set of kinds is closed: every consumer matches exhaustively, so a new
/// kind is a compile error everywhere it is not yet handled. Values are
/// immutable; compound values share their contents through `Rc` and are
/// cheap to clone.
#[derive(Debug, Clone)]
pub enum Value {
    /// A double precision number. Also the result of every arithmetic
    /// operator.
    Number(f64),
    /// A string. Date literals evaluate to strings too.
    String(Rc<str>),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// An ordered sequence whose elements may be `null`.
    List(Rc<Vec<Binding>>),
    /// Named columns of equal length.
    Table(Rc<Table>),
    /// Weighted assets.
    Portfolio(Rc<Portfolio>),
    /// Flows over periods.
    Cashflow(Rc<Cashflow>),
    /// A single ledger record.
    LedgerEntry(Rc<LedgerEntry>),
    /// A sequence of ledger records.
    Ledger(Rc<Ledger>),
    /// A deferred statement block bound by `scenario`.
    Block(Rc<BlockValue>),
    /// A builtin or a user function.
    Function(Rc<dyn Callable>),
    /// An amount in a currency.
    Money(Money),
    /// A fraction in `[0, 1]`.
    Rate(Rate),
    /// A percentage in `[0, 100]`.
    Percentage(Percentage),
    /// A length of time.
    TimePeriod(TimePeriod),
}

/// A named block of statements run on demand by `run` and `simulate`.
#[derive(Debug)]
pub struct BlockValue {
    /// The scenario name.
    pub name: String,
    /// The statements, shared with the syntax tree.
    pub body: Rc<[Stmt]>,
}

impl Value {
    /// The kind name reported by `type_of` and in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Table(_) => "table",
            Self::Portfolio(_) => "portfolio",
            Self::Cashflow(_) => "cashflow",
            Self::LedgerEntry(_) => "ledger_entry",
            Self::Ledger(_) => "ledger",
            Self::Block(_) => "block",
            Self::Function(_) => "function",
            Self::Money(_) => "money",
            Self::Rate(_) => "rate",
            Self::Percentage(_) => "percentage",
            Self::TimePeriod(_) => "period",
        }
    }
}

/// The kind name of a binding, `"null"` for `None`.
#[must_use]
pub fn type_name(value: &Binding) -> &'static str {
    value.as_ref().map_or("null", Value::type_name)
}

/// Truthiness: `null` and `false` are false, everything else is true.
///
/// # Example
/// ```
/// use finlite::interpreter::value::core::{Value, is_truthy};
///
/// assert!(!is_truthy(&None));
/// assert!(!is_truthy(&Some(Value::Bool(false))));
/// assert!(is_truthy(&Some(Value::Number(0.0))));
/// assert!(is_truthy(&Some(Value::from(""))));
/// ```
#[must_use]
pub const fn is_truthy(value: &Binding) -> bool {
    match value {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => true,
    }
}

/// Canonical string of a top-level value: `nil` for `null`, strings bare.
#[must_use]
pub fn format_binding(value: &Binding) -> String {
    value.as_ref().map_or_else(|| "nil".to_string(), ToString::to_string)
}

/// Canonical string of a value nested in a list or table row: like
/// [`format_binding`] but strings are quoted.
#[must_use]
pub fn format_element(value: &Binding) -> String {
    match value {
        Some(Value::String(text)) => format!("\"{text}\""),
        other => format_binding(other),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(elements) => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", format_element(element))?;
                }
                write!(f, "]")
            },
            Self::Table(table) => write!(f, "{table}"),
            Self::Portfolio(portfolio) => write!(f, "{portfolio}"),
            Self::Cashflow(cashflow) => write!(f, "{cashflow}"),
            Self::LedgerEntry(entry) => write!(f, "{entry}"),
            Self::Ledger(ledger) => write!(f, "{ledger}"),
            Self::Block(block) => write!(f, "<block {}>", block.name),
            Self::Function(function) => write!(f, "<{} {}>", function.kind(), function.name()),
            Self::Money(money) => write!(f, "{money}"),
            Self::Rate(rate) => write!(f, "{rate}"),
            Self::Percentage(percentage) => write!(f, "{percentage}"),
            Self::TimePeriod(period) => write!(f, "{period}"),
        }
    }
}

/// Structural equality. Blocks and functions are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => a == b,
            (Self::Portfolio(a), Self::Portfolio(b)) => a == b,
            (Self::Cashflow(a), Self::Cashflow(b)) => a == b,
            (Self::LedgerEntry(a), Self::LedgerEntry(b)) => a == b,
            (Self::Ledger(a), Self::Ledger(b)) => a == b,
            (Self::Block(a), Self::Block(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Self::Money(a), Self::Money(b)) => a == b,
            (Self::Rate(a), Self::Rate(b)) => a == b,
            (Self::Percentage(a), Self::Percentage(b)) => a == b,
            (Self::TimePeriod(a), Self::TimePeriod(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<Vec<Binding>> for Value {
    fn from(v: Vec<Binding>) -> Self {
        Self::List(Rc::new(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::List(Rc::new(v.into_iter().map(|n| Some(Self::Number(n))).collect()))
    }
}

impl From<Money> for Value {
    fn from(v: Money) -> Self {
        Self::Money(v)
    }
}

impl From<Rate> for Value {
    fn from(v: Rate) -> Self {
        Self::Rate(v)
    }
}

impl From<Percentage> for Value {
    fn from(v: Percentage) -> Self {
        Self::Percentage(v)
    }
}

impl From<TimePeriod> for Value {
    fn from(v: TimePeriod) -> Self {
        Self::TimePeriod(v)
    }
}

impl From<Table> for Value {
    fn from(v: Table) -> Self {
        Self::Table(Rc::new(v))
    }
}

impl From<Portfolio> for Value {
    fn from(v: Portfolio) -> Self {
        Self::Portfolio(Rc::new(v))
    }
}

impl From<Cashflow> for Value {
    fn from(v: Cashflow) -> Self {
        Self::Cashflow(Rc::new(v))
    }
}

impl From<LedgerEntry> for Value {
    fn from(v: LedgerEntry) -> Self {
        Self::LedgerEntry(Rc::new(v))
    }
}

impl From<Ledger> for Value {
    fn from(v: Ledger) -> Self {
        Self::Ledger(Rc::new(v))
    }
}

/// Converts a literal into the value it evaluates to. `null` has no value.
#[must_use]
pub fn from_literal(literal: &LiteralValue) -> Binding {
    match literal {
        LiteralValue::Number(n) => Some(Value::Number(*n)),
        LiteralValue::Text(text) => Some(Value::from(text.as_str())),
        LiteralValue::Bool(b) => Some(Value::Bool(*b)),
        LiteralValue::Null => None,
    }
}
