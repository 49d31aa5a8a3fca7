use std::rc::Rc;

/// Textual dump of the syntax tree.
///
/// Renders statements and expressions in a fully parenthesized prefix form,
/// e.g. `(let x (+ 1 2))`. Output is deterministic for a given tree; it is a
/// debugging view and is not meant to be parsed back.
pub mod printer;

/// Represents a literal value in the language.
///
/// Dates have no runtime type of their own and are stored as text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit floating-point literal.
    Number(f64),
    /// A string or date literal.
    Text(String),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// An abstract syntax tree (AST) node representing an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean, null).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A parenthesized expression.
    Grouping {
        /// The inner expression.
        inner: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation (negation or logical not).
    Unary {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A binary operation, including the short-circuiting `and`/`or`.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Function call expression (e.g. `sum(xs)`).
    Call {
        /// The expression producing the function.
        callee:    Box<Self>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// List literal expression.
    ListLiteral {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Indexing (`xs[2]`) or slicing (`xs[1:3]`).
    Subscript {
        /// The value being indexed.
        container: Box<Self>,
        /// The index, or the start of the slice.
        index:     Box<Self>,
        /// The exclusive end of the slice, if this is a slice.
        end:       Option<Box<Self>>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `name = value`; the only assignable target is a variable.
    Assign {
        /// The variable being assigned.
        name:  String,
        /// The value being assigned.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `value.name`: a table column or a field of a finance value.
    ColumnAccess {
        /// The value the field is read from.
        object: Box<Self>,
        /// The column or field name.
        name:   String,
        /// Line number in the source code.
        line:   usize,
    },
    /// One of the built-in finance forms.
    Finance {
        /// The form and its arguments.
        form: FinanceExpr,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use finlite::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Grouping { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Call { line, .. }
            | Self::ListLiteral { line, .. }
            | Self::Subscript { line, .. }
            | Self::Assign { line, .. }
            | Self::ColumnAccess { line, .. }
            | Self::Finance { line, .. } => *line,
        }
    }
}

/// The finance forms and their named arguments.
///
/// Required arguments are plain fields; optional ones are `Option`s. The
/// parser has already checked that every required argument is present.
#[derive(Debug, Clone, PartialEq)]
pub enum FinanceExpr {
    /// Net present value of a series of flows.
    Npv {
        /// Discount rate per period.
        rate:      Box<Expr>,
        /// Flows, the first one at period 0.
        cashflows: Box<Expr>,
    },
    /// Internal rate of return.
    Irr {
        /// Flows, the first one at period 0.
        cashflows: Box<Expr>,
        /// Starting point for the iteration.
        guess:     Option<Box<Expr>>,
    },
    /// Present value.
    Pv {
        /// Rate per period.
        rate: Box<Expr>,
        /// Number of periods.
        nper: Box<Expr>,
        /// Payment per period.
        pmt:  Option<Box<Expr>>,
        /// Future value.
        fv:   Option<Box<Expr>>,
    },
    /// Future value.
    Fv {
        /// Rate per period.
        rate: Box<Expr>,
        /// Number of periods.
        nper: Box<Expr>,
        /// Payment per period.
        pmt:  Option<Box<Expr>>,
        /// Present value.
        pv:   Option<Box<Expr>>,
    },
    /// Weighted average cost of capital.
    Wacc {
        /// Share of equity financing.
        equity_weight:  Box<Expr>,
        /// Share of debt financing.
        debt_weight:    Box<Expr>,
        /// Cost of equity.
        cost_of_equity: Box<Expr>,
        /// Pre-tax cost of debt.
        cost_of_debt:   Box<Expr>,
        /// Corporate tax rate.
        tax_rate:       Box<Expr>,
    },
    /// Capital asset pricing model.
    Capm {
        /// Risk-free rate.
        risk_free:     Box<Expr>,
        /// Asset beta.
        beta:          Box<Expr>,
        /// Expected market return.
        market_return: Box<Expr>,
    },
    /// Parametric value at risk.
    Var {
        /// Historical returns.
        returns:    Box<Expr>,
        /// Confidence level, e.g. `0.95`.
        confidence: Box<Expr>,
        /// Position value the result is scaled by.
        value:      Option<Box<Expr>>,
    },
    /// Simple moving average.
    Sma {
        /// The series.
        values: Box<Expr>,
        /// Window length.
        period: Box<Expr>,
    },
    /// Exponential moving average.
    Ema {
        /// The series.
        values: Box<Expr>,
        /// Smoothing period.
        period: Box<Expr>,
    },
    /// Loan amortization schedule.
    Amortize {
        /// Amount borrowed.
        principal: Box<Expr>,
        /// Rate per period.
        rate:      Box<Expr>,
        /// Number of payments.
        periods:   Box<Expr>,
    },
    /// `cashflow(f0, f1, ...)`.
    Cashflow {
        /// The flows in period order.
        flows: Vec<Expr>,
    },
    /// `portfolio(assets: ..., weights: ...)`.
    Portfolio {
        /// Asset names.
        assets:  Box<Expr>,
        /// Asset weights.
        weights: Box<Expr>,
    },
    /// `table(name: [...], ...)`.
    Table {
        /// Column names with their value expressions, in source order.
        columns: Vec<(String, Expr)>,
    },
}

impl FinanceExpr {
    /// The keyword the form is written with.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Npv { .. } => "npv",
            Self::Irr { .. } => "irr",
            Self::Pv { .. } => "pv",
            Self::Fv { .. } => "fv",
            Self::Wacc { .. } => "wacc",
            Self::Capm { .. } => "capm",
            Self::Var { .. } => "var",
            Self::Sma { .. } => "sma",
            Self::Ema { .. } => "ema",
            Self::Amortize { .. } => "amortize",
            Self::Cashflow { .. } => "cashflow",
            Self::Portfolio { .. } => "portfolio",
            Self::Table { .. } => "table",
        }
    }
}

/// A branch of an `if` statement after the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    /// The branch condition.
    pub condition: Expr,
    /// Statements run when the condition holds.
    pub body:      Vec<Stmt>,
}

/// Represents a user-defined function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The name of the function.
    pub name:   String,
    /// The parameter names.
    pub params: Vec<String>,
    /// The statements run when the function is called.
    pub body:   Vec<Stmt>,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let NAME = expr`, or `let NAME` for an uninitialized binding.
    Let {
        /// The name of the variable.
        name:        String,
        /// The initial value of the variable.
        initializer: Option<Expr>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `set NAME = expr`, assigning to an existing binding.
    Set {
        /// The name of the variable.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `print expr`.
    Print {
        /// The value to print.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `log expr`.
    Log {
        /// The value to log.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `block ... end`, a nested scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `if ... then ... (elseif ...)* (else ...)? end`.
    If {
        /// The primary condition.
        condition:   Expr,
        /// Statements run when the condition holds.
        then_branch: Vec<Self>,
        /// `elseif` branches in source order.
        elseifs:     Vec<ElseIf>,
        /// Statements run when no condition holds.
        else_branch: Option<Vec<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while expr ... end`.
    While {
        /// The loop condition.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for NAME from expr to expr (step expr)? ... end`.
    For {
        /// The loop variable name.
        var:   String,
        /// First value.
        start: Expr,
        /// Last value (inclusive).
        end:   Expr,
        /// Increment, `1` when omitted.
        step:  Option<Expr>,
        /// The loop body.
        body:  Vec<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `foreach NAME in expr ... end`.
    ForEach {
        /// The loop variable name.
        var:      String,
        /// The collection being iterated.
        iterable: Expr,
        /// The loop body.
        body:     Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `fn NAME(params) ... end`.
    Function(Rc<FunctionDecl>),
    /// `return expr?`.
    Return {
        /// The returned value, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A statement that failed to parse. Never executed.
    Error {
        /// Line number in the source code.
        line: usize,
    },
    /// `scenario NAME ... end`, binding a deferred block.
    Scenario {
        /// The name the block is bound to.
        name: String,
        /// The deferred statements.
        body: Rc<[Self]>,
        /// Line number in the source code.
        line: usize,
    },
    /// `run NAME`.
    Run {
        /// The scenario to run.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// `simulate NAME times expr`.
    Simulate {
        /// The scenario to run.
        name:  String,
        /// How many times to run it.
        times: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `portfolio NAME(assets: ..., weights: ...)`.
    Portfolio {
        /// The variable the portfolio is bound to.
        name:    String,
        /// Asset names.
        assets:  Expr,
        /// Asset weights.
        weights: Expr,
        /// Line number in the source code.
        line:    usize,
    },
    /// `entry LEDGER(date: ..., debit: ..., credit: ..., description: ...)`.
    LedgerEntry {
        /// The ledger the entry is appended to.
        ledger:      String,
        /// Entry date.
        date:        Expr,
        /// Debit amount.
        debit:       Option<Expr>,
        /// Credit amount.
        credit:      Option<Expr>,
        /// Free text.
        description: Expr,
        /// Line number in the source code.
        line:        usize,
    },
}

impl Stmt {
    /// Gets the line number from `self`.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Function(decl) => decl.line,
            Self::Let { line, .. }
            | Self::Set { line, .. }
            | Self::Print { line, .. }
            | Self::Log { line, .. }
            | Self::Expression { line, .. }
            | Self::Block { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::ForEach { line, .. }
            | Self::Return { line, .. }
            | Self::Error { line }
            | Self::Scenario { line, .. }
            | Self::Run { line, .. }
            | Self::Simulate { line, .. }
            | Self::Portfolio { line, .. }
            | Self::LedgerEntry { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`, `&&`)
    And,
    /// Logical or (`or`, `||`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`, `not x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Pow, Sub};
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
