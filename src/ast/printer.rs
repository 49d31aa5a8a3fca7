use super::{ElseIf, Expr, FinanceExpr, LiteralValue, Stmt};
use crate::interpreter::value::format_number;

/// Renders a whole program, one top-level statement per line.
///
/// # Example
/// ```
/// use finlite::{
///     ast::printer::print_program,
///     interpreter::{lexer::scan, parser::parse},
/// };
///
/// let (program, errors) = parse(&scan("let x = 1 + 2 * 3\nprint [x, \"a\"]\n"));
/// assert!(errors.is_empty());
/// assert_eq!(print_program(&program),
///            "(let x (+ 1 (* 2 3)))\n(print [x, \"a\"])\n");
/// ```
#[must_use]
pub fn print_program(statements: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in statements {
        out.push_str(&print_stmt(stmt));
        out.push('\n');
    }
    out
}

/// Renders one statement.
#[must_use]
pub fn print_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Let { name, initializer, .. } => match initializer {
            Some(init) => format!("(let {name} {})", print_expr(init)),
            None => format!("(let {name})"),
        },
        Stmt::Set { name, value, .. } => format!("(set {name} {})", print_expr(value)),
        Stmt::Print { expr, .. } => format!("(print {})", print_expr(expr)),
        Stmt::Log { expr, .. } => format!("(log {})", print_expr(expr)),
        Stmt::Expression { expr, .. } => format!("(; {})", print_expr(expr)),
        Stmt::Block { statements, .. } => format!("(block{})", body(statements)),
        Stmt::If { condition,
                   then_branch,
                   elseifs,
                   else_branch,
                   .. } => {
            let mut out = format!("(if {} (then{})", print_expr(condition), body(then_branch));
            for ElseIf { condition, body: branch } in elseifs {
                out.push_str(&format!(" (elseif {}{})", print_expr(condition), body(branch)));
            }
            if let Some(branch) = else_branch {
                out.push_str(&format!(" (else{})", body(branch)));
            }
            out.push(')');
            out
        },
        Stmt::While { condition, body: stmts, .. } => {
            format!("(while {}{})", print_expr(condition), body(stmts))
        },
        Stmt::For { var,
                    start,
                    end,
                    step,
                    body: stmts,
                    .. } => {
            let step = step.as_ref()
                           .map(|s| format!(" (step {})", print_expr(s)))
                           .unwrap_or_default();
            format!("(for {var} {} {}{step}{})", print_expr(start), print_expr(end), body(stmts))
        },
        Stmt::ForEach { var,
                        iterable,
                        body: stmts,
                        .. } => format!("(foreach {var} {}{})", print_expr(iterable), body(stmts)),
        Stmt::Function(decl) => {
            format!("(fn {} ({}){})", decl.name, decl.params.join(" "), body(&decl.body))
        },
        Stmt::Return { value, .. } => match value {
            Some(value) => format!("(return {})", print_expr(value)),
            None => "(return)".to_string(),
        },
        Stmt::Error { .. } => "(error)".to_string(),
        Stmt::Scenario { name, body: stmts, .. } => format!("(scenario {name}{})", body(stmts)),
        Stmt::Run { name, .. } => format!("(run {name})"),
        Stmt::Simulate { name, times, .. } => format!("(simulate {name} {})", print_expr(times)),
        Stmt::Portfolio { name,
                          assets,
                          weights,
                          .. } => format!("(portfolio {name} {} {})", print_expr(assets), print_expr(weights)),
        Stmt::LedgerEntry { ledger,
                            date,
                            debit,
                            credit,
                            description,
                            .. } => format!("(entry {ledger} {} {} {} {})",
                                            print_expr(date),
                                            optional(debit.as_ref()),
                                            optional(credit.as_ref()),
                                            print_expr(description)),
    }
}

/// Renders one expression.
#[must_use]
pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => match value {
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::Text(text) => format!("{text:?}"),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Null => "nil".to_string(),
        },
        Expr::Variable { name, .. } => name.clone(),
        Expr::Grouping { inner, .. } => format!("(group {})", print_expr(inner)),
        Expr::Unary { op, operand, .. } => format!("({op} {})", print_expr(operand)),
        Expr::Binary { left, op, right, .. } => {
            format!("({op} {} {})", print_expr(left), print_expr(right))
        },
        Expr::Call { callee, arguments, .. } => format!("(call {} ({}))", print_expr(callee), list(arguments, " ")),
        Expr::ListLiteral { elements, .. } => format!("[{}]", list(elements, ", ")),
        Expr::Subscript { container,
                          index,
                          end,
                          .. } => match end {
            Some(end) => format!("(slice {} {} {})", print_expr(container), print_expr(index), print_expr(end)),
            None => format!("(index {} {})", print_expr(container), print_expr(index)),
        },
        Expr::Assign { name, value, .. } => format!("(= {name} {})", print_expr(value)),
        Expr::ColumnAccess { object, name, .. } => format!("(. {} {name})", print_expr(object)),
        Expr::Finance { form, .. } => print_finance(form),
    }
}

fn print_finance(form: &FinanceExpr) -> String {
    let args: Vec<(&str, Option<&Expr>)> = match form {
        FinanceExpr::Npv { rate, cashflows } => vec![("rate", arg(rate)), ("cashflows", arg(cashflows))],
        FinanceExpr::Irr { cashflows, guess } => {
            vec![("cashflows", arg(cashflows)), ("guess", guess.as_deref())]
        },
        FinanceExpr::Pv { rate, nper, pmt, fv } => vec![("rate", arg(rate)),
                                                         ("nper", arg(nper)),
                                                         ("pmt", pmt.as_deref()),
                                                         ("fv", fv.as_deref())],
        FinanceExpr::Fv { rate, nper, pmt, pv } => vec![("rate", arg(rate)),
                                                         ("nper", arg(nper)),
                                                         ("pmt", pmt.as_deref()),
                                                         ("pv", pv.as_deref())],
        FinanceExpr::Wacc { equity_weight,
                            debt_weight,
                            cost_of_equity,
                            cost_of_debt,
                            tax_rate, } => vec![("equity_weight", arg(equity_weight)),
                                                ("debt_weight", arg(debt_weight)),
                                                ("cost_of_equity", arg(cost_of_equity)),
                                                ("cost_of_debt", arg(cost_of_debt)),
                                                ("tax_rate", arg(tax_rate))],
        FinanceExpr::Capm { risk_free,
                            beta,
                            market_return, } => vec![("risk_free", arg(risk_free)),
                                                     ("beta", arg(beta)),
                                                     ("market_return", arg(market_return))],
        FinanceExpr::Var { returns,
                           confidence,
                           value, } => vec![("returns", arg(returns)),
                                            ("confidence", arg(confidence)),
                                            ("value", value.as_deref())],
        FinanceExpr::Sma { values, period } | FinanceExpr::Ema { values, period } => {
            vec![("values", arg(values)), ("period", arg(period))]
        },
        FinanceExpr::Amortize { principal,
                                rate,
                                periods, } => vec![("principal", arg(principal)),
                                                   ("rate", arg(rate)),
                                                   ("periods", arg(periods))],
        FinanceExpr::Cashflow { flows } => return format!("(cashflow {})", list(flows, " ")),
        FinanceExpr::Portfolio { assets, weights } => {
            vec![("assets", arg(assets)), ("weights", arg(weights))]
        },
        FinanceExpr::Table { columns } => {
            let columns = columns.iter()
                                 .map(|(name, expr)| format!("({name} {})", print_expr(expr)))
                                 .collect::<Vec<_>>()
                                 .join(" ");
            return format!("(table {columns})");
        },
    };

    let mut out = format!("({}", form.name());
    for (name, expr) in args {
        if let Some(expr) = expr {
            out.push_str(&format!(" ({name} {})", print_expr(expr)));
        }
    }
    out.push(')');
    out
}

fn body(statements: &[Stmt]) -> String {
    statements.iter().fold(String::new(), |mut out, stmt| {
                         out.push(' ');
                         out.push_str(&print_stmt(stmt));
                         out
                     })
}

fn list(exprs: &[Expr], separator: &str) -> String {
    exprs.iter().map(print_expr).collect::<Vec<_>>().join(separator)
}

fn arg(expr: &Expr) -> Option<&Expr> {
    Some(expr)
}

fn optional(expr: Option<&Expr>) -> String {
    expr.map_or_else(|| "nil".to_string(), print_expr)
}
