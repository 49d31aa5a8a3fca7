use tracing::trace;

use crate::{
    ast::{Expr, FinanceExpr},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult},
        value::{
            coerce::{as_count, as_list, as_number, to_amount, to_number_list, to_rate_value},
            core::{Binding, Value, type_name},
            finance::{Cashflow, Portfolio, Rate, Table},
        },
    },
    util::num::usize_to_f64_checked,
};

/// Newton iterations `irr` runs before giving up on convergence.
pub const IRR_MAX_ITERATIONS: usize = 100;

/// Starting point for `irr` when no guess is given.
pub const IRR_DEFAULT_GUESS: f64 = 0.1;

const IRR_TOLERANCE: f64 = 1e-12;

/// One row of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment {
    /// The fixed payment.
    pub payment:   f64,
    /// The share of the payment that is interest.
    pub interest:  f64,
    /// The share of the payment that repays principal.
    pub principal: f64,
    /// Outstanding balance after the payment, never below zero.
    pub balance:   f64,
}

/// Net present value of `flows`, the first one at period 0.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::npv;
///
/// let value = npv(0.1, &[-100.0, 60.0, 60.0]);
/// assert!((value - 4.1322314).abs() < 1e-6);
/// ```
#[must_use]
pub fn npv(rate: f64, flows: &[f64]) -> f64 {
    let mut discount = 1.0;
    let mut total = 0.0;
    for flow in flows {
        total += flow / discount;
        discount *= 1.0 + rate;
    }
    total
}

/// Derivative of [`npv`] with respect to the rate.
fn npv_slope(rate: f64, flows: &[f64]) -> f64 {
    let mut discount = 1.0 + rate;
    let mut period = 0.0;
    let mut total = 0.0;
    for flow in flows {
        total -= period * flow / discount;
        discount *= 1.0 + rate;
        period += 1.0;
    }
    total
}

/// Internal rate of return by Newton's method.
///
/// Stops after [`IRR_MAX_ITERATIONS`] steps, once a step is negligible, or
/// when the slope vanishes, returning the current estimate.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::irr;
///
/// let rate = irr(&[-100.0, 110.0], 0.1);
/// assert!((rate - 0.1).abs() < 1e-9);
/// ```
#[must_use]
pub fn irr(flows: &[f64], guess: f64) -> f64 {
    let mut rate = guess;
    for _ in 0..IRR_MAX_ITERATIONS {
        let slope = npv_slope(rate, flows);
        if slope == 0.0 {
            break;
        }
        let step = npv(rate, flows) / slope;
        rate -= step;
        if step.abs() < IRR_TOLERANCE {
            break;
        }
    }
    rate
}

/// Present value of `nper` payments of `pmt` plus a final `fv`.
///
/// Follows the spreadsheet sign convention for the future value: money
/// received later is subtracted.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::pv;
///
/// assert_eq!(pv(0.0, 10.0, 100.0, 0.0), -1000.0);
/// assert!((pv(0.05, 10.0, 100.0, 0.0) - 772.1735).abs() < 1e-4);
/// ```
#[must_use]
pub fn pv(rate: f64, nper: f64, pmt: f64, fv: f64) -> f64 {
    if rate == 0.0 {
        return (-pmt).mul_add(nper, -fv);
    }
    let growth = (1.0 + rate).powf(nper);
    pmt * (1.0 - 1.0 / growth) / rate - fv / growth
}

/// Future value of `pv` plus `nper` payments of `pmt`.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::fv;
///
/// assert_eq!(fv(0.0, 5.0, 10.0, 100.0), 150.0);
/// assert!((fv(0.05, 10.0, 0.0, 1000.0) - 1628.8946).abs() < 1e-4);
/// ```
#[must_use]
pub fn fv(rate: f64, nper: f64, pmt: f64, pv: f64) -> f64 {
    if rate == 0.0 {
        return pmt.mul_add(nper, pv);
    }
    let growth = (1.0 + rate).powf(nper);
    pv.mul_add(growth, pmt * ((growth - 1.0) / rate))
}

/// Weighted average cost of capital, with the tax shield on debt.
#[must_use]
pub fn wacc(equity_weight: f64, debt_weight: f64, cost_of_equity: f64, cost_of_debt: f64, tax_rate: f64) -> f64 {
    equity_weight.mul_add(cost_of_equity, debt_weight * cost_of_debt * (1.0 - tax_rate))
}

/// Expected return under the capital asset pricing model.
#[must_use]
pub fn capm(risk_free: f64, beta: f64, market_return: f64) -> f64 {
    beta.mul_add(market_return - risk_free, risk_free)
}

/// The z-score used for a confidence level: 1.65 at 95%, 2.33 at 99% and 1
/// otherwise.
#[must_use]
pub fn z_score(confidence: f64) -> f64 {
    if (confidence - 0.95).abs() < 1e-9 {
        1.65
    } else if (confidence - 0.99).abs() < 1e-9 {
        2.33
    } else {
        1.0
    }
}

/// Parametric value at risk: the z-score of `confidence` times the
/// population standard deviation of `returns`. Zero for no returns.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::value_at_risk;
///
/// let var = value_at_risk(&[0.01, -0.01, 0.01, -0.01], 0.95);
/// assert!((var - 0.0165).abs() < 1e-12);
/// assert_eq!(value_at_risk(&[], 0.95), 0.0);
/// ```
#[must_use]
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / count;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / count;
    z_score(confidence) * variance.sqrt()
}

/// Simple moving average over every full window of `period` values.
///
/// Shorter series yield no averages.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::sma;
///
/// assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), vec![1.5, 2.5, 3.5]);
/// assert!(sma(&[1.0], 2).is_empty());
/// ```
#[must_use]
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let width = period as f64;
    values.windows(period)
          .map(|window| window.iter().sum::<f64>() / width)
          .collect()
}

/// Exponential moving average with smoothing `2 / (period + 1)`, seeded
/// with the first value.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::ema;
///
/// assert_eq!(ema(&[10.0, 20.0, 30.0], 3), vec![10.0, 15.0, 22.5]);
/// ```
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let k = 2.0 / (period as f64 + 1.0);
    let mut result: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        let next = match result.last() {
            Some(previous) => value.mul_add(k, previous * (1.0 - k)),
            None => *value,
        };
        result.push(next);
    }
    result
}

/// Level-payment amortization schedule.
///
/// A zero rate splits the principal evenly.
///
/// # Example
/// ```
/// use finlite::interpreter::evaluator::function::finance::amortize;
///
/// let schedule = amortize(1200.0, 0.0, 12);
/// assert_eq!(schedule.len(), 12);
/// assert_eq!(schedule[0].payment, 100.0);
/// assert_eq!(schedule[11].balance, 0.0);
///
/// let schedule = amortize(1000.0, 0.01, 12);
/// assert!((schedule[0].interest - 10.0).abs() < 1e-9);
/// assert!(schedule[11].balance.abs() < 1e-6);
/// ```
#[must_use]
pub fn amortize(principal: f64, rate: f64, periods: usize) -> Vec<Installment> {
    #[allow(clippy::cast_precision_loss)]
    let count = periods as f64;
    let payment = if rate == 0.0 {
        principal / count
    } else {
        principal * rate / (1.0 - (1.0 + rate).powf(-count))
    };

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(periods);
    for _ in 0..periods {
        let interest = balance * rate;
        let repaid = payment - interest;
        balance -= repaid;
        schedule.push(Installment { payment,
                                    interest,
                                    principal: repaid,
                                    balance: balance.max(0.0) });
    }
    schedule
}

/// Wraps a computed rate as a `Rate` when it lies in `[0, 1]`, and as a
/// plain number otherwise.
fn rate_or_number(value: f64) -> Value {
    Rate::new(value).map_or(Value::Number(value), Value::from)
}

/// Reads a portfolio weight: a plain number, a `Rate`, or a `Percentage`
/// taken as its fraction.
fn weight(value: &Binding) -> EvalResult<f64> {
    match value {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::Rate(rate)) => Ok(rate.value()),
        Some(Value::Percentage(percentage)) => Ok(percentage.to_rate().value()),
        other => Err(RuntimeError::type_mismatch(format!("portfolio weight must be a number, rate or percentage, found {}",
                                                         type_name(other)))),
    }
}

fn positive(count: usize, what: &str) -> EvalResult<usize> {
    if count == 0 {
        return Err(RuntimeError::invalid_argument(format!("{what} must be at least 1")));
    }
    Ok(count)
}

impl Context {
    /// Evaluates a finance form.
    ///
    /// Rate arguments accept a `Rate`, a `Percentage` or a fraction in
    /// `[0, 1]`. Amount arguments accept a number or `Money`, whose currency
    /// is dropped. Series accept a list of amounts or a cashflow.
    ///
    /// # Errors
    /// - `RuntimeError::TypeMismatch` for an argument of the wrong kind.
    /// - `RuntimeError::InvalidValue` for an out-of-range rate or a portfolio
    ///   or table that breaks its invariants.
    /// - `RuntimeError::InvalidArgument` for a zero period or an `irr` that
    ///   does not settle on a finite rate.
    pub(crate) fn eval_finance(&mut self, form: &FinanceExpr, env: &Environment) -> EvalResult<Binding> {
        trace!(form = form.name(), "finance form");
        let value = match form {
            FinanceExpr::Npv { rate, cashflows } => {
                let rate = self.rate_arg(rate, env, "rate")?;
                let flows = self.series_arg(cashflows, env, "cashflows")?;
                Value::Number(npv(rate, &flows))
            },
            FinanceExpr::Irr { cashflows, guess } => {
                let flows = self.series_arg(cashflows, env, "cashflows")?;
                if flows.len() < 2 {
                    return Err(RuntimeError::invalid_argument("irr needs at least two cashflows"));
                }
                let guess = match guess {
                    Some(guess) => as_number(&self.evaluate(guess, env)?, "guess")?,
                    None => IRR_DEFAULT_GUESS,
                };
                let rate = irr(&flows, guess);
                if !rate.is_finite() {
                    return Err(RuntimeError::invalid_argument("irr did not converge"));
                }
                rate_or_number(rate)
            },
            FinanceExpr::Pv { rate, nper, pmt, fv: future } => {
                let rate = self.rate_arg(rate, env, "rate")?;
                let nper = self.periods_arg(nper, env, "nper")?;
                let pmt = self.amount_or_zero(pmt.as_deref(), env, "pmt")?;
                let future = self.amount_or_zero(future.as_deref(), env, "fv")?;
                Value::Number(pv(rate, nper, pmt, future))
            },
            FinanceExpr::Fv { rate, nper, pmt, pv: present } => {
                let rate = self.rate_arg(rate, env, "rate")?;
                let nper = self.periods_arg(nper, env, "nper")?;
                let pmt = self.amount_or_zero(pmt.as_deref(), env, "pmt")?;
                let present = self.amount_or_zero(present.as_deref(), env, "pv")?;
                Value::Number(fv(rate, nper, pmt, present))
            },
            FinanceExpr::Wacc { equity_weight,
                                debt_weight,
                                cost_of_equity,
                                cost_of_debt,
                                tax_rate, } => {
                let equity_weight = self.rate_arg(equity_weight, env, "equity_weight")?;
                let debt_weight = self.rate_arg(debt_weight, env, "debt_weight")?;
                let cost_of_equity = self.rate_arg(cost_of_equity, env, "cost_of_equity")?;
                let cost_of_debt = self.rate_arg(cost_of_debt, env, "cost_of_debt")?;
                let tax_rate = self.rate_arg(tax_rate, env, "tax_rate")?;
                rate_or_number(wacc(equity_weight, debt_weight, cost_of_equity, cost_of_debt, tax_rate))
            },
            FinanceExpr::Capm { risk_free,
                                beta,
                                market_return, } => {
                let risk_free = self.rate_arg(risk_free, env, "risk_free")?;
                let beta = as_number(&self.evaluate(beta, env)?, "beta")?;
                let market_return = self.rate_arg(market_return, env, "market_return")?;
                rate_or_number(capm(risk_free, beta, market_return))
            },
            FinanceExpr::Var { returns,
                               confidence,
                               value, } => {
                let returns = self.series_arg(returns, env, "returns")?;
                let confidence = self.rate_arg(confidence, env, "confidence")?;
                let scale = match value {
                    Some(value) => to_amount(&self.evaluate(value, env)?, "value")?,
                    None => 1.0,
                };
                Value::Number(value_at_risk(&returns, confidence) * scale)
            },
            FinanceExpr::Sma { values, period } => {
                let values = self.series_arg(values, env, "values")?;
                let period = positive(as_count(&self.evaluate(period, env)?, "period")?, "period")?;
                Value::from(sma(&values, period))
            },
            FinanceExpr::Ema { values, period } => {
                let values = self.series_arg(values, env, "values")?;
                let period = positive(as_count(&self.evaluate(period, env)?, "period")?, "period")?;
                Value::from(ema(&values, period))
            },
            FinanceExpr::Amortize { principal,
                                    rate,
                                    periods, } => {
                let principal = to_amount(&self.evaluate(principal, env)?, "principal")?;
                let rate = self.rate_arg(rate, env, "rate")?;
                let periods = positive(as_count(&self.evaluate(periods, env)?, "periods")?, "periods")?;
                Value::from(schedule_table(&amortize(principal, rate, periods))?)
            },
            FinanceExpr::Cashflow { flows } => {
                let mut values = Vec::with_capacity(flows.len());
                for flow in flows {
                    values.push(to_amount(&self.evaluate(flow, env)?, "cashflow")?);
                }
                Value::from(Cashflow { flows: values })
            },
            FinanceExpr::Portfolio { assets, weights } => self.build_portfolio(assets, weights, env)?,
            FinanceExpr::Table { columns } => {
                let mut built = Vec::with_capacity(columns.len());
                for (name, expr) in columns {
                    let column = self.evaluate(expr, env)?;
                    built.push((name.clone(), as_list(&column, name)?.to_vec()));
                }
                Value::from(Table::new(built)?)
            },
        };
        Ok(Some(value))
    }

    /// Evaluates the asset and weight lists of a portfolio and builds it.
    ///
    /// Weights may be numbers, rates or percentages.
    ///
    /// # Errors
    /// - `RuntimeError::TypeMismatch` if either side is not a list, or for a
    ///   weight of another kind.
    /// - `RuntimeError::InvalidValue` if the portfolio breaks its
    ///   invariants.
    pub(crate) fn build_portfolio(&mut self, assets: &Expr, weights: &Expr, env: &Environment) -> EvalResult<Value> {
        let assets = self.evaluate(assets, env)?;
        let weights = self.evaluate(weights, env)?;

        let assets = as_list(&assets, "portfolio assets")?.to_vec();
        let weights = as_list(&weights, "portfolio weights")?.iter()
                                                             .map(weight)
                                                             .collect::<EvalResult<Vec<_>>>()?;

        Ok(Value::from(Portfolio::new(assets, weights)?))
    }

    fn rate_arg(&mut self, expr: &Expr, env: &Environment, what: &str) -> EvalResult<f64> {
        to_rate_value(&self.evaluate(expr, env)?, what)
    }

    fn series_arg(&mut self, expr: &Expr, env: &Environment, what: &str) -> EvalResult<Vec<f64>> {
        to_number_list(&self.evaluate(expr, env)?, what)
    }

    fn periods_arg(&mut self, expr: &Expr, env: &Environment, what: &str) -> EvalResult<f64> {
        usize_to_f64_checked(as_count(&self.evaluate(expr, env)?, what)?)
    }

    fn amount_or_zero(&mut self, expr: Option<&Expr>, env: &Environment, what: &str) -> EvalResult<f64> {
        match expr {
            Some(expr) => to_amount(&self.evaluate(expr, env)?, what),
            None => Ok(0.0),
        }
    }
}

/// Lays a schedule out as a table with `payment`, `interest`, `principal`
/// and `balance` columns.
fn schedule_table(schedule: &[Installment]) -> EvalResult<Table> {
    let column = |field: fn(&Installment) -> f64| -> Vec<Binding> {
        schedule.iter()
                .map(|row| Some(Value::Number(field(row))))
                .collect()
    };
    Ok(Table::new(vec![("payment".to_string(), column(|row| row.payment)),
                       ("interest".to_string(), column(|row| row.interest)),
                       ("principal".to_string(), column(|row| row.principal)),
                       ("balance".to_string(), column(|row| row.balance)),])?)
}
