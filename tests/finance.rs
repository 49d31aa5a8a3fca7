mod common;

use common::{assert_output, runtime_error};
use finlite::{
    error::RuntimeError,
    interpreter::{
        evaluator::function::{
            builtin,
            finance::{amortize, capm, irr, npv, value_at_risk, wacc, z_score},
        },
        value::core::Value,
    },
};

#[test]
fn net_present_value() {
    assert_output("print abs(npv(0.1, [-100, 60, 60]) - 4.1322314) < 0.000001\n", "true\n");
    assert_output("print npv(rate: 0, cashflows: cashflow(-100, 50, 60))\n", "10\n");
    assert_output("print abs(npv(percent(10), [-100, 110])) < 0.000001\n", "true\n");
}

#[test]
fn rates_outside_the_unit_interval_are_rejected() {
    assert!(matches!(runtime_error("print npv(10, [1, 2])\n"), RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("print npv(\"ten\", [1, 2])\n"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn internal_rate_of_return() {
    assert_output("print irr([-100, 110])\n", "10.00%\n");
    assert_output("print irr(cashflows: [-100, 110], guess: 0.5)\n", "10.00%\n");
    assert_output("print type_of(irr([-100, 300]))\n", "number\n");
    assert!(matches!(runtime_error("print irr([-100])\n"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn irr_matches_npv_root() {
    let flows = [-1000.0, 300.0, 400.0, 500.0];
    let rate = irr(&flows, 0.1);
    assert!(npv(rate, &flows).abs() < 1e-6);
}

#[test]
fn present_and_future_value() {
    assert_output("print round(pv(0.05, 10, 100), 2)\n", "772.17\n");
    assert_output("print pv(0, 10, pmt: 100)\n", "-1000\n");
    assert_output("print round(fv(rate(0.05), 10, 0, 1000), 2)\n", "1628.89\n");
    assert_output("print fv(0, 5, 10, 100)\n", "150\n");
    assert_output("print fv(rate: 0, nper: 5, pv: money(100))\n", "100\n");
    assert!(matches!(runtime_error("print pv(0.05, -1)\n"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn cost_of_capital() {
    assert_output("print wacc(0.6, 0.4, 0.1, 0.05, 0.3)\n", "7.40%\n");
    assert_output("print capm(0.02, 1.5, 0.08)\n", "11.00%\n");
    assert_output("print type_of(capm(0.02, 20, 0.08))\n", "number\n");
    assert!((wacc(0.5, 0.5, 0.1, 0.1, 0.0) - 0.1).abs() < 1e-12);
    assert!((capm(0.03, 0.0, 0.5) - 0.03).abs() < 1e-12);
}

#[test]
fn value_at_risk_uses_the_confidence_z_score() {
    assert_eq!(z_score(0.95), 1.65);
    assert_eq!(z_score(0.99), 2.33);
    assert_eq!(z_score(0.5), 1.0);
    assert!((value_at_risk(&[0.02, -0.02], 0.99) - 0.0466).abs() < 1e-12);

    assert_output("print abs(var([0.01, -0.01, 0.01, -0.01], 0.95) - 0.0165) < 0.0000001\n", "true\n");
    assert_output("print abs(var([0.01, -0.01], percent(95), 1000) - 16.5) < 0.0000001\n", "true\n");
    assert_output("print var([], 0.95)\n", "0\n");
}

#[test]
fn moving_averages() {
    assert_output("print sma([1, 2, 3, 4], 2)\n", "[1.5, 2.5, 3.5]\n");
    assert_output("print sma(values: [1], period: 2)\n", "[]\n");
    assert_output("print ema([10, 20, 30], 3)\n", "[10, 15, 22.5]\n");
    assert!(matches!(runtime_error("print sma([1, 2], 0)\n"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("print ema([1, 2], 1.5)\n"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn amortization_schedule_is_a_table() {
    let src = r"
let s = amortize(1200, 0, 12)
print len(s)
print s.payment[0]
print s.balance[11]
print s
";
    let out = common::output(src);
    assert!(out.starts_with("12\n100\n0\nTABLE(payment, interest, principal, balance)\n  [100, 0, 100, 1100]\n"));

    assert!(matches!(runtime_error("print amortize(1000, 0.01, 0)\n"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn amortization_pays_off_the_principal() {
    let schedule = amortize(10_000.0, 0.005, 36);
    let repaid: f64 = schedule.iter().map(|row| row.principal).sum();
    assert!((repaid - 10_000.0).abs() < 1e-6);
    assert!(schedule.last().is_some_and(|row| row.balance < 1e-6));
}

#[test]
fn cashflows() {
    let src = r"
let c = cashflow(-100, 50, money(60))
print c
print c.flows
print c[2]
print len(c)
print c[0:2]
";
    assert_output(src, "CASHFLOW(3 periods)\n[-100, 50, 60]\n60\n3\nCASHFLOW(2 periods)\n");
    assert!(matches!(runtime_error("print cashflow(1, \"two\")\n"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn money_rates_and_periods() {
    assert_output("print money(100)\n", "USD 100.00\n");
    assert_output("print money(5, \"eur\").currency\n", "EUR\n");
    assert_output("print money(12.345).amount\n", "12.345\n");
    assert_output("print rate(0.125)\n", "12.50%\n");
    assert_output("print percent(12.5)\n", "12.50%\n");
    assert_output("print to_rate(5)\n", "5.00%\n");
    assert_output("print type_of(to_rate(percent(40)))\n", "rate\n");
    assert_output("print to_percentage(0.125)\n", "12.50%\n");
    assert_output("print period(6, \"Months\")\n", "6 months\n");
    assert_output("print period(2).unit\n", "years\n");
    assert_output("print period(2).days\n", "730.5\n");
    assert_output("print period(730.5, \"days\").years\n", "2\n");

    assert!(matches!(runtime_error("print money(1, \"XYZ\")\n"), RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("print rate(1.5)\n"), RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("print percent(-1)\n"), RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("print period(1, \"weeks\")\n"), RuntimeError::InvalidValue { .. }));
}

#[test]
fn statistics_builtins() {
    assert_output("print sum([1, 2, 3])\n", "6\n");
    assert_output("print sum(1, 2, 3)\n", "6\n");
    assert_output("print sum([])\n", "0\n");
    assert_output("print avg([1, 2, 3, 4])\n", "2.5\n");
    assert_output("print min(4, 2, 8)\n", "2\n");
    assert_output("print max(cashflow(-5, 7))\n", "7\n");
    assert_output("print median([3, 1, 2])\n", "2\n");
    assert_output("print median([4, 1, 3, 2])\n", "2.5\n");
    assert_output("print percentile([1, 2, 3, 4, 5], 50)\n", "3\n");
    assert_output("print percentile([1, 2, 3, 4, 5], 100)\n", "5\n");
    assert_output("print sort([3, 1, 2])\n", "[1, 2, 3]\n");

    assert!(matches!(runtime_error("print avg([])\n"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("print percentile([1, 2], 101)\n"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("print sum()\n"), RuntimeError::ArgumentCountMismatch { .. }));
}

#[test]
fn math_builtins() {
    assert_output("print abs(-2)\n", "2\n");
    assert_output("print sqrt(9)\n", "3\n");
    assert_output("print pow(2, 3)\n", "8\n");
    assert_output("print round(2.5)\n", "3\n");
    assert_output("print round(3.14159, 2)\n", "3.14\n");
    assert!(matches!(runtime_error("print sqrt(-1)\n"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("print pow(-8, 0.5)\n"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn conversion_builtins() {
    assert_output("print number(\" 42 \") + 1\n", "43\n");
    assert_output("print number(true)\n", "1\n");
    assert_output("print number(money(7))\n", "7\n");
    assert_output("print str(5) + \"%\"\n", "5%\n");
    assert_output("print str([1, \"a\"])\n", "[1, \"a\"]\n");
    assert_output("print len(\"abc\")\n", "3\n");
    assert_output("print type_of(ledger())\n", "ledger\n");
    assert_output("print type_of(null)\n", "null\n");
    assert!(matches!(runtime_error("print number(\"x\")\n"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("print len(5)\n"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn builtins_called_directly_check_their_arguments() {
    let mismatch = |result: Result<Option<Value>, RuntimeError>| {
        matches!(result, Err(RuntimeError::ArgumentCountMismatch { .. }))
    };

    assert!(mismatch(builtin::len(&[])));
    assert!(mismatch(builtin::median(&[])));
    assert!(mismatch(builtin::to_rate(&[])));
    assert!(mismatch(builtin::pow(&[Some(Value::from(2.0))])));
    assert!(mismatch(builtin::percentile(&[])));
    assert!(mismatch(builtin::round(&[])));
    assert!(matches!(builtin::abs(&[Some(Value::from(-3.0))]), Ok(Some(Value::Number(n))) if n == 3.0));
}
