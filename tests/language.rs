mod common;

use common::{
    assert_failure, assert_output, assert_success, capturing_context, error, output, runtime_error,
};
use std::rc::Rc;

use finlite::{
    ScriptError,
    error::{ParseError, RuntimeError},
    interpreter::value::{
        callable::{Arity, NativeFunction},
        core::Value,
    },
    run_file, run_source,
};

#[test]
fn let_and_print() {
    assert_output("let x = 5\nprint x\n", "5\n");
    assert_output("let x\nprint x\n", "nil\n");
    assert_output("print \"a\" + \"b\"\n", "ab\n");
}

#[test]
fn arithmetic_and_precedence() {
    assert_output("print 1 + 2 * 3\n", "7\n");
    assert_output("print (1 + 2) * 3\n", "9\n");
    assert_output("print 10 / 4\n", "2.5\n");
    assert_output("print 7 % 3\n", "1\n");
    assert_output("print 2 ^ 10\n", "1024\n");
    assert_output("print -3 + 1\n", "-2\n");
    assert_output("print 0.1 + 0.2\n", "0.30000000000000004\n");
}

#[test]
fn number_literals_allow_grouping() {
    assert_output("print 1,000,000\n", "1000000\n");
    assert_output("print 1_500.25\n", "1500.25\n");
    assert_output("print [1,2]\n", "[1, 2]\n");
}

#[test]
fn operators_are_strict() {
    assert!(matches!(runtime_error("print 1 + \"b\"\n"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_error("print \"a\" * 2\n"), RuntimeError::OperandMustBeNumber { .. }));
    assert!(matches!(runtime_error("print 1 < \"2\"\n"), RuntimeError::OperandMustBeNumber { .. }));
    assert!(matches!(runtime_error("print null + 1\n"), RuntimeError::TypeMismatch { .. }));
    assert_output("print 1 == \"1\"\n", "false\n");
    assert_output("print null == null\n", "true\n");
    assert_output("print [1, 2] == [1, 2]\n", "true\n");
}

#[test]
fn division_by_zero_is_error() {
    assert!(matches!(runtime_error("let x = 1 / 0\n"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("let x = 5 % 0\n"), RuntimeError::DivisionByZero { .. }));
}

#[test]
fn logic_and_truthiness() {
    assert_output("print true and false\n", "false\n");
    assert_output("print false || true\n", "true\n");
    assert_output("print not true\n", "false\n");
    assert_output("print !null\n", "true\n");
    assert_output("if 0 then\n  print \"zero is true\"\nend\n", "zero is true\n");
    assert_output("if \"\" then\n  print \"empty is true\"\nend\n", "empty is true\n");
    assert_output("if null then\n  print 1\nelse\n  print 2\nend\n", "2\n");
}

#[test]
fn logic_short_circuits() {
    assert_output("print false and 1 / 0\n", "false\n");
    assert_output("print true or missing\n", "true\n");
}

#[test]
fn if_elseif_else() {
    let src = r#"
let x = 1
if x > 1 then
    print 1
else
    print 2
end
"#;
    assert_output(src, "2\n");

    let src = r"
fn grade(score)
    if score >= 90 then
        return 1
    elseif score >= 70 then
        return 2
    elseif score >= 50 then
        return 3
    else
        return 4
    end
end
print grade(95)
print grade(75)
print grade(55)
print grade(10)
";
    assert_output(src, "1\n2\n3\n4\n");
}

#[test]
fn flat_and_indented_blocks_agree() {
    let indented = "let x = 3\nif x > 1 then\n    print \"big\"\nend\n";
    let flat = "let x = 3\nif x > 1 then\nprint \"big\"\nend\n";
    assert_eq!(output(indented), output(flat));
}

#[test]
fn keywords_ignore_case() {
    assert_output("LET x = 1\nPrint x\nIF x == 1 THEN\n  print \"one\"\nEND\n", "1\none\n");
}

#[test]
fn comments_are_skipped() {
    assert_output("// a comment\nprint 1 // trailing\n/* block\ncomment */\nprint 2\n", "1\n2\n");
}

#[test]
fn block_scopes_shadow_and_assign() {
    let src = r"
let x = 1
block
    let x = 2
    print x
end
print x
";
    assert_output(src, "2\n1\n");

    let src = r"
let total = 1
block
    total = total + 10
end
print total
";
    assert_output(src, "11\n");

    assert_output("let x = 1\nset x = 4\nprint x\n", "4\n");
}

#[test]
fn block_locals_do_not_leak() {
    let src = "block\n    let hidden = 1\nend\nprint hidden\n";
    assert!(matches!(runtime_error(src), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn assigning_undefined_variable_is_error() {
    assert!(matches!(runtime_error("y = 5\n"), RuntimeError::UndefinedVariable { .. }));
    assert!(matches!(runtime_error("set y = 5\n"), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn expression_statements_print_their_value() {
    assert_output("1 + 2\n", "3\n");
    assert_output("let x = 1\nx = 3\n", "");
    assert_output("fn noop()\n    let a = 1\nend\nnoop()\n", "nil\n");
}

#[test]
fn log_does_not_print() {
    assert_output("log \"audit trail\"\n", "");
}

#[test]
fn while_loop() {
    let src = r"
let i = 0
while i < 3
    print i
    i = i + 1
end
";
    assert_output(src, "0\n1\n2\n");
}

#[test]
fn for_loops() {
    assert_output("for i from 1 to 3\n    print i\nend\n", "1\n2\n3\n");
    assert_output("for i from 10 to 0 step -5\n    print i\nend\n", "10\n5\n0\n");
    assert_output("for i from 0 to 1 step 0.5\n    print i\nend\n", "0\n0.5\n1\n");
    assert_output("for i from 3 to 1\n    print i\nend\n", "");
    assert!(matches!(runtime_error("for i from 1 to 3 step 0\n    print i\nend\n"),
                     RuntimeError::InvalidLoopStep { .. }));
}

#[test]
fn loop_variable_is_scoped_to_the_loop() {
    let src = "for i from 1 to 2\n    let doubled = i * 2\nend\nprint i\n";
    assert!(matches!(runtime_error(src), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn foreach_loops() {
    assert_output("foreach x in [1, \"a\", null]\n    print x\nend\n", "1\na\nnil\n");
    assert_output("foreach c in \"ab\"\n    print c\nend\n", "a\nb\n");
    assert_output("foreach f in cashflow(-100, 60, 60)\n    print f\nend\n", "-100\n60\n60\n");
    assert!(matches!(runtime_error("foreach x in 5\n    print x\nend\n"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn user_defined_function_and_calls() {
    let src = r"
fn add(a, b)
    return a + b
end
print add(2, 3)
";
    assert_output(src, "5\n");
}

#[test]
fn return_leaves_loops_inside_functions() {
    let src = r"
fn first_over(values, limit)
    foreach v in values
        if v > limit then
            return v
        end
    end
    return null
end
print first_over([1, 5, 9], 4)
print first_over([1, 2], 4)
";
    assert_output(src, "5\nnil\n");
}

#[test]
fn recursion() {
    let src = r"
fn fib(n)
    if n < 2 then
        return n
    end
    return fib(n - 1) + fib(n - 2)
end
print fib(15)
";
    assert_output(src, "610\n");
}

#[test]
fn closures_capture_their_scope() {
    let src = r"
fn make_counter()
    let count = 0
    fn next()
        count = count + 1
        return count
    end
    return next
end
let a = make_counter()
let b = make_counter()
print a()
print a()
print b()
";
    assert_output(src, "1\n2\n1\n");
}

#[test]
fn functions_are_values() {
    assert_output("fn twice(x)\n    return x * 2\nend\nlet f = twice\nprint f(4)\nprint f\n", "8\n<fn twice>\n");
    assert_output("print len\n", "<builtin len>\n");
}

#[test]
fn wrong_function_arity_is_error() {
    let err = runtime_error("fn f(x, y)\n    return x + y\nend\nf(3)\n");
    assert!(matches!(err,
                     RuntimeError::ArgumentCountMismatch { expected: 2,
                                                           found: 1,
                                                           .. }));
    assert_failure("print sqrt(1, 2)\n");
}

#[test]
fn calling_a_non_function_is_error() {
    assert!(matches!(runtime_error("let x = 1\nx()\n"), RuntimeError::NotCallable { .. }));
}

#[test]
fn unbounded_recursion_overflows() {
    let err = runtime_error("fn down(n)\n    return down(n + 1)\nend\ndown(0)\n");
    assert!(matches!(err, RuntimeError::StackOverflow { limit: 256, .. }));
}

#[test]
fn recursion_inside_nested_bodies_reports_overflow_on_a_small_stack() {
    let src = r"
fn down(n)
    while true
        for i from 1 to 2
            if n >= 0 then
                block
                    return 1 + (2 * (down(n + 1)))
                end
            end
        end
    end
end
down(0)
";
    let handle = std::thread::Builder::new().stack_size(8 * 1024 * 1024)
                                            .spawn(move || runtime_error(src))
                                            .unwrap();
    let err = handle.join().unwrap();
    assert!(matches!(err, RuntimeError::StackOverflow { .. }));
    assert!(err.to_string().contains("Stack overflow"));
}

#[test]
fn builtins_can_be_shadowed() {
    assert_output("let len = 5\nprint len\n", "5\n");
    assert_output("fn max(a, b)\n    return a\nend\nprint max(1, 9)\n", "1\n");
}

#[test]
fn lists_and_indexing() {
    assert_output("print [1, \"a\", null]\n", "[1, \"a\", nil]\n");
    assert_output("let a = [10, 20, 30]\nprint a[0]\nprint a[2]\n", "10\n30\n");
    assert_output("print [1, 2, 3, 4][1:3]\n", "[2, 3]\n");
    assert_output("print \"finance\"[0:3]\n", "fin\n");
    assert_output("print \"abc\"[1]\n", "b\n");
    assert!(matches!(runtime_error("print [1, 2][2]\n"), RuntimeError::IndexOutOfBounds { .. }));
    assert!(matches!(runtime_error("print 5[0]\n"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn strings() {
    assert_output("print \"tab\\there\"\n", "tab\there\n");
    assert_output("print \"say \\\"hi\\\"\"\n", "say \"hi\"\n");
    assert_output("print \"\"\"raw \\n\nlines\"\"\"\n", "raw \\n\nlines\n");
}

#[test]
fn dates_are_strings() {
    assert_output("print 2024-01-15\n", "2024-01-15\n");
    assert_output("print type_of(2024-01-15)\n", "string\n");
}

#[test]
fn scenarios_run_in_their_own_scope() {
    let src = r"
let base = 100
scenario doubled
    let base = base * 2
    print base
end
run doubled
print base
print doubled
";
    assert_output(src, "200\n100\n<block doubled>\n");
}

#[test]
fn simulate_runs_a_scenario_repeatedly() {
    let src = r"
scenario show
    print trial
end
simulate show times 3
";
    assert_output(src, "1\n2\n3\n");

    let src = r"
let total = 0
scenario add_one
    total = total + 1
end
simulate add_one times 4
print total
";
    assert_output(src, "4\n");
}

#[test]
fn return_ends_a_scenario() {
    let src = r"
scenario early
    print 1
    return
    print 2
end
run early
print 3
";
    assert_output(src, "1\n3\n");
}

#[test]
fn running_something_else_is_error() {
    assert!(matches!(runtime_error("let x = 1\nrun x\n"), RuntimeError::TypeMismatch { .. }));
    assert!(matches!(runtime_error("run missing\n"), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn ledger_entries_accumulate() {
    let src = r#"
entry books(date: 2024-01-01, debit: 500, description: "Deposit")
entry books(date: 2024-01-02, credit: 120, description: "Rent")
print books
print books.balance
print books[1].description
print books[1].credit
print books[0].credit
print len(books)
"#;
    assert_output(src, "LEDGER(2 entries)\n380\nRent\n120\nnil\n2\n");
}

#[test]
fn ledger_entries_take_positional_arguments() {
    let src = "entry cash(2024-03-01, money(50, \"EUR\"), null, \"Refund\")\nprint cash[0]\nprint cash.balance\n";
    assert_output(src, "LedgerEntry(2024-03-01: Refund)\n50\n");
}

#[test]
fn invalid_ledger_entries() {
    assert!(matches!(runtime_error("entry books(date: 2024-01-01, debit: -5, description: \"Bad\")\n"),
                     RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("let books = 1\nentry books(date: 2024-01-01, debit: 5, description: \"x\")\n"),
                     RuntimeError::TypeMismatch { .. }));
    match error("entry books(date: 2024-01-01, description: \"Nothing\")\n") {
        ScriptError::Syntax { parse, .. } => assert!(matches!(parse[0], ParseError::Arity { .. })),
        other => panic!("expected a syntax error, got {other}"),
    }
}

#[test]
fn portfolios() {
    let src = r#"
portfolio growth(assets: ["AAPL", "BND"], weights: [0.6, 0.4])
print growth
print growth.assets
print len(growth)
"#;
    assert_output(src, "PORTFOLIO(assets=2, weights=2)\n[\"AAPL\", \"BND\"]\n2\n");

    assert!(matches!(runtime_error("portfolio p(assets: [\"A\", \"B\"], weights: [0.6, 0.6])\n"),
                     RuntimeError::InvalidValue { .. }));
    assert!(matches!(runtime_error("portfolio p(assets: [\"A\"], weights: [0.5, 0.5])\n"),
                     RuntimeError::InvalidValue { .. }));
}

#[test]
fn portfolio_weights_accept_percentages() {
    assert_output("let p = portfolio(assets: [\"A\", \"B\"], weights: [percent(25), percent(75)])\nprint p.weights\n",
                  "[0.25, 0.75]\n");
}

#[test]
fn tables() {
    let src = r#"
let t = table(name: ["a", "b"], amount: [1, 2])
print t
print t.amount
print t["name"]
print len(t)
"#;
    assert_output(src, "TABLE(name, amount)\n  [\"a\", 1]\n  [\"b\", 2]\n[1, 2]\n[\"a\", \"b\"]\n2\n");
    assert!(matches!(runtime_error("let t = table(a: [1], b: [1, 2])\n"), RuntimeError::InvalidValue { .. }));
}

#[test]
fn runtime_errors_carry_their_line() {
    let err = runtime_error("let a = 1\n\nprint a / 0\n");
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.to_string(), "Error on line 3: Division by zero.");

    let err = runtime_error("fn f()\n    return missing\nend\nprint f()\n");
    assert_eq!(err.line(), Some(2));
}

#[test]
fn syntax_errors_stop_execution() {
    let (mut context, capture) = capturing_context();
    let err = run_source("print 1\nlet = 2\nprint )\n", &mut context).unwrap_err();

    match err {
        ScriptError::Syntax { lexical, parse } => {
            assert!(lexical.is_empty());
            assert_eq!(parse.len(), 2);
            assert_eq!(parse[0].line(), 2);
            assert_eq!(parse[1].line(), 3);
        },
        other => panic!("expected a syntax error, got {other}"),
    }
    assert_eq!(capture.text(), "");
}

#[test]
fn return_outside_function_is_syntax_error() {
    match error("return 1\n") {
        ScriptError::Syntax { parse, .. } => {
            assert!(matches!(parse[0], ParseError::ReturnOutsideFunction { line: 1 }));
        },
        other => panic!("expected a syntax error, got {other}"),
    }
}

#[test]
fn definitions_persist_across_runs() {
    let (mut context, capture) = capturing_context();
    run_source("let rate = 0.05\nfn grow(x)\n    return x * (1 + rate)\nend\n", &mut context).unwrap();
    run_source("print grow(100)\n", &mut context).unwrap();
    assert_eq!(capture.text(), "105\n");
}

#[test]
fn statements_before_a_runtime_error_keep_their_effects() {
    let (mut context, capture) = capturing_context();
    assert!(run_source("let kept = 1\nprint kept\nprint kept / 0\nprint 2\n", &mut context).is_err());
    assert_eq!(capture.text(), "1\n");
    assert!(context.globals().is_defined("kept"));
}

#[test]
fn scripts_with_every_statement_run() {
    assert_success(r#"
let principal = money(250000, "USD")
let r = rate(0.045)
let schedule = amortize(principal: principal, rate: r, periods: 12)
let flows = cashflow(-1000, 300, 400, 500)
print npv(0.1, flows)
foreach row in schedule
    log row
end
"#);
}

#[test]
fn native_functions_can_be_registered() {
    let (mut context, capture) = capturing_context();
    context.define_native(Rc::new(NativeFunction::new("spread", Arity::Exact(2), |args| match (&args[0], &args[1]) {
        (Some(Value::Number(bid)), Some(Value::Number(ask))) => Ok(Some(Value::Number(ask - bid))),
        _ => Err(RuntimeError::TypeMismatch { details: "spread takes two numbers".to_string(),
                                              line:    None, }),
    })));

    run_source("print spread(99, 101)\nprint spread\n", &mut context).unwrap();
    assert_eq!(capture.text(), "2\n<builtin spread>\n");
    assert!(matches!(runtime_error("print spread(1, 2)\n"), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn missing_script_files_are_reported() {
    let err = run_file("demos/no_such_script.fin").unwrap_err();
    assert!(matches!(err, ScriptError::Io(_)));
    assert!(err.to_string().starts_with("Could not read script:"));
}

#[test]
fn exponents_and_unicode_names() {
    assert_output("print 1e3 + 2.5e-1\n", "1000.25\n");
    assert_output("let größe = 2\nprint größe * 21\n", "42\n");
}
