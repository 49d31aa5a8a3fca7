use finlite::{
    ast::printer::print_program,
    error::ParseError,
    interpreter::{lexer::scan, parser::parse},
};
use pretty_assertions::assert_eq;

fn dump(src: &str) -> String {
    let (program, errors) = parse(&scan(src));
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    print_program(&program)
}

fn errors(src: &str) -> Vec<ParseError> {
    parse(&scan(src)).1
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(dump("print 1 + 2 * 3 - 4\n"), "(print (- (+ 1 (* 2 3)) 4))\n");
    assert_eq!(dump("print 2 ^ 3 ^ 2\n"), "(print (^ 2 (^ 3 2)))\n");
    assert_eq!(dump("print -2 ^ 2\n"), "(print (- (^ 2 2)))\n");
    assert_eq!(dump("print a or b and not c\n"), "(print (or a (and b (! c))))\n");
    assert_eq!(dump("print a < b == c >= d\n"), "(print (== (< a b) (>= c d)))\n");
    assert_eq!(dump("print (1 + 2) * 3\n"), "(print (* (group (+ 1 2)) 3))\n");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(dump("a = b = 3\n"), "(; (= a (= b 3)))\n");
}

#[test]
fn postfix_chains() {
    assert_eq!(dump("print books[0].description\n"), "(print (. (index books 0) description))\n");
    assert_eq!(dump("print f(1, 2)(3)\n"), "(print (call (call f (1 2)) (3)))\n");
    assert_eq!(dump("print xs[1:3]\n"), "(print (slice xs 1 3))\n");
}

#[test]
fn statements() {
    let src = r#"
let x
set x = 1
log x
block
    print x
end
while x < 3
    x = x + 1
end
for i from 1 to 10 step 2
    print i
end
foreach item in [1, "a"]
    print item
end
fn add(a, b)
    return a + b
end
"#;
    let expected = "(let x)\n(set x 1)\n(log x)\n(block (print x))\n(while (< x 3) (; (= x (+ x 1))))\n(for i 1 10 \
                    (step 2) (print i))\n(foreach item [1, \"a\"] (print item))\n(fn add (a b) (return (+ a b)))\n";
    assert_eq!(dump(src), expected);
}

#[test]
fn if_chains() {
    let src = "if a then\n    print 1\nelseif b then\n    print 2\nelse\n    print 3\nend\n";
    assert_eq!(dump(src), "(if a (then (print 1)) (elseif b (print 2)) (else (print 3)))\n");
}

#[test]
fn dumps_repeat_elseif_branches_and_skip_omitted_arguments() {
    let src = "if a then\n    print 1\nelseif b then\n    print 2\nelseif c then\n    print 3\nend\n";
    assert_eq!(dump(src), "(if a (then (print 1)) (elseif b (print 2)) (elseif c (print 3)))\n");
    assert_eq!(dump("print pv(0.05, 10, 100)\n"), "(print (pv (rate 0.05) (nper 10) (pmt 100)))\n");
}

#[test]
fn finance_statements() {
    let src = r#"
scenario stress
    print 1
end
run stress
simulate stress times 10
portfolio mix(assets: ["A", "B"], weights: [0.5, 0.5])
entry books(date: 2024-01-01, credit: 10, description: "Fee")
"#;
    let expected = "(scenario stress (print 1))\n(run stress)\n(simulate stress 10)\n(portfolio mix [\"A\", \"B\"] \
                    [0.5, 0.5])\n(entry books \"2024-01-01\" nil 10 \"Fee\")\n";
    assert_eq!(dump(src), expected);
}

#[test]
fn finance_forms_accept_named_and_positional_arguments() {
    let named = dump("print npv(rate: 0.1, cashflows: [1, 2])\n");
    let positional = dump("print npv(0.1, [1, 2])\n");
    let reordered = dump("print NPV(cashflows: [1, 2], rate: 0.1)\n");

    assert_eq!(named, "(print (npv (rate 0.1) (cashflows [1, 2])))\n");
    assert_eq!(positional, named);
    assert_eq!(reordered, named);
}

#[test]
fn optional_finance_arguments_are_omitted() {
    assert_eq!(dump("print pv(0.05, 10, pmt: -100)\n"), "(print (pv (rate 0.05) (nper 10) (pmt (- 100))))\n");
    assert_eq!(dump("print irr([-100, 110])\n"), "(print (irr (cashflows [(- 100), 110])))\n");
}

#[test]
fn cashflow_and_table_forms() {
    assert_eq!(dump("let c = cashflow(-100, 50, 60)\n"), "(let c (cashflow (- 100) 50 60))\n");
    assert_eq!(dump("let t = table(a: [1], b: [2])\n"), "(let t (table (a [1]) (b [2])))\n");
}

#[test]
fn finance_arity_is_checked_while_parsing() {
    assert!(matches!(&errors("print npv(0.1)\n")[..], [ParseError::Arity { .. }]));
    assert!(matches!(&errors("print capm(0.1, 1.2, 0.08, 9)\n")[..], [ParseError::Arity { .. }]));
    assert!(matches!(&errors("print sma(values: [1], span: 2)\n")[..], [ParseError::UnknownArgument { .. }]));
    assert!(matches!(&errors("print sma([1], values: [2], period: 1)\n")[..],
                     [ParseError::DuplicateArgument { .. }]));
    assert!(matches!(&errors("print cashflow()\n")[..], [ParseError::Arity { .. }]));
    assert!(matches!(&errors("print table([1])\n")[..], [ParseError::Arity { .. }]));
    assert!(matches!(&errors("print table(a: [1], a: [2])\n")[..], [ParseError::DuplicateArgument { .. }]));
}

#[test]
fn invalid_assignment_target() {
    let errors = errors("1 = 2\n");
    assert!(matches!(&errors[..], [ParseError::InvalidAssignmentTarget { line: 1, .. }]));
    assert_eq!(errors[0].to_string(), "Error on line 1 at '=': Invalid assignment target.");
}

#[test]
fn every_error_is_reported_in_line_order() {
    let (program, errors) = parse(&scan("let = 1\nprint 2\nprint )\nfn (x)\nend\nprint 3\n"));

    let lines: Vec<usize> = errors.iter().map(ParseError::line).collect();
    assert_eq!(lines, [1, 3, 4, 5]);
    assert!(program.len() >= 4);
}

#[test]
fn errors_inside_blocks_do_not_swallow_the_block() {
    let (program, errors) = parse(&scan("block\n    print )\n    print 1\nend\nprint 2\n"));
    assert_eq!(errors.len(), 1);
    assert_eq!(print_program(&program), "(block (error) (print 1))\n(print 2)\n");
}

#[test]
fn missing_end_is_reported() {
    let errors = errors("if x then\n    print 1\n");
    assert!(matches!(&errors[..], [ParseError::UnexpectedEndOfInput { .. }]));
}

#[test]
fn return_placement_is_checked() {
    assert!(matches!(&errors("return 1\n")[..], [ParseError::ReturnOutsideFunction { line: 1 }]));
    assert!(matches!(&errors("while true\n    return\nend\n")[..], [ParseError::ReturnOutsideFunction { line: 2 }]));
    assert!(errors("fn f()\n    while true\n        return 1\n    end\nend\n").is_empty());
    assert!(errors("scenario s\n    return\nend\n").is_empty());
}

#[test]
fn lexical_errors_surface_as_parse_errors() {
    assert!(matches!(&errors("print 1 @ 2\n")[..], [ParseError::ExpectedToken { .. } | ParseError::LexicalError { .. }]));
}

#[test]
fn dump_is_deterministic() {
    let src = "let r = rate(0.05)\nprint fv(r, 10, -100)\nentry l(2024-01-01, 5, null, \"x\")\n";
    assert_eq!(dump(src), dump(src));
}

#[test]
fn blank_lines_and_comments_are_ignored() {
    assert_eq!(dump("\n\n// nothing\nprint 1\n\n/* also nothing */\n"), "(print 1)\n");
}

#[test]
fn deep_nesting_is_a_parse_error() {
    let nested = |depth: usize| format!("print {}1{}\nprint 2\n", "(".repeat(depth), ")".repeat(depth));

    assert!(errors(&nested(200)).is_empty());

    let errors = errors(&nested(1000));
    assert!(matches!(&errors[..], [ParseError::NestingTooDeep { line: 1 }]));
    assert_eq!(errors[0].to_string(), "Error on line 1: Expression nested too deeply.");
}

#[test]
fn long_prefix_and_power_chains_are_limited() {
    assert!(errors(&format!("print {}1\n", "-".repeat(100))).is_empty());
    assert!(matches!(&errors(&format!("print {}1\n", "not ".repeat(1000)))[..],
                     [ParseError::NestingTooDeep { .. }]));
    assert!(matches!(&errors(&format!("print 2{}\n", " ^ 2".repeat(1000)))[..],
                     [ParseError::NestingTooDeep { .. }]));
}
