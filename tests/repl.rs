mod common;

use common::capturing_context;
use finlite::repl::{self, is_input_complete};

/// Feeds `input` to the REPL and returns what the script printed and what
/// went to the console.
fn session(input: &str) -> (String, String) {
    let (mut context, capture) = capturing_context();
    let mut console = Vec::new();
    repl::run(&mut context, input.as_bytes(), &mut console).unwrap();
    (capture.text(), String::from_utf8(console).unwrap())
}

#[test]
fn completeness_tracks_blocks() {
    assert!(is_input_complete("let x = 1\n"));
    assert!(!is_input_complete("fn f(x)\n"));
    assert!(!is_input_complete("fn f(x)\n    if x then\n        return 1\n    end\n"));
    assert!(is_input_complete("fn f(x)\n    if x then\n        return 1\n    end\nend\n"));
    assert!(!is_input_complete("IF x THEN\n"));
    assert!(is_input_complete("if a then\n    print 1\nelseif b then\n    print 2\nend\n"));
    assert!(!is_input_complete("scenario s\n"));
    assert!(!is_input_complete("foreach x in xs\n"));
}

#[test]
fn completeness_tracks_brackets() {
    assert!(!is_input_complete("let xs = [1,\n"));
    assert!(is_input_complete("let xs = [1,\n    2]\n"));
    assert!(!is_input_complete("print npv(0.1,\n"));
}

#[test]
fn completeness_ignores_strings_and_comments() {
    assert!(is_input_complete("print \"if (\"\n"));
    assert!(is_input_complete("print \"a \\\" if\"\n"));
    assert!(is_input_complete("print 1 // while (\n"));
    assert!(is_input_complete("let spend = 1\n"));
    assert!(!is_input_complete("print \"\"\"if\nstill open\n"));
    assert!(is_input_complete("print \"\"\"if\nclosed\"\"\"\n"));
    assert!(!is_input_complete("print \"open\n"));
}

#[test]
fn single_lines_run_immediately() {
    let (output, console) = session("let x = 2\nprint x * 21\n");
    assert_eq!(output, "42\n");
    assert!(console.starts_with("> "));
    assert!(!console.contains("..."));
}

#[test]
fn blocks_wait_for_an_empty_line() {
    let (output, console) = session("fn double(x)\n    return x * 2\nend\n\nprint double(4)\n");
    assert_eq!(output, "8\n");
    assert!(console.contains("... "));
}

#[test]
fn blank_lines_between_units_are_skipped() {
    let (output, _) = session("\n\nprint 1\n\n\nprint 2\n");
    assert_eq!(output, "1\n2\n");
}

#[test]
fn errors_are_reported_and_the_session_goes_on() {
    let (output, console) = session("print 1 / 0\nprint 2\nlet = 3\nprint 4\n");
    assert_eq!(output, "2\n4\n");
    assert!(console.contains("Error on line 1: Division by zero."));
    assert!(console.contains("Error on line 1 at '='"));
}

#[test]
fn definitions_carry_over_between_units() {
    let (output, _) = session("let rate = 0.1\nscenario boom\n    print rate * 2\nend\n\nrun boom\n");
    assert_eq!(output, "0.2\n");
}

#[test]
fn unfinished_input_is_run_at_end_of_input() {
    let (output, console) = session("if true then\n    print 1\n");
    assert_eq!(output, "");
    assert!(console.contains("Unexpected end of input"));
}

#[test]
fn deeply_nested_input_is_reported_and_the_session_goes_on() {
    let input = format!("print {}1{}\nprint 2\n", "[".repeat(2000), "]".repeat(2000));
    let (output, console) = session(&input);
    assert_eq!(output, "2\n");
    assert!(console.contains("Expression nested too deeply."));
}
