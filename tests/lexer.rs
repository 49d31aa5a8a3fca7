use finlite::{
    error::LexErrorKind,
    interpreter::lexer::{TokenKind, TokenLiteral, scan, scan_with_diagnostics},
};
use pretty_assertions::assert_eq;

fn kinds(src: &str) -> Vec<TokenKind> {
    scan(src).iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_fold_case_and_finance_words_stay_identifiers() {
    use TokenKind::*;

    assert_eq!(kinds("LET Print ElseIf npv times\n"),
               [Let, Print, Elseif, Identifier, Identifier, Newline, Eof]);
}

#[test]
fn operators_prefer_the_longest_match() {
    use TokenKind::*;

    assert_eq!(kinds("a <= b == c != d && e || !f >= g\n"),
               [Identifier,
                LessEqual,
                Identifier,
                EqualEqual,
                Identifier,
                BangEqual,
                Identifier,
                AndAnd,
                Identifier,
                OrOr,
                Bang,
                Identifier,
                GreaterEqual,
                Identifier,
                Newline,
                Eof]);
}

#[test]
fn numbers_drop_grouping_separators() {
    let tokens = scan("1,250,000.50 2_000 [1,2] 3.5\n");
    let numbers: Vec<f64> = tokens.iter()
                                  .filter_map(|t| match t.literal {
                                      Some(TokenLiteral::Number(n)) => Some(n),
                                      _ => None,
                                  })
                                  .collect();
    assert_eq!(numbers, [1_250_000.5, 2000.0, 1.0, 2.0, 3.5]);
}

#[test]
fn dates_are_their_own_token() {
    let tokens = scan("2024-03-31 2024 - 03\n");
    assert_eq!(tokens[0].kind, TokenKind::Date);
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Date("2024-03-31".to_string())));
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[2].kind, TokenKind::Minus);
}

#[test]
fn strings_decode_escapes() {
    let tokens = scan("\"a\\tb \\\"q\\\" \\\\\"\n");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Text("a\tb \"q\" \\".to_string())));
}

#[test]
fn triple_quoted_strings_span_lines() {
    let tokens = scan("\"\"\"one\ntwo\"\"\"\nprint\n");
    assert_eq!(tokens[0].literal, Some(TokenLiteral::Text("one\ntwo".to_string())));
    assert_eq!(tokens[2].kind, TokenKind::Print);
    assert_eq!(tokens[2].line, 3);
}

#[test]
fn comments_are_skipped() {
    use TokenKind::*;

    assert_eq!(kinds("// all comment\nx /* inline */ y\n"),
               [Newline, Identifier, Identifier, Newline, Eof]);
}

#[test]
fn indentation_becomes_layout_tokens() {
    use TokenKind::*;

    assert_eq!(kinds("if x then\n    print 1\n\n    print 2\nend\n"),
               [If, Identifier, Then, Newline, Indent, Print, Number, Newline, Newline, Print, Number, Newline,
                Dedent, End, Newline, Eof]);
}

#[test]
fn open_indentation_is_closed_at_end_of_input() {
    use TokenKind::*;

    assert_eq!(kinds("block\n  print 1"), [Block, Newline, Indent, Print, Number, Newline, Dedent, Eof]);
}

#[test]
fn tabs_count_as_four_spaces() {
    let (_, errors) = scan_with_diagnostics("block\n\tprint 1\n    print 2\nend\n");
    assert!(errors.is_empty());
}

#[test]
fn lines_are_counted() {
    let tokens = scan("let a = 1\n\n/* two\nlines */\nprint a\n");
    let print = tokens.iter().find(|t| t.kind == TokenKind::Print).unwrap();
    assert_eq!(print.line, 5);
}

#[test]
fn diagnostics_do_not_stop_scanning() {
    let (tokens, errors) = scan_with_diagnostics("let a = 1 @ 2\nprint \"open\n");

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter);
    assert_eq!(errors[0].lexeme, "@");
    assert_eq!(errors[0].to_string(), "Error on line 1: Unexpected character '@'.");
    assert_eq!(errors[1].kind, LexErrorKind::UnterminatedString);
    assert_eq!(errors[1].line, 2);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn unterminated_comment_is_reported() {
    let (_, errors) = scan_with_diagnostics("print 1 /* never closed\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::UnterminatedComment);
}

#[test]
fn inconsistent_indentation_is_reported() {
    let (_, errors) = scan_with_diagnostics("if x then\n    print 1\n  print 2\nend\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::InconsistentIndentation);
    assert_eq!(errors[0].line, 3);
}

#[test]
fn tokens_print_one_per_line() {
    let tokens = scan("let total = 1_000\n");
    assert_eq!(tokens[0].to_string(), "   1 Let \"let\"");
    assert_eq!(tokens[3].to_string(), "   1 Number \"1_000\" 1000");
}

#[test]
fn numbers_take_an_exponent() {
    let numbers: Vec<f64> = scan("1e3 2.5E-2 1_000e+1 4e\n").iter()
                                                         .filter_map(|t| match t.literal {
                                                             Some(TokenLiteral::Number(n)) => Some(n),
                                                             _ => None,
                                                         })
                                                         .collect();
    assert_eq!(numbers, [1000.0, 0.025, 10_000.0, 4.0]);
    assert_eq!(scan("4e\n")[1].kind, TokenKind::Identifier);
}

#[test]
fn identifiers_may_use_any_letter() {
    use TokenKind::*;

    assert_eq!(kinds("let größe = 利率\n"), [Let, Identifier, Equal, Identifier, Newline, Eof]);
    assert_eq!(scan("größe\n")[0].lexeme, "größe");
}

#[test]
fn indentation_ignores_lines_inside_block_comments() {
    let (tokens, errors) = scan_with_diagnostics("block\n    /* note\nspanning */ print 1\nend\n");
    assert!(errors.is_empty());
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Indent).count(), 1);
}

#[test]
fn carriage_returns_and_form_feeds_do_not_count_as_indentation() {
    let (tokens, errors) = scan_with_diagnostics("block\r\n    print 1\r\n\x0c    print 2\r\nend\r\n");
    assert!(errors.is_empty());
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Indent).count(), 1);
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count(), 1);
}
