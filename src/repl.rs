use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::{
    interpreter::{evaluator::core::Context, lexer::TokenKind},
    run_source,
};

/// Decides whether `input` is a complete source unit.
///
/// Input is complete when every `(`, `[` and `{` is closed, no string is
/// open and every block-opening keyword has its `end`. Text inside strings
/// and `//` comments is ignored.
///
/// This is a line-buffering heuristic, not a parse: complete input may still
/// fail to parse.
///
/// # Example
/// ```
/// use finlite::repl::is_input_complete;
///
/// assert!(is_input_complete("print 1 + 2\n"));
/// assert!(!is_input_complete("if x > 1 then\n  print x\n"));
/// assert!(is_input_complete("if x > 1 then\n  print x\nend\n"));
/// assert!(!is_input_complete("print sum([1, 2,\n"));
/// assert!(is_input_complete("print \"(\" // if\n"));
/// ```
#[must_use]
pub fn is_input_complete(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    let mut parens = 0i64;
    let mut brackets = 0i64;
    let mut braces = 0i64;
    let mut blocks = 0i64;
    let mut in_string = false;
    let mut in_raw_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if !in_string && chars[i..].starts_with(&['"', '"', '"']) {
            in_raw_string = !in_raw_string;
            i += 3;
            continue;
        }
        if in_raw_string {
            i += 1;
            continue;
        }

        if c == '"' {
            let backslashes = chars[..i].iter().rev().take_while(|&&p| p == '\\').count();
            if backslashes % 2 == 0 {
                in_string = !in_string;
            }
            i += 1;
            continue;
        }
        if in_string {
            i += 1;
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            match TokenKind::keyword(&word) {
                Some(TokenKind::End) => blocks -= 1,
                Some(kind) if kind.opens_block() => blocks += 1,
                _ => {},
            }
            continue;
        }

        match c {
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            _ => {},
        }
        i += 1;
    }

    parens == 0 && brackets == 0 && braces == 0 && blocks == 0 && !in_string && !in_raw_string
}

/// Reads one source unit from `lines`, writing prompts to `console`.
///
/// A single complete line is returned at once. Otherwise lines are
/// collected until the input is complete and an empty line is entered.
/// Returns `None` at the end of input with nothing buffered.
fn read_unit(lines: &mut impl Iterator<Item = io::Result<String>>,
             console: &mut impl Write)
             -> io::Result<Option<String>> {
    let first = loop {
        write!(console, "> ")?;
        console.flush()?;
        match lines.next().transpose()? {
            Some(line) if line.trim().is_empty() => {},
            Some(line) => break line,
            None => return Ok(None),
        }
    };

    let mut buffer = first + "\n";
    if is_input_complete(&buffer) {
        return Ok(Some(buffer));
    }

    loop {
        write!(console, "... ")?;
        console.flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(Some(buffer));
        };
        if line.trim().is_empty() && is_input_complete(&buffer) {
            return Ok(Some(buffer));
        }
        buffer.push_str(&line);
        buffer.push('\n');
    }
}

/// Runs the read-eval-print loop until `input` is exhausted.
///
/// Every unit runs in `context`, so definitions carry over. Errors are
/// written to `console` and the loop moves on to the next unit.
///
/// # Errors
/// Only I/O errors on `input` or `console` end the loop early.
///
/// # Example
/// ```
/// use finlite::{Context, repl};
///
/// let mut context = Context::with_output(Box::new(Vec::new()));
/// let mut console = Vec::new();
///
/// repl::run(&mut context, "let x = 1 / 0\nlet y = 2\n".as_bytes(), &mut console).unwrap();
///
/// let console = String::from_utf8(console).unwrap();
/// assert!(console.contains("Division by zero"));
/// assert!(context.globals().is_defined("y"));
/// ```
pub fn run(context: &mut Context, input: impl BufRead, console: &mut impl Write) -> io::Result<()> {
    let mut lines = input.lines();
    while let Some(unit) = read_unit(&mut lines, console)? {
        debug!(lines = unit.lines().count(), "submitting input");
        if let Err(err) = run_source(&unit, context) {
            writeln!(console, "{err}")?;
        }
    }
    writeln!(console)?;
    Ok(())
}
