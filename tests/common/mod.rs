#![allow(dead_code)]

use std::{cell::RefCell, io::Write, rc::Rc};

use finlite::{Context, ScriptError, error::RuntimeError, run_source};

/// Output sink that stays readable after the context takes ownership of it.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A context that prints into a fresh capture.
pub fn capturing_context() -> (Context, Capture) {
    let capture = Capture::default();
    (Context::with_output(Box::new(capture.clone())), capture)
}

/// Runs `src` and returns what it printed, panicking on any error.
pub fn output(src: &str) -> String {
    let (mut context, capture) = capturing_context();
    if let Err(e) = run_source(src, &mut context) {
        panic!("Script failed: {e}\n{src}");
    }
    capture.text()
}

pub fn assert_output(src: &str, expected: &str) {
    pretty_assertions::assert_eq!(output(src), expected, "script:\n{}", src);
}

pub fn assert_success(src: &str) {
    let (mut context, _) = capturing_context();
    if let Err(e) = run_source(src, &mut context) {
        panic!("Script failed: {e}\n{src}");
    }
}

pub fn assert_failure(src: &str) {
    let (mut context, _) = capturing_context();
    if run_source(src, &mut context).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

/// Runs `src` and returns its error.
pub fn error(src: &str) -> ScriptError {
    let (mut context, _) = capturing_context();
    match run_source(src, &mut context) {
        Ok(()) => panic!("Script succeeded but was expected to fail:\n{src}"),
        Err(e) => e,
    }
}

/// Runs `src` and returns the runtime error it stops with.
pub fn runtime_error(src: &str) -> RuntimeError {
    match error(src) {
        ScriptError::Runtime(e) => e,
        other => panic!("Expected a runtime error, got: {other}"),
    }
}
