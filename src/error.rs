use crate::token::{Token, TokenType};
use crate::value::object::Object;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// The one error type threaded through the parser and the interpreter.
///
/// `Return` is not an error at the language level. It rides the same `?`
/// channel so that a `return` statement can unwind out of deeply nested
/// statements, but it is always caught at the enclosing function call
/// site and converted back into the call's result value.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error")]
    Parse,

    #[error("{message}")]
    Runtime { token: Token, message: String },

    #[error("return")]
    Return(Object),
}

impl Error {
    pub fn runtime(token: &Token, message: impl Into<String>) -> Error {
        Error::Runtime {
            token: token.clone(),
            message: message.into(),
        }
    }
}

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Report a scan error, where all we know is the offending line.
pub fn error(line: usize, message: &str) {
    report(line, "", message);
}

/// Report a parse or resolve error at a specific token, so the user sees
/// the lexeme the phase was looking at when it gave up.
pub fn token_error(token: &Token, message: &str) {
    if token.token_type == TokenType::EOF {
        report(token.line, " at end", message);
    } else {
        report(token.line, &format!(" at '{}'", token.lexeme), message);
    }
}

/// Report a runtime error raised by the evaluator. Unlike static errors,
/// these print the message first and the line after.
pub fn runtime_error(error: &Error) {
    if let Error::Runtime { token, message } = error {
        eprintln!("{message}\n[line {}]", token.line);
    }
    HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
}

fn report(line: usize, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
    HAD_ERROR.store(true, Ordering::Relaxed);
}

pub fn had_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

pub fn had_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Clear both flags so a REPL session can keep accepting lines after a
/// mistake.
pub fn reset() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}
