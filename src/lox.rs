use crate::error;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use anyhow::Context;
use std::fs;
use std::io;
use std::io::Write;
use std::process::exit;

/// One interpreter session. A file run uses it once; the REPL keeps it
/// alive so globals and resolved bindings persist across lines.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// The full pipeline over one chunk of source: scan, parse, resolve,
    /// interpret, stopping at the first phase that reported an error.
    fn run(&mut self, source: &str, interactive: bool) {
        let mut scanner = Scanner::new(source.to_string());
        let tokens = scanner.scan_tokens();

        let mut parser = Parser::new(tokens);
        let (statements, had_parse_error) = parser.parse();

        // Scan and parse errors both keep the program from running.
        if had_parse_error || error::had_error() {
            return;
        }

        let locals = Resolver::new().resolve(&statements);

        // A program with a broken binding never runs either, however many
        // diagnostics the resolver managed to collect.
        if error::had_error() {
            return;
        }

        self.interpreter.add_resolutions(locals);

        // An interactive line holding a lone expression prints its value
        // instead of discarding it.
        if interactive {
            if let [Stmt::Expression { expression }] = statements.as_slice() {
                match self.interpreter.evaluate(expression) {
                    Ok(value) => println!("{value}"),
                    Err(error) => error::runtime_error(&error),
                }
                return;
            }
        }

        self.interpreter.interpret(&statements);
    }
}

impl Default for Lox {
    fn default() -> Self {
        Lox::new()
    }
}

/// Executes a script file. Static errors exit with 65, runtime errors
/// with 70.
pub fn run_file(path: &str) -> anyhow::Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;

    let mut lox = Lox::new();
    lox.run(&source, false);

    if error::had_error() {
        exit(65);
    }
    if error::had_runtime_error() {
        exit(70);
    }
    Ok(())
}

/// The interactive prompt: one statement or expression per line. Errors
/// are reported and the session keeps going.
pub fn run_prompt() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lox = Lox::new();

    loop {
        print!("> ");
        stdout.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let bytes_read = stdin
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if bytes_read == 0 {
            // End of input, Ctrl-D.
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // A line without a closing ';' or '}' is taken as a bare
        // expression; the appended ';' turns it into a statement the
        // parser accepts, and run() prints its value.
        let source = if trimmed.ends_with(';') || trimmed.ends_with('}') {
            trimmed.to_string()
        } else {
            format!("{trimmed};")
        };

        lox.run(&source, true);

        // Mistakes shouldn't end the session.
        error::reset();
    }

    Ok(())
}
