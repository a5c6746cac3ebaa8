#![allow(dead_code)]
use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

pub const NO_OUTPUT: &str = "";
pub const SUCCESS: i32 = 0;
pub const STATIC_ERROR: i32 = 65;
pub const RUNTIME_ERROR: i32 = 70;

/// Writes the script to a temp file, runs the interpreter on it, and
/// asserts stdout, stderr, and the exit code all at once.
pub fn run_program(
    input: &str,
    expected_stdout: &str,
    expected_stderr: &str,
    expected_code: i32,
) {
    let mut script = NamedTempFile::new().expect("Failed to create temp file");
    write!(script, "{input}").expect("Failed to write to temp file");

    let mut cmd = Command::cargo_bin("rlox").expect("Binary not found");
    cmd.arg(script.path());

    let output = cmd.output().expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected_stdout);
    assert_eq!(stderr, expected_stderr);
    assert_eq!(exit_code, expected_code);
}

/// The happy path: expected output on stdout, nothing on stderr, exit 0.
pub fn run_ok(input: &str, expected_stdout: &str) {
    run_program(input, expected_stdout, NO_OUTPUT, SUCCESS);
}
