//! End-to-end tests of the `qasmfmt` binary.
//!
//! Each test runs the built executable in a fresh temporary directory and
//! checks its stdout, stderr, exit status and the files it leaves behind.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const MESSY: &str = "OPENQASM 3.0;include \"stdgates.inc\";qubit[2] q;h q[0];cx q[0],q[1];";
const CLEAN: &str = "OPENQASM 3.0;\ninclude \"stdgates.inc\";\n\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n";

fn qasmfmt(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qasmfmt"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .stdin(Stdio::null());
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().unwrap()
}

fn run_with_stdin(cmd: &mut Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// ============================================================================
// Output modes
// ============================================================================

#[test]
fn test_print_mode_writes_stdout_and_leaves_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bell.qasm"), MESSY).unwrap();

    let output = run(qasmfmt(dir.path()).arg("bell.qasm"));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), CLEAN);
    assert_eq!(fs::read_to_string(dir.path().join("bell.qasm")).unwrap(), MESSY);
}

#[test]
fn test_check_mode_reports_unformatted_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("messy.qasm"), MESSY).unwrap();
    fs::write(dir.path().join("clean.qasm"), CLEAN).unwrap();

    let output = run(qasmfmt(dir.path()).args(["--check", "messy.qasm", "clean.qasm"]));
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("Would reformat: messy.qasm"));
    assert!(!err.contains("clean.qasm"));

    let output = run(qasmfmt(dir.path()).args(["--check", "clean.qasm"]));
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_write_mode_rewrites_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bell.qasm");
    fs::write(&path, MESSY).unwrap();

    let output = run(qasmfmt(dir.path()).args(["--write", "bell.qasm"]));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Formatted: bell.qasm"));
    assert_eq!(fs::read_to_string(&path).unwrap(), CLEAN);

    // Second run has nothing to do
    let output = run(qasmfmt(dir.path()).args(["-w", "bell.qasm"]));
    assert!(output.status.success());
    assert!(!stderr(&output).contains("Formatted"));
}

#[test]
fn test_diff_mode_lists_changed_lines() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.qasm"), "qubit q;h q;\n").unwrap();

    let output = run(qasmfmt(dir.path()).args(["--diff", "a.qasm"]));
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "--- a.qasm\n+++ a.qasm\n-1: qubit q;h q;\n+1: qubit q;\n+2: h q;\n"
    );
}

// ============================================================================
// Standard input
// ============================================================================

#[test]
fn test_stdin_dash() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(qasmfmt(dir.path()).arg("-"), MESSY);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), CLEAN);
}

#[test]
fn test_stdin_without_paths() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(&mut qasmfmt(dir.path()), "qubit q;h q;");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "qubit q;\nh q;\n");
}

#[test]
fn test_stdin_check_uses_stdin_filename() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(
        qasmfmt(dir.path()).args(["--check", "--stdin-filename", "piped.qasm", "-"]),
        MESSY,
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Would reformat: piped.qasm"));
}

#[test]
fn test_write_with_stdin_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(qasmfmt(dir.path()).args(["--write", "-"]), MESSY);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("cannot use --write with stdin"));
}

// ============================================================================
// Argument errors
// ============================================================================

#[test]
fn test_conflicting_modes_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.qasm"), CLEAN).unwrap();

    for flags in [["--write", "--check"], ["--check", "--diff"], ["--write", "--diff"]] {
        let output = run(qasmfmt(dir.path()).args(flags).arg("a.qasm"));
        assert_eq!(output.status.code(), Some(2), "flags: {flags:?}");
    }
}

#[test]
fn test_invalid_indent_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(qasmfmt(dir.path()).args(["--indent", "wide", "a.qasm"]));
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// Configuration
// ============================================================================

const NESTED: &str = "gate g a { h a; }";

#[test]
fn test_config_file_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(dir.path().join("qasmfmt.toml"), "indent_width = 4\n").unwrap();
    fs::write(src.join("g.qasm"), NESTED).unwrap();

    let output = run(qasmfmt(dir.path()).arg("src/g.qasm"));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "gate g a {\n    h a;\n}\n");
}

#[test]
fn test_yaml_config_file_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("qasmfmt.yaml"), "indent_width: 4\n").unwrap();
    fs::write(dir.path().join("g.qasm"), NESTED).unwrap();

    let output = run(qasmfmt(dir.path()).arg("g.qasm"));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "gate g a {\n    h a;\n}\n");

    fs::write(dir.path().join("qasmfmt.toml"), "indent_width = 1\n").unwrap();
    let output = run(qasmfmt(dir.path()).arg("g.qasm"));
    assert_eq!(stdout(&output), "gate g a {\n h a;\n}\n");
}

#[test]
fn test_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("qasmfmt.toml"), "indent_width = 4\n").unwrap();
    fs::write(dir.path().join("g.qasm"), NESTED).unwrap();

    let output = run(qasmfmt(dir.path()).args(["--no-config", "g.qasm"]));
    assert_eq!(stdout(&output), "gate g a {\n  h a;\n}\n");

    let output = run(qasmfmt(dir.path()).args(["-i", "1", "--no-newline", "g.qasm"]));
    assert_eq!(stdout(&output), "gate g a {\n h a;\n}");
}

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("custom.toml"), "indent_width = 3\n").unwrap();
    fs::write(dir.path().join("custom.yaml"), "indent_width: 5\n").unwrap();
    fs::write(dir.path().join("g.qasm"), NESTED).unwrap();

    let output = run(qasmfmt(dir.path()).args(["--config", "custom.toml", "g.qasm"]));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "gate g a {\n   h a;\n}\n");

    let output = run(qasmfmt(dir.path()).args(["--config", "custom.yaml", "g.qasm"]));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "gate g a {\n     h a;\n}\n");
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("qasmfmt.toml"), "indent_width = \"wide\"\n").unwrap();
    fs::write(dir.path().join("g.qasm"), NESTED).unwrap();

    let output = run(qasmfmt(dir.path()).arg("g.qasm"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("qasmfmt.toml"));
}

// ============================================================================
// Failures and directories
// ============================================================================

#[test]
fn test_malformed_file_fails_but_others_are_processed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.qasm"), "malformed qasm").unwrap();
    fs::write(dir.path().join("good.qasm"), MESSY).unwrap();

    let output = run(qasmfmt(dir.path()).args(["-w", "bad.qasm", "good.qasm"]));
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error:"));
    assert!(err.contains("bad.qasm"));
    assert_eq!(fs::read_to_string(dir.path().join("good.qasm")).unwrap(), CLEAN);
    assert_eq!(
        fs::read_to_string(dir.path().join("bad.qasm")).unwrap(),
        "malformed qasm"
    );
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(qasmfmt(dir.path()).arg("nowhere.qasm"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nowhere.qasm"));
}

#[test]
fn test_directory_is_walked_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("circuits/deep");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("circuits/top.qasm"), MESSY).unwrap();
    fs::write(nested.join("inner.qasm"), "qubit q;h q;").unwrap();
    fs::write(nested.join("readme.txt"), "qubit q;h q;").unwrap();

    let output = run(qasmfmt(dir.path()).args(["--write", "circuits"]));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(dir.path().join("circuits/top.qasm")).unwrap(),
        CLEAN
    );
    assert_eq!(
        fs::read_to_string(nested.join("inner.qasm")).unwrap(),
        "qubit q;\nh q;\n"
    );
    assert_eq!(
        fs::read_to_string(nested.join("readme.txt")).unwrap(),
        "qubit q;h q;"
    );
}
