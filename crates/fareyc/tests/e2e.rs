//! End-to-end integration tests for the Farey CLI.
//!
//! Each test writes a source file to a temp dir, invokes the `fareyc`
//! binary against it, and asserts on stdout/stderr and exit status.

use std::path::PathBuf;
use std::process::Command;

fn find_fareyc() -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("cannot find current exe")
        .parent()
        .expect("cannot find parent dir")
        .to_path_buf();

    if path.file_name().map_or(false, |n| n == "deps") {
        path = path.parent().unwrap().to_path_buf();
    }

    let fareyc = path.join("fareyc");
    assert!(
        fareyc.exists(),
        "fareyc binary not found at {}. Run `cargo build -p fareyc` first.",
        fareyc.display()
    );
    fareyc
}

fn write_source(dir: &tempfile::TempDir, text: &str) -> PathBuf {
    let file = dir.path().join("main.farey");
    std::fs::write(&file, text).expect("failed to write source file");
    file
}

fn run(subcommand: &str, file: &PathBuf) -> std::process::Output {
    Command::new(find_fareyc())
        .args([subcommand, file.to_str().unwrap()])
        .output()
        .expect("failed to invoke fareyc")
}

#[test]
fn run_prints_final_value_and_scope() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "x := 2 + 3\nx");
    let output = run("run", &file);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("5\n"), "got: {stdout}");
}

#[test]
fn check_prints_ir_and_scope_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "2 + 3");
    let output = run("check", &file);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("+: Int"), "got: {stdout}");
}

#[test]
fn tokens_prints_one_line_per_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "1 + 2");
    let output = run("tokens", &file);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn tokens_json_emits_a_valid_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "1 + 2");
    let output = Command::new(find_fareyc())
        .args(["tokens", file.to_str().unwrap(), "--json"])
        .output()
        .expect("failed to invoke fareyc");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("tokens --json must emit valid JSON");
    assert_eq!(parsed.as_array().expect("expected a JSON array").len(), 3);
}

#[test]
fn parse_prints_canonical_ast_string() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "1 + 2");
    let output = run("parse", &file);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "1 + 2");
}

#[test]
fn run_on_unmatched_overload_reports_a_substitution_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "2 + '3'");
    let output = run("run", &file);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("consider:"), "got: {stderr}");
    assert!(stderr.contains('3'), "got: {stderr}");
}

#[test]
fn check_on_unknown_variable_fails_with_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "missing");
    let output = run("check", &file);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing"), "got: {stderr}");
}

#[test]
fn parse_on_unmatched_brace_reports_a_related_span() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "(1 + 2");
    let output = run("parse", &file);
    assert!(!output.status.success());
}
