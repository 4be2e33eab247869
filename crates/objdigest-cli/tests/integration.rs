//! Integration tests for CLI commands.

use serde_json::json;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_objdigest"))
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn run_cli_stdin(args: &[&str], stdin: &str) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_objdigest"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[test]
fn test_digest_command() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.json", r#"{"Data": "X"}"#);

    let (success, stdout, _) = run_cli(&["digest", &input, "--alg", "md5"]);
    assert!(success);
    assert_eq!(stdout.trim(), "d6803713c121f57e6e9d82dbacaf4d04");
}

#[test]
fn test_digest_ignores_key_order() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.json", r#"{"A": 1, "B": [1, 2]}"#);
    let b = write_file(&dir, "b.json", r#"{"B": [1, 2], "A": 1}"#);

    let (_, out_a, _) = run_cli(&["digest", &a]);
    let (_, out_b, _) = run_cli(&["digest", &b]);
    assert_eq!(out_a.trim().len(), 64);
    assert_eq!(out_a, out_b);
}

#[test]
fn test_digest_with_exclusion() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.json", r#"{"Name": "John", "Age": 30}"#);
    let b = write_file(&dir, "b.json", r#"{"Name": "John", "Age": 31}"#);

    let (_, out_a, _) = run_cli(&["digest", &a, "--exclude", "Age"]);
    let (_, out_b, _) = run_cli(&["digest", &b, "-x", "Age"]);
    assert_eq!(out_a, out_b);

    let (_, plain_a, _) = run_cli(&["digest", &a]);
    assert_ne!(plain_a, out_a);
}

#[test]
fn test_digest_with_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.json", r#"{"Data": "X", "Token": "t"}"#);
    let config = write_file(
        &dir,
        "options.json",
        r#"{"algorithm": "sha-512", "exclusions": ["Token"]}"#,
    );

    let (success, stdout, _) = run_cli(&["digest", &input, "--config", &config, "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["alg"], "sha-512");
    assert_eq!(parsed["hash"].as_str().unwrap().len(), 128);
}

#[test]
fn test_digest_report_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.json", r#"{"a": [1, 2], "b": null}"#);

    let (success, stdout, _) = run_cli(&["digest", &input, "--report"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["report"]["status"], "Ok");
    assert_eq!(parsed["report"]["metrics"]["nodes"], json!(5));
}

#[test]
fn test_digest_unknown_algorithm() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.json", "{}");

    let (success, _, stderr) = run_cli(&["digest", &input, "--alg", "crc32"]);
    assert!(!success);
    assert!(stderr.contains("unsupported hash algorithm: crc32"));
}

#[test]
fn test_digest_unknown_algorithm_in_config() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "data.json", "{}");
    let config = write_file(&dir, "options.json", r#"{"algorithm": "crc32"}"#);

    let (success, _, stderr) = run_cli(&["digest", &input, "--config", &config]);
    assert!(!success);
    assert!(stderr.contains("unsupported hash algorithm: crc32"));
    assert!(!stderr.contains("invalid JSON"));
}

#[test]
fn test_digest_null_document() {
    let (success, _, stderr) = run_cli_stdin(&["digest"], "null");
    assert!(!success);
    assert!(stderr.contains("cannot digest a null value"));
}

#[test]
fn test_digest_invalid_json() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "bad.json", "{not json");

    let (success, _, stderr) = run_cli(&["digest", &input]);
    assert!(!success);
    assert!(stderr.contains("invalid JSON"));
}

#[test]
fn test_canonicalize_from_stdin() {
    let (success, stdout, _) = run_cli_stdin(&["canonicalize"], r#"{"b": 1, "a": true}"#);
    assert!(success);
    assert_eq!(
        stdout.trim(),
        r#"{"FieldMap":{"a":{"Scalar":{"Bool":true}},"b":{"Scalar":{"Int":"1"}}}}"#
    );
}

#[test]
fn test_canonicalize_with_exclusion() {
    let (success, stdout, _) = run_cli_stdin(
        &["canonicalize", "--exclude", "secret"],
        r#"{"keep": "x", "nested": {"secret": 1}}"#,
    );
    assert!(success);
    assert!(!stdout.contains("secret"));
    assert!(stdout.contains("keep"));
}
