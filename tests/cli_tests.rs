//! CLI integration tests
//!
//! Drives the xlsheet binary with assert_cmd and checks the JSON contract:
//! one JSON document on stdout, zero/non-zero exit status.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn xlsheet() -> Command {
    Command::cargo_bin("xlsheet").unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    xlsheet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsheet"))
        .stdout(predicate::str::contains("write"));
}

#[test]
fn test_cli_version() {
    xlsheet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsheet"));
}

#[test]
fn test_write_help() {
    xlsheet()
        .args(["write", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COLUMN WIDTH POLICY"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SUCCESS PATH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_write_reports_changed_true() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            r#"[{"name": "web1", "cpus": 8}]"#,
            "--create",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"changed":true}"#));

    assert!(temp_dir.path().join("report.xlsx").is_file());
}

#[test]
fn test_write_twice_reports_changed_both_times() {
    let temp_dir = TempDir::new().unwrap();
    for _ in 0..2 {
        xlsheet()
            .args([
                "write",
                "--path",
                temp_dir.path().to_str().unwrap(),
                "--file",
                "report.xlsx",
                "--worksheet",
                "hosts",
                "--data",
                r#"[{"name": "web1"}]"#,
                "--create",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"changed":true}"#));
    }
}

#[test]
fn test_workbook_alias_for_file() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--workbook",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            r#"[{"name": "web1"}]"#,
            "--create",
        ])
        .assert()
        .success();
}

#[test]
fn test_table_and_width_options_accepted() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            r#"[{"name": "web1", "cpus": 8}]"#,
            "--table-name",
            "hosts",
            "--column-width",
            "<42",
            "--create",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"changed":true}"#));
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURE PATHS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_data_fails_with_message() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""failed":true"#))
        .stdout(predicate::str::contains("data parameter"));
}

#[test]
fn test_wrong_extension_fails_with_message() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xls",
            "--worksheet",
            "hosts",
            "--data",
            "[]",
            "--create",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("xlsx"));
}

#[test]
fn test_missing_path_without_create_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("not-there");
    xlsheet()
        .args([
            "write",
            "--path",
            missing.to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            "[]",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("doesn't exist"));
}

#[test]
fn test_invalid_data_payload_fails() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            r#"{"not": "a list"}"#,
            "--create",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("JSON list"));
}

#[test]
fn test_invalid_column_width_rejected_at_parse() {
    let temp_dir = TempDir::new().unwrap();
    xlsheet()
        .args([
            "write",
            "--path",
            temp_dir.path().to_str().unwrap(),
            "--file",
            "report.xlsx",
            "--worksheet",
            "hosts",
            "--data",
            "[]",
            "--column-width",
            "wide",
            "--create",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid column width"));
}
