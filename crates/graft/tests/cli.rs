//! Integration tests for the `graft` command-line interface.

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn graft() -> Command {
    Command::cargo_bin("graft").unwrap()
}

#[test]
fn test_reports_loaded_grammar() {
    graft()
        .arg(fixture("cil.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok cil (abi 14, 23 symbols, 3 fields)"));
}

#[test]
fn test_verbose_logs_linking() {
    graft()
        .args([fixture("cil.json").as_str(), "--verbose"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("linked grammar"))
        .stderr(predicate::str::contains("logging disabled").not());
}

#[test]
fn test_version_mismatch_exit_code() {
    graft()
        .arg(fixture("cil-abi9.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("VersionMismatch"));
}

#[test]
fn test_widened_range_accepts_old_abi() {
    graft()
        .args([fixture("cil-abi9.json").as_str(), "--min-abi", "9"])
        .assert()
        .success();
}

#[test]
fn test_broken_artifact_is_unavailable() {
    graft()
        .arg(fixture("undefined-symbol.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ArtifactUnavailable"))
        .stdout(predicate::str::contains("def_class"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    graft()
        .arg(dir.path().join("tree-sitter-cil.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ArtifactUnavailable"));
}

#[test]
fn test_inverted_range_is_usage_error() {
    graft()
        .args([fixture("cil.json").as_str(), "--min-abi", "15", "--max-abi", "13"])
        .assert()
        .code(2);
}
