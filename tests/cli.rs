//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn mk_grammar() -> Command {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut cmd = Command::cargo_bin("mk-grammar").unwrap();
    // Keep user-level config files out of the run
    cmd.current_dir(&fixtures)
        .env("HOME", &fixtures)
        .arg("--no-color");
    cmd
}

#[test]
fn test_help() {
    mk_grammar()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_default_mode_is_informational() {
    mk_grammar()
        .arg(fixture("errors.yaml"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("AGREEMENT_MISMATCH"))
        .stdout(predicate::str::contains("2 units checked: 1 error"));
}

#[test]
fn test_ci_fails_on_errors() {
    mk_grammar()
        .args(["--ci", fixture("errors.yaml").as_str()])
        .assert()
        .code(1);
}

#[test]
fn test_ci_passes_on_warnings() {
    mk_grammar()
        .args(["--ci", fixture("warnings.json").as_str()])
        .assert()
        .code(0);
}

#[test]
fn test_strict_fails_on_warnings() {
    mk_grammar()
        .args(["--strict", fixture("warnings.json").as_str()])
        .assert()
        .code(1);
}

#[test]
fn test_strict_passes_clean_corpus() {
    mk_grammar()
        .args(["--strict", fixture("clean.yaml").as_str()])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no agreement problems found"));
}

#[test]
fn test_disable_rule() {
    mk_grammar()
        .args([
            "--strict",
            "--disable",
            "MISSING_METADATA,MISSING_DICTIONARY_ENTRY",
            fixture("warnings.json").as_str(),
        ])
        .assert()
        .code(0);
}

#[test]
fn test_json_output() {
    mk_grammar()
        .args(["--format", "json", "--timestamp", fixture("errors.yaml").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"generated_at\""))
        .stdout(predicate::str::contains("\"report\""))
        .stdout(predicate::str::contains("\"total_errors\": 1"));
}

#[test]
fn test_markdown_output_to_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.md");

    mk_grammar()
        .args(["--format", "markdown", "--output"])
        .arg(&out)
        .arg(fixture("errors.yaml"))
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("## lesson-02-city"));
    assert!(content.contains("| Content | Field | Severity | Rule | Expected | Actual | Count |"));
}

#[test]
fn test_missing_corpus_is_usage_error() {
    mk_grammar()
        .arg("/nonexistent/dir/*.yaml")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No corpus files matched"));
}

#[test]
fn test_unmatched_pattern_fails_the_run() {
    mk_grammar()
        .args([
            "--ci",
            fixture("clean.yaml").as_str(),
            fixture("lesson-typo.yaml").as_str(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("lesson-typo.yaml"));
}

#[test]
fn test_markdown_title() {
    mk_grammar()
        .args([
            "--format",
            "markdown",
            "--title",
            "Lesson 2 review",
            fixture("errors.yaml").as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Lesson 2 review"));
}

#[test]
fn test_invalid_config_exits_2() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("mkgrammar.yaml");
    std::fs::write(&config, "rules:\n  disabled: [NOT_A_RULE]\n").unwrap();

    mk_grammar()
        .arg("--config")
        .arg(&config)
        .arg(fixture("errors.yaml"))
        .assert()
        .code(2);
}

#[test]
fn test_list_rules() {
    mk_grammar()
        .arg("--list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("AGREEMENT_MISMATCH"))
        .stdout(predicate::str::contains("INVALID_PARADIGM_FORM"));
}

#[test]
fn test_explain() {
    mk_grammar()
        .args(["--explain", "agreement-mismatch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rationale"));

    mk_grammar()
        .args(["--explain", "NOPE"])
        .assert()
        .code(2);
}

#[test]
fn test_check_lexicon() {
    mk_grammar().arg("--check-lexicon").assert().code(0);

    mk_grammar()
        .args(["--check-lexicon", "--dictionary", fixture("incomplete.yaml").as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("шарен"));
}

#[test]
fn test_baseline_created_then_applied() {
    let dir = tempdir().unwrap();
    let baseline = dir.path().join("baseline.json");

    mk_grammar()
        .arg("--ci")
        .arg("--baseline")
        .arg(&baseline)
        .arg(fixture("errors.yaml"))
        .assert()
        .code(0);
    assert!(baseline.exists());

    mk_grammar()
        .arg("--ci")
        .arg("--baseline")
        .arg(&baseline)
        .arg(fixture("errors.yaml"))
        .assert()
        .code(0);

    // Without the baseline the gate still fails
    mk_grammar()
        .args(["--ci", fixture("errors.yaml").as_str()])
        .assert()
        .code(1);
}
