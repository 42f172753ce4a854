//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn review_sweep() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("review-sweep"));
    // Keep ambient REVIEW_SWEEP_* settings and user configs out of tests.
    cmd.env_clear();
    cmd
}

/// A small tree with two source files and one prompt.
fn fixture() -> TempDir {
    let dir = TempDir::new().expect("temp fixture dir");
    fs::create_dir(dir.path().join("src")).expect("src dir");
    fs::write(dir.path().join("src/a.rs"), "fn a() {}\n").expect("a.rs");
    fs::write(dir.path().join("src/b.rs"), "fn b() {}\n").expect("b.rs");
    fs::create_dir(dir.path().join("prompts")).expect("prompts dir");
    fs::write(
        dir.path().join("prompts/modernize.md"),
        "Modernize the code.\n",
    )
    .expect("prompt file");
    dir
}

#[test]
fn test_cli_version() {
    let mut cmd = review_sweep();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("review-sweep"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    let mut cmd = review_sweep();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("prompts"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_apply_requires_a_prompt() {
    let mut cmd = review_sweep();
    cmd.arg("apply");
    cmd.assert().failure().stderr(predicate::str::contains("--prompt"));
}

#[test]
fn test_apply_reports_unknown_prompts() {
    let dir = fixture();
    let mut cmd = review_sweep();
    cmd.args([
        "apply",
        "--prompt",
        "nonexistent",
        "--path",
        dir.path().to_str().expect("utf8 path"),
        "--dry-run",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("modernize"));
}

#[test]
fn test_apply_requires_an_api_key_outside_dry_run() {
    let dir = fixture();
    let mut cmd = review_sweep();
    cmd.args([
        "apply",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn test_apply_dry_run_reports_without_writing() {
    let dir = fixture();
    let mut cmd = review_sweep();
    cmd.args([
        "apply",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
        "--dry-run",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete!"))
        .stdout(predicate::str::contains("Would rewrite"));

    assert_eq!(
        fs::read_to_string(dir.path().join("src/a.rs")).expect("a.rs"),
        "fn a() {}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/b.rs")).expect("b.rs"),
        "fn b() {}\n"
    );
}

#[test]
fn test_apply_exits_nonzero_and_caps_the_failure_list() {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("src")).expect("src dir");
    for name in ["a", "b", "c", "d", "e", "f", "g"] {
        fs::write(dir.path().join(format!("src/{name}.rs")), "fn x() {}\n").expect("source file");
    }
    fs::create_dir(dir.path().join("prompts")).expect("prompts dir");
    fs::write(dir.path().join("prompts/modernize.md"), "Modernize.\n").expect("prompt");

    let mut cmd = review_sweep();
    cmd.env("REVIEW_SWEEP_API_KEY", "sk-test");
    cmd.args([
        "apply",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
        // Nothing listens on this port, so every request fails fast.
        "--base-url",
        "http://127.0.0.1:1",
        "--timeout-secs",
        "5",
    ]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("7 file(s) failed"))
        .stdout(predicate::str::contains("... and 2 more"))
        .stderr(predicate::str::contains("file(s) failed to transform"));

    // Failed files keep their original bytes.
    assert_eq!(
        fs::read_to_string(dir.path().join("src/a.rs")).expect("a.rs"),
        "fn x() {}\n"
    );
}

#[test]
fn test_apply_reports_empty_scans() {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("prompts")).expect("prompts dir");
    fs::write(dir.path().join("prompts/modernize.md"), "Modernize.\n").expect("prompt");
    let mut cmd = review_sweep();
    cmd.args([
        "apply",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
        "--dry-run",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No files matched"));
}

#[test]
fn test_check_classifies_marker_status() {
    let dir = fixture();
    fs::write(
        dir.path().join("src/a.rs"),
        "// performed \"modernize\" review\nfn a() {}\n",
    )
    .expect("marked a.rs");

    let mut cmd = review_sweep();
    cmd.args([
        "check",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
        "--no-date",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Marker status for \"modernize\""))
        .stdout(predicate::str::contains("1 current"))
        .stdout(predicate::str::contains("1 unmarked"));
}

#[test]
fn test_check_reports_markers_from_other_days_as_stale() {
    let dir = fixture();
    fs::write(
        dir.path().join("src/a.rs"),
        "// performed \"modernize\" review on 2000-01-01\nfn a() {}\n",
    )
    .expect("marked a.rs");

    // Dated mode: the marker names another day, so the file is stale.
    let mut cmd = review_sweep();
    cmd.args([
        "check",
        "--prompt",
        "modernize",
        "--path",
        dir.path().to_str().expect("utf8 path"),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 current"))
        .stdout(predicate::str::contains("1 stale"))
        .stdout(predicate::str::contains("1 unmarked"));
}

#[test]
fn test_prompts_lists_discovered_prompts() {
    let dir = fixture();
    let mut cmd = review_sweep();
    cmd.args(["prompts", "--path", dir.path().to_str().expect("utf8 path")]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("modernize"))
        .stdout(predicate::str::contains("Modernize the code."));
}

#[test]
fn test_init_scaffolds_config_and_example_prompt() {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = review_sweep();
    cmd.args(["init", "--path", dir.path().to_str().expect("utf8 path")]);
    cmd.assert().success().stdout(predicate::str::contains("Wrote"));

    let config = fs::read_to_string(dir.path().join("review-sweep.toml")).expect("config");
    assert!(config.contains("model"));
    assert!(config.contains("gpt-4o-mini"));
    assert!(!config.contains("api_key"), "init must not write a key field");
    assert!(dir.path().join("prompts/proofread.md").is_file());

    // Second run without --force refuses to clobber.
    let mut again = review_sweep();
    again.args(["init", "--path", dir.path().to_str().expect("utf8 path")]);
    again
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_completions_generates_a_script() {
    let mut cmd = review_sweep();
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("review-sweep"));
}
