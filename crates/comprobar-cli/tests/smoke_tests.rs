//! Smoke tests for the comprobador CLI.
//!
//! These cover the surfaces that never launch a browser: help text, suite
//! listing, and argument validation.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn comprobador() -> Command {
    Command::cargo_bin("comprobador").expect("comprobador binary should exist")
}

#[test]
fn test_help_flag() {
    comprobador()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    comprobador()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.3.1"));
}

#[test]
fn test_no_args_shows_usage() {
    comprobador().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    comprobador()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--suite"))
        .stdout(predicate::str::contains("--headed"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_list_shows_builtin_suites() {
    comprobador()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cart"))
        .stdout(predicate::str::contains("contact"))
        .stdout(predicate::str::contains(
            "add single item shows badge and cart line",
        ))
        .stdout(predicate::str::contains(
            "empty submission shows every required-field error",
        ));
}

#[test]
fn test_unknown_suite_fails_before_browser_launch() {
    comprobador()
        .args(["run", "--suite", "checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown suite 'checkout'"))
        .stderr(predicate::str::contains("cart, contact"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    comprobador()
        .args(["run", "--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout must be positive"));
}

#[test]
fn test_invalid_format_is_rejected() {
    comprobador()
        .args(["run", "--format", "xml"])
        .assert()
        .failure();
}
