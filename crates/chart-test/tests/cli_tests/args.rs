//! CLI argument tests.

use super::{chart_test, fixtures_dir};
use predicates::prelude::*;

#[test]
fn test_arg_help() {
    chart_test()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lists the unit test files of Helm charts",
        ));
}

#[test]
fn test_arg_version() {
    chart_test()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chart-test"));
}

#[test]
fn test_arg_invalid_format() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["--format", "invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn test_arg_invalid_with_subchart_value() {
    chart_test()
        .current_dir(fixtures_dir().join("with-subchart"))
        .args(["--with-subchart", "maybe"])
        .assert()
        .failure();
}
