//! Error reporting tests.

use super::{chart_test, fixtures_dir};
use predicates::prelude::*;

#[test]
fn test_error_missing_chart() {
    chart_test()
        .current_dir(fixtures_dir())
        .arg("does-not-exist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chart directory not found"));
}

#[test]
fn test_error_not_a_chart() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .arg("tests")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chart.yaml not found"));
}

#[test]
fn test_error_invalid_pattern() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["-f", "tests/["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern 'tests/['"));
}

#[test]
fn test_error_absolute_pattern() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["-f", "/tests/*_test.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be relative"));
}

#[test]
fn test_error_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("Chart.yaml"), "name: demo\n")?;
    std::fs::write(temp.path().join(".chart-test.yaml"), "unknown-key: 1\n")?;

    chart_test()
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML parse error"));
    Ok(())
}

#[test]
fn test_error_no_charts_for_glob() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .arg("tests/*")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no charts found"));
}

#[test]
fn test_error_reports_pattern_cause() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["-f", "tests/["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern 'tests/[': "))
        .stderr(predicate::str::contains("Pattern syntax error"));
}

#[test]
fn test_error_reports_config_cause() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("Chart.yaml"), "name: demo\n")?;
    std::fs::write(temp.path().join(".chart-test.yaml"), "unknown-key: 1\n")?;

    chart_test()
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML parse error: "))
        .stderr(predicate::str::contains("unknown field `unknown-key`"));
    Ok(())
}
