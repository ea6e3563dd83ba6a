//! Listing tests against the fixture charts.

use super::{chart_test, fixtures_dir};
use predicates::prelude::*;
use std::path::Path;

fn native(path: &str) -> String {
    path.split('/')
        .collect::<std::path::PathBuf>()
        .display()
        .to_string()
}

#[test]
fn test_list_plain_from_chart_root() {
    let output = chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["--format", "plain"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], native("tests/configmap_test.yaml"));
    assert_eq!(lines[10], native("tests/statefulset_test.yaml"));
}

#[test]
fn test_list_includes_subchart_tests() {
    chart_test()
        .current_dir(fixtures_dir().join("with-subchart"))
        .args(["--format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(native("tests/all-charts_test.yaml")))
        .stdout(predicate::str::contains(native(
            "charts/child-chart/tests/child_chart_test.yaml",
        )));
}

#[test]
fn test_list_without_subchart() {
    chart_test()
        .current_dir(fixtures_dir().join("with-subchart"))
        .args(["--format", "plain", "--with-subchart", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("child_chart_test.yaml").not());
}

#[test]
fn test_list_file_override_deduplicates() {
    let output = chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args([
            "--format",
            "plain",
            "-f",
            "tests/configmap_test.yaml",
            "-f",
            "tests/configmap_test.yaml",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![native("tests/configmap_test.yaml")]
    );
}

#[test]
fn test_list_chart_argument_relative_to_root() {
    chart_test()
        .args(["--format", "plain", "--root"])
        .arg(fixtures_dir())
        .arg("basic")
        .assert()
        .success()
        .stdout(predicate::str::contains(native(
            "basic/tests/configmap_test.yaml",
        )));
}

#[test]
fn test_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = chart_test()
        .current_dir(fixtures_dir().join("with-subchart"))
        .args(["--format", "json"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&output.get_output().stdout)?;
    let charts = value.as_array().ok_or("expected a JSON array")?;
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0]["chart"], ".");
    assert_eq!(charts[0]["files"].as_array().map(Vec::len), Some(8));
    assert_eq!(
        charts[1]["chart"],
        native("charts/child-chart").as_str()
    );
    assert_eq!(charts[1]["files"].as_array().map(Vec::len), Some(6));
    Ok(())
}

#[test]
fn test_list_table() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Test file"))
        .stdout(predicate::str::contains("crd_test.yaml"));
}

#[test]
fn test_list_no_matches_is_success() {
    chart_test()
        .current_dir(fixtures_dir().join("basic"))
        .args(["-f", "tests/not-exists.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no test files found"));
}

#[test]
fn test_list_config_file_patterns() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::TempDir::new()?;
    let chart = temp.path();
    std::fs::create_dir_all(chart.join("tests").join("unit"))?;
    std::fs::write(chart.join("Chart.yaml"), "name: demo\n")?;
    std::fs::write(
        chart.join(".chart-test.yaml"),
        "test-patterns:\n  - tests/**/*_spec.yaml\nrecursive: true\n",
    )?;
    std::fs::write(chart.join("tests").join("top_spec.yaml"), "")?;
    std::fs::write(chart.join("tests").join("unit").join("deep_spec.yaml"), "")?;
    std::fs::write(chart.join("tests").join("ignored_test.yaml"), "")?;

    let output = chart_test()
        .current_dir(chart)
        .args(["--format", "plain"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            Path::new("tests").join("top_spec.yaml").display().to_string(),
            Path::new("tests")
                .join("unit")
                .join("deep_spec.yaml")
                .display()
                .to_string(),
        ]
    );
    Ok(())
}
