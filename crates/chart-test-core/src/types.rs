//! Shared data types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pattern used when a chart does not configure its own.
pub const DEFAULT_TEST_PATTERN: &str = "tests/*_test.yaml";

/// Per-chart test discovery configuration (`.chart-test.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartTestConfig {
    /// Test file patterns, relative to the chart (default: `["tests/*_test.yaml"]`).
    #[serde(rename = "test-patterns", default = "default_test_patterns")]
    pub test_patterns: Vec<String>,

    /// Also collect the tests of unpacked sub-charts (default: true).
    #[serde(rename = "with-subchart", default = "default_with_subchart")]
    pub with_subchart: bool,

    /// Let `**` match across directory levels (default: false).
    #[serde(default)]
    pub recursive: bool,
}

fn default_test_patterns() -> Vec<String> {
    vec![DEFAULT_TEST_PATTERN.to_string()]
}

const fn default_with_subchart() -> bool {
    true
}

impl Default for ChartTestConfig {
    fn default() -> Self {
        Self {
            test_patterns: default_test_patterns(),
            with_subchart: default_with_subchart(),
            recursive: false,
        }
    }
}

/// Test files discovered for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartTestFiles {
    /// Chart directory, relative to the working root.
    pub chart: PathBuf,
    /// Test files in resolution order, relative to the working root.
    pub files: Vec<PathBuf>,
}

impl ChartTestFiles {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
