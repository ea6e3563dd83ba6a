//! Chart detection and per-chart test file collection.
//!
//! A chart is a directory holding a `Chart.yaml`. Unpacked sub-charts live in
//! the `charts/` directory of their parent and are collected as independent
//! charts: each one resolves the test patterns against its own directory.

use crate::fs::{FileSystem, clean_path};
use crate::resolver::{FileResolver, ResolveError, contains_glob_chars};
use crate::types::{ChartTestConfig, ChartTestFiles};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File that marks a chart directory.
pub const CHART_FILE: &str = "Chart.yaml";

/// Directory holding a chart's sub-charts.
pub const SUBCHART_DIR: &str = "charts";

/// Errors that can occur during chart operations.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("chart directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Chart.yaml not found in {0}")]
    ChartYamlNotFound(PathBuf),
    #[error("invalid chart pattern")]
    GlobPattern(#[from] glob::PatternError),
    #[error("no charts found matching pattern: {0}")]
    NoChartsFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Check if a root-relative path is a chart directory (has Chart.yaml).
#[must_use]
pub fn is_chart_dir<F: FileSystem>(resolver: &FileResolver<F>, dir: &Path) -> bool {
    resolver
        .fs()
        .is_file(&resolver.locate(&dir.join(CHART_FILE)))
}

/// Detect a single chart directory.
///
/// Returns the chart path in canonical form.
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist or isn't a directory
/// - Chart.yaml doesn't exist
pub fn detect_chart<F: FileSystem>(
    resolver: &FileResolver<F>,
    chart: &Path,
) -> Result<PathBuf, ChartError> {
    if !resolver.fs().is_dir(&resolver.locate(chart)) {
        return Err(ChartError::DirectoryNotFound(chart.to_path_buf()));
    }
    if !is_chart_dir(resolver, chart) {
        return Err(ChartError::ChartYamlNotFound(chart.to_path_buf()));
    }
    Ok(canonical_chart_path(chart))
}

/// Find the unpacked sub-charts of `chart`, depth-first in name order.
///
/// Packaged archives and directories without Chart.yaml are skipped.
///
/// # Errors
/// Returns an error if a `charts/` directory cannot be listed.
pub fn discover_subcharts<F: FileSystem>(
    resolver: &FileResolver<F>,
    chart: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    let mut found = Vec::new();
    collect_subcharts(resolver, &canonical_chart_path(chart), &mut found)?;
    Ok(found)
}

fn collect_subcharts<F: FileSystem>(
    resolver: &FileResolver<F>,
    chart: &Path,
    found: &mut Vec<PathBuf>,
) -> Result<(), ChartError> {
    let charts_dir = clean_path(&chart.join(SUBCHART_DIR));
    let location = resolver.locate(&charts_dir);
    if !resolver.fs().is_dir(&location) {
        return Ok(());
    }

    for child in resolver.fs().read_dir(&location)? {
        let Some(name) = child.file_name() else {
            continue;
        };
        let subchart = charts_dir.join(name);
        if resolver.fs().is_dir(&child) && is_chart_dir(resolver, &subchart) {
            found.push(subchart.clone());
            collect_subcharts(resolver, &subchart, found)?;
        } else {
            tracing::trace!(path = %subchart.display(), "skipping non-chart entry");
        }
    }
    Ok(())
}

/// Resolve chart paths from arguments.
///
/// Supports glob patterns (e.g., `*`, `charts/*`).
/// If no paths are given, uses the working root.
/// Validates that all resolved paths are charts.
///
/// # Errors
/// Returns an error if:
/// - Glob pattern is invalid
/// - No charts found for a glob pattern
/// - Any literal path is not a valid chart
pub fn resolve_chart_paths<F: FileSystem>(
    resolver: &FileResolver<F>,
    paths: &[PathBuf],
) -> Result<Vec<PathBuf>, ChartError> {
    if paths.is_empty() {
        return Ok(vec![detect_chart(resolver, Path::new("."))?]);
    }

    let mut resolved = Vec::new();

    for path in paths {
        let path_str = path.to_string_lossy();

        if contains_glob_chars(&path_str) {
            let root = resolver.locate(Path::new("."));
            let mut found_any = false;
            for located in resolver.expand_in(&root, &path_str)? {
                let chart = resolver.relativize(&located);
                if resolver.fs().is_dir(&located) && is_chart_dir(resolver, &chart) {
                    resolved.push(chart);
                    found_any = true;
                }
            }
            if !found_any {
                return Err(ChartError::NoChartsFound(path_str.into_owned()));
            }
        } else {
            resolved.push(detect_chart(resolver, path)?);
        }
    }

    // Sort for deterministic order
    resolved.sort();
    resolved.dedup();
    Ok(resolved)
}

/// Collect the test files of `chart` and, if configured, of its sub-charts.
///
/// The parent chart comes first, followed by each sub-chart in discovery
/// order. Files shared between charts are not deduplicated across entries.
///
/// # Errors
/// Returns an error if sub-chart discovery or any resolution fails.
#[tracing::instrument(level = "debug", skip_all, fields(chart = %chart.display()))]
pub fn collect_test_files<F: FileSystem>(
    resolver: &FileResolver<F>,
    chart: &Path,
    config: &ChartTestConfig,
) -> Result<Vec<ChartTestFiles>, ChartError> {
    let mut charts = vec![canonical_chart_path(chart)];
    if config.with_subchart {
        charts.extend(discover_subcharts(resolver, chart)?);
    }

    charts
        .into_iter()
        .map(|chart| -> Result<ChartTestFiles, ChartError> {
            let files = resolver.resolve(&chart, &config.test_patterns, config.recursive)?;
            Ok(ChartTestFiles { chart, files })
        })
        .collect()
}

fn canonical_chart_path(chart: &Path) -> PathBuf {
    let chart = clean_path(chart);
    if chart.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        chart
    }
}
