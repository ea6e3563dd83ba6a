//! Core library for chart-test.
//!
//! This crate finds the unit test files of Helm charts:
//! - Pattern resolution against a chart or sub-chart directory
//! - First-occurrence deduplication across patterns
//! - Chart and sub-chart detection
//! - Per-chart configuration loading with CLI overrides
//!
//! Filesystem access goes through the [`FileSystem`] trait so resolution can
//! run against [`MemoryFs`] as well as the host filesystem.

pub mod chart;
pub mod config;
pub mod fs;
pub mod ordered;
pub mod resolver;
pub mod types;

pub use chart::{
    CHART_FILE, ChartError, SUBCHART_DIR, collect_test_files, detect_chart, discover_subcharts,
    is_chart_dir, resolve_chart_paths,
};
pub use config::{
    CONFIG_FILE, ConfigError, ConfigOverrides, apply_overrides, load_config, validate_config,
};
pub use fs::{EntryKind, FileSystem, HostFs, MATCH_OPTIONS, MemoryFs};
pub use ordered::OrderedPathSet;
pub use resolver::{FileResolver, ResolveError};
pub use types::*;
