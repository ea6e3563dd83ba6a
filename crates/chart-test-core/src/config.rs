//! Configuration loader for chart-test.

use crate::fs::FileSystem;
use crate::resolver::{FileResolver, is_absolute_pattern};
use crate::types::ChartTestConfig;
use std::path::Path;
use thiserror::Error;

/// Name of the per-chart configuration file.
pub const CONFIG_FILE: &str = ".chart-test.yaml";

/// Errors that can occur during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error")]
    Yaml(#[from] serde_yml::Error),
    #[error("test-patterns must contain at least one pattern")]
    NoTestPatterns,
    #[error("test pattern '{0}' must be relative to the chart")]
    AbsolutePattern(String),
}

/// Load chart test configuration from `.chart-test.yaml` in `chart`.
///
/// `chart` is relative to the resolver's working root and the file is read
/// through the resolver's filesystem. If the file doesn't exist, returns
/// default configuration.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The YAML is invalid or has unknown fields
/// - Validation fails
pub fn load_config<F: FileSystem>(
    resolver: &FileResolver<F>,
    chart: &Path,
) -> Result<ChartTestConfig, ConfigError> {
    let config_path = resolver.locate(&chart.join(CONFIG_FILE));
    let fs = resolver.fs();

    let config = if fs.entry_kind(&config_path)?.is_some() {
        tracing::debug!(path = %config_path.display(), "loading config");
        let content = fs.read_to_string(&config_path)?;
        serde_yml::from_str(&content)?
    } else {
        ChartTestConfig::default()
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration.
///
/// # Errors
/// Returns an error if there are no test patterns or one of them is absolute.
pub fn validate_config(config: &ChartTestConfig) -> Result<(), ConfigError> {
    if config.test_patterns.is_empty() {
        return Err(ConfigError::NoTestPatterns);
    }
    if let Some(pattern) = config
        .test_patterns
        .iter()
        .find(|pattern| is_absolute_pattern(pattern))
    {
        return Err(ConfigError::AbsolutePattern(pattern.clone()));
    }
    Ok(())
}

/// CLI override options for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub test_patterns: Option<Vec<String>>,
    pub with_subchart: Option<bool>,
    pub recursive: Option<bool>,
}

/// Apply CLI overrides to a configuration.
///
/// # Errors
/// Returns an error if the overridden configuration fails validation.
pub fn apply_overrides(
    mut config: ChartTestConfig,
    overrides: &ConfigOverrides,
) -> Result<ChartTestConfig, ConfigError> {
    if let Some(ref patterns) = overrides.test_patterns {
        config.test_patterns.clone_from(patterns);
    }
    if let Some(with_subchart) = overrides.with_subchart {
        config.with_subchart = with_subchart;
    }
    if let Some(recursive) = overrides.recursive {
        config.recursive = recursive;
    }
    validate_config(&config)?;
    Ok(config)
}
