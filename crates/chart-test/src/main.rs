//! chart-test CLI - Lists the unit test files of Helm charts.

use anyhow::Result;
use chart_test_core::{
    ChartTestFiles, ConfigOverrides, FileResolver, apply_overrides, collect_test_files,
    load_config, resolve_chart_paths,
};
use clap::Parser;
use comfy_table::Table;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Format for listing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "plain" => Ok(Self::Plain),
            _ => Err(format!(
                "unknown format: {s}. Valid formats: table, json, plain"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "chart-test")]
#[command(version, about = "Lists the unit test files of Helm charts")]
struct Cli {
    /// Chart directories (default: current directory). Glob patterns are expanded.
    /// Each directory must contain a Chart.yaml file.
    #[arg(value_name = "CHART")]
    charts: Vec<PathBuf>,

    /// Test file pattern relative to each chart, repeatable (overrides config)
    #[arg(short, long = "file", value_name = "PATTERN")]
    files: Vec<String>,

    /// Include tests of unpacked sub-charts (overrides config)
    #[arg(long, value_name = "BOOL")]
    with_subchart: Option<bool>,

    /// Let `**` match any number of directories (overrides config)
    #[arg(short, long)]
    recursive: bool,

    /// Directory that chart paths and results are relative to
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Output format: table, json, plain
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            test_patterns: (!self.files.is_empty()).then(|| self.files.clone()),
            with_subchart: self.with_subchart,
            recursive: self.recursive.then_some(true),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chart_test=debug,chart_test_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => PathBuf::from("."),
    };
    let resolver = FileResolver::new(root);
    let overrides = cli.overrides();

    let mut collected = Vec::new();
    for chart in resolve_chart_paths(&resolver, &cli.charts)? {
        let config = apply_overrides(load_config(&resolver, &chart)?, &overrides)?;
        tracing::debug!(chart = %chart.display(), ?config, "collecting test files");
        collected.extend(collect_test_files(&resolver, &chart, &config)?);
    }

    if collected.iter().all(ChartTestFiles::is_empty) {
        eprintln!("no test files found");
        if cli.format != OutputFormat::Json {
            return Ok(());
        }
    }

    match cli.format {
        OutputFormat::Table => print_table(&collected),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&collected)?),
        OutputFormat::Plain => print_plain(&collected),
    }
    Ok(())
}

fn print_table(collected: &[ChartTestFiles]) {
    let mut table = Table::new();
    table.set_header(vec!["Chart", "Test file"]);
    for set in collected {
        for file in &set.files {
            table.add_row(vec![
                set.chart.display().to_string(),
                file.display().to_string(),
            ]);
        }
    }
    println!("{table}");
}

fn print_plain(collected: &[ChartTestFiles]) {
    for file in collected.iter().flat_map(|set| &set.files) {
        println!("{}", file.display());
    }
}
