//! Arguments and setup shared by every command.

use clap::{Args, ValueEnum};
use querystore_registry::{BulkImporter, DriverFilter};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Where to import definitions from and how.
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Directories containing query definition files
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<PathBuf>,

    /// Only read files directly inside each directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Only admit queries whose metadata matches KEY=VALUE[,VALUE...]
    /// (can be specified multiple times)
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter_arg)]
    pub filters: Vec<(String, Vec<String>)>,

    /// Show verbose output including skipped files and admissions
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ImportArgs {
    /// The driver filter described by the `--filter` arguments.
    ///
    /// Values for a repeated key accumulate.
    pub fn driver_filter(&self) -> DriverFilter {
        let mut filter = DriverFilter::new();
        for (key, values) in &self.filters {
            filter
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
        filter
    }

    /// A [`BulkImporter`] configured from these arguments.
    pub fn importer(&self) -> BulkImporter {
        let importer = BulkImporter::new().with_recursive(!self.no_recursive);
        if self.filters.is_empty() {
            importer
        } else {
            importer.with_driver_filter(self.driver_filter())
        }
    }

    /// Install a debug-level fmt subscriber when `--verbose` is given.
    pub fn init_logging(&self) {
        if self.verbose {
            tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Parse a `KEY=VALUE[,VALUE...]` filter argument.
pub fn parse_filter_arg(arg: &str) -> Result<(String, Vec<String>), String> {
    let (key, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid filter '{arg}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid filter '{arg}': empty key"));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((key.to_string(), values))
}
