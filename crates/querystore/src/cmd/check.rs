//! Implementation of `qstore-check`.

use crate::cmd::common::{ImportArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use querystore_registry::ImportResult;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

/// Import query definition directories and report what was loaded.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    import: ImportArgs,
}

/// Query count for one environment.
#[derive(Debug, Serialize)]
pub struct EnvironmentSummary {
    /// Environment name
    pub environment: String,
    /// Number of admitted queries
    pub queries: usize,
    /// Number of distinct family paths
    pub families: usize,
}

/// A file skipped during import.
#[derive(Debug, Serialize)]
pub struct JsonSkipped {
    /// File path
    pub path: String,
    /// Why it was skipped
    pub message: String,
}

/// JSON output structure for a check run.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Per-environment summaries, sorted by environment name
    pub environments: Vec<EnvironmentSummary>,
    /// Files skipped as malformed
    pub skipped: Vec<JsonSkipped>,
}

impl From<&ImportResult> for JsonOutput {
    fn from(result: &ImportResult) -> Self {
        Self {
            environments: result
                .stores
                .iter()
                .map(|(environment, store)| EnvironmentSummary {
                    environment: environment.clone(),
                    queries: store.len(),
                    families: store.families().count(),
                })
                .collect(),
            skipped: result
                .skipped
                .iter()
                .map(|s| JsonSkipped {
                    path: s.path.display().to_string(),
                    message: s.message.clone(),
                })
                .collect(),
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let start = std::time::Instant::now();
    let result = args
        .import
        .importer()
        .import(&args.import.dirs)
        .context("import failed")?;
    tracing::debug!(elapsed = ?start.elapsed(), "import complete");

    if args.import.quiet {
        return Ok(ExitCode::SUCCESS);
    }

    let output = JsonOutput::from(&result);
    let mut stdout = io::stdout().lock();
    match args.import.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &output)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => write_text(&mut stdout, &output)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn write_text<W: Write>(out: &mut W, output: &JsonOutput) -> io::Result<()> {
    if output.environments.is_empty() {
        writeln!(out, "no query definition files found")?;
    }
    for env in &output.environments {
        writeln!(
            out,
            "{}: {} queries in {} families",
            env.environment, env.queries, env.families
        )?;
    }
    for skipped in &output.skipped {
        writeln!(out, "skipped {}: {}", skipped.path, skipped.message)?;
    }
    Ok(())
}

/// Main entry point for `qstore-check`.
pub fn main() -> ExitCode {
    let args = Args::parse();
    args.import.init_logging();

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
