//! Implementation of `qstore-list`.

use crate::cmd::common::{ImportArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use querystore_core::environment_name;
use querystore_registry::{QueryStore, SearchEntry};
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

/// List the visible queries of imported definition directories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    import: ImportArgs,

    /// Only list queries of this data environment (aliases accepted)
    #[arg(short, long, value_name = "ENV")]
    pub env: Option<String>,

    /// Only list queries under this family path
    #[arg(long, value_name = "FAMILY")]
    pub family: Option<String>,

    /// Hide queries whose name contains SUBSTR (can be specified multiple times)
    #[arg(long, value_name = "SUBSTR")]
    pub hide: Vec<String>,

    /// Only list queries with a field containing TERM, ignoring case
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,
}

/// One listed query.
#[derive(Debug, Serialize)]
pub struct JsonQuery<'a> {
    /// Environment the query belongs to
    pub environment: &'a str,
    /// `family.name` path
    pub path: String,
    /// Searchable metadata
    #[serde(flatten)]
    pub entry: &'a SearchEntry,
}

/// Visible queries of `store` under `family` that match `search`.
pub fn select<'a>(
    store: &'a QueryStore,
    family: Option<&str>,
    search: Option<&str>,
) -> Vec<(String, &'a SearchEntry)> {
    let prefix = family.map(|f| format!("{f}."));
    let index = store.search_index();
    store
        .query_names()
        .filter(|path| prefix.as_ref().map_or(true, |p| path.starts_with(p.as_str())))
        .filter_map(|path| index.get(&path).map(|entry| (path, entry)))
        .filter(|(_, entry)| search.map_or(true, |term| entry.matches(term)))
        .collect()
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut result = args
        .import
        .importer()
        .import(&args.import.dirs)
        .context("import failed")?;

    if let Some(env) = &args.env {
        let environment = environment_name(env);
        result.stores.retain(|name, _| *name == environment);
        if result.stores.is_empty() {
            anyhow::bail!("no queries found for environment {environment}");
        }
    }

    if !args.hide.is_empty() {
        for store in result.stores.values_mut() {
            store.apply_query_filter(|def| !args.hide.iter().any(|h| def.name().contains(h.as_str())));
        }
    }

    let listed: Vec<JsonQuery<'_>> = result
        .stores
        .iter()
        .flat_map(|(environment, store)| {
            select(store, args.family.as_deref(), args.search.as_deref())
                .into_iter()
                .map(move |(path, entry)| JsonQuery {
                    environment: environment.as_str(),
                    path,
                    entry,
                })
        })
        .collect();
    tracing::debug!(count = listed.len(), "selected queries");

    if args.import.quiet {
        return Ok(if listed.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let mut stdout = io::stdout().lock();
    match args.import.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &listed)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => {
            let multiple = result.stores.len() > 1;
            for query in &listed {
                if multiple {
                    write!(stdout, "{}: ", query.environment)?;
                }
                writeln!(stdout, "{}", query.path)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for `qstore-list`.
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

#[cfg(test)]
mod tests {
    use super::*;
    use querystore_core::{ParamSpec, QueryDefinition};

    fn store() -> QueryStore {
        let mut store = QueryStore::new("AzureSentinel");
        for (family, name, query) in [
            ("Windows.Process", "list_processes", "{table} | where EventID == 4688"),
            ("Windows.Process", "TestProcesses", "{table} | take 1"),
            ("Windows.Logon", "logons", "{table} | where EventID == 4624"),
            ("WindowsExtra", "other", "{table}"),
        ] {
            store
                .add_definition(
                    QueryDefinition::builder(name, query)
                        .family(family)
                        .default_param("table", ParamSpec::new("str").with_default("SecurityEvent"))
                        .build(),
                )
                .unwrap();
        }
        store
    }

    fn paths(selected: &[(String, &SearchEntry)]) -> Vec<String> {
        selected.iter().map(|(path, _)| path.clone()).collect()
    }

    #[test]
    fn test_select_all() {
        let store = store();
        assert_eq!(select(&store, None, None).len(), 4);
    }

    #[test]
    fn test_select_family_prefix_matches_whole_segments() {
        let store = store();
        assert_eq!(
            paths(&select(&store, Some("Windows"), None)),
            [
                "Windows.Logon.logons",
                "Windows.Process.TestProcesses",
                "Windows.Process.list_processes",
            ]
        );
    }

    #[test]
    fn test_select_search_is_case_insensitive() {
        let store = store();
        assert_eq!(
            paths(&select(&store, None, Some("EVENTID == 4624"))),
            ["Windows.Logon.logons"]
        );
    }

    #[test]
    fn test_select_skips_hidden() {
        let mut store = store();
        store.apply_query_filter(|def| !def.name().contains("Test"));
        let selected = select(&store, Some("Windows.Process"), None);
        assert_eq!(paths(&selected), ["Windows.Process.list_processes"]);
        assert_eq!(selected[0].1.table, "SecurityEvent");
    }
}
