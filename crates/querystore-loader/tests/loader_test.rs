//! Integration tests for the loader crate.

use querystore_loader::{discover, parse_file, LoadError};
use std::path::{Path, PathBuf};

fn fixtures_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_load_windows_fixture() {
    let file = parse_file(&fixtures_path("windows.yaml")).expect("should parse windows.yaml");

    assert_eq!(file.data_environments(), ["LogAnalytics"]);
    assert_eq!(file.sources.len(), 2);
    assert_eq!(file.defaults.parameters.len(), 2);

    let host = &file.sources["list_host_processes"];
    assert!(host.parameters.contains_key("host_name"));
    assert!(host.args.query.as_deref().unwrap().contains("{host_name}"));
}

#[test]
fn test_broken_fixture_is_format_error() {
    let err = parse_file(&fixtures_path("broken.yaml")).unwrap_err();
    match err {
        LoadError::Format { path, message } => {
            assert!(path.ends_with("broken.yaml"));
            assert!(message.contains("data_environments"));
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_discover_fixtures() {
    let root = fixtures_path("");
    let top = discover(&root, false).unwrap();
    assert_eq!(top.len(), 2, "broken.yaml and windows.yaml: {top:?}");

    let all = discover(&root, true).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().any(|p| p.ends_with("nested/network.yaml")));
}

#[test]
fn test_dotted_environments_are_kept_raw() {
    let file = parse_file(&fixtures_path("nested/network.yaml")).unwrap();
    // canonicalization happens in the registry, not here
    assert_eq!(
        file.data_environments(),
        ["DataEnvironment.Kusto", "Env.MyBackend"]
    );
}
