//! YAML definition file parsing.

use crate::LoadError;
use querystore_core::source::{string_list, DATA_ENVIRONMENTS, DATA_FAMILIES};
use querystore_core::DefinitionFile;
use std::fs;
use std::path::Path;

/// Read and parse a definition file.
pub fn parse_file(path: &Path) -> Result<DefinitionFile, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file = parse_str(&text, path)?;
    tracing::debug!(
        path = %path.display(),
        sources = file.sources.len(),
        "parsed definition file"
    );
    Ok(file)
}

/// Parse definition file text. `path` is only used in error messages.
pub fn parse_str(text: &str, path: &Path) -> Result<DefinitionFile, LoadError> {
    let format_error = |message: String| LoadError::Format {
        path: path.to_path_buf(),
        message,
    };

    let file: DefinitionFile = serde_yaml::from_str(text).map_err(|e| format_error(e.to_string()))?;

    if file.metadata.is_empty() {
        return Err(format_error("no 'metadata' section".to_string()));
    }
    if string_list(&file.metadata, DATA_ENVIRONMENTS).is_empty() {
        return Err(format_error(format!("metadata has no '{DATA_ENVIRONMENTS}'")));
    }
    if file.metadata.get(DATA_FAMILIES).is_none() {
        return Err(format_error(format!("metadata has no '{DATA_FAMILIES}'")));
    }
    if file.sources.is_empty() {
        return Err(format_error("no 'sources' section".to_string()));
    }
    Ok(file)
}
