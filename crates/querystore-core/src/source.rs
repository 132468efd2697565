//! Raw definition-file model.
//!
//! These types mirror the YAML layout of a definition file:
//!
//! ```yaml
//! metadata:
//!   data_environments: [LogAnalytics]
//!   data_families: [WindowsSecurity]
//! defaults:
//!   metadata:
//!     data_source: security_event
//!   parameters:
//!     table: { type: str, default: SecurityEvent }
//! sources:
//!   list_events:
//!     description: List events
//!     args:
//!       query: "{table} | take 10"
//! ```

use crate::param::ParamTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Free-form metadata attached to a file, its defaults, or a source.
pub type Metadata = Mapping;

/// Metadata key listing the environments a file targets.
pub const DATA_ENVIRONMENTS: &str = "data_environments";

/// Metadata key listing the families a query is filed under.
pub const DATA_FAMILIES: &str = "data_families";

/// A parsed definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    /// File-level metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Defaults shared by every source in the file.
    #[serde(default)]
    pub defaults: FileDefaults,
    /// Named query sources, in file order.
    #[serde(default)]
    pub sources: IndexMap<String, RawSource>,
}

impl DefinitionFile {
    /// Environments declared in the file metadata.
    pub fn data_environments(&self) -> Vec<String> {
        string_list(&self.metadata, DATA_ENVIRONMENTS)
    }
}

/// The `defaults` section of a definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDefaults {
    /// Metadata merged beneath each source's own metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Parameters merged beneath each source's own parameters.
    #[serde(default)]
    pub parameters: ParamTable,
}

/// A single entry of the `sources` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSource {
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Source-specific metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Query arguments.
    #[serde(default)]
    pub args: SourceArgs,
    /// Source-specific parameters.
    #[serde(default)]
    pub parameters: ParamTable,
}

/// The `args` block of a source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceArgs {
    /// Query text or template.
    #[serde(default)]
    pub query: Option<String>,
    /// Optional endpoint for API-backed environments.
    #[serde(default)]
    pub uri: Option<String>,
}

/// Read `key` from `metadata` as a list of strings.
///
/// A single string is treated as a one-element list. Non-string items are
/// skipped.
pub fn string_list(metadata: &Metadata, key: &str) -> Vec<String> {
    match metadata.get(key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Merge `other` into `base`, later keys overwriting earlier ones.
pub fn merge_metadata(base: &mut Metadata, other: &Metadata) {
    for (key, value) in other {
        base.insert(key.clone(), value.clone());
    }
}
