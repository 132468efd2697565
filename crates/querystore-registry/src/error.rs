//! Registry error types.

use querystore_core::PathNotFound;
use querystore_loader::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Where to read about the definition file format.
pub const DEFINITION_HELP: &str = "docs/query-definitions.md#validation";

/// Error returned by registry operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A dotted path did not resolve.
    #[error(transparent)]
    PathNotFound(#[from] PathNotFound),

    /// No query with this name exists in the family that was searched.
    #[error("could not find {name} in path {}", .family.as_deref().unwrap_or("<none>"))]
    QueryNotFound {
        /// The undotted query name looked up.
        name: String,
        /// The family path searched, if one was determined.
        family: Option<String>,
    },

    /// A definition failed validation and was not admitted.
    #[error("error importing query definition {name}: {} (see {help})", .failures.join("; "))]
    InvalidDefinition {
        /// Name of the rejected definition.
        name: String,
        /// Every validation failure.
        failures: Vec<String>,
        /// Documentation reference.
        help: &'static str,
    },

    /// An import directory does not exist.
    #[error("{path} is not a directory")]
    DirectoryNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// Reading definition files failed.
    #[error(transparent)]
    Load(LoadError),
}

impl From<LoadError> for StoreError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::DirectoryNotFound { path } => Self::DirectoryNotFound { path },
            other => Self::Load(other),
        }
    }
}
