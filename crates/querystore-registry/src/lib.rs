//! Registry of analytic query definitions.
//!
//! A [`QueryStore`] holds the queries of one data environment, indexed by
//! data family path and query name. [`BulkImporter`] reads directories of
//! definition files and builds one store per environment.
//!
//! # Example
//!
//! ```
//! use querystore_core::{ParamSpec, QueryDefinition};
//! use querystore_registry::QueryStore;
//!
//! let mut store = QueryStore::new("AzureSentinel");
//! store.add_definition(
//!     QueryDefinition::builder("ListProcs", "{table} | take 10")
//!         .family("Windows.Process")
//!         .default_param("table", ParamSpec::new("str").with_default("Events"))
//!         .build(),
//! )?;
//!
//! let def = store.get_query("Windows.Process.ListProcs", None)?;
//! assert_eq!(def.name(), "ListProcs");
//! assert_eq!(store.query_names().collect::<Vec<_>>(), ["Windows.Process.ListProcs"]);
//! # Ok::<(), querystore_registry::StoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod import;
pub mod search;
pub mod store;

pub use error::{StoreError, DEFINITION_HELP};
pub use filter::{matches_driver_filter, DriverFilter};
pub use import::{import_files, BulkImporter, ImportResult, SkippedFile};
pub use search::{SearchEntry, SearchIndex};
pub use store::{FamilyQueries, QueryStore, Resolved};
