//! Core types for querystore
//!
//! This crate provides the data model shared by the loader and the registry:
//!
//! - [`QueryDefinition`] - A named query with parameters, defaults and metadata
//! - [`ParamSpec`] / [`ParamTable`] - Parameter schemas
//! - [`DefinitionFile`] - The raw layout of a definition file
//! - [`DataEnvironment`] / [`DataFamily`] - Known backends and families
//! - [`dot_path`] - Dotted-path resolution over two-level maps
//!
//! # Example
//!
//! ```
//! use querystore_core::{ParamSpec, QueryDefinition};
//!
//! let def = QueryDefinition::builder("ListProcs", "{table} | take 10")
//!     .family("Windows.Process")
//!     .default_param("table", ParamSpec::new("str").with_default("Events"))
//!     .build();
//!
//! assert!(def.validate().is_ok());
//! assert_eq!(def.families(), ["Windows.Process"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod definition;
pub mod dot_path;
pub mod env;
pub mod param;
pub mod source;
pub mod validate;

pub use definition::{Defaults, DefaultsId, QueryDefinition, QueryDefinitionBuilder, StoreId};
pub use dot_path::{PathMatch, PathNotFound};
pub use env::{environment_name, DataEnvironment, DataFamily};
pub use param::{merge_params, ParamSpec, ParamTable};
pub use source::{DefinitionFile, FileDefaults, Metadata, RawSource, SourceArgs};

// Re-export the value type used for defaults and metadata
pub use serde_yaml::Value;
