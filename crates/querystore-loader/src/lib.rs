//! Query definition file loader.
//!
//! This crate reads YAML definition files into the raw
//! [`DefinitionFile`] model and finds definition files on disk.
//!
//! # Features
//!
//! - Layout checks for the `metadata` / `defaults` / `sources` sections
//! - Deterministic directory discovery, optionally recursive
//! - Distinct errors for unreadable files and malformed files, so callers
//!   can skip the latter
//!
//! # Example
//!
//! ```ignore
//! use querystore_loader::{discover, parse_file};
//! use std::path::Path;
//!
//! for path in discover(Path::new("queries"), true)? {
//!     let file = parse_file(&path)?;
//!     println!("{}: {} queries", path.display(), file.sources.len());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod discover;
mod parse;

pub use discover::{discover, is_definition_file};
pub use parse::{parse_file, parse_str};

use std::path::PathBuf;
use thiserror::Error;

pub use querystore_core::DefinitionFile;

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid query definition file.
    #[error("{path} is not a valid query definition file: {message}")]
    Format {
        /// The offending file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A directory to search does not exist.
    #[error("{path} is not a directory")]
    DirectoryNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// Walking a directory failed part way.
    #[error("failed to scan {path}: {source}")]
    Walk {
        /// The directory being scanned.
        path: PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },
}

impl LoadError {
    /// Whether this error means the file itself is malformed.
    ///
    /// Malformed files are skipped during imports; every other error is
    /// fatal.
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
