//! Query store CLI tools.
//!
//! This crate provides command-line tools for working with directories of
//! query definition files:
//!
//! - `qstore-check`: Import directories and report per-environment counts
//! - `qstore-list`: List, filter and search the imported queries
//!
//! # Example Usage
//!
//! ```bash
//! qstore-check queries/
//! qstore-list queries/ --env AzureSentinel --family Windows --hide Test
//! qstore-list queries/ --search logon --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
