//! Bulk import of definition files into per-environment stores.

use crate::error::StoreError;
use crate::filter::{matches_driver_filter, DriverFilter};
use crate::store::QueryStore;
use querystore_core::{environment_name, QueryDefinition};
use querystore_loader::{discover, parse_file};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A definition file that was skipped because it is malformed.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// The skipped file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub message: String,
}

/// Result of a bulk import.
#[derive(Debug, Default)]
pub struct ImportResult {
    /// One store per data environment.
    pub stores: BTreeMap<String, QueryStore>,
    /// Files skipped as malformed, in discovery order.
    pub skipped: Vec<SkippedFile>,
}

/// Imports definition files from directories.
#[derive(Debug, Clone)]
pub struct BulkImporter {
    recursive: bool,
    driver_filter: Option<DriverFilter>,
}

impl Default for BulkImporter {
    fn default() -> Self {
        Self {
            recursive: true,
            driver_filter: None,
        }
    }
}

impl BulkImporter {
    /// Create an importer that searches subdirectories and admits every
    /// definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether subdirectories are searched.
    #[must_use]
    pub const fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Only admit definitions matching `filter`.
    ///
    /// An empty filter admits everything.
    #[must_use]
    pub fn with_driver_filter(mut self, filter: DriverFilter) -> Self {
        self.driver_filter = Some(filter);
        self
    }

    /// Import every definition file under `dirs`.
    ///
    /// Each file's queries are added to the store of every environment the
    /// file declares. Malformed files are skipped and reported in
    /// [`ImportResult::skipped`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::DirectoryNotFound`] - A directory does not exist
    /// - [`StoreError::InvalidDefinition`] - A query failed validation
    /// - [`StoreError::Load`] - A file could not be read
    #[tracing::instrument(skip_all, fields(dirs = dirs.len(), recursive = self.recursive))]
    pub fn import<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<ImportResult, StoreError> {
        let mut result = ImportResult::default();

        for dir in dirs {
            for path in discover(dir.as_ref(), self.recursive)? {
                let file = match parse_file(&path) {
                    Ok(file) => file,
                    Err(e) if e.is_format_error() => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping invalid query definition file");
                        result.skipped.push(SkippedFile {
                            message: e.to_string(),
                            path,
                        });
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                for declared in file.data_environments() {
                    let environment = environment_name(&declared);
                    let store = result
                        .stores
                        .entry(environment.clone())
                        .or_insert_with(|| {
                            tracing::debug!(%environment, "created query store");
                            QueryStore::new(environment.clone())
                        });

                    for (name, source) in &file.sources {
                        let def = QueryDefinition::from_source(
                            name.clone(),
                            source,
                            &file.defaults,
                            &file.metadata,
                        );
                        if self.admits(&def) {
                            store.add_definition(def)?;
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    fn admits(&self, def: &QueryDefinition) -> bool {
        self.driver_filter
            .as_ref()
            .map_or(true, |filter| matches_driver_filter(def, filter))
    }
}

/// Import definition files from `dirs` into one store per environment.
///
/// This is a convenience wrapper around [`BulkImporter`] that drops the
/// list of skipped files.
pub fn import_files<P: AsRef<Path>>(
    dirs: &[P],
    recursive: bool,
    driver_filter: Option<&DriverFilter>,
) -> Result<BTreeMap<String, QueryStore>, StoreError> {
    let mut importer = BulkImporter::new().with_recursive(recursive);
    if let Some(filter) = driver_filter {
        importer = importer.with_driver_filter(filter.clone());
    }
    Ok(importer.import(dirs)?.stores)
}
