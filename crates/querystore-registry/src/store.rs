//! The query store for one data environment.

use crate::error::{StoreError, DEFINITION_HELP};
use crate::search::SearchIndex;
use querystore_core::dot_path::{self, PathMatch};
use querystore_core::{
    merge_params, DataFamily, Defaults, DefaultsId, ParamTable, QueryDefinition, StoreId,
};
use querystore_loader::parse_file;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Queries of one family, by name.
#[derive(Debug, Clone, Copy)]
pub struct FamilyQueries<'a> {
    names: &'a BTreeMap<String, usize>,
    definitions: &'a [QueryDefinition],
}

impl<'a> FamilyQueries<'a> {
    /// Look up a query by its undotted name.
    pub fn get(&self, name: &str) -> Option<&'a QueryDefinition> {
        let definitions = self.definitions;
        self.names.get(name).map(|&i| &definitions[i])
    }

    /// Queries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a QueryDefinition)> + 'a {
        let (names, definitions) = (self.names, self.definitions);
        names
            .iter()
            .map(move |(name, &i)| (name.as_str(), &definitions[i]))
    }

    /// Number of queries in the family.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the family has no queries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Result of [`QueryStore::resolve`].
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The path named a family.
    Family(FamilyQueries<'a>),
    /// The path named a query within a family.
    Query(&'a QueryDefinition),
}

/// Repository of query definitions for a data environment.
///
/// Definitions are indexed by family path and then by name. Definitions
/// filed under the same family share one default-parameter table.
#[derive(Debug)]
pub struct QueryStore {
    id: StoreId,
    environment: String,
    /// Every admitted definition, in admission order.
    definitions: Vec<QueryDefinition>,
    /// Family path to query name to index into `definitions`.
    families: BTreeMap<String, BTreeMap<String, usize>>,
    /// Family path to its merged default table.
    family_defaults: BTreeMap<String, DefaultsId>,
    default_tables: Vec<ParamTable>,
    /// Reset on every admission.
    search_index: OnceCell<SearchIndex>,
}

impl QueryStore {
    /// Create an empty store for `environment`.
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            id: StoreId::next(),
            environment: environment.into(),
            definitions: Vec::new(),
            families: BTreeMap::new(),
            family_defaults: BTreeMap::new(),
            default_tables: Vec::new(),
            search_index: OnceCell::new(),
        }
    }

    /// The data environment this store serves.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Identity recorded as the owner of admitted definitions.
    pub const fn id(&self) -> StoreId {
        self.id
    }

    /// Number of admitted definitions, counting overwritten ones.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing has been admitted.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Every admitted definition, in admission order.
    pub fn definitions(&self) -> &[QueryDefinition] {
        &self.definitions
    }

    /// Known family paths, in order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Queries filed under `family`.
    pub fn family_queries(&self, family: &str) -> Option<FamilyQueries<'_>> {
        self.families.get(family).map(|names| FamilyQueries {
            names,
            definitions: &self.definitions,
        })
    }

    /// Add a definition to the store.
    ///
    /// The definition is validated first; a rejected definition leaves the
    /// store untouched. An existing query with the same name in the same
    /// family is replaced in that family's index.
    pub fn add_definition(&mut self, mut def: QueryDefinition) -> Result<(), StoreError> {
        if let Err(failures) = def.validate() {
            return Err(StoreError::InvalidDefinition {
                name: def.name().to_string(),
                failures,
                help: DEFINITION_HELP,
            });
        }

        let index = self.definitions.len();
        // each family receives the table merged into the previous one
        let mut carried = def.own_defaults().cloned().unwrap_or_default();
        let mut shared = None;
        for family in def.families() {
            let handle = self.family_table(family);
            let table = &mut self.default_tables[handle.index()];
            merge_params(table, &carried);
            carried = table.clone();
            self.families
                .entry(family.clone())
                .or_default()
                .insert(def.name().to_string(), index);
            shared = Some(handle);
        }
        if let Some(handle) = shared {
            def.admit(self.id, handle);
        }

        tracing::debug!(
            environment = %self.environment,
            name = def.name(),
            families = ?def.families(),
            "admitted query"
        );
        self.definitions.push(def);
        self.search_index.take();
        Ok(())
    }

    fn family_table(&mut self, family: &str) -> DefaultsId {
        if let Some(&handle) = self.family_defaults.get(family) {
            return handle;
        }
        let handle = DefaultsId::new(self.default_tables.len());
        self.default_tables.push(ParamTable::new());
        self.family_defaults.insert(family.to_string(), handle);
        handle
    }

    /// Add a query from its name and text.
    ///
    /// A dotted `name` files the query one level deeper: `"Proc.list"` with
    /// path `"Windows"` becomes `list` in family `"Windows.Proc"`. The
    /// description defaults to the undotted name.
    pub fn add_query<I, S>(
        &mut self,
        name: &str,
        query: &str,
        query_paths: I,
        description: Option<&str>,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (prefix, name) = match dot_path::split_last(name) {
            Some((prefix, leaf)) => (Some(prefix), leaf),
            None => (None, name),
        };
        let families = query_paths.into_iter().map(|path| match prefix {
            Some(prefix) => format!("{}.{prefix}", path.as_ref()),
            None => path.as_ref().to_string(),
        });

        let mut builder = QueryDefinition::builder(name, query).families(families);
        if let Some(description) = description {
            builder = builder.description(description);
        }
        self.add_definition(builder.build())
    }

    /// Import every query in a definition file.
    ///
    /// A malformed file is logged and skipped. Returns the number of
    /// definitions admitted.
    pub fn import_file(&mut self, path: &Path) -> Result<usize, StoreError> {
        let file = match parse_file(path) {
            Ok(file) => file,
            Err(e) if e.is_format_error() => {
                tracing::warn!(path = %path.display(), error = %e, "skipping invalid query definition file");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        for (name, source) in &file.sources {
            let def = QueryDefinition::from_source(name.clone(), source, &file.defaults, &file.metadata);
            self.add_definition(def)?;
        }
        Ok(file.sources.len())
    }

    /// Look up a query by name and optional family path.
    ///
    /// A dotted `name` is split at its last `.` into a container and a
    /// query name. The container is used as the family if it is one;
    /// otherwise `family.container` is tried; otherwise the lookup falls
    /// back to `family` unchanged.
    pub fn get_query(&self, name: &str, family: Option<&str>) -> Result<&QueryDefinition, StoreError> {
        let mut family = family.map(str::to_string);
        let mut query_name = name;

        if let Some((container, leaf)) = dot_path::split_last(name) {
            query_name = leaf;
            if self.families.contains_key(container) {
                family = Some(container.to_string());
            } else if let Some(base) = &family {
                let nested = format!("{base}.{container}");
                if self.families.contains_key(&nested) {
                    family = Some(nested);
                }
            }
        }

        family
            .as_deref()
            .and_then(|family| self.families.get(family))
            .and_then(|names| names.get(query_name))
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| StoreError::QueryNotFound {
                name: query_name.to_string(),
                family,
            })
    }

    /// Look up a query within a well-known family.
    pub fn get_family_query(&self, name: &str, family: DataFamily) -> Result<&QueryDefinition, StoreError> {
        self.get_query(name, Some(family.as_str()))
    }

    /// Every distinct definition called `name`, across all families.
    pub fn find_query(&self, name: &str) -> Vec<&QueryDefinition> {
        let found: BTreeSet<usize> = self
            .families
            .values()
            .filter_map(|names| names.get(name).copied())
            .collect();
        found.into_iter().map(|i| &self.definitions[i]).collect()
    }

    /// Resolve a dotted path to a family or to a query in a family.
    pub fn resolve(&self, path: &str) -> Result<Resolved<'_>, StoreError> {
        Ok(match dot_path::resolve(path, &self.families)? {
            PathMatch::Branch(names) => Resolved::Family(FamilyQueries {
                names,
                definitions: &self.definitions,
            }),
            PathMatch::Leaf(&i) => Resolved::Query(&self.definitions[i]),
        })
    }

    /// `family.name` for every visible query, ordered by family then name.
    ///
    /// Each call starts a fresh iteration.
    pub fn query_names(&self) -> impl Iterator<Item = String> + '_ {
        self.families.iter().flat_map(move |(family, names)| {
            names
                .iter()
                .filter(move |&(_, &i)| self.definitions[i].is_visible())
                .map(move |(name, _)| format!("{family}.{name}"))
        })
    }

    /// Searchable metadata for every indexed query.
    ///
    /// Built on first use after any admission.
    pub fn search_index(&self) -> &SearchIndex {
        self.search_index.get_or_init(|| {
            SearchIndex::build(self.families.iter().flat_map(move |(family, names)| {
                names
                    .iter()
                    .map(move |(name, &i)| (family.as_str(), name.as_str(), &self.definitions[i]))
            }))
        })
    }

    /// Set each definition's visibility from `predicate`.
    ///
    /// Nothing is removed from the indexes; hidden queries are only left
    /// out of [`QueryStore::query_names`].
    pub fn apply_query_filter<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&QueryDefinition) -> bool,
    {
        for def in &mut self.definitions {
            let visible = predicate(def);
            def.set_visible(visible);
        }
    }

    /// The merged default table of `family`.
    pub fn family_defaults(&self, family: &str) -> Option<&ParamTable> {
        self.family_defaults
            .get(family)
            .map(|handle| &self.default_tables[handle.index()])
    }

    /// The defaults `def` currently sees.
    ///
    /// For a definition admitted by this store this is its family's shared
    /// table. Returns `None` for a definition owned by another store.
    pub fn defaults_of<'a>(&'a self, def: &'a QueryDefinition) -> Option<&'a ParamTable> {
        match def.defaults() {
            Defaults::Owned(table) => Some(table),
            Defaults::Shared(handle) if def.owner() == Some(self.id) => {
                self.default_tables.get(handle.index())
            }
            Defaults::Shared(_) => None,
        }
    }

    /// Mutable access to a shared default table.
    ///
    /// Changes are seen by every definition holding `handle`.
    pub fn defaults_table_mut(&mut self, handle: DefaultsId) -> Option<&mut ParamTable> {
        self.default_tables.get_mut(handle.index())
    }
}
