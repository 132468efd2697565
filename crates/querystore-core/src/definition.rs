//! Query definitions.

use crate::param::{merge_params, ParamSpec, ParamTable};
use crate::source::{merge_metadata, string_list, FileDefaults, Metadata, RawSource, DATA_FAMILIES};
use serde_yaml::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of the store that admitted a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}

/// Handle to a family default table owned by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefaultsId(usize);

impl DefaultsId {
    /// Wrap an index into a store's default-table arena.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Default parameters of a definition.
///
/// Before admission a definition owns its defaults. Admission merges them
/// into the family table and swaps in a handle to it, so every definition
/// of a family sees the same table.
#[derive(Debug, Clone, PartialEq)]
pub enum Defaults {
    /// Not yet admitted.
    Owned(ParamTable),
    /// Shared family table held by the owning store.
    Shared(DefaultsId),
}

/// A named query with its parameter schema and metadata.
#[derive(Debug)]
pub struct QueryDefinition {
    name: String,
    families: Vec<String>,
    defaults: Defaults,
    /// Effective parameter schema.
    pub params: ParamTable,
    /// Query text or template.
    pub query: String,
    /// Human readable description.
    pub description: String,
    /// Effective metadata.
    pub metadata: Metadata,
    /// Endpoint for API-backed environments.
    pub uri: Option<String>,
    visible: bool,
    owner: Option<StoreId>,
}

impl QueryDefinition {
    /// Start building an ad-hoc definition.
    pub fn builder(name: impl Into<String>, query: impl Into<String>) -> QueryDefinitionBuilder {
        QueryDefinitionBuilder::new(name, query)
    }

    /// Build a definition from a parsed file entry.
    ///
    /// Parameters are the file defaults overlaid by the source's own.
    /// Metadata is the file metadata, then the default metadata, then the
    /// source metadata. Families come from the merged `data_families`.
    pub fn from_source(
        name: impl Into<String>,
        source: &RawSource,
        defaults: &FileDefaults,
        file_metadata: &Metadata,
    ) -> Self {
        let mut params = defaults.parameters.clone();
        merge_params(&mut params, &source.parameters);

        let mut metadata = file_metadata.clone();
        merge_metadata(&mut metadata, &defaults.metadata);
        merge_metadata(&mut metadata, &source.metadata);

        let families = string_list(&metadata, DATA_FAMILIES);

        Self {
            name: name.into(),
            families,
            defaults: Defaults::Owned(defaults.parameters.clone()),
            params,
            query: source.args.query.clone().unwrap_or_default(),
            description: source.description.clone().unwrap_or_default(),
            metadata,
            uri: source.args.uri.clone(),
            visible: true,
            owner: None,
        }
    }

    /// Query name, unique within a family.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family paths this definition is filed under.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Defaults, owned or shared.
    pub const fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Handle to the shared family defaults, once admitted.
    pub const fn defaults_handle(&self) -> Option<DefaultsId> {
        match self.defaults {
            Defaults::Shared(id) => Some(id),
            Defaults::Owned(_) => None,
        }
    }

    /// Whether the definition is listed by enumeration.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the definition.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The store that admitted this definition.
    pub const fn owner(&self) -> Option<StoreId> {
        self.owner
    }

    /// Defaults carried before admission, if any.
    pub const fn own_defaults(&self) -> Option<&ParamTable> {
        match &self.defaults {
            Defaults::Owned(table) => Some(table),
            Defaults::Shared(_) => None,
        }
    }

    /// Record the admitting store and point the defaults at its shared
    /// family table.
    ///
    /// The owner is recorded by the first call only.
    pub fn admit(&mut self, owner: StoreId, shared: DefaultsId) {
        if self.owner.is_none() {
            self.owner = Some(owner);
        }
        self.defaults = Defaults::Shared(shared);
    }

    /// Parameters without a default value.
    pub fn required_params(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params
            .iter()
            .filter(|(_, spec)| spec.default.is_none())
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// Parameters with a default value.
    pub fn default_params(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params
            .iter()
            .filter_map(|(name, spec)| spec.default.as_ref().map(|d| (name.as_str(), d)))
    }
}

/// Builder for ad-hoc [`QueryDefinition`]s.
#[derive(Debug)]
pub struct QueryDefinitionBuilder {
    name: String,
    query: String,
    description: Option<String>,
    families: Vec<String>,
    defaults: ParamTable,
    params: ParamTable,
    metadata: Metadata,
}

impl QueryDefinitionBuilder {
    fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            description: None,
            families: Vec::new(),
            defaults: ParamTable::new(),
            params: ParamTable::new(),
            metadata: Metadata::new(),
        }
    }

    /// File the query under a family path.
    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// File the query under several family paths.
    #[must_use]
    pub fn families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families.extend(families.into_iter().map(Into::into));
        self
    }

    /// Set the description. Defaults to the query name.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a default parameter. Defaults also count as parameters.
    #[must_use]
    pub fn default_param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        let name = name.into();
        self.params.insert(name.clone(), spec.clone());
        self.defaults.insert(name, spec);
        self
    }

    /// Add a query-specific parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.insert(name.into(), spec);
        self
    }

    /// Set a metadata value.
    #[must_use]
    pub fn metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(Value::from(key), value.into());
        self
    }

    /// Finish the definition.
    pub fn build(self) -> QueryDefinition {
        let mut metadata = self.metadata;
        metadata.insert(
            Value::from(DATA_FAMILIES),
            Value::Sequence(self.families.iter().cloned().map(Value::from).collect()),
        );
        QueryDefinition {
            description: self.description.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            families: self.families,
            defaults: Defaults::Owned(self.defaults),
            params: self.params,
            query: self.query,
            metadata,
            uri: None,
            visible: true,
            owner: None,
        }
    }
}
