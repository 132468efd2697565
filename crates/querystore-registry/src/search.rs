//! Flattened, searchable view of a store.

use querystore_core::QueryDefinition;
use serde::Serialize;
use std::collections::BTreeMap;

/// Searchable metadata for one `family.name` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    /// Query name.
    pub name: String,
    /// Query description.
    pub description: String,
    /// Parameter names, space separated.
    pub params: String,
    /// Default of the `table` parameter, or empty.
    pub table: String,
    /// Query text.
    pub query: String,
}

impl SearchEntry {
    fn from_definition(def: &QueryDefinition) -> Self {
        Self {
            name: def.name().to_string(),
            description: def.description.clone(),
            params: def.params.keys().map(String::as_str).collect::<Vec<_>>().join(" "),
            table: def
                .params
                .get("table")
                .and_then(|spec| spec.default_as_string())
                .unwrap_or_default(),
            query: def.query.clone(),
        }
    }

    /// Case-insensitive substring match on every field.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.description, &self.params, &self.table, &self.query]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// `family.name` to [`SearchEntry`], in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: BTreeMap<String, SearchEntry>,
}

impl SearchIndex {
    pub(crate) fn build<'a>(
        families: impl IntoIterator<Item = (&'a str, &'a str, &'a QueryDefinition)>,
    ) -> Self {
        let entries = families
            .into_iter()
            .map(|(family, name, def)| (format!("{family}.{name}"), SearchEntry::from_definition(def)))
            .collect();
        Self { entries }
    }

    /// Look up one entry by `family.name`.
    pub fn get(&self, key: &str) -> Option<&SearchEntry> {
        self.entries.get(key)
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SearchEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries with any field containing `term`, ignoring case.
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = (&'a str, &'a SearchEntry)> {
        self.iter().filter(move |(_, entry)| entry.matches(term))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
