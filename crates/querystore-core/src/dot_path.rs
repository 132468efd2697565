//! Dotted-path resolution over a two-level map.
//!
//! A path is first tried as a top-level key. Failing that, it is split at
//! the last `.` into `prefix` and `leaf`, and `map[prefix][leaf]` is tried.
//! Nothing deeper is attempted.

use std::collections::BTreeMap;
use thiserror::Error;

/// Error returned when a dotted path does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{path}' not found")]
pub struct PathNotFound {
    /// The path that was looked up.
    pub path: String,
}

/// What a dotted path resolved to.
#[derive(Debug)]
pub enum PathMatch<'a, V> {
    /// The path named a top-level entry.
    Branch(&'a BTreeMap<String, V>),
    /// The path named a value inside a top-level entry.
    Leaf(&'a V),
}

/// Resolve `path` against `map`.
pub fn resolve<'a, V>(
    path: &str,
    map: &'a BTreeMap<String, BTreeMap<String, V>>,
) -> Result<PathMatch<'a, V>, PathNotFound> {
    if let Some(branch) = map.get(path) {
        return Ok(PathMatch::Branch(branch));
    }
    if let Some((prefix, leaf)) = path.rsplit_once('.') {
        if let Some(value) = map.get(prefix).and_then(|branch| branch.get(leaf)) {
            return Ok(PathMatch::Leaf(value));
        }
    }
    Err(PathNotFound {
        path: path.to_string(),
    })
}

/// Split a dotted name once at its last `.`, into `(container, leaf)`.
///
/// Returns `None` for undotted names.
pub fn split_last(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BTreeMap<String, BTreeMap<String, u32>> {
        let mut map = BTreeMap::new();
        let mut process = BTreeMap::new();
        process.insert("list".to_string(), 1);
        process.insert("tree".to_string(), 2);
        map.insert("Windows.Process".to_string(), process);
        let mut net = BTreeMap::new();
        net.insert("flows".to_string(), 3);
        map.insert("Network".to_string(), net);
        map
    }

    #[test]
    fn test_top_level_key_wins() {
        let map = sample();
        match resolve("Windows.Process", &map).unwrap() {
            PathMatch::Branch(branch) => assert_eq!(branch.len(), 2),
            PathMatch::Leaf(_) => panic!("expected branch"),
        }
    }

    #[test]
    fn test_prefix_and_leaf() {
        let map = sample();
        assert!(matches!(
            resolve("Windows.Process.tree", &map),
            Ok(PathMatch::Leaf(2))
        ));
        assert!(matches!(resolve("Network.flows", &map), Ok(PathMatch::Leaf(3))));
    }

    #[test]
    fn test_not_found_names_path() {
        let map = sample();
        let err = resolve("Windows.list", &map).unwrap_err();
        assert_eq!(err.path, "Windows.list");
        assert_eq!(err.to_string(), "'Windows.list' not found");

        // only one level below the prefix is searched
        assert!(resolve("Network.flows.extra", &map).is_err());
        assert!(resolve("missing", &map).is_err());
    }

    #[test]
    fn test_split_last() {
        assert_eq!(split_last("a.b.c"), Some(("a.b", "c")));
        assert_eq!(split_last("plain"), None);
    }
}
