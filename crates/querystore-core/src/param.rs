//! Query parameter schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Schema for a single query parameter.
///
/// Only `type` and `default` are interpreted; any other keys found in the
/// definition file are kept in [`ParamSpec::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared type name (`str`, `datetime`, `list`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Default value, if the parameter is optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Unrecognized keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ParamSpec {
    /// Create a parameter of the given type with no default.
    #[must_use]
    pub fn new(param_type: impl Into<String>) -> Self {
        Self {
            param_type: Some(param_type.into()),
            ..Self::default()
        }
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the default rendered as a plain string, if it is a scalar.
    pub fn default_as_string(&self) -> Option<String> {
        match self.default.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Parameter name to schema, in declaration order.
pub type ParamTable = IndexMap<String, ParamSpec>;

/// Merge `other` into `base`, overwriting values for keys already present.
///
/// Existing keys keep their position; new keys are appended.
pub fn merge_params(base: &mut ParamTable, other: &ParamTable) {
    for (name, spec) in other {
        base.insert(name.clone(), spec.clone());
    }
}
