//! Structural checks run on a definition before it is admitted.

use crate::definition::QueryDefinition;
use std::collections::BTreeSet;

impl QueryDefinition {
    /// Check the definition is usable.
    ///
    /// Returns every failure found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut failures = Vec::new();
        let name = self.name();

        if self.query.trim().is_empty() {
            failures.push(format!("Source {name} does not have a 'query' property in args."));
        }
        if self.families().is_empty() {
            failures.push(format!("Source {name} has no data_families."));
        }
        for (param, spec) in &self.params {
            if spec.param_type.is_none() {
                failures.push(format!("Source {name} parameter '{param}' has no 'type' property."));
            }
        }

        if !braces_balanced(&self.query) {
            failures.push(format!("Source {name} has an unclosed '{{' or a single '}}' in its query."));
        }

        let missing: Vec<_> = placeholders(&self.query)
            .into_iter()
            .filter(|p| !self.params.contains_key(p.as_str()))
            .collect();
        if !missing.is_empty() {
            failures.push(format!(
                "Source {name} uses parameters that are not defined in defaults or in its own parameters: {}",
                missing.join(", ")
            ));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}

/// Names of the `{placeholder}` fields in a query template.
///
/// `{{` and `}}` are literal braces. Format specs (`{x:fmt}`) and
/// conversions (`{x!r}`) reduce to the field name. An unclosed field
/// contributes nothing.
pub fn placeholders(template: &str) -> BTreeSet<String> {
    scan(template).0
}

/// Whether every `{` field is closed and every lone `}` is escaped.
pub fn braces_balanced(template: &str) -> bool {
    scan(template).1
}

fn scan(template: &str) -> (BTreeSet<String>, bool) {
    let mut fields = BTreeSet::new();
    let mut balanced = true;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
            }
            '}' => balanced = false,
            '{' => {
                let mut field = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    field.push(c);
                }
                if !closed {
                    balanced = false;
                    continue;
                }
                let name = field
                    .split([':', '!'])
                    .next()
                    .unwrap_or_default()
                    .trim();
                if !name.is_empty() {
                    fields.insert(name.to_string());
                }
            }
            _ => {}
        }
    }
    (fields, balanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamSpec;

    #[test]
    fn test_placeholders() {
        let fields = placeholders("{table} | where T > {start:%Y} and x == {{literal}} {v!r}");
        let fields: Vec<_> = fields.iter().map(String::as_str).collect();
        assert_eq!(fields, ["start", "table", "v"]);
        assert!(placeholders("no fields }} here").is_empty());
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(braces_balanced("{table} | {{literal}}"));
        assert!(!braces_balanced("{table"));
        assert!(!braces_balanced("Events | where x == }"));
        assert!(placeholders("{table").is_empty());
    }

    #[test]
    fn test_unclosed_field_fails_validation() {
        let def = QueryDefinition::builder("open", "{table | take 10")
            .family("F")
            .param("table", ParamSpec::new("str"))
            .build();
        let failures = def.validate().unwrap_err();
        assert_eq!(failures.len(), 1, "{failures:?}");
        assert!(failures[0].contains("unclosed '{'"));
    }

    #[test]
    fn test_valid_definition() {
        let def = QueryDefinition::builder("q", "{table} | take 10")
            .family("F")
            .param("table", ParamSpec::new("str"))
            .build();
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_collects_all_failures() {
        let def = QueryDefinition::builder("broken", "{table} | where x == {value}")
            .param("table", ParamSpec::default())
            .build();
        let failures = def.validate().unwrap_err();
        assert_eq!(failures.len(), 3, "{failures:?}");
        assert!(failures[0].contains("no data_families"));
        assert!(failures[1].contains("'table' has no 'type'"));
        assert!(failures[2].ends_with(": value"));
    }

    #[test]
    fn test_empty_query_fails() {
        let def = QueryDefinition::builder("empty", "  ").family("F").build();
        let failures = def.validate().unwrap_err();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("'query'"));
    }
}
