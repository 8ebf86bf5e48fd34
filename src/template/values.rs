//! Placeholder name → replacement value mapping.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Replacement values keyed by placeholder name.
///
/// Names are matched case-sensitively and exactly, without the surrounding
/// braces. Values are inserted verbatim: braces inside a value are never
/// treated as placeholders. Iteration order is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderValues(BTreeMap<String, String>);

impl PlaceholderValues {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a name, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up the value for a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Check whether a value exists for a name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse and insert a `name=value` assignment.
    ///
    /// The assignment is split at the first `=`, so values may themselves
    /// contain `=` or be empty. The name must not be empty.
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            Error::InvalidValue(format!("expected NAME=VALUE, got {:?}", assignment))
        })?;
        if name.is_empty() {
            return Err(Error::InvalidValue(format!(
                "empty placeholder name in {:?}",
                assignment
            )));
        }
        self.insert(name, value);
        Ok(())
    }

    /// Parse a JSON object of placeholder values.
    ///
    /// Strings are taken as-is; numbers and booleans are stringified and
    /// `null` becomes an empty value. Arrays and objects are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut values = Self::new();
        for (name, value) in raw {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(Error::InvalidValue(format!(
                        "value for {:?} must be a string, number or boolean",
                        name
                    )));
                }
            };
            values.insert(name, text);
        }
        Ok(values)
    }

    /// Merge another mapping into this one; later values win.
    pub fn extend(&mut self, other: PlaceholderValues) {
        self.0.extend(other.0);
    }
}

impl<K, V> FromIterator<(K, V)> for PlaceholderValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
