//! Caller-supplied name lists and protected term sets

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Ordered list of literal names to redact
///
/// Built from arbitrary JSON values at the request boundary: strings are
/// kept as-is, numbers and booleans become their text form, arrays and
/// objects become their JSON text, and `null` is dropped. Blank entries are
/// dropped after coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Value>")]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerce boundary values into a name list
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let names = values
            .into_iter()
            .filter_map(coerce_name)
            .filter(|name| !name.trim().is_empty())
            .collect();
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<Value>> for NameList {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self::from_values(names.into_iter().map(Value::String))
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        Self::from_values(names.into_iter().map(|name| Value::String(name.to_string())))
    }
}

fn coerce_name(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
    }
}

/// Domain terms that must survive redaction, as spelled in the source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedTermSet(BTreeSet<String>);

impl ProtectedTermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-sensitive membership
    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Terms in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Approximate heap footprint, used to weigh cache entries
    pub fn byte_size(&self) -> usize {
        self.0.iter().map(String::len).sum()
    }
}

impl<S: Into<String>> FromIterator<S> for ProtectedTermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
