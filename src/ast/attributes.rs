//! Attribute values and the ordered attribute map

use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered attribute map. Overwriting a key keeps its original position.
pub type Attributes = IndexMap<String, AttrValue>;

/// Value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` renders as `key="key"`, `false` is omitted.
    Bool(bool),
    Text(String),
    /// Accumulated values, joined with spaces on output (used by `class`).
    List(Vec<String>),
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}
