//! JSON output tree
//!
//! The mirror decides once per table whether it becomes an [`JsonNode::Array`]
//! or an [`JsonNode::Object`]; the node keeps that decision explicit instead of
//! going through a dynamically typed container. Objects keep Lua iteration
//! order so the minified output matches what the interpreter enumerated, while
//! [`SortedKeys`] serializes the same tree with lexicographically ordered keys.

use std::collections::HashMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Placeholder written for Lua functions
pub const FUNCTION_MARKER: &str = "lua function";

/// Placeholder written for entries whose text could not be decoded as UTF-8
pub const DECODE_ERROR_MARKER: &str = "UnicodeDecodeError";

/// Placeholder written when a table is reached again while still being mirrored
pub const CYCLE_MARKER: &str = "lua cycle";

/// Placeholder written when nesting exceeds the configured depth
pub const DEPTH_LIMIT_MARKER: &str = "lua depth limit";

/// A JSON leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn is_empty_text(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// One node of a mirrored Lua value
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// Text-keyed entries in Lua iteration order, keys unique
    Object(Vec<(String, JsonNode)>),
    Array(Vec<JsonNode>),
    Scalar(Scalar),
}

impl JsonNode {
    pub fn empty_object() -> Self {
        JsonNode::Object(Vec::new())
    }

    pub fn text(s: impl Into<String>) -> Self {
        JsonNode::Scalar(Scalar::Text(s.into()))
    }

    /// Null, an empty container or an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            JsonNode::Object(entries) => entries.is_empty(),
            JsonNode::Array(items) => items.is_empty(),
            JsonNode::Scalar(scalar) => *scalar == Scalar::Null || scalar.is_empty_text(),
        }
    }

    /// Replace an empty result with `{}`
    pub fn or_empty_object(self) -> Self {
        if self.is_empty() {
            Self::empty_object()
        } else {
            self
        }
    }

    /// Look up an object entry by key
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        match self {
            JsonNode::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`
    pub fn to_value(&self) -> JsonValue {
        match self {
            JsonNode::Object(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            JsonNode::Array(items) => JsonValue::Array(items.iter().map(Self::to_value).collect()),
            JsonNode::Scalar(Scalar::Null) => JsonValue::Null,
            JsonNode::Scalar(Scalar::Bool(b)) => JsonValue::Bool(*b),
            JsonNode::Scalar(Scalar::Integer(i)) => JsonValue::from(*i),
            JsonNode::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            JsonNode::Scalar(Scalar::Text(s)) => JsonValue::String(s.clone()),
        }
    }
}

impl From<Scalar> for JsonNode {
    fn from(scalar: Scalar) -> Self {
        JsonNode::Scalar(scalar)
    }
}

/// Builds an object with dictionary semantics: a repeated key keeps its first
/// position and takes the last value.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    entries: Vec<(String, JsonNode)>,
    index: HashMap<String, usize>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: JsonNode) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> JsonNode {
        JsonNode::Object(self.entries)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonNode::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            JsonNode::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonNode::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

/// Serializes a node with object keys in lexicographic order at every depth
pub struct SortedKeys<'a>(pub &'a JsonNode);

impl Serialize for SortedKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            JsonNode::Object(entries) => {
                let mut sorted: Vec<&(String, JsonNode)> = entries.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                let mut map = serializer.serialize_map(Some(sorted.len()))?;
                for (key, value) in sorted {
                    map.serialize_entry(key, &SortedKeys(value))?;
                }
                map.end()
            }
            JsonNode::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&SortedKeys(item))?;
                }
                seq.end()
            }
            JsonNode::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}
