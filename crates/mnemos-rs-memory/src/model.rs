//! Memory record model used by providers.

use crate::error::MemoryError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Metadata key holding the ISO-8601 creation timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";
/// Metadata key holding the source text.
pub const TEXT_KEY: &str = "text";
/// Metadata key holding categorization tags.
pub const TAGS_KEY: &str = "tags";

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// String value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// List of strings.
    List(Vec<String>),
}

impl MetadataValue {
    /// Convert a JSON value, returning None for kinds outside the supported set.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            serde_json::Value::Number(number) => number.as_f64().map(Self::Number),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            _ => None,
        }
    }

    /// Borrow the string value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the list value, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Open metadata map attached to each record.
///
/// Arbitrary keys are allowed. `timestamp` and `text` must be strings and
/// `tags` must be a list of strings when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    /// Create an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from a JSON object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, MemoryError> {
        let Some(object) = value.as_object() else {
            return Err(MemoryError::InvalidMetadata(
                "metadata must be an object".to_string(),
            ));
        };
        let mut metadata = Self::new();
        for (key, value) in object {
            let value = MetadataValue::from_json(value).ok_or_else(|| {
                MemoryError::InvalidMetadata(format!(
                    "{key} must be a string, number, or list of strings"
                ))
            })?;
            metadata.insert(key.clone(), value);
        }
        Ok(metadata)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overlay another map; keys from `other` win.
    pub fn extend(&mut self, other: Metadata) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ISO-8601 creation timestamp.
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_KEY).and_then(MetadataValue::as_str)
    }

    /// Source text, if recorded.
    pub fn text(&self) -> Option<&str> {
        self.get(TEXT_KEY).and_then(MetadataValue::as_str)
    }

    /// Tags, empty when absent.
    pub fn tags(&self) -> &[String] {
        self.get(TAGS_KEY)
            .and_then(MetadataValue::as_list)
            .unwrap_or(&[])
    }

    /// Check that the well-known fields carry the expected kinds and that
    /// every number is finite.
    pub fn validate(&self) -> Result<(), MemoryError> {
        for (key, value) in self.iter() {
            if let MetadataValue::Number(number) = value
                && !number.is_finite()
            {
                return Err(MemoryError::InvalidMetadata(format!(
                    "{key} must be a finite number"
                )));
            }
        }
        for key in [TIMESTAMP_KEY, TEXT_KEY] {
            if let Some(value) = self.get(key)
                && value.as_str().is_none()
            {
                return Err(MemoryError::InvalidMetadata(format!(
                    "{key} must be a string"
                )));
            }
        }
        if let Some(value) = self.get(TAGS_KEY)
            && value.as_list().is_none()
        {
            return Err(MemoryError::InvalidMetadata(
                "tags must be a list of strings".to_string(),
            ));
        }
        Ok(())
    }
}

/// Directed, labeled edge owned by its source record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Target record id.
    pub to: Uuid,
    /// Relation label.
    #[serde(rename = "type")]
    pub relation: String,
}

/// Persisted memory record.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Open metadata map.
    pub metadata: Metadata,
    /// Outgoing edges in insertion order.
    pub connections: Vec<Edge>,
}

/// One ranked search result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub id: Uuid,
    /// Cosine similarity in [-1, 1].
    pub score: f64,
    pub metadata: Metadata,
}

/// Edge as emitted in a subgraph.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubgraphEdge {
    pub from: Uuid,
    pub to: Uuid,
    pub relation: String,
}

/// Nodes and edges reachable from a root within a depth bound.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Subgraph {
    /// Node metadata in discovery order.
    pub nodes: IndexMap<Uuid, Metadata>,
    pub edges: Vec<SubgraphEdge>,
}

/// Listing entry for recency browsing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemorySummary {
    pub id: Uuid,
    pub metadata: Metadata,
    /// Number of outgoing edges.
    pub connections: usize,
}

#[cfg(test)]
mod tests {
    use super::{Metadata, MetadataValue};
    use crate::MemoryError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn metadata_from_json_accepts_supported_kinds() {
        let metadata = Metadata::from_json(&json!({
            "text": "hello",
            "score": 2.5,
            "tags": ["a", "b"]
        }))
        .expect("metadata");
        assert_eq!(metadata.text(), Some("hello"));
        assert_eq!(metadata.get("score"), Some(&MetadataValue::Number(2.5)));
        assert_eq!(metadata.tags(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn metadata_from_json_rejects_nested_objects() {
        let err = Metadata::from_json(&json!({ "nested": { "a": 1 } })).unwrap_err();
        let MemoryError::InvalidMetadata(message) = err else {
            panic!("expected invalid metadata");
        };
        assert!(message.contains("nested"));
    }

    #[test]
    fn validate_rejects_numeric_timestamp() {
        let metadata = Metadata::new().with("timestamp", 12.0);
        assert!(matches!(
            metadata.validate(),
            Err(MemoryError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn metadata_serializes_as_flat_object() {
        let metadata = Metadata::new()
            .with("text", "note")
            .with("tags", vec!["x".to_string()]);
        let value = serde_json::to_value(&metadata).expect("serialize");
        assert_eq!(value, json!({ "tags": ["x"], "text": "note" }));
    }
}
