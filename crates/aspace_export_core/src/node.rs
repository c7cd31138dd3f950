//! Archival node model.
//!
//! [`ArchivalNode`] is the read-only view the exporter needs of a record:
//! its raw JSON document, its children, the `tree` of a resource, and a way
//! to follow `{"ref": ...}` links. [`JsonNode`] implements it over an
//! in-memory document.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::date::{DateError, DateRecord};

/// Discriminator of top-level resources, whose descendants live under `tree`.
pub const RESOURCE_TYPE: &str = "resource";

/// A record in an archival description hierarchy.
pub trait ArchivalNode: Sized {
    /// Error raised by the collaborator when related records cannot be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The record's attribute document.
    fn json(&self) -> &Value;

    /// Direct children in their stored order.
    fn children(&self) -> Result<Vec<Self>, Self::Error>;

    /// Tree view of a resource. Its `children` are the resource's descendants.
    fn tree(&self) -> Result<Self, Self::Error>;

    /// Loads the record a `{"ref": uri}` link points at.
    fn dereference(&self, uri: &str) -> Result<Value, Self::Error>;

    /// Completes a node returned by [`children`](Self::children) just before
    /// it is visited.
    ///
    /// Implementations may hand out placeholders from `children` and fetch
    /// the full record here, so that siblings are only loaded once the walk
    /// reaches them. The default returns the node unchanged.
    fn load(self) -> Result<Self, Self::Error> {
        Ok(self)
    }

    /// Opaque identifier, empty when the document has none.
    fn uri(&self) -> &str {
        self.json()
            .get("uri")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Record type discriminator, empty when the document has none.
    fn jsonmodel_type(&self) -> &str {
        self.json()
            .get("jsonmodel_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Structured dates attached to the record.
    fn dates(&self) -> Result<Vec<DateRecord>, DateError> {
        match self.json().get("dates") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(dates) => serde_json::from_value(dates.clone())
                .map_err(|e| DateError::Malformed(e.to_string())),
        }
    }
}

/// Whether `node` is a resource and must be entered through its tree.
pub fn is_resource<N: ArchivalNode>(node: &N) -> bool {
    node.jsonmodel_type() == RESOURCE_TYPE
}

/// Errors raised by [`JsonNode`].
#[derive(Debug, Error)]
pub enum JsonNodeError {
    /// A resource document has no `tree` entry.
    #[error("resource {0} has no tree")]
    NoTree(String),

    /// `children` is present but not an array.
    #[error("children of {0} are not an array")]
    InvalidChildren(String),

    /// A reference points at a record that is not in the index.
    #[error("no record for reference {0}")]
    NotFound(String),
}

/// In-memory node over a JSON document.
///
/// Children are read from the `children` array and a resource's tree from
/// its `tree` entry. An optional index maps URIs to records so that
/// references (`{"ref": uri}`) and tree entries carrying a `record_uri`
/// resolve to full records.
#[derive(Debug, Clone)]
pub struct JsonNode {
    value: Arc<Value>,
    index: Arc<HashMap<String, Value>>,
}

impl JsonNode {
    /// Creates a node with no reference index.
    pub fn new(value: Value) -> Self {
        Self::with_index(value, HashMap::new())
    }

    /// Creates a node whose references resolve through `index`.
    pub fn with_index(value: Value, index: HashMap<String, Value>) -> Self {
        Self {
            value: Arc::new(value),
            index: Arc::new(index),
        }
    }

    fn related(&self, value: Value) -> Self {
        Self {
            value: Arc::new(value),
            index: Arc::clone(&self.index),
        }
    }

    /// Replaces tree entries that only carry a `record_uri` with the indexed
    /// record. Nested `children` stay with the entry.
    fn expand_entry(&self, entry: &Value) -> Value {
        let record = entry
            .get("record_uri")
            .and_then(Value::as_str)
            .and_then(|uri| self.index.get(uri));

        match (record, entry.get("children")) {
            (Some(Value::Object(record)), Some(children)) => {
                let mut merged = record.clone();
                merged.insert("children".to_string(), children.clone());
                Value::Object(merged)
            }
            (Some(record), None) => record.clone(),
            _ => entry.clone(),
        }
    }
}

impl ArchivalNode for JsonNode {
    type Error = JsonNodeError;

    fn json(&self) -> &Value {
        &self.value
    }

    fn children(&self) -> Result<Vec<Self>, Self::Error> {
        match self.value.get("children") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries
                .iter()
                .map(|entry| self.related(self.expand_entry(entry)))
                .collect()),
            Some(_) => Err(JsonNodeError::InvalidChildren(self.uri().to_string())),
        }
    }

    fn tree(&self) -> Result<Self, Self::Error> {
        self.value
            .get("tree")
            .map(|tree| self.related(tree.clone()))
            .ok_or_else(|| JsonNodeError::NoTree(self.uri().to_string()))
    }

    fn dereference(&self, uri: &str) -> Result<Value, Self::Error> {
        self.index
            .get(uri)
            .cloned()
            .ok_or_else(|| JsonNodeError::NotFound(uri.to_string()))
    }
}
