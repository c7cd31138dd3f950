//! Archival records loaded from an ArchivesSpace backend.

use std::sync::Arc;

use aspace_export_core::ArchivalNode;
use serde_json::Value;
use tracing::debug;

use crate::client::AspaceClient;
use crate::error::ClientError;

/// Discriminator of the tree document returned for a resource.
pub const TREE_TYPE: &str = "resource_tree";

/// A record fetched from the backend.
///
/// Related records (children, the resource tree, references) are loaded on
/// demand through the client that fetched this one. Children listed in a
/// resource tree start out as the tree entry and fetch their full record
/// when the walk reaches them.
#[derive(Debug, Clone)]
pub struct RemoteNode {
    record: Arc<Value>,
    client: AspaceClient,
    /// URI still to fetch when this node is only a tree entry.
    unloaded: Option<String>,
}

impl RemoteNode {
    pub fn new(record: Value, client: AspaceClient) -> Self {
        Self {
            record: Arc::new(record),
            client,
            unloaded: None,
        }
    }

    /// A tree entry whose full record is fetched by [`ArchivalNode::load`].
    fn entry(entry: Value, record_uri: String, client: AspaceClient) -> Self {
        Self {
            record: Arc::new(entry),
            client,
            unloaded: Some(record_uri),
        }
    }

    /// Whether the full record has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.unloaded.is_none()
    }

    fn tree_children(&self, entries: &[Value]) -> Result<Vec<Self>, ClientError> {
        entries
            .iter()
            .map(|entry| {
                let uri = entry
                    .get("record_uri")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ClientError::unexpected(self.uri(), "tree entry without record_uri")
                    })?;
                Ok(Self::entry(
                    entry.clone(),
                    self.client.relative_uri(uri),
                    self.client.clone(),
                ))
            })
            .collect()
    }
}

impl ArchivalNode for RemoteNode {
    type Error = ClientError;

    /// The fetched record, or the tree entry while it is not loaded.
    fn json(&self) -> &Value {
        &self.record
    }

    /// Tree documents list their children inline and each entry is fetched
    /// by `record_uri` once reached. Other records ask the backend for
    /// `{uri}/children`.
    fn children(&self) -> Result<Vec<Self>, Self::Error> {
        if self.jsonmodel_type() == TREE_TYPE {
            return match self.record.get("children") {
                Some(Value::Array(entries)) => self.tree_children(entries),
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(_) => Err(ClientError::unexpected(
                    self.uri(),
                    "tree children are not an array",
                )),
            };
        }

        let endpoint = format!("{}/children", self.uri());
        debug!("Fetching children of {}", self.uri());
        match self.client.get_json(&endpoint)? {
            Value::Array(records) => Ok(records
                .into_iter()
                .map(|record| Self::new(record, self.client.clone()))
                .collect()),
            _ => Err(ClientError::unexpected(endpoint, "children are not an array")),
        }
    }

    fn tree(&self) -> Result<Self, Self::Error> {
        let tree = self.client.get_json(&format!("{}/tree", self.uri()))?;
        Ok(Self::new(tree, self.client.clone()))
    }

    fn dereference(&self, uri: &str) -> Result<Value, Self::Error> {
        self.client.get_json(uri)
    }

    fn load(self) -> Result<Self, Self::Error> {
        match self.unloaded {
            Some(ref uri) => self.client.from_uri(uri),
            None => Ok(self),
        }
    }
}
