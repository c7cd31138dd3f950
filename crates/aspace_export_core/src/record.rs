//! Emitted records.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One exported row: field name to rendered value, in requested order.
///
/// `None` marks a true absence (no date records, or a `null` attribute). A
/// missing attribute is not absent; it renders as the placeholder text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field. A name that is already present keeps its first value
    /// and position.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push((name, value));
        }
    }

    /// Looks up a field. The outer `Option` is whether the field exists.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_first_occurrence() {
        let mut record = Record::new();
        record.insert("uri", Some("/a".to_string()));
        record.insert("title", None);
        record.insert("uri", Some("/b".to_string()));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("uri"), Some(Some("/a")));
        assert_eq!(record.get("title"), Some(None));
        assert_eq!(record.get("level"), None);
    }

    #[test]
    fn test_serializes_in_field_order() {
        let mut record = Record::new();
        record.insert("uri", Some("/a".to_string()));
        record.insert("date", None);
        record.insert("title", Some("Letters".to_string()));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"uri":"/a","date":null,"title":"Letters"}"#);
    }
}
