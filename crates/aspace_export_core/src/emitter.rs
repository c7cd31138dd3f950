//! Record emission.

use crate::ExportError;
use crate::config::ExportConfig;
use crate::node::ArchivalNode;
use crate::path::FieldPath;
use crate::record::Record;
use crate::resolver::FieldResolver;

/// Default separator between values in a display row.
pub const DEFAULT_FIELD_SEPARATOR: &str = " <-> ";

/// Packages resolved fields into one [`Record`] per node.
#[derive(Debug, Clone)]
pub struct RecordEmitter {
    fields: Vec<FieldPath>,
    field_sep: String,
    resolver: FieldResolver,
}

impl RecordEmitter {
    pub fn new(
        fields: Vec<FieldPath>,
        field_sep: impl Into<String>,
        resolver: FieldResolver,
    ) -> Self {
        Self {
            fields,
            field_sep: field_sep.into(),
            resolver,
        }
    }

    /// Creates an emitter from the fields, separators and placeholder in
    /// `config`.
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        Ok(Self::new(
            config.field_paths()?,
            config.field_separator.clone(),
            FieldResolver::from_config(config),
        ))
    }

    /// Requested fields in order.
    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    pub fn field_separator(&self) -> &str {
        &self.field_sep
    }

    /// Records for `node`. Always exactly one, resolved when first pulled.
    pub fn emit<'a, N: ArchivalNode>(&'a self, node: &'a N) -> impl Iterator<Item = Record> + 'a {
        std::iter::once_with(move || self.resolver.resolve(node, &self.fields))
    }

    /// Applies [`emit`](Self::emit) to every node of a traversal.
    ///
    /// Traversal errors pass through unchanged.
    pub fn records<'a, N, E, I>(&'a self, nodes: I) -> impl Iterator<Item = Result<Record, E>> + 'a
    where
        N: ArchivalNode + 'a,
        E: 'a,
        I: Iterator<Item = Result<N, E>> + 'a,
    {
        nodes.flat_map(move |item| match item {
            Ok(node) => self.emit(&node).map(Ok).collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        })
    }

    /// Joins the record's values in requested field order. Absent values
    /// are shown as empty strings.
    pub fn row(&self, record: &Record) -> String {
        self.fields
            .iter()
            .map(|field| record.get(field.as_str()).flatten().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(&self.field_sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing::Missing;
    use crate::node::JsonNode;
    use crate::path::parse_field_list;
    use crate::traversal::traverse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn emitter(fields: &str) -> RecordEmitter {
        RecordEmitter::new(
            parse_field_list(fields).unwrap(),
            DEFAULT_FIELD_SEPARATOR,
            FieldResolver::default(),
        )
    }

    #[test]
    fn test_emit_yields_single_record() {
        let node = JsonNode::new(json!({ "uri": "/a", "title": "Letters" }));
        let emitter = emitter("uri,title");

        let records: Vec<Record> = emitter.emit(&node).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("title"), Some(Some("Letters")));
    }

    #[test]
    fn test_row_joins_in_field_order() {
        let node = JsonNode::new(json!({ "uri": "/a", "title": "Letters", "dates": [] }));
        let emitter = emitter("title,date,missing,uri,title");

        let record = emitter.emit(&node).next().unwrap();

        assert_eq!(emitter.row(&record), "Letters <->  <->  <-> /a <-> Letters");
    }

    #[test]
    fn test_row_uses_placeholder_for_missing() {
        let node = JsonNode::new(json!({ "uri": "/a" }));
        let emitter = RecordEmitter::new(
            parse_field_list("uri,level").unwrap(),
            ",",
            FieldResolver::new(Missing::new("-"), "-"),
        );

        let record = emitter.emit(&node).next().unwrap();

        assert_eq!(emitter.row(&record), "/a,-");
    }

    #[test]
    fn test_records_follow_traversal_order() {
        let root = JsonNode::new(json!({
            "uri": "R",
            "dates": [{ "date_type": "single", "begin": "1900" }],
            "children": [{ "uri": "C1" }, { "uri": "C2" }]
        }));
        let emitter = emitter("uri,date");

        let rows: Vec<String> = emitter
            .records(traverse(root, true, None))
            .map(|record| emitter.row(&record.unwrap()))
            .collect();

        assert_eq!(rows, vec!["R <-> 1900", "C1 <-> ", "C2 <-> "]);
    }

    #[test]
    fn test_records_pass_errors_through() {
        let root = JsonNode::new(json!({ "uri": "R", "children": 5 }));
        let emitter = emitter("uri");

        let results: Vec<_> = emitter.records(traverse(root, true, None)).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
