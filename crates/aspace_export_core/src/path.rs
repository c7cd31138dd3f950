//! Dotted field paths.

use std::fmt;
use std::str::FromStr;

use crate::ExportError;

/// Reserved field name for the date derived from a record's date sub-records.
pub const DATE_FIELD: &str = "date";

/// A field specification in dot notation, such as `parent.uri`.
///
/// The original text is both the output column name and the attribute path
/// resolved against each node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Empty paths and empty components are rejected.
    pub fn parse(spec: &str) -> Result<Self, ExportError> {
        let raw = spec.trim();
        if raw.is_empty() {
            return Err(ExportError::invalid_field(spec, "field name is empty"));
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ExportError::invalid_field(
                spec,
                "path contains an empty component",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path as written, used as the output column name.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path components in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First component of the path.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// Whether this path starts at the derived `date` field.
    pub fn is_date(&self) -> bool {
        self.head() == DATE_FIELD
    }
}

impl FromStr for FieldPath {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses a comma-separated list of field specifications.
pub fn parse_field_list(list: &str) -> Result<Vec<FieldPath>, ExportError> {
    list.split(',').map(FieldPath::parse).collect()
}
