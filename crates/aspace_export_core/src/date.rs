//! Date sub-records and their display form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default separator between the two ends of an inclusive date.
pub const DEFAULT_DATE_SEPARATOR: &str = "-";

/// Structured date attached to an archival record.
///
/// Only the keys used for display are kept; everything else in the
/// ArchivesSpace `date` model is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl DateRecord {
    /// A single date.
    pub fn single(begin: impl Into<String>) -> Self {
        Self {
            date_type: Some("single".to_string()),
            begin: Some(begin.into()),
            ..Self::default()
        }
    }

    /// A date range.
    pub fn inclusive(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            date_type: Some("inclusive".to_string()),
            begin: Some(begin.into()),
            end: Some(end.into()),
            ..Self::default()
        }
    }

    /// Sets the free-text expression.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

/// Errors produced when a date record cannot be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Neither an expression nor a date type is present.
    #[error("date record has neither an expression nor a date_type")]
    MissingType,

    /// The date type is not one we know how to display.
    #[error("unsupported date_type '{0}' without an expression")]
    UnsupportedType(String),

    /// A required begin/end value is absent.
    #[error("{date_type} date has no '{bound}' value")]
    MissingBound {
        date_type: String,
        bound: &'static str,
    },

    /// The `dates` attribute does not hold date records.
    #[error("malformed dates: {0}")]
    Malformed(String),
}

/// Converts a date record into its display string.
///
/// A non-empty `expression` wins. Otherwise a `single` date shows `begin`
/// and an `inclusive` date shows `begin` and `end` joined by `date_sep`.
pub fn normalize_date(record: &DateRecord, date_sep: &str) -> Result<String, DateError> {
    if let Some(expression) = record.expression.as_deref().filter(|e| !e.is_empty()) {
        return Ok(expression.to_string());
    }

    let date_type = record.date_type.as_deref().ok_or(DateError::MissingType)?;
    let bound = |value: &Option<String>, name: &'static str| {
        value.clone().ok_or_else(|| DateError::MissingBound {
            date_type: date_type.to_string(),
            bound: name,
        })
    };

    match date_type {
        "single" => bound(&record.begin, "begin"),
        "inclusive" => {
            let begin = bound(&record.begin, "begin")?;
            let end = bound(&record.end, "end")?;
            Ok([begin, end].join(date_sep))
        }
        other => Err(DateError::UnsupportedType(other.to_string())),
    }
}
