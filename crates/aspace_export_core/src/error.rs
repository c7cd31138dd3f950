//! Export error types.

use thiserror::Error;

/// Errors that can occur while configuring an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field specification could not be parsed.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl ExportError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
