//! Error types for ArchivesSpace API operations.

use thiserror::Error;

/// Error type for ArchivesSpace API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP error status.
    #[error("HTTP error {status} for {uri}")]
    HttpError {
        status: reqwest::StatusCode,
        uri: String,
    },

    /// Response body is not the expected JSON.
    #[error("Invalid JSON from {uri}: {source}")]
    InvalidJson {
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    /// A response parsed but does not have the expected shape.
    #[error("Unexpected response from {uri}: {reason}")]
    UnexpectedResponse { uri: String, reason: String },

    /// Base URL or record URI could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication was rejected.
    #[error("Login failed for '{username}': {reason}")]
    LoginFailed { username: String, reason: String },

    /// The request was abandoned because cancellation was signalled.
    #[error("Request cancelled")]
    Cancelled,

    /// Failed to build HTTP client or runtime.
    #[error("Failed to build client: {0}")]
    ClientBuildError(String),
}

impl ClientError {
    pub(crate) fn unexpected(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}
