//! Connection settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ClientError;

/// How to reach and authenticate against an ArchivesSpace backend.
///
/// Read from the `archivesspace` section of the configuration file. The
/// defaults match a local development instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API base URL.
    #[serde(default = "default_baseurl")]
    pub baseurl: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_baseurl() -> String {
    "http://localhost:8089".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            baseurl: default_baseurl(),
            username: default_username(),
            password: default_password(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Section name in the configuration document.
    pub const SECTION: &'static str = "archivesspace";

    /// Reads the connection section of a configuration document, falling
    /// back to defaults when it is absent.
    pub fn from_document(document: &Value) -> Result<Self, ClientError> {
        match document.get(Self::SECTION) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(section) => Self::deserialize(section).map_err(|source| {
                ClientError::InvalidJson {
                    uri: Self::SECTION.to_string(),
                    source,
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults_when_section_missing() {
        let config = ClientConfig::from_document(&json!({ "fields": ["uri"] })).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.baseurl, "http://localhost:8089");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = ClientConfig::from_document(&json!({
            "archivesspace": { "baseurl": "https://aspace.example.edu/api", "password": "secret" }
        }))
        .unwrap();

        assert_eq!(config.baseurl, "https://aspace.example.edu/api");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = ClientConfig::from_document(&json!({
            "archivesspace": { "timeout_secs": "soon" }
        }));
        assert!(matches!(result, Err(ClientError::InvalidJson { .. })));
    }
}
