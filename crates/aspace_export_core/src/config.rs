//! Export configuration.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ExportError;
use crate::date::DEFAULT_DATE_SEPARATOR;
use crate::emitter::DEFAULT_FIELD_SEPARATOR;
use crate::path::FieldPath;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Settings that control what is exported and how it is displayed.
///
/// The configuration file may carry other sections (such as the
/// `archivesspace` connection block); they are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Fields to export, in dot notation.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Generations of descendants to visit. `None` means unlimited.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Whether each root itself is exported.
    #[serde(default = "default_include_top")]
    pub include_top: bool,

    /// Separator between values in a display row.
    #[serde(default = "default_field_separator")]
    pub field_separator: String,

    /// Separator between the ends of an inclusive date.
    #[serde(default = "default_date_separator")]
    pub date_separator: String,

    /// Text shown for attributes that do not exist.
    #[serde(default)]
    pub placeholder: String,
}

fn default_include_top() -> bool {
    true
}

fn default_field_separator() -> String {
    DEFAULT_FIELD_SEPARATOR.to_string()
}

fn default_date_separator() -> String {
    DEFAULT_DATE_SEPARATOR.to_string()
}

impl ExportConfig {
    /// Configuration file names searched for, in order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".aspace-export.json"];

    /// Creates a configuration with default settings and no fields.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            max_depth: None,
            include_top: true,
            field_separator: default_field_separator(),
            date_separator: default_date_separator(),
            placeholder: String::new(),
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        Self::from_document(&read_document(path)?)
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Self::from_document(&parse_document(json)?)
    }

    /// Extracts export settings from an already validated document.
    pub fn from_document(document: &Value) -> Result<Self, ExportError> {
        Self::deserialize(document)
            .map_err(|e| ExportError::config(format!("Invalid config: {}", e)))
    }

    /// Parses the configured fields.
    pub fn field_paths(&self) -> Result<Vec<FieldPath>, ExportError> {
        if self.fields.is_empty() {
            return Err(ExportError::config("No fields to export"));
        }
        self.fields.iter().map(|f| FieldPath::parse(f)).collect()
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and validates a configuration file, returning the whole document.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value, ExportError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ExportError::config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    parse_document(&content)
}

/// Parses a configuration document and checks it against the schema.
pub fn parse_document(json: &str) -> Result<Value, ExportError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ExportError::config(format!("Invalid JSON: {}", e)))?;

    let schema = CONFIG_SCHEMA.get_or_init(|| {
        let schema_json: Value =
            serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
        Validator::new(&schema_json).expect("Invalid config schema compilation")
    });

    if let Err(e) = schema.validate(&value) {
        return Err(ExportError::config(format!(
            "Config validation failed: {} at {}",
            e,
            e.instance_path()
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_config_new() {
        let config = ExportConfig::new();
        assert!(config.fields.is_empty());
        assert_eq!(config.max_depth, None);
        assert!(config.include_top);
        assert_eq!(config.field_separator, " <-> ");
        assert_eq!(config.date_separator, "-");
        assert_eq!(config.placeholder, "");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "fields": ["uri", "parent.uri", "date"],
            "max_depth": 2,
            "placeholder": "n/a",
            "archivesspace": { "baseurl": "http://localhost:8089" }
        }"#;

        let config = ExportConfig::from_json(json).unwrap();
        assert_eq!(config.fields, vec!["uri", "parent.uri", "date"]);
        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.placeholder, "n/a");
        assert_eq!(config.field_separator, " <-> ");
    }

    #[test]
    fn test_config_null_depth_is_unlimited() {
        let config = ExportConfig::from_json(r#"{ "max_depth": null }"#).unwrap();
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".aspace-export.json");
        fs::write(&path, r#"{ "fields": ["title"], "include_top": false }"#).unwrap();

        let config = ExportConfig::from_file(&path).unwrap();
        assert_eq!(config.fields, vec!["title"]);
        assert!(!config.include_top);
    }

    #[test]
    fn test_config_missing_file() {
        let err = ExportConfig::from_file("/nonexistent/.aspace-export.json").unwrap_err();
        assert!(matches!(
            &err,
            ExportError::Config(message)
                if message.contains("Failed to read config /nonexistent/.aspace-export.json")
        ));
    }

    #[test]
    fn test_field_paths_requires_fields() {
        assert!(ExportConfig::new().field_paths().is_err());
    }

    #[test]
    fn test_field_paths_rejects_malformed() {
        let mut config = ExportConfig::new();
        config.fields = vec!["uri".to_string(), "parent..uri".to_string()];
        assert!(matches!(
            config.field_paths(),
            Err(ExportError::InvalidField { .. })
        ));
    }

    #[rstest]
    #[case::unknown_property(r#"{ "feilds": [] }"#, "Config validation failed")]
    #[case::negative_depth(r#"{ "max_depth": -1 }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "include_top": "yes" }"#, "Config validation failed")]
    #[case::unknown_connection_key(
        r#"{ "archivesspace": { "host": "x" } }"#,
        "Config validation failed"
    )]
    #[case::not_json("{ fields: }", "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let result = ExportConfig::from_json(json);
        assert!(result.is_err(), "Expected error for JSON: {}", json);
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }
}
