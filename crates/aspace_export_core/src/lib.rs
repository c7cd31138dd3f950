//! # aspace_export_core
//!
//! Core export engine for aspace-export.
//!
//! This crate provides:
//! - Depth-first, depth-bounded traversal of archival trees
//! - Dotted field-path resolution with a placeholder for missing attributes
//! - Date normalization for the derived `date` field
//! - Record emission and configuration loading
//!
//! ## Example
//!
//! ```rust
//! use aspace_export_core::{JsonNode, RecordEmitter, ExportConfig, traverse};
//! use serde_json::json;
//!
//! let root = JsonNode::new(json!({
//!     "uri": "/repositories/2/archival_objects/1",
//!     "jsonmodel_type": "archival_object",
//!     "dates": [{ "date_type": "single", "begin": "1950" }],
//!     "children": [
//!         { "uri": "/repositories/2/archival_objects/2", "jsonmodel_type": "archival_object" }
//!     ]
//! }));
//!
//! let mut config = ExportConfig::new();
//! config.fields = vec!["uri".to_string(), "date".to_string()];
//! let emitter = RecordEmitter::from_config(&config).unwrap();
//!
//! let rows: Vec<String> = emitter
//!     .records(traverse(root, true, None))
//!     .map(|record| emitter.row(&record.unwrap()))
//!     .collect();
//!
//! assert_eq!(rows[0], "/repositories/2/archival_objects/1 <-> 1950");
//! assert_eq!(rows[1], "/repositories/2/archival_objects/2 <-> ");
//! ```

pub mod config;
pub mod date;
mod emitter;
mod error;
mod missing;
pub mod node;
mod path;
mod record;
pub mod resolver;
pub mod traversal;

pub use config::ExportConfig;
pub use date::{DEFAULT_DATE_SEPARATOR, DateError, DateRecord, normalize_date};
pub use emitter::{DEFAULT_FIELD_SEPARATOR, RecordEmitter};
pub use error::ExportError;
pub use missing::Missing;
pub use node::{ArchivalNode, JsonNode, JsonNodeError, RESOURCE_TYPE, is_resource};
pub use path::{DATE_FIELD, FieldPath, parse_field_list};
pub use record::Record;
pub use resolver::{FieldResolver, MissingAttribute, resolve};
pub use traversal::{Traversal, traverse};
