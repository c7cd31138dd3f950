//! ArchivesSpace API client and remote archival nodes.

pub mod client;
pub mod config;
pub mod error;
pub mod node;

pub use client::{AspaceClient, AspaceClientBuilder, DEFAULT_TIMEOUT, SESSION_HEADER};
pub use config::ClientConfig;
pub use error::ClientError;
pub use node::{RemoteNode, TREE_TYPE};
