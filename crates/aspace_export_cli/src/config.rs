//! Configuration discovery and command-line overrides

use std::path::{Path, PathBuf};

use aspace_export_client::ClientConfig;
use aspace_export_core::ExportConfig;
use aspace_export_core::config::read_document;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, ExportArgs};

/// Export and connection settings after overrides are applied.
#[derive(Debug)]
pub struct Settings {
    pub export: ExportConfig,
    pub client: ClientConfig,
}

impl Settings {
    pub fn from_document(document: &Value) -> Result<Self> {
        Ok(Self {
            export: ExportConfig::from_document(document).into_diagnostic()?,
            client: ClientConfig::from_document(document).into_diagnostic()?,
        })
    }

    /// Applies flags given on the command line over file values.
    pub fn apply_overrides(&mut self, cli: &Cli, args: &ExportArgs) {
        if let Some(ref fields) = args.fields {
            self.export.fields = fields.split(',').map(|f| f.trim().to_string()).collect();
        }
        if let Some(depth) = args.depth {
            self.export.max_depth = usize::try_from(depth).ok();
        }
        if let Some(ref sep) = args.field_sep {
            self.export.field_separator = sep.clone();
        }
        if let Some(ref sep) = args.date_sep {
            self.export.date_separator = sep.clone();
        }
        if let Some(ref placeholder) = args.placeholder {
            self.export.placeholder = placeholder.clone();
        }
        if args.exclude_top {
            self.export.include_top = false;
        }

        if let Some(ref baseurl) = cli.baseurl {
            self.client.baseurl = baseurl.clone();
        }
        if let Some(ref username) = cli.username {
            self.client.username = username.clone();
        }
        if let Some(ref password) = cli.password {
            self.client.password = password.clone();
        }
    }
}

/// Loads settings from `--config`, or the first config file found in the
/// current directory or the home directory, then applies CLI overrides.
pub fn load_settings(cli: &Cli, args: &ExportArgs) -> Result<Settings> {
    let document = match cli.config {
        Some(ref path) => read_document(path).into_diagnostic()?,
        None => find_config()?,
    };

    let mut settings = Settings::from_document(&document)?;
    settings.apply_overrides(cli, args);
    Ok(settings)
}

fn find_config() -> Result<Value> {
    let mut candidates = vec![PathBuf::from(".")];
    candidates.extend(dirs::home_dir());

    if let Some(path) = discover(&candidates) {
        info!("Using config: {}", path.display());
        return read_document(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(Value::Object(Default::default()))
}

/// First existing config file in `dirs`, in order.
pub fn discover(dirs: &[impl AsRef<Path>]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            ExportConfig::CONFIG_FILES
                .iter()
                .map(move |name| dir.as_ref().join(name))
        })
        .find(|path| path.is_file())
}
