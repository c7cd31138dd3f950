//! Init command implementation

use std::path::{Path, PathBuf};

use aspace_export_core::ExportConfig;
use miette::{IntoDiagnostic, Result};
use tracing::info;

pub(crate) const DEFAULT_CONFIG: &str = r#"{
  "fields": ["uri", "title", "date"],
  "max_depth": null,
  "include_top": true,
  "field_separator": " <-> ",
  "date_separator": "-",
  "placeholder": "",
  "archivesspace": {
    "baseurl": "http://localhost:8089",
    "username": "admin",
    "password": "admin",
    "timeout_secs": 30
  }
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    write_config(&PathBuf::from(ExportConfig::CONFIG_FILES[0]), force)
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes())
                    .into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
