//! Export command implementation

use std::io::{self, Write};
use std::time::Duration;

use aspace_export_client::{AspaceClient, ClientError};
use aspace_export_core::{ArchivalNode, RecordEmitter, traverse};
use miette::{IntoDiagnostic, Result};
use tracing::{error, info, warn};

use crate::cli::{Cli, ExportArgs};
use crate::config::load_settings;
use crate::output::write_record;
use crate::utils::{Interrupt, create_tokio_runtime, watch_interrupt};

/// How an export run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Completed,
    /// Some subtrees could not be loaded.
    Incomplete,
    Interrupted,
}

pub fn run_export(cli: &Cli, args: &ExportArgs) -> Result<ExportStatus> {
    let settings = load_settings(cli, args)?;
    let emitter = RecordEmitter::from_config(&settings.export).into_diagnostic()?;

    let runtime = create_tokio_runtime()?;
    let interrupt = watch_interrupt(&runtime);

    let client = AspaceClient::builder(&settings.client.baseurl)
        .timeout(Duration::from_secs(settings.client.timeout_secs))
        .cancel_on(interrupt.subscribe())
        .build()
        .into_diagnostic()?;
    if let Err(e) = client.login(&settings.client.username, &settings.client.password) {
        return stopped_or(&interrupt, e);
    }

    let mut stdout = io::stdout().lock();
    let mut failures = 0usize;

    for reference in &args.refs {
        if interrupt.is_set() {
            return Ok(terminated());
        }

        let root = match client.from_uri(reference) {
            Ok(root) => root,
            Err(e) => return stopped_or(&interrupt, e),
        };
        info!("Exporting {}", root.uri());

        let nodes = traverse(
            root,
            settings.export.include_top,
            settings.export.max_depth,
        );
        for item in emitter.records(nodes) {
            if interrupt.is_set() {
                return Ok(terminated());
            }
            match item {
                Ok(record) => write_record(&mut stdout, &record, args.format, &emitter)?,
                Err(e) => {
                    error!("{}", e);
                    failures += 1;
                }
            }
        }
        stdout.flush().into_diagnostic()?;
    }

    if failures > 0 {
        error!("{} subtree(s) could not be loaded", failures);
        return Ok(ExportStatus::Incomplete);
    }
    Ok(ExportStatus::Completed)
}

/// Treats a failure caused by Ctrl-C as an interruption.
fn stopped_or(interrupt: &Interrupt, error: ClientError) -> Result<ExportStatus> {
    if interrupt.is_set() {
        return Ok(terminated());
    }
    Err(error).into_diagnostic()
}

fn terminated() -> ExportStatus {
    warn!("process terminated by user");
    ExportStatus::Interrupted
}
