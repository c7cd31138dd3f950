//! Output formatting module

mod json;
mod text;

use std::io::Write;

use aspace_export_core::{Record, RecordEmitter};
use miette::Result;

use crate::cli::OutputFormat;

/// Writes one exported record to `out` in the chosen format.
pub fn write_record(
    out: &mut impl Write,
    record: &Record,
    format: OutputFormat,
    emitter: &RecordEmitter,
) -> Result<()> {
    match format {
        OutputFormat::Json => json::write_json(out, record),
        OutputFormat::Text => text::write_text(out, &emitter.row(record)),
    }
}
