//! JSON lines output formatter

use std::io::Write;

use aspace_export_core::Record;
use miette::{IntoDiagnostic, Result};

pub fn write_json(out: &mut impl Write, record: &Record) -> Result<()> {
    serde_json::to_writer(&mut *out, record).into_diagnostic()?;
    writeln!(out).into_diagnostic()
}
