//! Text output formatter

use std::io::Write;

use miette::{IntoDiagnostic, Result};

pub fn write_text(out: &mut impl Write, row: &str) -> Result<()> {
    writeln!(out, "{}", row).into_diagnostic()
}
