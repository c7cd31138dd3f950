//! aspace-export CLI
//!
//! Walks ArchivesSpace resource trees and prints selected fields for every
//! archival object.

mod cli;
mod commands;
mod config;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{ExportStatus, run_export, run_init};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(ExportStatus::Completed) => ExitCode::SUCCESS,
        Ok(ExportStatus::Interrupted) => ExitCode::from(1),
        Ok(ExportStatus::Incomplete) => ExitCode::from(2),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExportStatus> {
    match &cli.command {
        Commands::Export(args) => run_export(cli, args),
        Commands::Init { force } => run_init(*force).map(|_| ExportStatus::Completed),
    }
}
