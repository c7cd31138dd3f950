//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// aspace-export - Export fields from ArchivesSpace resource trees
#[derive(Parser)]
#[command(name = "aspace-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ArchivesSpace backend URL
    #[arg(long, global = true)]
    pub baseurl: Option<String>,

    /// ArchivesSpace username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// ArchivesSpace password
    #[arg(long, global = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export fields for every node under the given records
    Export(ExportArgs),

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Record URIs or URLs to start from
    #[arg(required = true)]
    pub refs: Vec<String>,

    /// Comma-separated fields in dot notation (e.g. "uri,title,date")
    #[arg(short, long)]
    pub fields: Option<String>,

    /// Generations of descendants to visit (negative for unlimited)
    #[arg(short, long, allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Separator between fields in text output
    #[arg(long)]
    pub field_sep: Option<String>,

    /// Separator between the ends of an inclusive date
    #[arg(long)]
    pub date_sep: Option<String>,

    /// Text shown for missing attributes
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Do not export the starting records themselves
    #[arg(long)]
    pub exclude_top: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One separator-joined row per record
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
