//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - The `parse` and `batch` subcommands
//! - [`Source`] / [`OutputFormat`] - clap-facing mirrors of the library enums
//!
//! The library types ([`crate::parser::Source`], [`crate::format::OutputFormat`])
//! carry no clap dependency; the enums here convert into them with `From`.

use clap::{Parser, Subcommand, ValueEnum};

/// Turn WhatsApp and iMessage exports into speaker turns and
/// input/output training pairs.
#[derive(Parser, Debug, Clone)]
#[command(name = "echolalia")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    echolalia parse wa _chat.txt --user Alice
    echolalia parse imessage Bob.txt --user Me --format jsonl --exclusions
    echolalia batch manifest.yaml --store ./logs --out-dir dataset")]
pub struct Args {
    /// What to do
    #[command(subcommand)]
    pub command: Command,

    /// Output format for every written table
    #[arg(short, long, value_enum, default_value = "csv", global = true)]
    pub format: OutputFormat,

    /// Directory the tables are written to
    #[arg(short, long, default_value = ".", global = true)]
    pub out_dir: String,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a single local export
    Parse(ParseArgs),
    /// Process every source listed in a manifest
    Batch(BatchArgs),
}

/// Arguments of `echolalia parse`.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseArgs {
    /// Chat source type
    #[arg(value_enum)]
    pub source: Source,

    /// Path to the export file
    pub input: String,

    /// Target speaker whose replies become outputs
    #[arg(short, long)]
    pub user: String,

    /// Also write the excluded rows with their reasons
    #[arg(long)]
    pub exclusions: bool,
}

/// Arguments of `echolalia batch`.
#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Manifest path, or a key searched for in the bucket if no such file exists
    pub manifest: String,

    /// Root directory of the blob store (each bucket is a subdirectory)
    #[arg(long, default_value = ".")]
    pub store: String,

    /// Bucket to read from when the manifest does not name one
    #[arg(long, default_value = "echolalia")]
    pub bucket: String,

    /// Attempts per store operation before a document is given up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Process documents one at a time
    #[arg(long)]
    pub sequential: bool,
}

/// Supported chat sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Source {
    /// WhatsApp TXT export
    #[value(name = "whatsapp", alias = "wa")]
    WhatsApp,

    /// imessage-exporter TXT file
    #[value(name = "imessage", alias = "imsg")]
    IMessage,
}

impl From<Source> for crate::parser::Source {
    fn from(source: Source) -> Self {
        match source {
            Source::WhatsApp => crate::parser::Source::WhatsApp,
            Source::IMessage => crate::parser::Source::IMessage,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    #[default]
    Csv,
    /// JSON array
    Json,
    /// JSON Lines
    #[value(alias = "ndjson")]
    Jsonl,
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
