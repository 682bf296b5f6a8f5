//! CLI argument definitions for the roster importer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Participant roster import - map, validate and preview CSV uploads",
    long_about = "Import a participant roster from CSV.\n\n\
                  Columns are matched to the canonical participant fields, every record is\n\
                  validated, and the first rows are previewed. An optional advisory analysis\n\
                  can be requested from the wizard's analysis endpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: roster.toml in the user config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow participant values (names, emails, phones) to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a participant CSV and report mapping, validation and preview.
    Import(ImportArgs),

    /// Write the header-only CSV template.
    Template(TemplateArgs),

    /// List the canonical participant fields.
    Fields,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Participant CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Declared media type (default: inferred from the file extension).
    #[arg(long = "media-type", value_name = "TYPE")]
    pub media_type: Option<String>,

    /// Map a field to a column, replacing the automatic choice.
    #[arg(long = "map", value_name = "FIELD=HEADER")]
    pub map: Vec<MapOverride>,

    /// Leave a field unmapped.
    #[arg(long = "unmap", value_name = "FIELD")]
    pub unmap: Vec<String>,

    /// Request an advisory analysis from the analysis endpoint.
    #[arg(long = "analyze")]
    pub analyze: bool,

    /// Print the import report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct TemplateArgs {
    /// Output file or directory (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// A `FIELD=HEADER` mapping override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOverride {
    pub field: String,
    pub column: String,
}

impl FromStr for MapOverride {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (field, column) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=HEADER, got '{raw}'"))?;
        let (field, column) = (field.trim(), column.trim());
        if field.is_empty() || column.is_empty() {
            return Err(format!("expected FIELD=HEADER, got '{raw}'"));
        }
        Ok(Self {
            field: field.to_string(),
            column: column.to_string(),
        })
    }
}

impl fmt::Display for MapOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.column)
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
