//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// blockcmp -- compare per-block timings from a Bitcoin Core debug.log and a bitcrust log.
///
/// Use `blockcmp <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "blockcmp", version, about, long_about = None)]
pub struct Cli {
    /// Path to the blockcmp.toml configuration file.
    #[arg(short, long, default_value = "blockcmp.toml", global = true)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable key=value dump.
    Text,
    /// Machine-readable JSON.
    Json,
    /// HTML `<ul class='graph'>` fragment list.
    Html,
}

/// Which of the two logs a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogKind {
    /// Bitcoin Core debug.log (run with -debug=bench).
    Core,
    /// bitcrust log.
    Bitcrust,
}

impl LogKind {
    /// Built-in profile name for this log.
    pub fn profile_name(self) -> &'static str {
        match self {
            Self::Core => blockcmp_log_pipeline::rule::CORE_PROFILE,
            Self::Bitcrust => blockcmp_log_pipeline::rule::BITCRUST_PROFILE,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read both logs, extract block records and join them by hash.
    Compare(CompareArgs),

    /// Extract block records from a single log.
    Extract(ExtractArgs),

    /// Inspect or validate log profiles.
    Profile(ProfileArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- compare ----

/// Compare the tails of both logs.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Override the Bitcoin Core debug.log path.
    #[arg(long)]
    pub core_log: Option<PathBuf>,

    /// Override the bitcrust log path.
    #[arg(long)]
    pub bitcrust_log: Option<PathBuf>,

    /// Number of trailing lines to read from each log.
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    /// Skip frames whose timestamps or numbers cannot be parsed instead of failing.
    #[arg(long)]
    pub skip_malformed: bool,
}

// ---- extract ----

/// Extract records from one log.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Which log to read.
    pub kind: LogKind,

    /// Override the log path.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Number of trailing lines to read.
    #[arg(short = 'n', long)]
    pub lines: Option<usize>,

    /// YAML profile to use instead of the configured or built-in one.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Skip frames whose timestamps or numbers cannot be parsed instead of failing.
    #[arg(long)]
    pub skip_malformed: bool,
}

// ---- profile ----

/// Inspect or validate log profiles.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Show the effective profile for a log (configured file or built-in).
    Show {
        /// Which log's profile to show.
        kind: LogKind,
    },
    /// Validate a YAML profile file.
    Validate {
        /// Path to the profile file.
        path: PathBuf,
    },
}

// ---- config ----

/// Manage blockcmp configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, sources, compare).
        #[arg(long)]
        section: Option<String>,
    },
}
