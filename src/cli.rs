// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::ResolutionOrdering;

/// Command-line arguments for `branchwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "branchwatch",
    version,
    about = "Print the current git branch of a directory and follow changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to track.
    ///
    /// Default: `[tracker].directory` from the config, then the current
    /// working directory.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Path to a config file (TOML).
    ///
    /// Default: `Branchwatch.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolve the label once, print it and exit.
    #[arg(long)]
    pub once: bool,

    /// Do not watch `.git/logs/HEAD`; the label is resolved only at startup.
    #[arg(long)]
    pub no_watch: bool,

    /// How overlapping resolutions are applied (completion, latest).
    ///
    /// Overrides `[tracker].ordering`.
    #[arg(long, value_name = "ORDERING")]
    pub ordering: Option<ResolutionOrdering>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BRANCHWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
