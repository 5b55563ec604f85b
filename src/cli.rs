// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procwarden`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procwarden",
    version,
    about = "Supervise commands under allowlisted working directories.",
    long_about = None
)]
pub struct CliArgs {
    /// Directories under which command working directories may resolve.
    ///
    /// Appended to any `allowed_roots` from the config file. If neither is
    /// given, the current directory is used and a notice is logged.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Path to an optional config file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wall-clock timeout for commands that do not specify one.
    ///
    /// Overrides `default_timeout_secs` from the config file.
    #[arg(long, value_name = "SECS")]
    pub default_timeout_secs: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCWARDEN_LOG` or a default level will be used.
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
