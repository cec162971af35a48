// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Re-run a command whenever files under a directory (default: current) change.",
    long_about = None
)]
pub struct CliArgs {
    /// Command to run when a file changes, e.g. "cargo run --bin server".
    ///
    /// Split on spaces; shell quoting is not supported.
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Exclude any path containing this substring from watching.
    ///
    /// May be given multiple times.
    #[arg(long = "ex", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Directory to watch recursively.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
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
