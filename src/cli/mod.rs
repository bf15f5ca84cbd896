//! CLI interface using clap
//!
//! Provides the command-line interface for PageSentinel

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PageSentinel - web page change detection tool
#[derive(Parser, Debug)]
#[command(name = "pagesentinel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file (environment variables override it)
    #[arg(short, long, global = true, env = "PAGESENTINEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the page once and notify if it changed
    Check(CheckArgs),

    /// Check the page repeatedly on a fixed interval
    Watch(WatchArgs),

    /// Show the stored fingerprint
    Status(StatusArgs),

    /// Delete the stored fingerprint so the next check notifies
    Forget(ForgetArgs),

    /// Show the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Override the monitored page URI
    #[arg(short, long)]
    pub uri: Option<String>,
}

/// Arguments for watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Seconds between checks
    #[arg(short, long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

/// Arguments for status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show every stored record, not just the configured page
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for forget command
#[derive(Parser, Debug)]
pub struct ForgetArgs {
    /// URI to forget (defaults to the configured page)
    pub uri: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
