//! Command-line argument definitions.

use std::path::PathBuf;

use bunpro_export_core::ProficiencyLevel;
use clap::{Args, Parser, Subcommand};

/// Export your Bunpro vocabulary progress to CSV
#[derive(Parser, Debug)]
#[command(name = "bunpro-export", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch every level and write the CSV
    Export(ExportArgs),

    /// Manage the cached API token
    Token {
        /// Token action
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect or create the configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Where to take the token from, in priority order.
#[derive(Args, Debug, Default, Clone)]
pub struct TokenSourceArgs {
    /// Token, bare or as the full `Token token=...` header value
    #[arg(long, env = "BUNPRO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// HAR file exported from the browser's network tab
    #[arg(long, value_name = "FILE")]
    pub har: Option<PathBuf>,

    /// File holding a copied request (raw headers, cURL or fetch)
    #[arg(long, value_name = "FILE")]
    pub headers: Option<PathBuf>,

    /// Token cache file (defaults to the configured one)
    #[arg(long, value_name = "FILE")]
    pub token_file: Option<PathBuf>,
}

/// Arguments for `export`.
#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Token sources
    #[command(flatten)]
    pub source: TokenSourceArgs,

    /// Output file, or directory to place the timestamped file in
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Levels to export, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<ProficiencyLevel>,

    /// Pause between page requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// How long to wait for a cached token to appear, in seconds
    #[arg(long)]
    pub wait_secs: Option<u64>,

    /// Reviewable type to export
    #[arg(long)]
    pub reviewable_type: Option<String>,

    /// API base URL
    #[arg(long)]
    pub api_base_url: Option<String>,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Capture a token and cache it
    Capture(TokenSourceArgs),
    /// Print the cached token (redacted unless --reveal)
    Show {
        /// Token cache file
        #[arg(long, value_name = "FILE")]
        token_file: Option<PathBuf>,
        /// Print the full token
        #[arg(long)]
        reveal: bool,
    },
    /// Delete the cached token
    Clear {
        /// Token cache file
        #[arg(long, value_name = "FILE")]
        token_file: Option<PathBuf>,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Print one configuration value
    Get {
        /// Key to look up
        key: String,
    },
    /// Write a default configuration file
    Init {
        /// Where to write it (defaults to the resolved path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
