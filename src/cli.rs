//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for taplinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// Taplinker - NFC tap attribution and funnel analytics service
#[derive(Parser)]
#[command(name = "taplinker")]
#[command(version)]
#[command(about = "NFC tap attribution and funnel analytics service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Insert the four test reps and their house-card tags
    Seed,

    /// Print the funnel report for a time window
    Funnel {
        /// Window size in days
        #[arg(long)]
        days: Option<i64>,

        /// Restrict the report to one rep
        #[arg(long)]
        rep: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Issue an admin bearer token signed with the configured secret
    Token,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
