//! CLI interface module
//!
//! This module provides command-line interface functionality for taplinker.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::storage::StorageFactory;
use commands::{config_generate, print_funnel, print_token, seed_demo_data};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::TaplinkerError> for CliError {
    fn from(err: crate::errors::TaplinkerError) -> Self {
        if err.is_client_error() {
            CliError::ParseError(err.message().to_string())
        } else {
            CliError::StorageError(err.to_string())
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is handled by the runtime and never reaches this function.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
        // 不需要数据库
        Commands::Token => print_token(),
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,
        Commands::Seed => {
            let storage = StorageFactory::create().await?;
            seed_demo_data(storage).await
        }
        Commands::Funnel { days, rep, json } => {
            let storage = StorageFactory::create().await?;
            print_funnel(storage, days, rep, json).await
        }
    }
}
