//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for medredact using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// medredact - selective PII redaction for clinical free text
#[derive(Parser, Debug)]
#[command(name = "medredact")]
#[command(version, about, long_about = None)]
#[command(author = "medredact Contributors")]
pub struct Cli {
    /// Path to configuration file (default: ./medredact.toml if present)
    #[arg(short, long, env = "MEDREDACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDREDACT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize one JSON request
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Anonymize a JSON Lines file of requests
    Batch(commands::batch::BatchArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
