//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Redacta using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Redacta - document anonymizer
#[derive(Parser, Debug)]
#[command(name = "redacta")]
#[command(version, about, long_about = None)]
#[command(author = "Redacta Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "redacta.toml", env = "REDACTA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REDACTA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace sensitive entities in a document with placeholders
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Report what would be redacted without rewriting anything
    Detect(commands::detect::DetectArgs),

    /// Show gazetteer health and contents
    Gazetteer(commands::gazetteer::GazetteerArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
