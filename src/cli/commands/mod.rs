//! CLI command implementations

pub mod anonymize;
pub mod detect;
pub mod gazetteer;
pub mod init;
pub mod validate;

use crate::config::{load_config, parse_config, RedactaConfig};
use crate::domain::Result;
use std::path::Path;

/// Configuration error exit code
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Fatal error exit code
pub const EXIT_FATAL: i32 = 5;

/// Load the configuration file, or defaults plus env overrides if it does not exist
pub fn load_runtime_config(config_path: &str) -> Result<RedactaConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::info!(
            config_path = %config_path,
            "Configuration file not found; using defaults"
        );
        parse_config("")
    }
}

/// Read a document from a path, or stdin when the path is `-`
pub async fn read_input(input: &str) -> anyhow::Result<String> {
    use anyhow::Context;
    use tokio::io::AsyncReadExt;

    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read document from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read document: {input}"))
    }
}
