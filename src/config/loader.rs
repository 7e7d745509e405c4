//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RedactaConfig;
use crate::domain::context::ResultExt;
use crate::domain::errors::RedactaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactaConfig
/// 4. Applies environment variable overrides (REDACTA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RedactaError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override has an invalid value
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use redacta::config::loader::load_config;
///
/// let config = load_config("redacta.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| {
            RedactaError::Configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

    let config = parse_config(&contents)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses configuration from TOML text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<RedactaConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RedactaConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RedactaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RedactaError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(RedactaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the REDACTA_* prefix
///
/// Variables follow the pattern `REDACTA_<SECTION>_<KEY>`, for example
/// `REDACTA_APPLICATION_LOG_LEVEL` or `REDACTA_LOGGING_LOCAL_PATH`.
fn apply_env_overrides(config: &mut RedactaConfig) -> Result<()> {
    if let Ok(val) = std::env::var("REDACTA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| RedactaError::Configuration(format!("{e:#}")))?;

    if let Ok(val) = std::env::var("REDACTA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().map_err(|_| {
            RedactaError::Configuration(format!(
                "Invalid REDACTA_LOGGING_LOCAL_ENABLED value: {val}"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("REDACTA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("REDACTA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
