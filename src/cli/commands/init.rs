//! Init command implementation
//!
//! Writes a starter `redacta.toml`.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "redacta.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Redacta configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point the gazetteer paths at your district and commune lists");
                println!("  2. Adjust anonymization.categories if needed");
                println!("  3. Validate configuration: redacta validate-config");
                println!("  4. Try it: redacta anonymize --input note.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Redacta Configuration File

[application]
log_level = "info"

[anonymization]
categories = ["PERSON", "LOCATION", "EMAIL_ADDRESS", "PHONE_NUMBER", "DISTRICT", "COMMUNE"]

[anonymization.gazetteers.district]
path = "data/district.txt"

[anonymization.gazetteers.commune]
path = "data/commune.txt"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Redacta Configuration File
#
# Every setting below shows its default. Values may reference environment
# variables with ${VAR_NAME}, and any setting can be overridden with
# REDACTA_<SECTION>_<KEY> (for example REDACTA_APPLICATION_LOG_LEVEL).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Categories detectors may emit; anything else is ignored
categories = ["PERSON", "LOCATION", "EMAIL_ADDRESS", "PHONE_NUMBER", "DISTRICT", "COMMUNE"]

# Detect and resolve but return the text unchanged
dry_run = false

# Run detector adapters on separate threads
parallel_detectors = false

# Custom regex pattern library (built-in library when unset)
# pattern_library = "patterns/custom.toml"

# Regex patterns with a lower confidence are skipped
regex_confidence_threshold = 0.5

# Gazetteers: one name per line. A missing file disables that list with a
# warning instead of failing.
[anonymization.gazetteers.district]
path = "data/district.txt"
category = "LOCATION"
case_sensitive = false
score = 1.0

[anonymization.gazetteers.commune]
path = "data/commune.txt"
category = "LOCATION"
case_sensitive = false
score = 1.0

# Offsets used in --ner-spans result files: bytes | chars
[anonymization.ner]
offset_unit = "chars"

# One line per anonymized document with SHA-256 hashes of redacted values
[anonymization.audit]
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
