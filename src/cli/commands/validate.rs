//! Validate config command implementation

use super::EXIT_CONFIG_ERROR;
use crate::anonymization::detector::patterns::PatternRegistry;
use crate::anonymization::gazetteer::GazetteerSet;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let anonymization = &config.anonymization;
        let registry = match anonymization.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let pattern_count = match registry {
            Ok(registry) => registry.all_patterns().len(),
            Err(e) => {
                println!("❌ Pattern library failed to compile");
                println!("   Error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Categories: {}",
            anonymization
                .categories
                .categories()
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Dry Run: {}", anonymization.dry_run);
        println!("  Parallel Detectors: {}", anonymization.parallel_detectors);
        println!(
            "  Pattern Library: {} ({} pattern(s))",
            anonymization
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            pattern_count
        );
        println!(
            "  District Gazetteer: {}",
            anonymization.gazetteers.district.path.display()
        );
        println!(
            "  Commune Gazetteer: {}",
            anonymization.gazetteers.commune.path.display()
        );
        println!("  Audit Logging: {}", anonymization.audit.enabled);
        println!();

        // Missing gazetteers degrade detection but do not invalidate the config
        let gazetteers = GazetteerSet::load(&anonymization.gazetteers)?;
        for warning in gazetteers.warnings() {
            println!("⚠️  {warning}");
        }

        Ok(0)
    }
}
