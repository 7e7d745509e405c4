//! Gazetteer command implementation
//!
//! Shows whether each configured gazetteer could be loaded and how many names
//! it holds.

use super::{load_runtime_config, EXIT_CONFIG_ERROR};
use crate::anonymization::gazetteer::{Gazetteer, GazetteerSet};
use clap::Args;

/// Arguments for the gazetteer command
#[derive(Args, Debug)]
pub struct GazetteerArgs {
    /// Print every name, `; `-joined in source order
    #[arg(long)]
    pub list: bool,
}

impl GazetteerArgs {
    /// Execute the gazetteer command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let gazetteers = GazetteerSet::load(&config.anonymization.gazetteers)?;

        println!("📚 Gazetteers");
        println!();
        for gazetteer in gazetteers.iter() {
            println!("{}", Self::describe(gazetteer));
            if self.list {
                println!("    {}", gazetteer.joined());
            }
        }
        println!();

        for warning in gazetteers.warnings() {
            println!("⚠️  {warning}");
        }

        Ok(0)
    }

    fn describe(gazetteer: &Gazetteer) -> String {
        let source = gazetteer
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(in-memory)".to_string());
        if gazetteer.is_available() {
            format!(
                "  ✅ {:10} {:>6} name(s)  {}",
                gazetteer.name(),
                gazetteer.len(),
                source
            )
        } else {
            format!("  ❌ {:10} {:>6}          {} (missing)", gazetteer.name(), "-", source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_loaded_and_missing() {
        let loaded = Gazetteer::from_names("district", ["Takeo", "Kep"]);
        let line = GazetteerArgs::describe(&loaded);
        assert!(line.contains("district"));
        assert!(line.contains("2 name(s)"));

        let dir = tempfile::tempdir().unwrap();
        let missing = Gazetteer::load("commune", dir.path().join("none.txt")).unwrap();
        assert!(GazetteerArgs::describe(&missing).contains("(missing)"));
    }

    #[tokio::test]
    async fn test_execute_with_defaults() {
        let args = GazetteerArgs { list: true };
        assert_eq!(args.execute("absent.toml").await.unwrap(), 0);
    }
}
