//! Detect command implementation
//!
//! Runs the pipeline in dry-run mode over one or more documents and prints
//! the detection report. Nothing is rewritten.

use super::{load_runtime_config, read_input, EXIT_CONFIG_ERROR};
use crate::anonymization::detector::PrecomputedRecognizer;
use crate::anonymization::AnonymizationEngine;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Document(s) to analyze (`-` for stdin); repeat for a batch
    #[arg(short, long, required = true)]
    pub input: Vec<String>,

    /// Also write the report as JSON to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// JSON file with statistical recognizer results (single document only)
    #[arg(long, value_name = "JSON")]
    pub ner_spans: Option<PathBuf>,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(documents = self.input.len(), "Starting detect command");

        let mut config = match load_runtime_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        config.anonymization.dry_run = true;

        if self.ner_spans.is_some() && self.input.len() > 1 {
            eprintln!("--ner-spans applies to a single document; pass exactly one --input");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let offset_unit = config.anonymization.ner.offset_unit;
        let mut engine = match AnonymizationEngine::new(config.anonymization) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to initialize anonymization engine");
                eprintln!("Configuration error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Some(ref path) = self.ner_spans {
            let recognizer = PrecomputedRecognizer::from_file(path, offset_unit)?;
            engine = engine.with_recognizer(Arc::new(recognizer));
        }

        let mut texts = Vec::with_capacity(self.input.len());
        for input in &self.input {
            texts.push(read_input(input).await?);
        }

        let (_, report) = engine.anonymize_batch_with_report(&texts);
        println!("{}", report.format_console());

        if let Some(ref path) = self.report {
            report.write_to_file(path)?;
            println!("📄 Report written to {}", path.display());
        }

        Ok(0)
    }
}
