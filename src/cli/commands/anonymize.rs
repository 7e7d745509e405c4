//! Anonymize command implementation
//!
//! Reads one document, runs the pipeline, and writes the anonymized text to a
//! file or stdout.

use super::{load_runtime_config, read_input, EXIT_CONFIG_ERROR, EXIT_FATAL};
use crate::anonymization::detector::PrecomputedRecognizer;
use crate::anonymization::AnonymizationEngine;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Document to anonymize (`-` for stdin)
    #[arg(short, long)]
    pub input: String,

    /// Write the anonymized text here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// JSON file with statistical recognizer results for this document
    #[arg(long, value_name = "JSON")]
    pub ner_spans: Option<PathBuf>,

    /// Identifier recorded in the audit log
    #[arg(long)]
    pub document_id: Option<String>,

    /// Detect and resolve only; print the report instead of rewriting
    #[arg(long)]
    pub dry_run: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting anonymize command");

        let mut config = match load_runtime_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.anonymization.dry_run = true;
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
            tracing::info!(
                path = %path.display(),
                entities = recognizer.len(),
                "Loaded recognizer results"
            );
            engine = engine.with_recognizer(Arc::new(recognizer));
        }

        for warning in engine.gazetteer_warnings() {
            eprintln!("⚠️  {warning}");
        }

        let text = read_input(&self.input).await?;

        if engine.is_dry_run() {
            let (_, report) = engine.anonymize_batch_with_report(&[text]);
            println!("{}", report.format_console());
            return Ok(if report.stats.documents_failed > 0 {
                EXIT_FATAL
            } else {
                0
            });
        }

        let result = engine.anonymize_document(self.document_id.clone(), &text)?;

        match self.output {
            Some(ref output) => {
                tokio::fs::write(output, &result.text)
                    .await
                    .with_context(|| format!("Failed to write anonymized text: {output}"))?;
                eprintln!(
                    "✅ {} span(s) redacted, written to {}",
                    result.total_redactions(),
                    output
                );
            }
            None => print!("{}", result.text),
        }

        Ok(0)
    }
}
