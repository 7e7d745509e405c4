//! Audit logger for anonymization operations

use crate::anonymization::models::{AnonymizedText, CandidateSpan};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    document_id: String,
    candidates_total: usize,
    redactions_count: usize,
    dry_run: bool,
    processing_time_ms: u64,
    redactions: Vec<AuditRedaction>,
}

/// Audit entry for one accepted span (with hashed value)
#[derive(Debug, Serialize)]
struct AuditRedaction {
    category: String,
    start: usize,
    end: usize,
    score: f32,
    recognizer: String,
    /// SHA-256 hash of the redacted substring (never log plaintext)
    value_hash: String,
}

/// Audit logger for anonymization operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    pub fn log_path(&self) -> &std::path::Path {
        &self.log_path
    }

    /// Log one anonymized document
    ///
    /// `original` is the text the spans index into; only hashes of the
    /// redacted substrings are written.
    pub fn log_anonymization(&self, original: &str, result: &AnonymizedText) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            document_id: result.document_id.clone(),
            candidates_total: result.candidates_total,
            redactions_count: result.accepted.len(),
            dry_run: result.dry_run,
            processing_time_ms: result.processing_time_ms,
            redactions: result
                .accepted
                .iter()
                .map(|span| self.create_audit_redaction(original, span))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn create_audit_redaction(&self, original: &str, span: &CandidateSpan) -> AuditRedaction {
        let value = original.get(span.start..span.end).unwrap_or_default();
        AuditRedaction {
            category: span.category.label().to_string(),
            start: span.start,
            end: span.end,
            score: span.score,
            recognizer: span.recognizer.clone(),
            value_hash: self.hash_value(value),
        }
    }

    /// Hash a redacted value using SHA-256
    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} | Candidates: {} | Redactions: {} | Dry run: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.candidates_total,
                entry.redactions_count,
                entry.dry_run,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
