//! Dry-run reporting for anonymization
//!
//! Summarizes what the pipeline would redact across a batch of documents:
//! candidate and acceptance counts, accepted spans by category, a few sample
//! spans, and warnings (missing gazetteers, failed documents). Samples carry
//! offsets and categories only, never the matched text.

use crate::anonymization::models::{AnonymizedText, CandidateSpan, EntityCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 20;
const SAMPLES_PER_DOCUMENT: usize = 3;

/// Dry-run report with detection statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunReport {
    /// Total documents analyzed
    pub total_documents: usize,

    /// Candidates produced by all detectors
    pub total_candidates: usize,

    /// Spans accepted for redaction
    pub total_accepted: usize,

    /// Candidates dropped as malformed
    pub dropped_malformed: usize,

    /// Candidates dropped for overlapping a higher-priority span
    pub dropped_overlap: usize,

    /// Accepted spans by category
    pub detections_by_category: BTreeMap<EntityCategory, usize>,

    /// Sample accepted spans
    pub samples: Vec<SpanSample>,

    /// Degraded sources and failed documents
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Sample accepted span
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanSample {
    pub document_id: String,
    pub category: EntityCategory,
    pub start: usize,
    pub end: usize,
    pub score: f32,
    pub recognizer: String,
    /// Placeholder the span is (or would be) replaced with
    pub placeholder: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Documents with at least one accepted span
    pub documents_with_entities: usize,

    /// Documents with nothing to redact
    pub documents_without_entities: usize,

    /// Documents skipped after an error
    pub documents_failed: usize,
}

impl DryRunReport {
    /// Create a new empty dry-run report
    pub fn new() -> Self {
        Self {
            total_documents: 0,
            total_candidates: 0,
            total_accepted: 0,
            dropped_malformed: 0,
            dropped_overlap: 0,
            detections_by_category: BTreeMap::new(),
            samples: Vec::new(),
            warnings: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Add results from one processed document
    pub fn add_document(&mut self, result: &AnonymizedText, processing_time_ms: u64) {
        self.total_documents += 1;
        self.total_candidates += result.candidates_total;
        self.total_accepted += result.accepted.len();
        self.dropped_malformed += result.dropped_malformed;
        self.dropped_overlap += result.dropped_overlap();
        self.stats.total_processing_time_ms += processing_time_ms;

        if result.has_redactions() {
            self.stats.documents_with_entities += 1;
            for span in &result.accepted {
                *self.detections_by_category.entry(span.category).or_insert(0) += 1;
            }
            for span in result.accepted.iter().take(SAMPLES_PER_DOCUMENT) {
                self.add_sample(&result.document_id, span);
            }
        } else {
            self.stats.documents_without_entities += 1;
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    /// Record a document that could not be processed
    pub fn add_failure(&mut self, warning: String) {
        self.stats.documents_failed += 1;
        self.add_warning(warning);
    }

    fn add_sample(&mut self, document_id: &str, span: &CandidateSpan) {
        if self.samples.len() >= MAX_SAMPLES {
            return;
        }

        self.samples.push(SpanSample {
            document_id: document_id.to_string(),
            category: span.category,
            start: span.start,
            end: span.end,
            score: span.score,
            recognizer: span.recognizer.clone(),
            placeholder: crate::anonymization::substitution::placeholder(span.category),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                 ANONYMIZATION DRY-RUN REPORT                  \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Total Documents Analyzed:    {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with Entities:     {}\n",
            self.stats.documents_with_entities
        ));
        output.push_str(&format!(
            "  Documents without Entities:  {}\n",
            self.stats.documents_without_entities
        ));
        if self.stats.documents_failed > 0 {
            output.push_str(&format!(
                "  Documents Failed:            {}\n",
                self.stats.documents_failed
            ));
        }
        output.push_str(&format!(
            "  Candidate Spans:             {}\n",
            self.total_candidates
        ));
        output.push_str(&format!(
            "  Accepted Spans:              {}\n",
            self.total_accepted
        ));
        output.push_str(&format!(
            "  Dropped (overlap):           {}\n",
            self.dropped_overlap
        ));
        output.push_str(&format!(
            "  Dropped (malformed):         {}\n",
            self.dropped_malformed
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.detections_by_category.is_empty() {
            output.push_str("🔍 ACCEPTED SPANS BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut categories: Vec<_> = self.detections_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in categories {
                output.push_str(&format!("  {:30} {:>5}\n", category.label(), count));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE SPANS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for (i, sample) in self.samples.iter().take(10).enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Document:    {}\n", sample.document_id));
                output.push_str(&format!("    Category:    {}\n", sample.category));
                output.push_str(&format!(
                    "    Offsets:     {}..{}\n",
                    sample.start, sample.end
                ));
                output.push_str(&format!("    Score:       {:.2}\n", sample.score));
                output.push_str(&format!("    Recognizer:  {}\n", sample.recognizer));
                output.push_str(&format!("    Replacement: {}\n", sample.placeholder));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for DryRunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::DetectionMethod;

    fn result_with(spans: Vec<CandidateSpan>, candidates_total: usize) -> AnonymizedText {
        AnonymizedText::new(
            Some("doc-1".to_string()),
            "unchanged".to_string(),
            spans,
            candidates_total,
            10,
            true,
        )
    }

    #[test]
    fn test_dry_run_report_creation() {
        let report = DryRunReport::new();
        assert_eq!(report.total_documents, 0);
        assert_eq!(report.total_accepted, 0);
        assert!(report.detections_by_category.is_empty());
        assert!(report.samples.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_add_document_without_entities() {
        let mut report = DryRunReport::new();
        report.add_document(&result_with(vec![], 0), 10);

        assert_eq!(report.total_documents, 1);
        assert_eq!(report.total_accepted, 0);
        assert_eq!(report.stats.documents_without_entities, 1);
        assert_eq!(report.stats.documents_with_entities, 0);
        assert_eq!(report.stats.avg_processing_time_ms, 10);
    }

    #[test]
    fn test_add_document_with_entities() {
        let mut report = DryRunReport::new();
        let spans = vec![
            CandidateSpan::new(0, 5, EntityCategory::Person, 0.85, DetectionMethod::Ner, "ner"),
            CandidateSpan::new(
                11,
                16,
                EntityCategory::Location,
                1.0,
                DetectionMethod::DenyList,
                "district",
            ),
        ];
        let result = result_with(spans, 4).with_dropped_malformed(1);

        report.add_document(&result, 15);
        report.add_document(&result_with(vec![], 0), 5);

        assert_eq!(report.total_documents, 2);
        assert_eq!(report.total_candidates, 4);
        assert_eq!(report.total_accepted, 2);
        assert_eq!(report.dropped_malformed, 1);
        assert_eq!(report.dropped_overlap, 1);
        assert_eq!(
            report.detections_by_category.get(&EntityCategory::Location),
            Some(&1)
        );
        assert_eq!(report.samples.len(), 2);
        assert_eq!(report.samples[1].placeholder, "<LOCATION>");
        assert_eq!(report.stats.avg_processing_time_ms, 10);
    }

    #[test]
    fn test_failures_are_counted_and_warned() {
        let mut report = DryRunReport::new();
        report.add_failure("Failed to anonymize document 3".to_string());
        assert_eq!(report.stats.documents_failed, 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_format_console() {
        let mut report = DryRunReport::new();
        report.total_documents = 10;
        report.total_accepted = 5;
        report.stats.documents_with_entities = 3;
        report.stats.documents_without_entities = 7;
        report.stats.avg_processing_time_ms = 12;
        report.add_warning("Gazetteer 'commune' unavailable".to_string());

        let output = report.format_console();
        assert!(output.contains("ANONYMIZATION DRY-RUN REPORT"));
        assert!(output.contains("Total Documents Analyzed:    10"));
        assert!(output.contains("Accepted Spans:              5"));
        assert!(output.contains("Gazetteer 'commune' unavailable"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = DryRunReport::new();
        report.add_document(&result_with(vec![], 2), 3);
        report.write_to_file(&path).unwrap();

        let parsed: DryRunReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.total_documents, 1);
        assert_eq!(parsed.total_candidates, 2);
    }
}
