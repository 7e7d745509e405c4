//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that runs the full
//! pipeline for one document:
//!
//! 1. every detector adapter proposes candidate spans for the whitelisted
//!    categories;
//! 2. the resolver picks a non-overlapping subset;
//! 3. the substitution step replaces each accepted span with `<CATEGORY>`;
//! 4. the audit logger records hashes of what was redacted.
//!
//! # Examples
//!
//! ```no_run
//! use redacta::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let result = engine.anonymize("Write to sokha@example.com")?;
//! assert_eq!(result.text, "Write to <EMAIL_ADDRESS>");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::AnonymizationConfig,
    detector::{
        patterns::PatternRegistry, DenyListDetector, EntityRecognizer, NerDetector,
        RegexDetector, SpanDetector,
    },
    gazetteer::GazetteerSet,
    models::{AnonymizedText, CandidateSpan},
    report::DryRunReport,
    resolver::{self, DropReason},
    substitution,
};
use crate::domain::RedactaError;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;

/// Main anonymization engine
///
/// Holds the configured detectors and the loaded gazetteers. All detectors are
/// `Send + Sync`, so the engine can be shared across threads behind an `Arc`.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    gazetteers: GazetteerSet,
    deny_lists: Vec<Arc<dyn SpanDetector>>,
    regex: Arc<dyn SpanDetector>,
    extra: Vec<Arc<dyn SpanDetector>>,
    audit_logger: Option<AuditLogger>,
}

impl std::fmt::Debug for AnonymizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizationEngine")
            .field("config", &self.config)
            .field("gazetteers", &self.gazetteers)
            .finish_non_exhaustive()
    }
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Validates the configuration, loads the gazetteers, and builds the regex
    /// and deny-list detectors. Missing gazetteer files do not fail
    /// construction; see [`gazetteer_warnings`](Self::gazetteer_warnings).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - A gazetteer file exists but cannot be read
    /// - The pattern library cannot be loaded
    /// - Audit logger initialization fails
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;

        let gazetteers =
            GazetteerSet::load(&config.gazetteers).context("Failed to load gazetteers")?;
        let deny_lists = build_deny_lists(&config, &gazetteers)?;

        let registry = match config.pattern_library {
            Some(ref pattern_path) => PatternRegistry::from_file(pattern_path)?,
            None => PatternRegistry::default_patterns()?,
        };
        let regex: Arc<dyn SpanDetector> = Arc::new(
            RegexDetector::with_registry(registry)
                .with_confidence_threshold(config.regex_confidence_threshold),
        );

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?)
        } else {
            None
        };

        tracing::debug!(
            categories = ?config.categories.categories(),
            dry_run = config.dry_run,
            parallel = config.parallel_detectors,
            "Anonymization engine initialized"
        );

        Ok(Self {
            config,
            gazetteers,
            deny_lists,
            regex,
            extra: Vec::new(),
            audit_logger,
        })
    }

    /// Attach a statistical entity recognizer
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.add_detector(Arc::new(NerDetector::new(recognizer)));
        self
    }

    /// Register an additional detector adapter
    pub fn add_detector(&mut self, detector: Arc<dyn SpanDetector>) {
        tracing::debug!(detector = detector.name(), "Detector registered");
        self.extra.push(detector);
    }

    /// Re-read both gazetteers and rebuild their detectors
    pub fn reload_gazetteers(&mut self) -> Result<()> {
        self.gazetteers
            .reload()
            .context("Failed to reload gazetteers")?;
        self.deny_lists = build_deny_lists(&self.config, &self.gazetteers)?;
        Ok(())
    }

    /// All active detectors, in a fixed order
    pub fn detectors(&self) -> impl Iterator<Item = &Arc<dyn SpanDetector>> {
        self.deny_lists
            .iter()
            .chain(std::iter::once(&self.regex))
            .chain(self.extra.iter())
    }

    /// Anonymize a single document
    ///
    /// Returns the rewritten text together with the accepted spans (offsets
    /// into `text`). In dry-run mode the returned text is `text` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if any detector fails or the audit record cannot be
    /// written. No partial output is produced in that case.
    pub fn anonymize(&self, text: &str) -> Result<AnonymizedText> {
        self.anonymize_document(None, text)
    }

    /// Anonymize a document under a caller-supplied identifier
    pub fn anonymize_document(
        &self,
        document_id: Option<String>,
        text: &str,
    ) -> Result<AnonymizedText> {
        let start = Instant::now();

        let candidates = self.collect_candidates(text)?;
        let candidates_total = candidates.len();

        let outcome = resolver::resolve_outcome_in(text, candidates);
        let dropped_malformed = outcome.dropped_count(DropReason::Malformed);

        let output = if self.config.dry_run {
            text.to_string()
        } else {
            substitution::substitute(text, &outcome.accepted)
        };

        let processing_time = start.elapsed().as_millis() as u64;
        let result = AnonymizedText::new(
            document_id,
            output,
            outcome.accepted,
            candidates_total,
            processing_time,
            self.config.dry_run,
        )
        .with_dropped_malformed(dropped_malformed);

        if let Some(ref logger) = self.audit_logger {
            logger.log_anonymization(text, &result)?;
        }

        crate::log_anonymization_complete!(
            &result.document_id,
            result.total_redactions(),
            result.candidates_total,
            processing_time
        );

        Ok(result)
    }

    /// Anonymize a document and return only the output text
    pub fn anonymize_text(&self, text: &str) -> Result<String> {
        Ok(self.anonymize(text)?.text)
    }

    /// Anonymize a batch of documents
    ///
    /// A document that fails is logged and skipped; its text never appears in
    /// the output.
    pub fn anonymize_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<AnonymizedText> {
        let mut results = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            crate::log_batch_processing!(index + 1, texts.len());
            match self.anonymize(text.as_ref()) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(error = ?e, index, "Failed to anonymize document");
                    continue;
                }
            }
        }

        results
    }

    /// Anonymize a batch and generate a dry-run report
    pub fn anonymize_batch_with_report<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> (Vec<AnonymizedText>, DryRunReport) {
        let mut results = Vec::with_capacity(texts.len());
        let mut report = DryRunReport::new();

        for warning in self.gazetteer_warnings() {
            report.add_warning(warning);
        }

        for (index, text) in texts.iter().enumerate() {
            crate::log_batch_processing!(index + 1, texts.len());
            let start = Instant::now();
            match self.anonymize(text.as_ref()) {
                Ok(result) => {
                    let processing_time = start.elapsed().as_millis() as u64;
                    report.add_document(&result, processing_time);
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!(error = ?e, index, "Failed to anonymize document");
                    report.add_failure(format!("Failed to anonymize document {}: {:#}", index, e));
                    continue;
                }
            }
        }

        (results, report)
    }

    /// One message per gazetteer whose source file was missing
    pub fn gazetteer_warnings(&self) -> Vec<String> {
        self.gazetteers.warnings()
    }

    pub fn gazetteers(&self) -> &GazetteerSet {
        &self.gazetteers
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    fn collect_candidates(&self, text: &str) -> Result<Vec<CandidateSpan>> {
        let whitelist = &self.config.categories;
        let detectors: Vec<&Arc<dyn SpanDetector>> = self.detectors().collect();

        let per_detector: Vec<Result<Vec<CandidateSpan>>> = if self.config.parallel_detectors {
            std::thread::scope(|scope| {
                let handles: Vec<_> = detectors
                    .iter()
                    .map(|detector| scope.spawn(move || detector.detect(text, whitelist)))
                    .collect();

                handles
                    .into_iter()
                    .zip(&detectors)
                    .map(|(handle, detector)| {
                        handle.join().unwrap_or_else(|_| {
                            Err(RedactaError::detection(detector.name(), "detector thread panicked")
                                .into())
                        })
                    })
                    .collect()
            })
        } else {
            detectors
                .iter()
                .map(|detector| detector.detect(text, whitelist))
                .collect()
        };

        let mut candidates = Vec::new();
        for (detector, spans) in detectors.iter().zip(per_detector) {
            let spans = spans.with_context(|| format!("Detector '{}' failed", detector.name()))?;
            tracing::trace!(
                detector = detector.name(),
                candidates = spans.len(),
                "Detector finished"
            );
            candidates.extend(spans);
        }

        Ok(candidates)
    }
}

fn build_deny_lists(
    config: &AnonymizationConfig,
    gazetteers: &GazetteerSet,
) -> Result<Vec<Arc<dyn SpanDetector>>> {
    let district = DenyListDetector::from_config(&gazetteers.district, &config.gazetteers.district)?;
    let commune = DenyListDetector::from_config(&gazetteers.commune, &config.gazetteers.commune)?;
    Ok(vec![Arc::new(district), Arc::new(commune)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::{CategoryWhitelist, GazetteerSourceConfig};
    use crate::anonymization::detector::RecognizedEntity;
    use crate::anonymization::models::{DetectionMethod, EntityCategory};
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> AnonymizationConfig {
        let district = dir.join("district.txt");
        let commune = dir.join("commune.txt");
        std::fs::write(&district, "Kampong Cham\nTakeo\n").unwrap();
        std::fs::write(&commune, "Prek Leap\n").unwrap();

        let mut config = AnonymizationConfig::default();
        config.gazetteers.district = GazetteerSourceConfig::at(district);
        config.gazetteers.commune = GazetteerSourceConfig::at(commune);
        config
    }

    fn person_at(name: &'static str) -> Arc<dyn EntityRecognizer> {
        Arc::new(move |text: &str| -> Result<Vec<RecognizedEntity>> {
            Ok(text
                .match_indices(name)
                .map(|(i, m)| RecognizedEntity {
                    entity_type: "PERSON".to_string(),
                    start: i,
                    end: i + m.len(),
                    score: 0.85,
                })
                .collect())
        })
    }

    struct FailingDetector;

    impl SpanDetector for FailingDetector {
        fn name(&self) -> &str {
            "failing"
        }

        fn supported_categories(&self) -> Vec<EntityCategory> {
            vec![EntityCategory::Person]
        }

        fn detect(&self, _: &str, _: &CategoryWhitelist) -> Result<Vec<CandidateSpan>> {
            anyhow::bail!("model offline")
        }
    }

    #[test]
    fn test_engine_creation() {
        let dir = TempDir::new().unwrap();
        let engine = AnonymizationEngine::new(config_in(dir.path())).unwrap();
        assert!(engine.gazetteer_warnings().is_empty());
        assert_eq!(engine.detectors().count(), 3);
    }

    #[test]
    fn test_anonymize_mixed_document() {
        let dir = TempDir::new().unwrap();
        let engine = AnonymizationEngine::new(config_in(dir.path()))
            .unwrap()
            .with_recognizer(person_at("Sokha"));

        let result = engine
            .anonymize("Sokha lives in Kampong Cham; mail sokha@example.com")
            .unwrap();

        assert_eq!(
            result.text,
            "<PERSON> lives in <LOCATION>; mail <EMAIL_ADDRESS>"
        );
        assert_eq!(result.total_redactions(), 3);
        assert!(!result.dry_run);
    }

    #[test]
    fn test_deny_list_beats_ner_location() {
        let dir = TempDir::new().unwrap();
        let recognizer: Arc<dyn EntityRecognizer> =
            Arc::new(|_: &str| -> Result<Vec<RecognizedEntity>> {
                Ok(vec![RecognizedEntity {
                    entity_type: "PERSON".to_string(),
                    start: 0,
                    end: 7,
                    score: 0.6,
                }])
            });
        let engine = AnonymizationEngine::new(config_in(dir.path()))
            .unwrap()
            .with_recognizer(recognizer);

        let result = engine.anonymize("Kampong Cham").unwrap();
        assert_eq!(result.text, "<LOCATION>");
        assert_eq!(result.accepted[0].method, DetectionMethod::DenyList);
        assert_eq!(result.dropped_overlap(), 1);
    }

    #[test]
    fn test_dry_run_returns_original_text() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.dry_run = true;
        let engine = AnonymizationEngine::new(config).unwrap();
        assert!(engine.is_dry_run());

        let text = "Born in Takeo";
        let result = engine.anonymize(text).unwrap();
        assert_eq!(result.text, text);
        assert_eq!(result.accepted.len(), 1);
        assert!(result.dry_run);
    }

    #[test]
    fn test_whitelist_restricts_output() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.categories = CategoryWhitelist::new([EntityCategory::EmailAddress]);
        let engine = AnonymizationEngine::new(config).unwrap();

        let result = engine.anonymize("Takeo, a@b.org").unwrap();
        assert_eq!(result.text, "Takeo, <EMAIL_ADDRESS>");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        let text = "Sokha from Prek Leap, call +855 12 345 678 or sokha@example.com";

        let sequential = AnonymizationEngine::new(config_in(dir.path()))
            .unwrap()
            .with_recognizer(person_at("Sokha"));

        let mut config = config_in(dir.path());
        config.parallel_detectors = true;
        let parallel = AnonymizationEngine::new(config)
            .unwrap()
            .with_recognizer(person_at("Sokha"));

        let a = sequential.anonymize(text).unwrap();
        let b = parallel.anonymize(text).unwrap();
        assert_eq!(a.text, b.text);
        assert_eq!(a.accepted, b.accepted);
    }

    #[test]
    fn test_detector_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let mut engine = AnonymizationEngine::new(config_in(dir.path())).unwrap();
        engine.add_detector(Arc::new(FailingDetector));

        let err = engine.anonymize("anything").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failing"));
        assert!(message.contains("model offline"));
    }

    #[test]
    fn test_batch_skips_failed_documents() {
        let dir = TempDir::new().unwrap();
        let mut engine = AnonymizationEngine::new(config_in(dir.path())).unwrap();
        engine.add_detector(Arc::new(FailingDetector));

        let results = engine.anonymize_batch(&["Takeo", "Kep"]);
        assert!(results.is_empty());

        let (results, report) = engine.anonymize_batch_with_report(&["Takeo"]);
        assert!(results.is_empty());
        assert_eq!(report.stats.documents_failed, 1);
    }

    #[test]
    fn test_batch_with_report_counts_documents() {
        let dir = TempDir::new().unwrap();
        let engine = AnonymizationEngine::new(config_in(dir.path())).unwrap();

        let (results, report) =
            engine.anonymize_batch_with_report(&["Takeo and Kampong Cham", "nothing here"]);
        assert_eq!(results.len(), 2);
        assert_eq!(report.total_documents, 2);
        assert_eq!(report.total_accepted, 2);
        assert_eq!(report.stats.documents_without_entities, 1);
    }

    #[test]
    fn test_missing_gazetteer_degrades() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.gazetteers.commune = GazetteerSourceConfig::at(dir.path().join("absent.txt"));
        let engine = AnonymizationEngine::new(config).unwrap();

        let warnings = engine.gazetteer_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("commune"));

        assert_eq!(engine.anonymize_text("Prek Leap").unwrap(), "Prek Leap");

        let (_, report) = engine.anonymize_batch_with_report(&["Prek Leap"]);
        assert_eq!(report.warnings, warnings);
    }

    #[test]
    fn test_reload_gazetteers_picks_up_new_names() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let district_path = config.gazetteers.district.path.clone();
        let mut engine = AnonymizationEngine::new(config).unwrap();
        assert_eq!(engine.anonymize_text("Kampot").unwrap(), "Kampot");

        std::fs::write(&district_path, "Kampot\n").unwrap();
        engine.reload_gazetteers().unwrap();
        assert_eq!(engine.anonymize_text("Kampot").unwrap(), "<LOCATION>");
    }

    #[test]
    fn test_audit_log_written_without_plaintext() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.audit.enabled = true;
        config.audit.log_path = dir.path().join("audit").join("anonymization.log");
        let engine = AnonymizationEngine::new(config.clone()).unwrap();

        engine.anonymize("mail dara@example.org").unwrap();

        let log = std::fs::read_to_string(&config.audit.log_path).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("EMAIL_ADDRESS"));
        assert!(!log.contains("dara@example.org"));
    }

    #[test]
    fn test_audit_disabled_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.audit.log_path = dir.path().join("audit").join("anonymization.log");
        let engine = AnonymizationEngine::new(config.clone()).unwrap();

        engine.anonymize("mail dara@example.org").unwrap();

        assert!(!config.audit.enabled);
        assert!(!config.audit.log_path.exists());
        assert!(!dir.path().join("audit").exists());
    }
}
