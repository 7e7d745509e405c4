//! Regex-based contact-data detector

use super::{patterns::PatternRegistry, SpanDetector};
use crate::anonymization::config::CategoryWhitelist;
use crate::anonymization::models::{CandidateSpan, DetectionMethod, EntityCategory};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based detector over a [`PatternRegistry`]
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
}

impl RegexDetector {
    /// Create a new regex detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.5,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

impl SpanDetector for RegexDetector {
    fn name(&self) -> &str {
        "regex"
    }

    fn supported_categories(&self) -> Vec<EntityCategory> {
        self.pattern_registry.categories()
    }

    fn detect(&self, text: &str, whitelist: &CategoryWhitelist) -> Result<Vec<CandidateSpan>> {
        let mut spans = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.confidence_threshold
                || !whitelist.contains(pattern.category)
            {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if matched.is_empty() {
                    continue;
                }
                spans.push(CandidateSpan::new(
                    matched.start(),
                    matched.end(),
                    pattern.category,
                    pattern.confidence,
                    DetectionMethod::Regex,
                    self.name(),
                ));
            }
        }

        Ok(spans)
    }
}
