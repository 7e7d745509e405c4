//! Detector adapters
//!
//! Every detection source (statistical recognizer, regex library, gazetteer
//! deny-lists) sits behind the [`SpanDetector`] trait and produces raw
//! [`CandidateSpan`]s. Adapters are pure functions of the text and their
//! read-only data, so the engine may run them in any order or in parallel.

pub mod deny_list;
pub mod ner;
pub mod patterns;
pub mod regex;

use crate::anonymization::config::CategoryWhitelist;
use crate::anonymization::models::{CandidateSpan, EntityCategory};
use anyhow::Result;

/// Trait for span detection sources
pub trait SpanDetector: Send + Sync {
    /// Name used in logs, audit records and candidate provenance
    fn name(&self) -> &str;

    /// Categories this detector can emit
    fn supported_categories(&self) -> Vec<EntityCategory>;

    /// Detect candidate spans in `text`, emitting only whitelisted categories
    fn detect(&self, text: &str, whitelist: &CategoryWhitelist) -> Result<Vec<CandidateSpan>>;
}

pub use deny_list::DenyListDetector;
pub use ner::{EntityRecognizer, NerDetector, PrecomputedRecognizer, RecognizedEntity};
pub use regex::RegexDetector;
