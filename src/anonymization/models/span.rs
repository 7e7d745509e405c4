//! Candidate span and entity category models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Entity categories recognized by the pipeline
///
/// `District` and `Commune` exist as whitelist labels. Gazetteer matches for
/// those lists are emitted as `Location` unless a gazetteer is configured with
/// its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    /// Person names
    Person,
    /// Geographic locations of any granularity
    Location,
    /// Email addresses
    EmailAddress,
    /// Telephone numbers
    PhoneNumber,
    /// District-level place names
    District,
    /// Commune-level place names
    Commune,
}

impl EntityCategory {
    /// All categories, in label order
    pub const ALL: [EntityCategory; 6] = [
        Self::Person,
        Self::Location,
        Self::EmailAddress,
        Self::PhoneNumber,
        Self::District,
        Self::Commune,
    ];

    /// Uppercase label used in placeholders and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::District => "DISTRICT",
            Self::Commune => "COMMUNE",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityCategory {
    type Err = String;

    /// Parses a label, accepting the short aliases common in pattern libraries
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PERSON" | "NAME" | "PER" => Ok(Self::Person),
            "LOCATION" | "LOC" | "GPE" | "GEOGRAPHIC_LOCATION" => Ok(Self::Location),
            "EMAIL_ADDRESS" | "EMAIL" => Ok(Self::EmailAddress),
            "PHONE_NUMBER" | "PHONE" => Ok(Self::PhoneNumber),
            "DISTRICT" => Ok(Self::District),
            "COMMUNE" => Ok(Self::Commune),
            other => Err(format!("Unknown entity category: {other}")),
        }
    }
}

/// Detection method used to produce a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Statistical named entity recognition (external)
    Ner,
    /// Regex pattern matching
    Regex,
    /// Exact gazetteer membership
    DenyList,
}

/// Fixed score assigned to deny-list matches
pub const DENY_LIST_SCORE: f32 = 1.0;

/// One detector's hypothesis that `[start, end)` denotes a sensitive entity
///
/// Offsets are UTF-8 byte offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Entity category
    pub category: EntityCategory,
    /// Confidence, higher wins
    pub score: f32,
    /// How the span was detected
    pub method: DetectionMethod,
    /// Name of the detector that produced the span
    pub recognizer: String,
}

impl CandidateSpan {
    /// Create a new candidate span
    pub fn new(
        start: usize,
        end: usize,
        category: EntityCategory,
        score: f32,
        method: DetectionMethod,
        recognizer: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            category,
            score,
            method,
            recognizer: recognizer.into(),
        }
    }

    /// Span length in bytes (zero for malformed spans)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the span covers no text
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when the half-open intervals intersect
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Well-formed without reference to a text: non-empty with a finite score
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end && self.score.is_finite()
    }

    /// Well-formed and addressable inside `text`
    pub fn fits(&self, text: &str) -> bool {
        self.is_well_formed()
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Result of running the pipeline over one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Document identifier
    pub document_id: String,
    /// Output text (the original text in dry-run mode)
    pub text: String,
    /// Accepted spans, sorted by start, offsets into the original text
    pub accepted: Vec<CandidateSpan>,
    /// Number of candidates produced by all detectors
    pub candidates_total: usize,
    /// Number of candidates dropped as malformed or overlapping
    pub dropped_total: usize,
    /// Share of `dropped_total` that was malformed rather than overlapping
    #[serde(default)]
    pub dropped_malformed: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Whether the text was left untouched
    pub dry_run: bool,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
    /// Accepted spans by category
    pub stats_by_category: HashMap<EntityCategory, usize>,
}

impl AnonymizedText {
    /// Create a new result, computing per-category statistics
    pub fn new(
        document_id: Option<String>,
        text: String,
        accepted: Vec<CandidateSpan>,
        candidates_total: usize,
        processing_time_ms: u64,
        dry_run: bool,
    ) -> Self {
        let mut stats_by_category = HashMap::new();
        for span in &accepted {
            *stats_by_category.entry(span.category).or_insert(0) += 1;
        }

        Self {
            document_id: document_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            text,
            dropped_total: candidates_total.saturating_sub(accepted.len()),
            dropped_malformed: 0,
            accepted,
            candidates_total,
            processing_time_ms,
            dry_run,
            timestamp: Utc::now(),
            stats_by_category,
        }
    }

    pub fn with_dropped_malformed(mut self, count: usize) -> Self {
        self.dropped_malformed = count.min(self.dropped_total);
        self
    }

    /// Candidates that lost to an overlapping higher-priority span
    pub fn dropped_overlap(&self) -> usize {
        self.dropped_total - self.dropped_malformed
    }

    /// Get total number of accepted spans
    pub fn total_redactions(&self) -> usize {
        self.accepted.len()
    }

    /// Check if anything was redacted
    pub fn has_redactions(&self) -> bool {
        !self.accepted.is_empty()
    }
}
