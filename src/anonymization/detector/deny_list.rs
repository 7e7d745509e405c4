//! Gazetteer deny-list detector
//!
//! Exact substring matching of every gazetteer entry, restricted to word
//! boundaries. Matches are ground truth rather than inference, so all of them
//! carry the same fixed score.

use super::SpanDetector;
use crate::anonymization::config::{CategoryWhitelist, GazetteerSourceConfig};
use crate::anonymization::gazetteer::Gazetteer;
use crate::anonymization::models::{CandidateSpan, DetectionMethod, EntityCategory, DENY_LIST_SCORE};
use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// Deny-list detector backed by one gazetteer
pub struct DenyListDetector {
    name: String,
    category: EntityCategory,
    score: f32,
    case_sensitive: bool,
    // None when the gazetteer is empty
    automaton: Option<AhoCorasick>,
}

impl DenyListDetector {
    /// Build a detector matching `gazetteer` case-insensitively at the maximal score
    ///
    /// Case folding covers ASCII letters only: non-ASCII characters in an
    /// entry (Khmer script, accented Latin) match by exact case.
    pub fn new(gazetteer: &Gazetteer, category: EntityCategory) -> Result<Self> {
        Self::build(gazetteer, category, false, DENY_LIST_SCORE)
    }

    /// Build a detector using the matching options of a configured source
    pub fn from_config(gazetteer: &Gazetteer, config: &GazetteerSourceConfig) -> Result<Self> {
        Self::build(gazetteer, config.category, config.case_sensitive, config.score)
    }

    fn build(
        gazetteer: &Gazetteer,
        category: EntityCategory,
        case_sensitive: bool,
        score: f32,
    ) -> Result<Self> {
        let automaton = if gazetteer.is_empty() {
            None
        } else {
            let automaton = AhoCorasick::builder()
                .ascii_case_insensitive(!case_sensitive)
                .build(gazetteer.names())
                .with_context(|| {
                    format!("Failed to build matcher for gazetteer '{}'", gazetteer.name())
                })?;
            Some(automaton)
        };

        Ok(Self {
            name: gazetteer.name().to_string(),
            category,
            score,
            case_sensitive,
            automaton,
        })
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True when the gazetteer had no entries and nothing can match
    pub fn is_inert(&self) -> bool {
        self.automaton.is_none()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Match must not be glued to surrounding word characters
fn on_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

impl SpanDetector for DenyListDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_categories(&self) -> Vec<EntityCategory> {
        vec![self.category]
    }

    fn detect(&self, text: &str, whitelist: &CategoryWhitelist) -> Result<Vec<CandidateSpan>> {
        let Some(automaton) = &self.automaton else {
            return Ok(Vec::new());
        };
        if !whitelist.contains(self.category) {
            return Ok(Vec::new());
        }

        // Duplicate entries (or entries differing only by case) hit the same
        // interval; keep one candidate per occurrence.
        let mut seen = BTreeSet::new();
        let mut spans = Vec::new();

        for found in automaton.find_overlapping_iter(text) {
            let (start, end) = (found.start(), found.end());
            if start == end || !on_word_boundaries(text, start, end) {
                continue;
            }
            if seen.insert((start, end)) {
                spans.push(CandidateSpan::new(
                    start,
                    end,
                    self.category,
                    self.score,
                    DetectionMethod::DenyList,
                    self.name.as_str(),
                ));
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(names: &[&str]) -> DenyListDetector {
        let gazetteer = Gazetteer::from_names("district", names.iter().copied());
        DenyListDetector::new(&gazetteer, EntityCategory::Location).unwrap()
    }

    fn matched<'a>(text: &'a str, spans: &[CandidateSpan]) -> Vec<&'a str> {
        spans.iter().map(|s| &text[s.start..s.end]).collect()
    }

    #[test]
    fn test_exact_match_at_max_score() {
        let text = "She grew up in Kampong Cham province.";
        let spans = detector(&["Kampong Cham"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();

        assert_eq!(matched(text, &spans), vec!["Kampong Cham"]);
        assert_eq!(spans[0].score, DENY_LIST_SCORE);
        assert_eq!(spans[0].category, EntityCategory::Location);
        assert_eq!(spans[0].method, DetectionMethod::DenyList);
        assert_eq!(spans[0].recognizer, "district");
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let text = "moved to KAMPONG CHAM and then kampong cham";
        let spans = detector(&["Kampong Cham"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_case_sensitive_option() {
        let gazetteer = Gazetteer::from_names("commune", ["Prek Leap"]);
        let mut config = GazetteerSourceConfig::at("unused.txt");
        config.case_sensitive = true;
        let detector = DenyListDetector::from_config(&gazetteer, &config).unwrap();
        assert!(detector.is_case_sensitive());

        let text = "prek leap, Prek Leap";
        let spans = detector.detect(text, &CategoryWhitelist::default()).unwrap();
        assert_eq!(matched(text, &spans), vec!["Prek Leap"]);
        assert_eq!(spans[0].start, 11);
    }

    #[test]
    fn test_requires_word_boundaries() {
        let text = "Takeover of Takeo, not Takeos";
        let spans = detector(&["Takeo"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 12);
    }

    #[test]
    fn test_overlapping_entries_all_reported() {
        let text = "Kampong Cham City";
        let spans = detector(&["Kampong Cham", "Cham City", "Kampong Cham City"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();

        let mut found = matched(text, &spans);
        found.sort();
        assert_eq!(found, vec!["Cham City", "Kampong Cham", "Kampong Cham City"]);
    }

    #[test]
    fn test_duplicate_entries_emit_one_span() {
        let text = "Kep";
        let spans = detector(&["Kep", "Kep", "KEP"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_empty_gazetteer_matches_nothing() {
        let detector = detector(&[]);
        assert!(detector.is_inert());
        assert!(detector
            .detect("Kampong Cham", &CategoryWhitelist::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_whitelisted_category_emits_nothing() {
        let whitelist = CategoryWhitelist::new([EntityCategory::Person]);
        let spans = detector(&["Kep"]).detect("Kep", &whitelist).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_boundaries_around_multibyte_text() {
        let text = "ភូមិ Kep។";
        let spans = detector(&["Kep"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(matched(text, &spans), vec!["Kep"]);
    }

    #[test]
    fn test_non_ascii_letters_are_not_case_folded() {
        let text = "écija, Écija, ÉCIJA";
        let spans = detector(&["Écija"])
            .detect(text, &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(matched(text, &spans), vec!["Écija", "ÉCIJA"]);
    }
}
