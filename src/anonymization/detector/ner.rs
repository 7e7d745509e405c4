//! Statistical entity recognition adapter
//!
//! Redacta does not run a statistical model itself. An [`EntityRecognizer`]
//! supplies already-computed results (for example from an external analyzer
//! service) and [`NerDetector`] turns them into candidate spans. Recognizer
//! output may overlap or nest freely; the resolver sorts that out.

use super::SpanDetector;
use crate::anonymization::config::{CategoryWhitelist, OffsetUnit};
use crate::anonymization::models::{CandidateSpan, DetectionMethod, EntityCategory};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One raw result from an external recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    /// Recognizer label, e.g. `PERSON` or `DATE_TIME`
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Source of statistical entity results for a text
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`; offsets are UTF-8 byte offsets
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;
}

impl<F> EntityRecognizer for F
where
    F: Fn(&str) -> Result<Vec<RecognizedEntity>> + Send + Sync,
{
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        self(text)
    }
}

/// Recognizer that replays results computed ahead of time
///
/// Results are tied to one document. Offsets given in code points are
/// converted to byte offsets against the text passed to `recognize`; entries
/// whose offsets fall outside that text are dropped.
#[derive(Debug, Clone)]
pub struct PrecomputedRecognizer {
    entities: Vec<RecognizedEntity>,
    offset_unit: OffsetUnit,
}

impl PrecomputedRecognizer {
    pub fn new(entities: Vec<RecognizedEntity>, offset_unit: OffsetUnit) -> Self {
        Self {
            entities,
            offset_unit,
        }
    }

    /// Parse a JSON array of results
    pub fn from_json(json: &str, offset_unit: OffsetUnit) -> Result<Self> {
        let entities: Vec<RecognizedEntity> =
            serde_json::from_str(json).context("Failed to parse recognizer results JSON")?;
        Ok(Self::new(entities, offset_unit))
    }

    /// Load a JSON array of results from a file
    pub fn from_file(path: impl AsRef<Path>, offset_unit: OffsetUnit) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recognizer results: {}", path.display()))?;
        Self::from_json(&json, offset_unit)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityRecognizer for PrecomputedRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        match self.offset_unit {
            OffsetUnit::Bytes => Ok(self.entities.clone()),
            OffsetUnit::Chars => {
                // byte offset of every char index, plus the end of text
                let boundaries: Vec<usize> = text
                    .char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(text.len()))
                    .collect();

                Ok(self
                    .entities
                    .iter()
                    .filter_map(|entity| {
                        let start = *boundaries.get(entity.start)?;
                        let end = *boundaries.get(entity.end)?;
                        Some(RecognizedEntity {
                            start,
                            end,
                            ..entity.clone()
                        })
                    })
                    .collect())
            }
        }
    }
}

/// Adapter from an [`EntityRecognizer`] to [`SpanDetector`]
pub struct NerDetector {
    name: String,
    recognizer: Arc<dyn EntityRecognizer>,
}

impl NerDetector {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::named("ner", recognizer)
    }

    pub fn named(name: impl Into<String>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            name: name.into(),
            recognizer,
        }
    }
}

impl SpanDetector for NerDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_categories(&self) -> Vec<EntityCategory> {
        vec![EntityCategory::Person, EntityCategory::Location]
    }

    fn detect(&self, text: &str, whitelist: &CategoryWhitelist) -> Result<Vec<CandidateSpan>> {
        let entities = self
            .recognizer
            .recognize(text)
            .with_context(|| format!("Recognizer '{}' failed", self.name))?;

        let mut spans = Vec::with_capacity(entities.len());
        for entity in entities {
            let category = match entity.entity_type.parse::<EntityCategory>() {
                Ok(category) if whitelist.contains(category) => category,
                Ok(_) => continue,
                Err(_) => {
                    tracing::trace!(
                        detector = %self.name,
                        entity_type = %entity.entity_type,
                        "Ignoring unsupported entity type"
                    );
                    continue;
                }
            };

            spans.push(CandidateSpan::new(
                entity.start,
                entity.end,
                category,
                entity.score,
                DetectionMethod::Ner,
                self.name.as_str(),
            ));
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(entity_type: &str, start: usize, end: usize, score: f32) -> RecognizedEntity {
        RecognizedEntity {
            entity_type: entity_type.to_string(),
            start,
            end,
            score,
        }
    }

    #[test]
    fn test_maps_labels_and_filters_whitelist() {
        let recognizer = PrecomputedRecognizer::new(
            vec![
                entity("PERSON", 0, 5, 0.85),
                entity("LOCATION", 11, 16, 0.85),
                entity("DATE_TIME", 20, 24, 0.95),
            ],
            OffsetUnit::Bytes,
        );
        let detector = NerDetector::new(Arc::new(recognizer));

        let whitelist = CategoryWhitelist::new([EntityCategory::Person]);
        let spans = detector.detect("Alice from Paris", &whitelist).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category, EntityCategory::Person);
        assert_eq!(spans[0].method, DetectionMethod::Ner);
        assert_eq!(spans[0].recognizer, "ner");
    }

    #[test]
    fn test_nested_results_are_kept() {
        let recognizer = PrecomputedRecognizer::new(
            vec![entity("PERSON", 0, 10, 0.6), entity("PERSON", 0, 5, 0.85)],
            OffsetUnit::Bytes,
        );
        let detector = NerDetector::new(Arc::new(recognizer));
        let spans = detector
            .detect("Sokha Chan", &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_char_offsets_converted_to_bytes() {
        // "Dara" starts at char 6 / byte 8 because 'é' and 'ü' are two bytes each
        let text = "Hélüo Dara";
        let recognizer = PrecomputedRecognizer::new(
            vec![entity("PERSON", 6, 10, 0.85), entity("PERSON", 6, 40, 0.85)],
            OffsetUnit::Chars,
        );

        let results = recognizer.recognize(text).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(&text[results[0].start..results[0].end], "Dara");
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"entity_type": "PERSON", "start": 0, "end": 5, "score": 0.85}]"#;
        let recognizer = PrecomputedRecognizer::from_json(json, OffsetUnit::Bytes).unwrap();
        assert_eq!(recognizer.len(), 1);

        assert!(PrecomputedRecognizer::from_json("{not json", OffsetUnit::Bytes).is_err());
    }

    #[test]
    fn test_closure_recognizer() {
        let recognizer = |text: &str| -> Result<Vec<RecognizedEntity>> {
            Ok(text
                .find("Dara")
                .map(|i| vec![entity("PER", i, i + 4, 0.9)])
                .unwrap_or_default())
        };
        let detector = NerDetector::new(Arc::new(recognizer));
        let spans = detector
            .detect("Hello Dara", &CategoryWhitelist::default())
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 6);
    }

    #[test]
    fn test_recognizer_failure_propagates() {
        let recognizer =
            |_: &str| -> Result<Vec<RecognizedEntity>> { anyhow::bail!("service unavailable") };
        let detector = NerDetector::new(Arc::new(recognizer));
        let err = detector
            .detect("text", &CategoryWhitelist::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("service unavailable"));
    }
}
