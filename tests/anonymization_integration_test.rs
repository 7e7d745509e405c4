//! Integration tests for the anonymization pipeline

use redacta::anonymization::{
    config::{AnonymizationConfig, CategoryWhitelist, GazetteerSourceConfig},
    detector::{DenyListDetector, RecognizedEntity, SpanDetector},
    engine::AnonymizationEngine,
    gazetteer::Gazetteer,
    models::{CandidateSpan, DetectionMethod, EntityCategory, DENY_LIST_SCORE},
    resolve, resolve_in, substitute,
};
use std::sync::Arc;
use tempfile::TempDir;

fn candidate(start: usize, end: usize, category: EntityCategory, score: f32) -> CandidateSpan {
    CandidateSpan::new(start, end, category, score, DetectionMethod::Ner, "ner")
}

/// Engine over temporary gazetteer files
fn create_test_engine(dir: &TempDir, district: &str, commune: &str) -> AnonymizationEngine {
    let district_path = dir.path().join("district.txt");
    let commune_path = dir.path().join("commune.txt");
    std::fs::write(&district_path, district).unwrap();
    std::fs::write(&commune_path, commune).unwrap();

    let mut config = AnonymizationConfig::default();
    config.gazetteers.district = GazetteerSourceConfig::at(district_path);
    config.gazetteers.commune = GazetteerSourceConfig::at(commune_path);
    AnonymizationEngine::new(config).expect("Failed to create engine")
}

#[test]
fn test_higher_score_overlapping_span_wins() {
    let text = "Alice from Paris";
    let accepted = resolve_in(
        text,
        vec![
            candidate(0, 5, EntityCategory::Person, 0.9),
            candidate(2, 8, EntityCategory::Location, 0.95),
        ],
    );

    assert_eq!(accepted.len(), 1);
    assert_eq!((accepted[0].start, accepted[0].end), (2, 8));
    assert_eq!(accepted[0].category, EntityCategory::Location);
    assert_eq!(substitute(text, &accepted), "Al<LOCATION>om Paris");
}

#[test]
fn test_equal_score_longer_span_wins() {
    let accepted = resolve(vec![
        candidate(0, 5, EntityCategory::Person, 0.9),
        candidate(0, 10, EntityCategory::Location, 0.9),
    ]);

    assert_eq!(accepted.len(), 1);
    assert_eq!((accepted[0].start, accepted[0].end), (0, 10));
    assert_eq!(accepted[0].category, EntityCategory::Location);
}

#[test]
fn test_non_overlapping_spans_all_substituted() {
    let text = "Tom went to Kep, ok.";
    assert_eq!(text.len(), 20);

    let accepted = resolve_in(
        text,
        vec![
            candidate(10, 15, EntityCategory::Location, 0.8),
            candidate(0, 3, EntityCategory::Person, 0.9),
        ],
    );
    assert_eq!(accepted.len(), 2);

    let expected = format!("<PERSON>{}<LOCATION>{}", &text[3..10], &text[15..20]);
    assert_eq!(substitute(text, &accepted), expected);
}

#[test]
fn test_empty_candidates_return_text_unchanged() {
    let accepted = resolve_in("hello", Vec::new());
    assert!(accepted.is_empty());
    assert_eq!(substitute("hello", &accepted), "hello");
}

#[test]
fn test_gazetteer_match_becomes_location_placeholder() {
    let gazetteer = Gazetteer::from_names("district", ["Kampong Cham"]);
    let detector = DenyListDetector::new(&gazetteer, EntityCategory::Location).unwrap();

    let text = "The clinic in Kampong Cham opened in May.";
    let spans = detector
        .detect(text, &CategoryWhitelist::default())
        .unwrap();

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].category, EntityCategory::Location);
    assert_eq!(spans[0].score, DENY_LIST_SCORE);
    assert_eq!(&text[spans[0].start..spans[0].end], "Kampong Cham");

    let accepted = resolve_in(text, spans);
    assert_eq!(
        substitute(text, &accepted),
        "The clinic in <LOCATION> opened in May."
    );
}

#[test]
fn test_engine_end_to_end_with_all_detectors() {
    let dir = TempDir::new().unwrap();
    let engine = create_test_engine(&dir, "Kampong Cham\nBattambang\n", "Prek Leap\n")
        .with_recognizer(Arc::new(|text: &str| -> anyhow::Result<Vec<RecognizedEntity>> {
            // A recognizer that also (wrongly) tags the district as a person
            let mut entities = Vec::new();
            if let Some(i) = text.find("Chan Dara") {
                entities.push(RecognizedEntity {
                    entity_type: "PERSON".to_string(),
                    start: i,
                    end: i + "Chan Dara".len(),
                    score: 0.85,
                });
            }
            if let Some(i) = text.find("Kampong") {
                entities.push(RecognizedEntity {
                    entity_type: "PERSON".to_string(),
                    start: i,
                    end: i + "Kampong".len(),
                    score: 0.7,
                });
            }
            Ok(entities)
        }));

    let text = "Chan Dara (chan.dara@example.org, +855 12 345 678) moved from Prek Leap to Kampong Cham.";
    let result = engine.anonymize(text).unwrap();

    assert_eq!(
        result.text,
        "<PERSON> (<EMAIL_ADDRESS>, <PHONE_NUMBER>) moved from <LOCATION> to <LOCATION>."
    );
    assert_eq!(result.total_redactions(), 5);
    assert!(result.dropped_overlap() >= 1);

    // accepted spans are sorted and pairwise disjoint
    for pair in result.accepted.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
}

#[test]
fn test_whitelist_is_enforced_across_detectors() {
    let dir = TempDir::new().unwrap();
    let district = dir.path().join("district.txt");
    std::fs::write(&district, "Takeo\n").unwrap();

    let mut config = AnonymizationConfig::default();
    config.categories = CategoryWhitelist::new([EntityCategory::Person, EntityCategory::PhoneNumber]);
    config.gazetteers.district = GazetteerSourceConfig::at(district);
    config.gazetteers.commune = GazetteerSourceConfig::at(dir.path().join("none.txt"));

    let engine = AnonymizationEngine::new(config).unwrap();
    let result = engine.anonymize("Takeo office: info@takeo.gov.kh").unwrap();
    assert_eq!(result.text, "Takeo office: info@takeo.gov.kh");
    assert!(result.accepted.is_empty());
}

#[test]
fn test_khmer_text_is_preserved_around_placeholders() {
    let dir = TempDir::new().unwrap();
    let engine = create_test_engine(&dir, "Siem Reap\n", "");

    let text = "គាត់រស់នៅ Siem Reap ។ អ៊ីមែល: sokha@example.com";
    let result = engine.anonymize(text).unwrap();
    assert_eq!(result.text, "គាត់រស់នៅ <LOCATION> ។ អ៊ីមែល: <EMAIL_ADDRESS>");
}

#[test]
fn test_batch_results_keep_input_order() {
    let dir = TempDir::new().unwrap();
    let engine = create_test_engine(&dir, "Kep\n", "");

    let results = engine.anonymize_batch(&["Kep", "plain", "a@b.org"]);
    let texts: Vec<_> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["<LOCATION>", "plain", "<EMAIL_ADDRESS>"]);
}
