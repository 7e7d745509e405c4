//! Data models for candidate detections and pipeline results

pub mod span;

pub use span::{
    AnonymizedText, CandidateSpan, DetectionMethod, EntityCategory, DENY_LIST_SCORE,
};
