//! Anonymization pipeline
//!
//! Finds sensitive entities in free text and replaces them with irreversible
//! `<CATEGORY>` placeholders.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Gazetteers**: curated district and commune name lists
//! - **Detection**: independent adapters (statistical recognizer results,
//!   regex contact patterns, gazetteer deny-lists) proposing candidate spans
//! - **Resolution**: greedy selection of a non-overlapping span set
//! - **Substitution**: placeholder rewriting of the accepted spans
//! - **Audit**: structured logging with hashed values
//!
//! # Usage
//!
//! ```rust,ignore
//! use redacta::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//!
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let anonymized = engine.anonymize_text("Sokha lives in Kampong Cham")?;
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod gazetteer;
pub mod models;
pub mod report;
pub mod resolver;
pub mod substitution;

// Re-export main types
pub use config::{AnonymizationConfig, CategoryWhitelist};
pub use engine::AnonymizationEngine;
pub use gazetteer::{Gazetteer, GazetteerSet};
pub use models::{AnonymizedText, CandidateSpan, DetectionMethod, EntityCategory};
pub use report::DryRunReport;
pub use resolver::{resolve, resolve_in};
pub use substitution::substitute;
