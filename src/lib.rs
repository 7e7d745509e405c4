// Redacta - Document anonymizer
// Copyright (c) 2025 Redacta Contributors
// Licensed under the MIT License

//! # Redacta - document anonymizer
//!
//! Redacta finds personal data in free text and replaces each occurrence with
//! an irreversible `<CATEGORY>` placeholder.
//!
//! ## Overview
//!
//! Several independent detectors propose candidate spans:
//! - **Statistical recognizer** results (persons, locations), supplied by an
//!   external analyzer
//! - **Regex patterns** for email addresses and phone numbers
//! - **Gazetteer deny-lists** of district and commune names
//!
//! Their proposals usually overlap. A greedy resolver keeps the
//! highest-scoring, longest candidates and drops anything that collides with
//! a span already kept. The survivors are substituted left to right.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Gazetteers, detectors, resolver, substitution, engine
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redacta::anonymization::AnonymizationEngine;
//! use redacta::config::load_config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config("redacta.toml")?;
//!     let engine = AnonymizationEngine::new(config.anonymization)?;
//!
//!     let result = engine.anonymize("Contact Sokha in Kampong Cham at sokha@example.com")?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Resolving candidates directly
//!
//! ```rust
//! use redacta::anonymization::{resolve_in, substitute};
//! use redacta::anonymization::models::{CandidateSpan, DetectionMethod, EntityCategory};
//!
//! let text = "Alice from Paris";
//! let candidates = vec![
//!     CandidateSpan::new(0, 5, EntityCategory::Person, 0.85, DetectionMethod::Ner, "ner"),
//!     CandidateSpan::new(0, 5, EntityCategory::Location, 0.4, DetectionMethod::Ner, "ner"),
//!     CandidateSpan::new(11, 16, EntityCategory::Location, 1.0, DetectionMethod::DenyList, "district"),
//! ];
//!
//! let accepted = resolve_in(text, candidates);
//! assert_eq!(substitute(text, &accepted), "<PERSON> from <LOCATION>");
//! ```
//!
//! ## Error Handling
//!
//! Configuration and gazetteer loading return [`domain::RedactaError`]; the
//! pipeline itself reports detector failures through `anyhow` with context.
//!
//! ## Logging
//!
//! Redacta uses structured logging with the `tracing` crate. Log records carry
//! categories, offsets and counts, never the redacted text.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
