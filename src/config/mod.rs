//! Configuration management for Redacta.
//!
//! Redacta reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REDACTA_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use redacta::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("redacta.toml")?;
//! println!("Whitelist: {:?}", config.anonymization.categories.categories());
//! println!("District list: {}", config.anonymization.gazetteers.district.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationConfig`] - Whitelist, detectors, gazetteers, audit
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! categories = ["PERSON", "LOCATION", "EMAIL_ADDRESS", "PHONE_NUMBER"]
//!
//! [anonymization.gazetteers.district]
//! path = "${REDACTA_DATA_DIR}/district.txt"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::AnonymizationConfig;
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, LoggingConfig, RedactaConfig};
