//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - console output with an `EnvFilter`
//! - optional JSON log files with rotation
//! - helper macros for recurring pipeline events
//!
//! Log records carry categories, offsets, counts and identifiers. They never
//! carry the text of a detected entity.
//!
//! # Example
//!
//! ```no_run
//! use redacta::logging::init_logging;
//! use redacta::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of one anonymized document
///
/// # Example
///
/// ```no_run
/// use redacta::log_anonymization_complete;
///
/// log_anonymization_complete!("doc-1", 3, 5, 2u64);
/// ```
#[macro_export]
macro_rules! log_anonymization_complete {
    ($document_id:expr, $redactions:expr, $candidates:expr, $duration_ms:expr) => {
        tracing::info!(
            document_id = %$document_id,
            redactions = $redactions,
            candidates = $candidates,
            duration_ms = $duration_ms,
            "Anonymization completed"
        );
    };
}

/// Log a gazetteer whose source file is missing
///
/// # Example
///
/// ```no_run
/// use redacta::log_gazetteer_degraded;
/// use std::path::Path;
///
/// log_gazetteer_degraded!("district", Path::new("data/district.txt").display());
/// ```
#[macro_export]
macro_rules! log_gazetteer_degraded {
    ($name:expr, $path:expr) => {
        tracing::warn!(
            gazetteer = $name,
            path = %$path,
            "Gazetteer source missing; deny-list disabled"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use redacta::log_error_with_context;
/// use redacta::domain::RedactaError;
///
/// let error = RedactaError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log batch progress
///
/// # Example
///
/// ```no_run
/// use redacta::log_batch_processing;
///
/// log_batch_processing!(10, 100);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
