//! Domain error types
//!
//! This module defines the error hierarchy for Redacta.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Redacta error type
///
/// Used by the configuration, logging and gazetteer layers. The anonymization
/// pipeline itself reports failures through `anyhow` with context attached.
#[derive(Debug, Error)]
pub enum RedactaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Gazetteer source could not be read (a missing source is not an error)
    #[error("Gazetteer error: {0}")]
    Gazetteer(String),

    /// A detector adapter failed
    #[error("Detection error in '{detector}': {message}")]
    Detection { detector: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RedactaError {
    /// Builds a detection error for the named detector
    pub fn detection(detector: impl Into<String>, message: impl Into<String>) -> Self {
        RedactaError::Detection {
            detector: detector.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedactaError {
    fn from(err: std::io::Error) -> Self {
        RedactaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RedactaError {
    fn from(err: serde_json::Error) -> Self {
        RedactaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedactaError {
    fn from(err: toml::de::Error) -> Self {
        RedactaError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacta_error_display() {
        let err = RedactaError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_detection_error_display() {
        let err = RedactaError::detection("ner", "recognizer unavailable");
        assert_eq!(
            err.to_string(),
            "Detection error in 'ner': recognizer unavailable"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RedactaError = io_err.into();
        assert!(matches!(err, RedactaError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RedactaError = json_err.into();
        assert!(matches!(err, RedactaError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RedactaError = toml_err.into();
        assert!(matches!(err, RedactaError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_redacta_error_implements_std_error() {
        let err = RedactaError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
