//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` for `Result<T, RedactaError>`,
//! mirroring `anyhow::Context` while keeping the domain error type.
//!
//! # Examples
//!
//! ```rust
//! use redacta::domain::Result;
//! use redacta::domain::context::ResultExt;
//!
//! fn read_gazetteer(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read gazetteer: {}", path))
//! }
//! ```

use crate::domain::errors::RedactaError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error, computing it only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// Implementation for any `Result<T, E>` where `E` converts into `RedactaError`
///
/// Configuration errors keep their variant so callers can still map them to
/// the configuration exit code; everything else becomes `Other`.
impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RedactaError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

fn wrap(base: RedactaError, context: impl std::fmt::Display) -> RedactaError {
    match base {
        RedactaError::Configuration(msg) => {
            RedactaError::Configuration(format!("{context}: {msg}"))
        }
        other => RedactaError::Other(format!("{context}: {other}")),
    }
}
