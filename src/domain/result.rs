//! Result type alias for Redacta

use super::errors::RedactaError;

/// Result type alias for Redacta operations
///
/// # Examples
///
/// ```
/// use redacta::domain::result::Result;
/// use redacta::domain::errors::RedactaError;
///
/// fn failing_function() -> Result<()> {
///     Err(RedactaError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, RedactaError>;
