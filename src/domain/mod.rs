//! Domain types shared across Redacta.
//!
//! - **Error types** ([`RedactaError`])
//! - **Error context** ([`context::ResultExt`])
//! - **Result type alias** ([`Result`])
//!
//! ```rust
//! use redacta::domain::{RedactaError, Result};
//!
//! fn example() -> Result<()> {
//!     let _config = redacta::config::load_config("redacta.toml")?;
//!     Ok(())
//! }
//! # let _ = example();
//! ```

pub mod context;
pub mod errors;
pub mod result;

pub use errors::RedactaError;
pub use result::Result;
