//! Error types for keyword registration.
//!
//! The match engine itself has no error conditions; these cover the
//! registry and store layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    /// Keyword text was empty or whitespace only.
    #[error("keyword must not be empty")]
    Empty,

    /// A keyword with the same case-insensitive text is already registered.
    #[error("keyword already exists: {0}")]
    Duplicate(String),

    #[error("invalid category: '{0}'. Use positive or negative.")]
    UnknownCategory(String),
}
