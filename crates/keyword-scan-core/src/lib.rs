//! # keyword-scan core
//!
//! Pure logic for keyword-scan: keyword models, the caller-owned keyword
//! registry, the match engine, snippet construction, highlight markup,
//! and the keyword store trait.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or document
//! parsing. Text extraction and persistence live in the application
//! crate; the engine only ever sees in-memory pages and keywords.

pub mod engine;
pub mod error;
pub mod highlight;
pub mod models;
pub mod registry;
pub mod snippet;
pub mod store;

pub use engine::{MatchEngine, SearchOptions, SearchOutcome};
pub use error::KeywordError;
pub use models::{Category, Keyword, Match, MatchSummary, Page, SearchMode};
pub use registry::KeywordRegistry;
