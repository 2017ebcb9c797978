//! Storage abstraction for the keyword registry.
//!
//! The [`KeywordStore`] trait covers every persistence operation the
//! frontends need, so the CLI and HTTP server can run against SQLite while
//! tests and embedders use [`memory::InMemoryKeywordStore`].
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::models::{Category, CategoryCounts, Keyword};
use crate::registry::KeywordRegistry;

/// A keyword as persisted, with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredKeyword {
    pub id: i64,
    #[serde(flatten)]
    pub keyword: Keyword,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Abstract keyword persistence.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add_keyword`](KeywordStore::add_keyword) | Insert, rejecting case-insensitive duplicates |
/// | [`list_keywords`](KeywordStore::list_keywords) | All keywords, optionally one category, in insertion order |
/// | [`find_keyword`](KeywordStore::find_keyword) | Case-insensitive lookup by text |
/// | [`remove_keyword`](KeywordStore::remove_keyword) | Delete by id |
/// | [`count_by_category`](KeywordStore::count_by_category) | Keyword totals per category |
/// | [`load_registry`](KeywordStore::load_registry) | Snapshot into a [`KeywordRegistry`] for a search |
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Insert a keyword.
    ///
    /// Fails with [`KeywordError::Duplicate`](crate::error::KeywordError::Duplicate)
    /// when the same text (ignoring case) already exists.
    async fn add_keyword(&self, keyword: &Keyword) -> Result<StoredKeyword>;

    async fn list_keywords(&self, category: Option<Category>) -> Result<Vec<StoredKeyword>>;

    async fn find_keyword(&self, text: &str) -> Result<Option<StoredKeyword>>;

    /// Returns `false` if no keyword had that id.
    async fn remove_keyword(&self, id: i64) -> Result<bool>;

    async fn count_by_category(&self) -> Result<CategoryCounts>;

    async fn load_registry(&self, category: Option<Category>) -> Result<KeywordRegistry> {
        let stored = self.list_keywords(category).await?;
        Ok(KeywordRegistry::from_keywords(
            stored.into_iter().map(|s| s.keyword),
        ))
    }
}
