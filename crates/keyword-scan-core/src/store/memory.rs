//! In-memory [`KeywordStore`] implementation for tests and embedding.
//!
//! Keeps keywords in a `Vec` behind `std::sync::RwLock`; ids are assigned
//! from a monotonically increasing counter and never reused.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::error::KeywordError;
use crate::models::{fold_case, Category, CategoryCounts, Keyword};

use super::{KeywordStore, StoredKeyword};

#[derive(Default)]
struct State {
    next_id: i64,
    keywords: Vec<StoredKeyword>,
}

/// In-memory keyword store.
#[derive(Default)]
pub struct InMemoryKeywordStore {
    state: RwLock<State>,
}

impl InMemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("keyword store lock poisoned")
}

#[async_trait]
impl KeywordStore for InMemoryKeywordStore {
    async fn add_keyword(&self, keyword: &Keyword) -> Result<StoredKeyword> {
        let mut state = self.state.write().map_err(poisoned)?;
        let needle = keyword.normalized();
        if state
            .keywords
            .iter()
            .any(|s| s.keyword.normalized() == needle)
        {
            return Err(KeywordError::Duplicate(keyword.text().to_string()).into());
        }
        state.next_id += 1;
        let stored = StoredKeyword {
            id: state.next_id,
            keyword: keyword.clone(),
            created_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
        };
        state.keywords.push(stored.clone());
        Ok(stored)
    }

    async fn list_keywords(&self, category: Option<Category>) -> Result<Vec<StoredKeyword>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .keywords
            .iter()
            .filter(|s| category.map_or(true, |c| s.keyword.category() == c))
            .cloned()
            .collect())
    }

    async fn find_keyword(&self, text: &str) -> Result<Option<StoredKeyword>> {
        let needle = fold_case(text.trim());
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .keywords
            .iter()
            .find(|s| s.keyword.normalized() == needle)
            .cloned())
    }

    async fn remove_keyword(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        let before = state.keywords.len();
        state.keywords.retain(|s| s.id != id);
        Ok(state.keywords.len() != before)
    }

    async fn count_by_category(&self) -> Result<CategoryCounts> {
        let state = self.state.read().map_err(poisoned)?;
        let mut counts = CategoryCounts::default();
        for s in &state.keywords {
            counts.increment(s.keyword.category());
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_list_remove() {
        let store = InMemoryKeywordStore::new();
        let a = store
            .add_keyword(&Keyword::positive("Approved").unwrap())
            .await
            .unwrap();
        let b = store
            .add_keyword(&Keyword::negative("fraud").unwrap())
            .await
            .unwrap();
        assert!(b.id > a.id);

        let negatives = store.list_keywords(Some(Category::Negative)).await.unwrap();
        assert_eq!(negatives.len(), 1);
        assert_eq!(negatives[0].keyword.text(), "fraud");

        assert!(store.remove_keyword(a.id).await.unwrap());
        assert!(!store.remove_keyword(a.id).await.unwrap());
        assert_eq!(store.list_keywords(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_is_typed_error() {
        let store = InMemoryKeywordStore::new();
        store
            .add_keyword(&Keyword::negative("Fraud").unwrap())
            .await
            .unwrap();
        let err = store
            .add_keyword(&Keyword::positive("FRAUD").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KeywordError>(),
            Some(KeywordError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn registry_snapshot_and_counts() {
        let store = InMemoryKeywordStore::new();
        for kw in [
            Keyword::positive("approved").unwrap(),
            Keyword::negative("denied").unwrap(),
            Keyword::negative("fraud").unwrap(),
        ] {
            store.add_keyword(&kw).await.unwrap();
        }

        let counts = store.count_by_category().await.unwrap();
        assert_eq!(counts.positive, 1);
        assert_eq!(counts.negative, 2);

        let registry = store.load_registry(Some(Category::Negative)).await.unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("DENIED"));

        let found = store.find_keyword(" Approved ").await.unwrap().unwrap();
        assert_eq!(found.keyword.category(), Category::Positive);
    }
}
