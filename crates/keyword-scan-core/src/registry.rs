//! Caller-owned keyword registry.
//!
//! Holds the monitored keywords for one search. Uniqueness is enforced on
//! the lower-cased text, so `"Fraud"` and `"fraud"` cannot both be
//! registered. Insertion order is preserved and drives match discovery
//! order within a line.

use tracing::warn;

use crate::error::KeywordError;
use crate::models::{fold_case, Category, Keyword};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordRegistry {
    entries: Vec<Keyword>,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an arbitrary list, keeping the first of any
    /// case-insensitive duplicates.
    pub fn from_keywords(keywords: impl IntoIterator<Item = Keyword>) -> Self {
        let mut registry = Self::new();
        for kw in keywords {
            if let Err(e) = registry.insert(kw) {
                warn!("skipping keyword: {}", e);
            }
        }
        registry
    }

    pub fn insert(&mut self, keyword: Keyword) -> Result<(), KeywordError> {
        if self.contains(keyword.text()) {
            return Err(KeywordError::Duplicate(keyword.text().to_string()));
        }
        self.entries.push(keyword);
        Ok(())
    }

    /// Remove by case-insensitive text.
    pub fn remove(&mut self, text: &str) -> Option<Keyword> {
        let needle = fold_case(text.trim());
        let pos = self
            .entries
            .iter()
            .position(|k| k.normalized() == needle)?;
        Some(self.entries.remove(pos))
    }

    pub fn get(&self, text: &str) -> Option<&Keyword> {
        let needle = fold_case(text.trim());
        self.entries.iter().find(|k| k.normalized() == needle)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Keyword> {
        self.entries
            .iter()
            .filter(move |k| k.category() == category)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Keyword] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeywordRegistry {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
