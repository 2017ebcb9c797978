//! Core data models shared by the engine, the stores, and the frontends.
//!
//! [`Keyword`]s come from a caller-owned registry, [`Page`]s from a text
//! extractor, and [`Match`]es / [`MatchSummary`]s are produced per search
//! and never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::KeywordError;

/// Per-character lower-casing shared by keyword normalisation and page
/// scanning, so both sides of a comparison fold identically.
///
/// Folding is strictly one char to one char, so a folded string has the
/// same char count as its source.
pub fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Lower-case `c` when it has a single-char lower-case form; otherwise
/// keep it as is (`'İ'` lower-cases to two chars and stays `'İ'`).
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Classification of a monitored keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Negative,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Positive, Category::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Negative => "negative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(Category::Positive),
            "negative" | "neg" | "-" => Ok(Category::Negative),
            other => Err(KeywordError::UnknownCategory(other.to_string())),
        }
    }
}

/// A monitored term and its classification.
///
/// The text is trimmed and guaranteed non-empty; its original casing is
/// preserved for display while matching uses [`Keyword::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawKeyword")]
pub struct Keyword {
    text: String,
    category: Category,
}

#[derive(Deserialize)]
struct RawKeyword {
    text: String,
    category: Category,
}

impl TryFrom<RawKeyword> for Keyword {
    type Error = KeywordError;

    fn try_from(raw: RawKeyword) -> Result<Self, Self::Error> {
        Keyword::new(raw.text, raw.category)
    }
}

impl Keyword {
    pub fn new(text: impl AsRef<str>, category: Category) -> Result<Self, KeywordError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(KeywordError::Empty);
        }
        Ok(Self {
            text: text.to_string(),
            category,
        })
    }

    pub fn positive(text: impl AsRef<str>) -> Result<Self, KeywordError> {
        Self::new(text, Category::Positive)
    }

    pub fn negative(text: impl AsRef<str>) -> Result<Self, KeywordError> {
        Self::new(text, Category::Negative)
    }

    /// Original text, as entered.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Lower-cased text used for uniqueness checks and matching.
    pub fn normalized(&self) -> String {
        fold_case(&self.text)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.category)
    }
}

/// One page of extracted text. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: u32,
    pub text: String,
}

impl Page {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// How occurrences are recorded for a keyword on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Only the first occurrence per line of text.
    #[default]
    FirstPerLine,
    /// Every non-overlapping occurrence.
    AllOccurrences,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::FirstPerLine => "first-per-line",
            SearchMode::AllOccurrences => "all-occurrences",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-per-line" | "line" => Ok(SearchMode::FirstPerLine),
            "all-occurrences" | "all" => Ok(SearchMode::AllOccurrences),
            other => Err(format!(
                "unknown search mode: {}. Use first-per-line or all-occurrences.",
                other
            )),
        }
    }
}

/// One recorded occurrence of a keyword in a page's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub keyword: Keyword,
    /// Page index (1-based).
    pub page: u32,
    /// Line within the page (1-based) where the occurrence starts.
    pub line: usize,
    /// Byte offset of the occurrence in the page text.
    pub byte_offset: usize,
    /// Byte length of the occurrence in the page text.
    pub byte_len: usize,
    /// Page byte range covered by `snippet`.
    pub context: Range<usize>,
    pub snippet: String,
    pub count_contribution: usize,
}

impl Match {
    /// Byte range of the occurrence in the page text.
    pub fn span(&self) -> Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }

    /// Byte range of the occurrence inside `snippet`.
    pub fn snippet_highlight(&self) -> Range<usize> {
        let start = self.byte_offset - self.context.start;
        start..(start + self.byte_len).min(self.snippet.len())
    }
}

/// Match counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
        }
    }

    pub fn increment(&mut self, category: Category) {
        match category {
            Category::Positive => self.positive += 1,
            Category::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }
}

/// Aggregate counts derived from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub counts_by_category: CategoryCounts,
    /// Keyed by the keyword's original text. Every searched keyword is
    /// present, with 0 when it never matched.
    pub counts_by_keyword: BTreeMap<String, usize>,
}

impl MatchSummary {
    pub fn count_for(&self, keyword: &Keyword) -> usize {
        self.counts_by_keyword
            .get(keyword.text())
            .copied()
            .unwrap_or(0)
    }
}
