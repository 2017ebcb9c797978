//! Keyword occurrence search over paginated text.
//!
//! The [`MatchEngine`] takes pages from an extractor and keywords from a
//! caller-owned registry and returns every [`Match`] together with a
//! [`MatchSummary`]. It is pure: no I/O, no shared state, no errors on
//! well-formed input.
//!
//! # Algorithm
//!
//! 1. Fold each keyword to lower case once; later case-insensitive
//!    duplicates are skipped.
//! 2. Fold each page to lower case one char at a time, keeping a map from
//!    folded bytes back to the original text (lower-casing can change byte
//!    lengths, never char counts).
//! 3. Scan according to [`SearchMode`]:
//!    - `FirstPerLine`: for every line, record the first occurrence of
//!      each keyword present on it.
//!    - `AllOccurrences`: for every keyword, record each non-overlapping
//!      occurrence on the page, advancing past the hit.
//! 4. Cut a snippet of `context_radius` characters around each occurrence.
//! 5. Order matches by page, then discovery order, and tally the summary.
//!
//! # Example
//!
//! ```rust
//! use keyword_scan_core::engine::search;
//! use keyword_scan_core::models::{Keyword, Page, SearchMode};
//!
//! let pages = vec![Page::new(1, "The claim was APPROVED.")];
//! let keywords = vec![Keyword::positive("approved").unwrap()];
//! let (matches, summary) = search(pages, &keywords, SearchMode::FirstPerLine, 10);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(summary.counts_by_category.positive, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use tracing::debug;

use crate::models::{fold_case, fold_char, Keyword, Match, MatchSummary, Page, SearchMode};
use crate::snippet::build_snippet;

/// Characters of context on each side of a match when none is configured.
pub const DEFAULT_CONTEXT_RADIUS: usize = 40;

/// Tuning for a single search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Whether to record the first occurrence per line or every occurrence.
    pub mode: SearchMode,
    /// Characters of context before and after each occurrence.
    pub context_radius: usize,
    /// Stop after this many pages.
    pub max_pages: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            max_pages: None,
        }
    }
}

/// Result of one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Matches ordered by page, then discovery order within the page.
    pub matches: Vec<Match>,
    /// Per-category and per-keyword counts over `matches`.
    pub summary: MatchSummary,
    /// Pages actually searched, including pages with no hits.
    pub pages_scanned: usize,
    /// True when `max_pages` or the caller's callback cut the scan short.
    pub stopped_early: bool,
}

/// Stateless keyword search over pages, configured once with
/// [`SearchOptions`] and reusable across documents.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    options: SearchOptions,
}

impl MatchEngine {
    /// Create an engine that searches with `options`.
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Options this engine was built with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search every page (up to `max_pages`) for `keywords`.
    ///
    /// Keywords that fold to the same text are searched once, under the
    /// first one given.
    pub fn search<I>(&self, pages: I, keywords: &[Keyword]) -> SearchOutcome
    where
        I: IntoIterator<Item = Page>,
    {
        self.search_until(pages, keywords, |_| true)
    }

    /// Like [`search`](Self::search), but asks `keep_going` before each page
    /// and stops as soon as it returns `false`.
    pub fn search_until<I, F>(&self, pages: I, keywords: &[Keyword], mut keep_going: F) -> SearchOutcome
    where
        I: IntoIterator<Item = Page>,
        F: FnMut(&Page) -> bool,
    {
        let terms = prepare_terms(keywords);
        let radius = self.options.context_radius;

        let mut matches = Vec::new();
        let mut pages_scanned = 0usize;
        let mut stopped_early = false;

        for page in pages {
            let capped = self
                .options
                .max_pages
                .is_some_and(|cap| pages_scanned >= cap);
            if capped || !keep_going(&page) {
                stopped_early = true;
                break;
            }
            pages_scanned += 1;

            if terms.is_empty() || page.text.trim().is_empty() {
                continue;
            }

            let before = matches.len();
            let folded = FoldedText::new(&page.text);
            match self.options.mode {
                SearchMode::FirstPerLine => {
                    scan_lines(&page, &folded, &terms, radius, &mut matches)
                }
                SearchMode::AllOccurrences => {
                    scan_all(&page, &folded, &terms, radius, &mut matches)
                }
            }
            debug!(page = page.index, hits = matches.len() - before, "scanned page");
        }

        // Stable: discovery order survives within a page.
        matches.sort_by_key(|m| m.page);

        let mut summary = MatchSummary::default();
        for term in &terms {
            summary
                .counts_by_keyword
                .insert(term.keyword.text().to_string(), 0);
        }
        for m in &matches {
            *summary
                .counts_by_keyword
                .entry(m.keyword.text().to_string())
                .or_insert(0) += m.count_contribution;
            summary.counts_by_category.increment(m.keyword.category());
        }

        SearchOutcome {
            matches,
            summary,
            pages_scanned,
            stopped_early,
        }
    }
}

/// Run one search with explicit mode and radius.
pub fn search<I>(
    pages: I,
    keywords: &[Keyword],
    mode: SearchMode,
    context_radius: usize,
) -> (Vec<Match>, MatchSummary)
where
    I: IntoIterator<Item = Page>,
{
    let engine = MatchEngine::new(SearchOptions {
        mode,
        context_radius,
        max_pages: None,
    });
    let outcome = engine.search(pages, keywords);
    (outcome.matches, outcome.summary)
}

struct Term<'k> {
    keyword: &'k Keyword,
    needle: String,
}

fn prepare_terms(keywords: &[Keyword]) -> Vec<Term<'_>> {
    let mut seen = HashSet::new();
    let mut terms = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let needle = fold_case(keyword.text());
        assert!(!needle.is_empty(), "keyword text must not be empty");
        if !seen.insert(needle.clone()) {
            debug!(keyword = keyword.text(), "duplicate keyword skipped");
            continue;
        }
        terms.push(Term { keyword, needle });
    }
    terms
}

/// Lower-cased copy of a page with a map back to source byte offsets.
struct FoldedText {
    lower: String,
    /// Source char start for every byte of `lower`; `None` when the
    /// folding is byte-for-byte (pure ASCII input). Each folded char maps
    /// to exactly one source char.
    origin: Option<Vec<usize>>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                lower: text.to_ascii_lowercase(),
                origin: None,
            };
        }
        let mut lower = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (i, c) in text.char_indices() {
            lower.push(fold_char(c));
            origin.resize(lower.len(), i);
        }
        Self {
            lower,
            origin: Some(origin),
        }
    }

    /// Map a non-empty folded range onto the source text.
    fn source_range(&self, text: &str, range: Range<usize>) -> Range<usize> {
        match &self.origin {
            None => range,
            Some(origin) => {
                let start = origin[range.start];
                let last = origin[range.end - 1];
                let last_len = text[last..].chars().next().map_or(0, char::len_utf8);
                start..last + last_len
            }
        }
    }
}

fn scan_lines(
    page: &Page,
    folded: &FoldedText,
    terms: &[Term<'_>],
    radius: usize,
    out: &mut Vec<Match>,
) {
    let mut line_start = 0;
    for (line_idx, line) in folded.lower.split('\n').enumerate() {
        for term in terms {
            if let Some(pos) = line.find(term.needle.as_str()) {
                let start = line_start + pos;
                let span = folded.source_range(&page.text, start..start + term.needle.len());
                out.push(make_match(page, term.keyword, span, line_idx + 1, radius));
            }
        }
        line_start += line.len() + 1;
    }
}

fn scan_all(
    page: &Page,
    folded: &FoldedText,
    terms: &[Term<'_>],
    radius: usize,
    out: &mut Vec<Match>,
) {
    let newlines: Vec<usize> = page.text.match_indices('\n').map(|(i, _)| i).collect();
    for term in terms {
        let mut cursor = 0;
        while let Some(pos) = folded.lower[cursor..].find(term.needle.as_str()) {
            let start = cursor + pos;
            let end = start + term.needle.len();
            let span = folded.source_range(&page.text, start..end);
            let line = newlines.partition_point(|&nl| nl < span.start) + 1;
            out.push(make_match(page, term.keyword, span, line, radius));
            cursor = end;
        }
    }
}

fn make_match(
    page: &Page,
    keyword: &Keyword,
    span: Range<usize>,
    line: usize,
    radius: usize,
) -> Match {
    let snippet = build_snippet(&page.text, span.start, span.len(), radius);
    Match {
        keyword: keyword.clone(),
        page: page.index,
        line,
        byte_offset: span.start,
        byte_len: span.len(),
        context: snippet.context,
        snippet: snippet.text,
        count_contribution: 1,
    }
}
