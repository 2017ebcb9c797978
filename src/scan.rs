//! Document scan pipeline.
//!
//! ```text
//! bytes + content type ──▶ extract_pages ──▶ MatchEngine ──▶ ScanReport
//!                               │
//!                               └─ ExtractError (reported before matching)
//! ```
//!
//! [`scan_document`] is pure and synchronous so the HTTP server can run it
//! on a blocking thread; [`run_scan`] is the `kws scan` entry point that
//! reads the file, loads the keyword registry from SQLite, and prints.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use keyword_scan_core::engine::SearchOptions;
use keyword_scan_core::models::{Category, Match, MatchSummary, SearchMode};
use keyword_scan_core::store::KeywordStore;
use keyword_scan_core::{KeywordRegistry, MatchEngine};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::db;
use crate::extract::{self, ExtractError};
use crate::render;
use crate::sqlite_store::SqliteKeywordStore;

/// Everything a caller needs to present one scanned document.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// File name or path the bytes came from.
    pub document: String,
    /// Content type the document was extracted as, parameters included.
    pub content_type: String,
    /// Pages the extractor produced.
    pub page_count: usize,
    /// Pages the engine actually searched.
    pub pages_scanned: usize,
    /// True when `max_pages` left pages unsearched.
    pub stopped_early: bool,
    pub mode: SearchMode,
    pub context_radius: usize,
    /// Matches ordered by page, then discovery order.
    pub matches: Vec<Match>,
    pub summary: MatchSummary,
}

impl ScanReport {
    /// Matches on `page`, in report order.
    pub fn page_matches(&self, page: u32) -> Vec<Match> {
        self.matches
            .iter()
            .filter(|m| m.page == page)
            .cloned()
            .collect()
    }
}

/// Per-invocation overrides for the configured `[scan]` settings.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub mode: Option<SearchMode>,
    pub context_radius: Option<usize>,
    pub max_pages: Option<usize>,
    pub category: Option<Category>,
    pub markup: Option<String>,
}

impl ScanOverrides {
    pub fn apply(&self, mut options: SearchOptions) -> SearchOptions {
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(radius) = self.context_radius {
            options.context_radius = radius;
        }
        if let Some(max) = self.max_pages {
            options.max_pages = Some(max);
        }
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Lines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "lines" => Ok(OutputFormat::Lines),
            other => Err(format!(
                "unknown output format: {}. Use text, json, or lines.",
                other
            )),
        }
    }
}

/// Extract `bytes` and search every page against `registry`.
///
/// Extraction failures are returned as-is; the engine never sees a
/// partially parsed document.
pub fn scan_document(
    document: &str,
    bytes: &[u8],
    content_type: &str,
    registry: &KeywordRegistry,
    options: SearchOptions,
) -> Result<ScanReport, ExtractError> {
    let pages = extract::extract_pages(bytes, content_type)?;
    let page_count = pages.len();
    debug!(document, page_count, keywords = registry.len(), "extracted pages");

    let outcome = MatchEngine::new(options).search(pages, registry.as_slice());
    debug!(
        document,
        matches = outcome.matches.len(),
        pages_scanned = outcome.pages_scanned,
        "scan complete"
    );

    Ok(ScanReport {
        document: document.to_string(),
        content_type: content_type.to_string(),
        page_count,
        pages_scanned: outcome.pages_scanned,
        stopped_early: outcome.stopped_early,
        mode: options.mode,
        context_radius: options.context_radius,
        matches: outcome.matches,
        summary: outcome.summary,
    })
}

/// `kws scan <path>`.
pub async fn run_scan(
    config: &Config,
    path: &Path,
    content_type: Option<&str>,
    overrides: &ScanOverrides,
    format: OutputFormat,
) -> Result<()> {
    let content_type = match content_type {
        Some(ct) => ct.to_string(),
        None => extract::content_type_for_path(path)
            .map(str::to_string)
            .with_context(|| {
                format!(
                    "Cannot infer content type for {}; pass --content-type",
                    path.display()
                )
            })?,
    };

    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if size > config.scan.max_file_bytes {
        bail!(
            "{} is {} bytes, larger than scan.max_file_bytes ({})",
            path.display(),
            size,
            config.scan.max_file_bytes
        );
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let pool = db::connect(config).await?;
    let store = SqliteKeywordStore::new(pool.clone());
    let registry = store.load_registry(overrides.category).await?;
    pool.close().await;

    if registry.is_empty() {
        warn!("keyword registry is empty; add keywords with `kws keyword add`");
    }

    let options = overrides.apply(config.scan.search_options());
    let document = path.display().to_string();
    let report = tokio::task::spawn_blocking(move || {
        scan_document(&document, &bytes, &content_type, &registry, options)
    })
    .await??;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Lines => print!("{}", render::render_lines(&report)),
        OutputFormat::Text => {
            let name = overrides
                .markup
                .as_deref()
                .unwrap_or(config.render.markup.as_str());
            let markup = render::resolve_markup(name)?;
            print!("{}", render::render_text(&report, markup));
        }
    }

    Ok(())
}
