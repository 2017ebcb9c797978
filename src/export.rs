//! Keyword registry import and export as JSON.
//!
//! The file format is a plain array so lists can be edited by hand or
//! produced by other tools:
//!
//! ```json
//! [
//!   { "text": "approved", "category": "positive" },
//!   { "text": "fraud", "category": "negative" }
//! ]
//! ```

use anyhow::{Context, Result};
use keyword_scan_core::models::Keyword;
use keyword_scan_core::store::KeywordStore;
use keyword_scan_core::KeywordError;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteKeywordStore;

/// Outcome of an import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Insert every keyword, skipping ones already present.
pub async fn import_keywords(
    store: &dyn KeywordStore,
    keywords: &[Keyword],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for keyword in keywords {
        match store.add_keyword(keyword).await {
            Ok(_) => summary.added += 1,
            Err(e) if matches!(e.downcast_ref::<KeywordError>(), Some(KeywordError::Duplicate(_))) => {
                debug!(keyword = keyword.text(), "skipping duplicate");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

/// `kws keyword import <file>`.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let keywords: Vec<Keyword> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid keyword file: {}", path.display()))?;

    let pool = db::connect(config).await?;
    let store = SqliteKeywordStore::new(pool.clone());
    let summary = import_keywords(&store, &keywords).await?;
    pool.close().await;

    println!(
        "Imported {} keyword(s), skipped {} duplicate(s)",
        summary.added, summary.skipped
    );
    Ok(())
}

/// `kws keyword export`. Writes to `output` when given, stdout otherwise.
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteKeywordStore::new(pool.clone());
    let keywords: Vec<Keyword> = store
        .list_keywords(None)
        .await?
        .into_iter()
        .map(|s| s.keyword)
        .collect();
    pool.close().await;

    let json = serde_json::to_string_pretty(&keywords)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)?;
            eprintln!("Exported {} keywords to {}", keywords.len(), path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
