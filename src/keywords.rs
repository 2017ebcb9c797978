//! `kws keyword add | list | remove`.
//!
//! Thin command wrappers over [`SqliteKeywordStore`]. Duplicate and empty
//! keywords surface as [`KeywordError`] messages and a non-zero exit.

use anyhow::{bail, Result};
use keyword_scan_core::models::{Category, Keyword};
use keyword_scan_core::store::KeywordStore;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteKeywordStore;

async fn open_store(config: &Config) -> Result<SqliteKeywordStore> {
    let pool = db::connect(config).await?;
    Ok(SqliteKeywordStore::new(pool))
}

pub async fn run_add(config: &Config, text: &str, category: Category) -> Result<()> {
    let store = open_store(config).await?;
    let keyword = Keyword::new(text, category)?;
    let stored = store.add_keyword(&keyword).await?;
    info!(id = stored.id, keyword = stored.keyword.text(), "keyword added");
    println!("Added keyword #{}: {}", stored.id, stored.keyword);
    store.pool().close().await;
    Ok(())
}

pub async fn run_list(config: &Config, category: Option<Category>) -> Result<()> {
    let store = open_store(config).await?;
    let keywords = store.list_keywords(category).await?;
    store.pool().close().await;

    if keywords.is_empty() {
        println!("No keywords.");
        return Ok(());
    }

    println!("{:>5}  {:<10} {:<20}  {}", "ID", "CATEGORY", "ADDED", "KEYWORD");
    for s in &keywords {
        println!(
            "{:>5}  {:<10} {:<20}  {}",
            s.id,
            s.keyword.category().as_str(),
            s.created_at,
            s.keyword.text()
        );
    }
    println!();
    println!("{} keyword(s)", keywords.len());
    Ok(())
}

pub async fn run_remove(config: &Config, id: i64) -> Result<()> {
    let store = open_store(config).await?;
    let removed = store.remove_keyword(id).await?;
    store.pool().close().await;

    if !removed {
        bail!("No keyword with id {}", id);
    }
    println!("Removed keyword #{}", id);
    Ok(())
}
