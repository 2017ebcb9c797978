//! Keyword database overview for `kws stats`.

use anyhow::Result;
use keyword_scan_core::models::Category;
use keyword_scan_core::store::KeywordStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteKeywordStore;

pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteKeywordStore::new(pool.clone());
    let counts = store.count_by_category().await?;
    pool.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("keyword-scan - Database Stats");
    println!("=============================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Keywords:    {}", counts.total());
    for category in Category::ALL {
        println!("    {:<10} {:>6}", category.as_str(), counts.get(category));
    }
    println!();
    println!("  Scan mode:   {}", config.scan.mode);
    println!("  Radius:      {} chars", config.scan.context_radius);
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
