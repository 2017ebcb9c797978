//! SQLite-backed [`KeywordStore`] implementation.
//!
//! Persists the keyword registry in the `keywords` table created by
//! [`migrate`](crate::migrate). Duplicate detection folds case in Rust
//! before the insert; the `lower(word)` unique index backs it up for
//! concurrent writers.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use keyword_scan_core::models::{Category, CategoryCounts, Keyword};
use keyword_scan_core::store::{KeywordStore, StoredKeyword};
use keyword_scan_core::KeywordError;

pub struct SqliteKeywordStore {
    pool: SqlitePool,
}

impl SqliteKeywordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn row_to_stored(row: &SqliteRow) -> Result<StoredKeyword> {
    let word: String = row.try_get("word")?;
    let category: Category = row.try_get::<String, _>("category")?.parse()?;
    Ok(StoredKeyword {
        id: row.try_get("id")?,
        keyword: Keyword::new(word, category)?,
        created_at: format_ts_iso(row.try_get("created_at")?),
    })
}

#[async_trait]
impl KeywordStore for SqliteKeywordStore {
    async fn add_keyword(&self, keyword: &Keyword) -> Result<StoredKeyword> {
        if self.find_keyword(keyword.text()).await?.is_some() {
            return Err(KeywordError::Duplicate(keyword.text().to_string()).into());
        }

        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query("INSERT INTO keywords (word, category, created_at) VALUES (?, ?, ?)")
            .bind(keyword.text())
            .bind(keyword.category().as_str())
            .bind(now)
            .execute(&self.pool)
            .await;

        let done = match result {
            Ok(done) => done,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(KeywordError::Duplicate(keyword.text().to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(StoredKeyword {
            id: done.last_insert_rowid(),
            keyword: keyword.clone(),
            created_at: format_ts_iso(now),
        })
    }

    async fn list_keywords(&self, category: Option<Category>) -> Result<Vec<StoredKeyword>> {
        let rows = match category {
            Some(c) => {
                sqlx::query(
                    "SELECT id, word, category, created_at FROM keywords WHERE category = ? ORDER BY id",
                )
                .bind(c.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT id, word, category, created_at FROM keywords ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(row_to_stored).collect()
    }

    async fn find_keyword(&self, text: &str) -> Result<Option<StoredKeyword>> {
        // SQLite's lower() is ASCII-only, so compare folded text here
        let needle = keyword_scan_core::models::fold_case(text.trim());
        let all = self.list_keywords(None).await?;
        Ok(all.into_iter().find(|s| s.keyword.normalized() == needle))
    }

    async fn remove_keyword(&self, id: i64) -> Result<bool> {
        let done = sqlx::query("DELETE FROM keywords WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn count_by_category(&self) -> Result<CategoryCounts> {
        let rows = sqlx::query("SELECT category, COUNT(*) AS n FROM keywords GROUP BY category")
            .fetch_all(&self.pool)
            .await?;

        let mut counts = CategoryCounts::default();
        for row in rows {
            let n: i64 = row.try_get("n")?;
            match row.try_get::<String, _>("category")?.parse::<Category>()? {
                Category::Positive => counts.positive = n as usize,
                Category::Negative => counts.negative = n as usize,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::{db, migrate};
    use tempfile::TempDir;

    async fn open_store(tmp: &TempDir) -> SqliteKeywordStore {
        let config = Config::minimal(tmp.path().join("data").join("kw.sqlite"));
        let pool = db::connect(&config).await.unwrap();
        migrate::apply(&pool).await.unwrap();
        SqliteKeywordStore::new(pool)
    }

    #[tokio::test]
    async fn add_list_and_remove() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;

        let approved = store
            .add_keyword(&Keyword::positive("approved").unwrap())
            .await
            .unwrap();
        store
            .add_keyword(&Keyword::negative("fraud").unwrap())
            .await
            .unwrap();

        let all = store.list_keywords(None).await.unwrap();
        let words: Vec<&str> = all.iter().map(|s| s.keyword.text()).collect();
        assert_eq!(words, vec!["approved", "fraud"]);
        assert!(all[0].created_at.ends_with('Z'));

        let neg = store.list_keywords(Some(Category::Negative)).await.unwrap();
        assert_eq!(neg.len(), 1);

        assert!(store.remove_keyword(approved.id).await.unwrap());
        assert!(!store.remove_keyword(approved.id).await.unwrap());
        assert_eq!(store.list_keywords(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_case_insensitive_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;

        store
            .add_keyword(&Keyword::negative("Fraud").unwrap())
            .await
            .unwrap();
        let err = store
            .add_keyword(&Keyword::negative("fRAUD").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KeywordError>(),
            Some(KeywordError::Duplicate(_))
        ));

        store
            .add_keyword(&Keyword::negative("Überprüfung").unwrap())
            .await
            .unwrap();
        let err = store
            .add_keyword(&Keyword::negative("ÜBERPRÜFUNG").unwrap())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<KeywordError>().is_some());
    }

    #[tokio::test]
    async fn counts_and_registry() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        for kw in [
            Keyword::positive("approved").unwrap(),
            Keyword::positive("granted").unwrap(),
            Keyword::negative("denied").unwrap(),
        ] {
            store.add_keyword(&kw).await.unwrap();
        }

        let counts = store.count_by_category().await.unwrap();
        assert_eq!((counts.positive, counts.negative), (2, 1));

        let registry = store.load_registry(None).await.unwrap();
        assert_eq!(registry.len(), 3);
        let positives = store.load_registry(Some(Category::Positive)).await.unwrap();
        assert!(!positives.contains("denied"));
    }
}
