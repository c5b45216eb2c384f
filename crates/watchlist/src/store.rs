//! SQLite-backed watchlist store.

use crate::models::WatchlistEntry;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use valuation_core::AnalysisError;

#[derive(Debug, FromRow)]
struct WatchlistRow {
    id: i64,
    symbol: String,
    name: String,
    sector: String,
    industry: String,
    score: i64,
    price_at_save: f64,
    added_at: DateTime<Utc>,
}

impl From<WatchlistRow> for WatchlistEntry {
    fn from(row: WatchlistRow) -> Self {
        WatchlistEntry {
            id: Some(row.id),
            symbol: row.symbol,
            name: row.name,
            sector: row.sector,
            industry: row.industry,
            score: row.score,
            price_at_save: row.price_at_save,
            added_at: row.added_at,
        }
    }
}

#[derive(Clone)]
pub struct WatchlistStore {
    pool: SqlitePool,
}

impl WatchlistStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the watchlist table if it does not exist yet
    pub async fn init(&self) -> Result<(), AnalysisError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS watchlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL DEFAULT '',
                sector TEXT NOT NULL DEFAULT '',
                industry TEXT NOT NULL DEFAULT '',
                score INTEGER NOT NULL DEFAULT 0,
                price_at_save REAL NOT NULL DEFAULT 0,
                added_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AnalysisError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// All saved entries, newest first
    pub async fn list(&self) -> Result<Vec<WatchlistEntry>, AnalysisError> {
        let rows: Vec<WatchlistRow> = sqlx::query_as(
            r#"
            SELECT id, symbol, name, sector, industry, score, price_at_save, added_at
            FROM watchlist
            ORDER BY added_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AnalysisError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(WatchlistEntry::from).collect())
    }

    /// Save one entry. A duplicate symbol surfaces as `AlreadySaved`.
    pub async fn add(&self, entry: &WatchlistEntry) -> Result<WatchlistEntry, AnalysisError> {
        let symbol = entry.symbol.to_uppercase();
        let added_at = entry.added_at;

        let result = sqlx::query(
            r#"
            INSERT INTO watchlist (symbol, name, sector, industry, score, price_at_save, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&symbol)
        .bind(&entry.name)
        .bind(&entry.sector)
        .bind(&entry.industry)
        .bind(entry.score)
        .bind(entry.price_at_save)
        .bind(added_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(WatchlistEntry {
                id: Some(done.last_insert_rowid()),
                symbol,
                ..entry.clone()
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AnalysisError::AlreadySaved(symbol))
            }
            Err(e) => Err(AnalysisError::DatabaseError(e.to_string())),
        }
    }

    /// Delete by symbol. Returns whether a row was removed.
    pub async fn remove(&self, symbol: &str) -> Result<bool, AnalysisError> {
        let done = sqlx::query("DELETE FROM watchlist WHERE symbol = ?")
            .bind(symbol.to_uppercase())
            .execute(&self.pool)
            .await
            .map_err(|e| AnalysisError::DatabaseError(e.to_string()))?;

        Ok(done.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> WatchlistStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let store = WatchlistStore::new(pool);
        store.init().await.unwrap();
        store
    }

    fn entry(symbol: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: None,
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc"),
            sector: "Technology".to_string(),
            industry: "Software".to_string(),
            score: 68,
            price_at_save: 123.45,
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_list_remove_roundtrip() {
        let store = memory_store().await;

        let saved = store.add(&entry("aapl")).await.unwrap();
        assert_eq!(saved.symbol, "AAPL");
        assert!(saved.id.is_some());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].symbol, "AAPL");
        assert_eq!(listed[0].score, 68);

        assert!(store.remove("AAPL").await.unwrap());
        assert!(!store.remove("AAPL").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_symbol_is_rejected() {
        let store = memory_store().await;
        store.add(&entry("MSFT")).await.unwrap();

        match store.add(&entry("msft")).await {
            Err(AnalysisError::AlreadySaved(sym)) => assert_eq!(sym, "MSFT"),
            other => panic!("expected AlreadySaved, got {other:?}"),
        }
    }
}
