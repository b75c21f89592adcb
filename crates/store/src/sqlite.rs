//! SQLite task store.
//!
//! Uses a single `todos` table. Timestamps are stored as RFC 3339 text.
//!
//! SQLite's `lower()` and `LIKE` only fold ASCII, so search folds case in
//! Rust over the fetched rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use taskpilot_core::error::StoreError;
use taskpilot_core::task::{Task, TaskStore};
use tracing::{debug, info};

/// A SQLite-backed task store.
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // Every connection to `:memory:` is a separate database.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite task store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                todo       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("todos table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, StoreError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let text: String = row
            .try_get("todo")
            .map_err(|e| StoreError::QueryFailed(format!("todo column: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| StoreError::QueryFailed(format!("updated_at column: {e}")))?;

        Ok(Task {
            id,
            text,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::QueryFailed(format!("bad timestamp '{s}': {e}")))
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query("SELECT * FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        rows.iter().map(Self::row_to_task).collect()
    }

    async fn create(&self, text: &str) -> Result<i64, StoreError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("INSERT INTO todos (todo, created_at, updated_at) VALUES (?1, ?2, ?2)")
            .bind(text)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!("Created todo {id}");
        Ok(id)
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query("SELECT * FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Search failed: {e}")))?;

        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        for row in &rows {
            let task = Self::row_to_task(row)?;
            if task.text.to_lowercase().contains(&needle) {
                matches.push(task);
            }
        }
        Ok(matches)
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: i64, text: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE todos SET todo = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(text)
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("UPDATE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query("SELECT * FROM todos WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        row.as_ref().map(Self::row_to_task).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteTaskStore {
        SqliteTaskStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn create_and_list() {
        let store = test_store().await;
        let a = store.create("Finish coding project").await.unwrap();
        let b = store.create("Shopping for groceries").await.unwrap();
        assert!(b > a);

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Finish coding project");
        assert_eq!(tasks[1].id, b);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let store = test_store().await;
        store.create("Shopping for Groceries").await.unwrap();
        store.create("Call the dentist").await.unwrap();

        let results = store.search("GROCER").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Shopping for Groceries");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = test_store().await;
        store.create("Save 100% of receipts").await.unwrap();
        store.create("Save 1000 photos").await.unwrap();

        let results = store.search("100%").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].text.contains("100%"));
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let store = test_store().await;
        store.create("Ölwechsel beim Auto").await.unwrap();
        store.create("ÉPICERIE du quartier").await.unwrap();
        store.create("Call the dentist").await.unwrap();

        let results = store.search("öl").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Ölwechsel beim Auto");

        let results = store.search("épicerie").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "ÉPICERIE du quartier");
    }

    #[tokio::test]
    async fn remove_reports_whether_row_existed() {
        let store = test_store().await;
        let id = store.create("temporary").await.unwrap();
        assert!(store.remove(id).await.unwrap());
        assert!(!store.remove(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_bumps_updated_at() {
        let store = test_store().await;
        let id = store.create("Shopping for groceries").await.unwrap();
        let before = store.get(id).await.unwrap().unwrap();

        assert!(store.update(id, "Buy vegetables and fruits").await.unwrap());
        assert!(!store.update(id + 100, "ghost").await.unwrap());

        let after = store.get(id).await.unwrap().unwrap();
        assert_eq!(after.text, "Buy vegetables and fruits");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }
}
