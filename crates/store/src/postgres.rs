//! PostgreSQL task store.
//!
//! Reads the `todos` table of the hosted deployment as it exists: an `INTEGER`
//! identity key, `created_at` as `TIMESTAMP` without time zone, and a nullable
//! `updated_at`. Columns are cast in SQL so rows decode as [`Task`]; naive
//! timestamps are taken as UTC. Search uses `ILIKE`.
//!
//! # Feature gate
//!
//! ```toml
//! taskpilot-store = { workspace = true, features = ["postgres"] }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use taskpilot_core::error::StoreError;
use taskpilot_core::task::{Task, TaskStore};
use tracing::{debug, info};

use crate::like_pattern;

/// Task columns, cast to the types [`row_to_task`] decodes.
const SELECT_TODOS: &str = "SELECT id::int8 AS id, todo, \
     COALESCE(created_at, now() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC' AS created_at, \
     COALESCE(updated_at, created_at, now() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC' AS updated_at \
     FROM todos";

/// PostgreSQL-backed task store.
pub struct PostgresTaskStore {
    pool: PgPool,
}

impl PostgresTaskStore {
    /// Connect using a connection string and run the migration.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Storage(format!("PostgreSQL connection failed: {e}")))?;

        info!("Connected to PostgreSQL task store");
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the schema migration.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let migration_sql = include_str!("../migrations/001_create_todos.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("Migration failed: {e}")))?;

        debug!("Task schema migration complete");
        Ok(())
    }
}

fn row_to_task(row: &PgRow) -> Result<Task, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
    let text: String = row
        .try_get("todo")
        .map_err(|e| StoreError::QueryFailed(format!("todo column: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| StoreError::QueryFailed(format!("updated_at column: {e}")))?;

    Ok(Task {
        id,
        text,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let sql = format!("{SELECT_TODOS} ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        rows.iter().map(row_to_task).collect()
    }

    async fn create(&self, text: &str) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "INSERT INTO todos (todo, created_at, updated_at) \
             VALUES ($1, now() AT TIME ZONE 'UTC', now() AT TIME ZONE 'UTC') \
             RETURNING id::int8 AS id",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        row.try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        let sql = format!(r"{SELECT_TODOS} WHERE todo ILIKE $1 ESCAPE '\' ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Search failed: {e}")))?;

        rows.iter().map(row_to_task).collect()
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: i64, text: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE todos SET todo = $1, updated_at = now() AT TIME ZONE 'UTC' WHERE id = $2",
        )
        .bind(text)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("UPDATE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let sql = format!("{SELECT_TODOS} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT failed: {e}")))?;

        row.as_ref().map(row_to_task).transpose()
    }
}
