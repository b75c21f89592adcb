//! Task store implementations for taskpilot.
//!
//! All backends implement [`taskpilot_core::TaskStore`]. The in-memory store
//! is always available; SQL backends sit behind cargo features.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryTaskStore;

use std::sync::Arc;
use taskpilot_config::StoreConfig;
use taskpilot_core::error::StoreError;
use taskpilot_core::task::TaskStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTaskStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresTaskStore;

/// Open the backend selected by `config.backend`.
///
/// A backend whose cargo feature is disabled is reported as a storage error.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn TaskStore>, StoreError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryTaskStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.sqlite_path();
            if let Some(parent) = std::path::Path::new(&path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Storage(format!("Cannot create {}: {e}", parent.display()))
                })?;
            }
            Ok(Arc::new(SqliteTaskStore::new(&format!("sqlite://{path}")).await?))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Storage("store.database_url is not set".into())
            })?;
            Ok(Arc::new(PostgresTaskStore::connect(url).await?))
        }
        other => Err(StoreError::Storage(format!(
            "store backend '{other}' is unknown or not compiled in"
        ))),
    }
}

/// Build an `ILIKE` pattern that matches `query` literally as a substring.
///
/// Uses `\` as the escape character, so callers pair it with `ESCAPE '\'`.
#[cfg(feature = "postgres")]
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
