use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Centralized connection pool manager for the application database
pub struct DatabaseManager {
    pool: Arc<RwLock<Option<SqlitePool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: Arc::new(RwLock::new(None)),
        })
    }

    const DEFAULT_DATABASE_URL: &'static str = "sqlite:mindful_minutes.db";

    /// Database URL from the environment, falling back to a local file
    pub fn database_url() -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_DATABASE_URL.to_string())
    }

    /// Get the shared application pool, creating it lazily on first use
    pub async fn pool() -> Result<SqlitePool, DatabaseError> {
        let manager = Self::instance();

        // Fast path: try read lock
        {
            let pool = manager.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let pool = Self::connect(&Self::database_url()).await?;

        {
            let mut slot = manager.pool.write().await;
            *slot = Some(pool.clone());
        }

        info!("Created database pool for: {}", Self::database_url());
        Ok(pool)
    }

    /// Open a fresh pool for the given URL (used by the CLI and tests)
    pub async fn connect(url: &str) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database vanishes when its last connection closes,
        // so it must be pinned to a single pooled connection.
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            config().database.max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config().database.connection_timeout,
            ))
            .connect_with(options)
            .await?;

        Ok(pool)
    }

    /// Pings the given pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close and drop the shared pool (e.g., on shutdown)
    pub async fn close_all() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_falls_back_to_local_file() {
        // Exercised without DATABASE_URL in the test environment; when the
        // variable is present the override wins.
        std::env::remove_var("DATABASE_URL");
        assert_eq!(DatabaseManager::database_url(), "sqlite:mindful_minutes.db");

        std::env::set_var("DATABASE_URL", "sqlite:/tmp/journal-test.db");
        assert_eq!(DatabaseManager::database_url(), "sqlite:/tmp/journal-test.db");
        std::env::remove_var("DATABASE_URL");
    }

    #[tokio::test]
    async fn in_memory_pool_connects_and_pings() {
        let pool = DatabaseManager::connect("sqlite::memory:").await.unwrap();
        DatabaseManager::health_check(&pool).await.unwrap();
    }
}
