/// Database connection management with connection pooling
///
/// Provides a thread-safe connection pool to the SQLite report history.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of database connections in the pool
const MAX_CONNECTIONS: u32 = 5;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl Database {
    /// Open (or create) the history database
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(Database)` - Successfully created database instance
    /// * `Err(ReportError)` - If connection fails
    ///
    /// # Examples
    /// ```no_run
    /// use improvement_report_lib::db::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new("/tmp/improvement-report/history.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
            db_path,
        };

        db.initialize_schema().await?;
        debug!(path = %db.db_path.display(), "history database ready");

        Ok(db)
    }

    /// Create a test database in memory
    ///
    /// Every pooled connection to `:memory:` would be its own database, so
    /// the pool is pinned to a single connection.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
            db_path: PathBuf::from(":memory:"),
        };

        db.initialize_schema().await?;

        Ok(db)
    }

    /// Create all tables and indexes if they don't exist
    async fn initialize_schema(&self) -> Result<()> {
        let schema = include_str!("../../database/schema.sql");

        // SQLite executes one statement per query
        for statement in schema.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(self.pool.as_ref()).await?;
            }
        }

        Ok(())
    }

    /// Connection pool for running queries
    ///
    /// Clones of a `Database` share this pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Location of the history file, `:memory:` for test databases
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close all connections in the pool
    ///
    /// Waits for checked-out connections to be returned. Queries issued
    /// afterwards fail with `ReportError::Database`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Report and improvement counts, average stored confidence and pool usage
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let report_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
            .fetch_one(self.pool.as_ref())
            .await?;

        let improvement_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM improvements")
            .fetch_one(self.pool.as_ref())
            .await?;

        let average: (Option<f64>,) = sqlx::query_as("SELECT AVG(confidence) FROM improvements")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(DatabaseStats {
            total_reports: report_count.0,
            total_improvements: improvement_count.0,
            average_confidence: average.0,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    pub total_reports: i64,
    pub total_improvements: i64,
    pub average_confidence: Option<f64>,
    pub pool_size: u32,
    pub idle_connections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_creation() {
        let db = Database::new_test().await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    async fn test_database_stats_empty() {
        let db = Database::new_test().await.unwrap();
        let stats = db.stats().await.unwrap();

        assert_eq!(stats.total_reports, 0);
        assert_eq!(stats.total_improvements, 0);
        assert_eq!(stats.average_confidence, None);
    }

    #[tokio::test]
    async fn test_database_on_disk_creates_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("history.db");

        let db = Database::new(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
        db.close().await;
    }

    #[tokio::test]
    async fn test_schema_initialization() {
        let db = Database::new_test().await.unwrap();

        let result: std::result::Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM improvements")
                .fetch_one(db.pool())
                .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_queries_fail_after_close() {
        let db = Database::new_test().await.unwrap();
        db.close().await;

        assert!(matches!(
            db.stats().await,
            Err(crate::error::ReportError::Database(_))
        ));
    }
}
