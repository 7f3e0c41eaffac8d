//! SeaORM storage backend
//!
//! Durable, indexed storage for sites and hits using SeaORM, supporting
//! SQLite, MySQL/MariaDB, and PostgreSQL. All mutations are single-key
//! upserts or bounded read-modify-writes on one record; no cross-record
//! transaction coordination is needed beyond the cascading site delete.

mod connection;
mod converters;
mod mutations;
mod operations;
mod query;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{Result, SitebeaconError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{apply_patch, hit_to_active_model, model_to_hit, model_to_site};
pub use operations::upsert_hit;

/// Infer the database backend from the URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(SitebeaconError::database_config(format!(
            "Cannot infer database backend from URL: {}. Supported URL schemes: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// Inclusive timestamp range restriction for hit queries (epoch ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsRange {
    pub start: i64,
    pub end: i64,
}

impl TsRange {
    /// Fails fast on an inverted range: a programming-contract violation on
    /// the caller's side, not something to absorb silently.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(SitebeaconError::validation(format!(
                "invalid ts range: start {} > end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// `[start, now]` window for the dashboard's since-style queries
    pub fn since(start: i64, now: i64) -> Result<Self> {
        Self::new(start, now)
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SitebeaconError::database_config(
                "DATABASE_URL is not set".to_string(),
            ));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_sqlite() {
        assert_eq!(infer_backend_from_url("sqlite://x.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("hits.sqlite").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
    }

    #[test]
    fn test_infer_backend_mysql_postgres() {
        assert_eq!(
            infer_backend_from_url("mysql://localhost/sb").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgres://localhost/sb").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn test_infer_backend_unknown() {
        let err = infer_backend_from_url("mongodb://nope").unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_ts_range_rejects_inverted() {
        let err = TsRange::new(100, 50).unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(TsRange::new(50, 50).is_ok());
    }
}
