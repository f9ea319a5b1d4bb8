// Database module - provides data access layer

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::Result;

// Re-export models for convenience
pub mod models;
pub use models::*;

// Internal modules
mod migrations;
mod prefs;
mod question;
mod score;

/// Main database handle. Cheap to clone; all state lives in the pool.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn new(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        debug_assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!(path, "database connection has been verified");

        Ok(Self { pool })
    }

    pub async fn migration_applied(&self, version: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?)",
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
