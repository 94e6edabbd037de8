pub mod repositories;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::DbConfig;

pub use repositories::{DayStatisticsRepository, NotificationSettingRepository};

/// SQLite connection pool with migrations applied.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool, creating the database file if needed, and run
    /// pending migrations.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        info!(url = %config.url, "Initializing database connection pool");

        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid database URL: {}", config.url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to create database pool")?;

        let db = Self::from_pool(pool).await?;
        db.health_check().await?;

        info!("Database connection pool initialized successfully");
        Ok(db)
    }

    /// Wrap an existing pool and bring its schema up to date.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(Self { pool })
    }

    /// Perform a health check query, returning its latency in milliseconds.
    pub async fn health_check(&self) -> Result<u64> {
        let start = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(start.elapsed().as_millis() as u64)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn notification_settings(&self) -> NotificationSettingRepository<'_> {
        NotificationSettingRepository::new(&self.pool)
    }

    pub fn day_statistics(&self) -> DayStatisticsRepository<'_> {
        DayStatisticsRepository::new(&self.pool)
    }

    /// Gracefully close the database connection pool
    pub async fn close(self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory_runs_migrations() {
        let db = Database::connect(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert!(tables.contains(&"notification_settings".to_string()));
        assert!(tables.contains(&"day_statistics".to_string()));
    }

    #[tokio::test]
    async fn test_connect_fails_for_missing_directory() {
        let result = Database::connect(&DbConfig {
            url: "sqlite://does/not/exist/dsmr-notifier.db".to_string(),
            max_connections: 1,
        })
        .await;
        assert!(result.is_err());
    }
}
