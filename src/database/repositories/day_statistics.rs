use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::domain::{Capabilities, DayStatistics};

/// Read access to the daily aggregates produced by the statistics pipeline.
pub struct DayStatisticsRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(Debug, FromRow)]
struct CapabilityRow {
    any: bool,
    electricity_returned: bool,
    gas: bool,
}

impl<'a> DayStatisticsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_day(&self, day: NaiveDate) -> Result<Option<DayStatistics>, sqlx::Error> {
        sqlx::query_as::<_, DayStatistics>(
            r#"
            SELECT day, total_cost, electricity1, electricity2,
                   electricity1_returned, electricity2_returned, gas
            FROM day_statistics
            WHERE day = ?
            "#,
        )
        .bind(day)
        .fetch_optional(self.pool)
        .await
    }

    /// Insert or replace the aggregate for `stats.day`.
    pub async fn upsert(&self, stats: &DayStatistics) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO day_statistics (day, total_cost, electricity1, electricity2,
                                        electricity1_returned, electricity2_returned, gas)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (day) DO UPDATE SET
                total_cost = excluded.total_cost,
                electricity1 = excluded.electricity1,
                electricity2 = excluded.electricity2,
                electricity1_returned = excluded.electricity1_returned,
                electricity2_returned = excluded.electricity2_returned,
                gas = excluded.gas
            "#,
        )
        .bind(stats.day)
        .bind(stats.total_cost)
        .bind(stats.electricity1)
        .bind(stats.electricity2)
        .bind(stats.electricity1_returned)
        .bind(stats.electricity2_returned)
        .bind(stats.gas)
        .execute(self.pool)
        .await?;

        debug!(day = %stats.day, "Stored day statistics");
        Ok(())
    }

    /// Derive the metering capabilities from the stored history.
    pub async fn capabilities(&self) -> Result<Capabilities, sqlx::Error> {
        let row = sqlx::query_as::<_, CapabilityRow>(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM day_statistics) AS "any",
                EXISTS (
                    SELECT 1 FROM day_statistics
                    WHERE electricity1_returned + electricity2_returned > 0
                ) AS electricity_returned,
                EXISTS (SELECT 1 FROM day_statistics WHERE gas IS NOT NULL) AS gas
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(Capabilities {
            any: row.any,
            electricity_returned: row.electricity_returned,
            gas: row.gas,
        })
    }
}
