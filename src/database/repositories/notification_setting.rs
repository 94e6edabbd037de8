use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::domain::{NotificationService, NotificationSetting};

/// Primary key of the one and only settings row.
const SOLO_ID: i64 = 1;

#[derive(Debug, FromRow)]
struct NotificationSettingRow {
    notification_service: Option<String>,
    api_key: String,
    next_notification: Option<NaiveDate>,
}

impl From<NotificationSettingRow> for NotificationSetting {
    fn from(row: NotificationSettingRow) -> Self {
        let notification_service = row.notification_service.and_then(|s| {
            NotificationService::from_str(&s)
                .map_err(|_| warn!(service = %s, "Ignoring unknown notification service"))
                .ok()
        });

        Self {
            notification_service,
            api_key: row.api_key,
            next_notification: row.next_notification,
        }
    }
}

/// Accessor for the singleton notification settings.
pub struct NotificationSettingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NotificationSettingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the settings, inserting the default row on first access.
    pub async fn get_solo(&self) -> Result<NotificationSetting, sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO notification_settings (id) VALUES (?)")
            .bind(SOLO_ID)
            .execute(self.pool)
            .await?;

        let row = sqlx::query_as::<_, NotificationSettingRow>(
            r#"
            SELECT notification_service, api_key, next_notification
            FROM notification_settings
            WHERE id = ?
            "#,
        )
        .bind(SOLO_ID)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn save(&self, settings: &NotificationSetting) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO notification_settings (id, notification_service, api_key, next_notification)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                notification_service = excluded.notification_service,
                api_key = excluded.api_key,
                next_notification = excluded.next_notification
            "#,
        )
        .bind(SOLO_ID)
        .bind(settings.notification_service.map(|s| s.to_string()))
        .bind(&settings.api_key)
        .bind(settings.next_notification)
        .execute(self.pool)
        .await?;

        debug!(
            service = ?settings.notification_service,
            next_notification = ?settings.next_notification,
            "Saved notification settings"
        );

        Ok(())
    }
}
