#![allow(dead_code)]
use chrono::NaiveDate;
use dsmr_notifier::config::NotificationConfig;
use dsmr_notifier::database::Database;
use dsmr_notifier::domain::{DayStatistics, NotificationService, NotificationSetting};
use sqlx::sqlite::SqlitePoolOptions;

pub const API_KEY: &str = "es7sh2d-DSMR-Reader-Rulez-iweu732";
pub const NMA_PATH: &str = "/publicapi/notify";
pub const PROWL_PATH: &str = "/publicapi/add";

/// Which slice of the metering setup the fixture data represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    Full,
    WithoutGas,
    WithoutElectricityReturned,
    Empty,
}

/// In-memory database with migrations applied. A single connection keeps
/// every query on the same in-memory instance.
pub async fn memory_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Database::from_pool(pool).await.expect("migrations")
}

pub fn notification_config(base_url: &str) -> NotificationConfig {
    NotificationConfig {
        timezone: "Europe/Amsterdam".to_string(),
        http_timeout_seconds: 5,
        nma_url: format!("{base_url}{NMA_PATH}"),
        prowl_url: format!("{base_url}{PROWL_PATH}"),
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn day_statistics(day: NaiveDate, fixture: Fixture) -> DayStatistics {
    let mut stats = DayStatistics {
        day,
        total_cost: 3.96,
        electricity1: 5.432,
        electricity2: 3.321,
        electricity1_returned: 1.123,
        electricity2_returned: 0.456,
        gas: Some(2.654),
    };
    match fixture {
        Fixture::WithoutGas => stats.gas = None,
        Fixture::WithoutElectricityReturned => {
            stats.electricity1_returned = 0.0;
            stats.electricity2_returned = 0.0;
        }
        Fixture::Full | Fixture::Empty => {}
    }
    stats
}

/// Load a few days around `around` unless the fixture is empty.
pub async fn load_fixture(db: &Database, around: NaiveDate, fixture: Fixture) {
    if fixture == Fixture::Empty {
        return;
    }
    let repo = db.day_statistics();
    for offset in -2..=0 {
        let d = around + chrono::Duration::days(offset);
        repo.upsert(&day_statistics(d, fixture)).await.expect("fixture insert");
    }
}

pub async fn enable_notifications(db: &Database, next_notification: Option<NaiveDate>) {
    db.notification_settings()
        .save(&NotificationSetting {
            notification_service: Some(NotificationService::Nma),
            api_key: API_KEY.to_string(),
            next_notification,
        })
        .await
        .expect("save settings");
}
