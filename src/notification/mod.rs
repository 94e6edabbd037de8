//! Daily usage notifications.
//!
//! Once per day, when a provider and API key are configured, yesterday's
//! [`DayStatistics`] are rendered into a short message and pushed to the
//! provider. The next run is then pushed back to tomorrow. Every failure
//! aborts the run and leaves the schedule untouched, so the next external
//! trigger simply tries again.

pub mod error;
pub mod gateway;

pub use error::NotifyError;
pub use gateway::{HttpPushGateway, PushGateway};

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::database::Database;
use crate::domain::{Capabilities, DayStatistics, NotificationSetting};

pub struct Notifier {
    db: Database,
    gateway: Arc<dyn PushGateway>,
    tz: Tz,
}

impl Notifier {
    pub fn new(db: Database, gateway: Arc<dyn PushGateway>, tz: Tz) -> Self {
        Self { db, gateway, tz }
    }

    /// Current wall-clock time in the configured timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    pub async fn should_notify(&self) -> Result<bool, NotifyError> {
        self.should_notify_at(self.now()).await
    }

    pub async fn should_notify_at(&self, now: DateTime<Tz>) -> Result<bool, NotifyError> {
        let settings = self.db.notification_settings().get_solo().await?;
        Ok(settings.is_due(now.date_naive()))
    }

    /// Render the message for `day`, honouring the current capabilities.
    pub async fn create_notification_message(
        &self,
        day: NaiveDate,
        stats: &DayStatistics,
    ) -> Result<String, NotifyError> {
        let capabilities = self.db.day_statistics().capabilities().await?;
        Ok(render_message(day, stats, &capabilities))
    }

    pub async fn notify(&self) -> Result<bool, NotifyError> {
        self.notify_at(self.now()).await
    }

    /// Send yesterday's summary if one is due at `now`.
    ///
    /// Returns `Ok(false)` when nothing was due and `Ok(true)` after a
    /// successful send.
    pub async fn notify_at(&self, now: DateTime<Tz>) -> Result<bool, NotifyError> {
        let mut settings = self.db.notification_settings().get_solo().await?;
        if !settings.is_due(now.date_naive()) {
            debug!(next_notification = ?settings.next_notification, "No notification due");
            return Ok(false);
        }
        let Some(service) = settings.notification_service else {
            return Ok(false);
        };

        let yesterday = previous_day(now);
        let stats = match self.db.day_statistics().find_by_day(yesterday).await? {
            Some(stats) => stats,
            None => {
                error!(day = %yesterday, "Day statistics missing, refusing to notify");
                return Err(NotifyError::DataIntegrity { day: yesterday });
            }
        };

        let message = self.create_notification_message(yesterday, &stats).await?;

        if let Err(e) = self.gateway.push(service, &settings.api_key, &message).await {
            if e.is_transient() {
                warn!(%service, error = %e, "Notification not delivered, provider may recover");
            } else {
                error!(%service, error = %e, "Notification not delivered");
            }
            return Err(e);
        }

        self.set_next_notification(&mut settings, now).await?;
        info!(
            %service,
            day = %yesterday,
            next_notification = ?settings.next_notification,
            "Daily usage notification sent"
        );
        Ok(true)
    }

    /// Schedule the next notification for the calendar day after
    /// `reference_time` and persist it.
    pub async fn set_next_notification(
        &self,
        settings: &mut NotificationSetting,
        reference_time: DateTime<Tz>,
    ) -> Result<(), NotifyError> {
        settings.next_notification = Some(next_day(reference_time));
        self.db.notification_settings().save(settings).await?;
        Ok(())
    }
}

/// Local calendar day before `now`, whatever the length of the DST day.
pub fn previous_day(now: DateTime<Tz>) -> NaiveDate {
    now.date_naive() - Days::new(1)
}

/// Local calendar day after `now`.
pub fn next_day(now: DateTime<Tz>) -> NaiveDate {
    now.date_naive() + Days::new(1)
}

/// Fixed template for the daily summary.
pub fn render_message(day: NaiveDate, stats: &DayStatistics, capabilities: &Capabilities) -> String {
    let mut lines = vec![
        format!("Your daily usage statistics for {}", day.format("%d-%m-%Y")),
        format!("Electricity consumed: {:.2} kWh", stats.electricity_merged()),
    ];

    if capabilities.electricity_returned {
        lines.push(format!(
            "Electricity returned: {:.2} kWh",
            stats.electricity_returned_merged()
        ));
    }

    if let Some(gas) = stats.gas.filter(|_| capabilities.gas) {
        lines.push(format!("Gas consumed: {:.2} m3", gas));
    }

    lines.push(format!("Total cost: € {:.2}", stats.total_cost));
    lines.join("\n")
}
