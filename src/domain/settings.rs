use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

/// Supported push-notification providers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationService {
    /// Notify My Android
    Nma,
    Prowl,
}

impl NotificationService {
    pub fn default_api_url(&self) -> &'static str {
        match self {
            NotificationService::Nma => "https://www.notifymyandroid.com/publicapi/notify",
            NotificationService::Prowl => "https://api.prowlapp.com/publicapi/add",
        }
    }
}

/// The single, system-wide notification settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub notification_service: Option<NotificationService>,
    pub api_key: String,
    /// First calendar day on which the next notification may go out.
    pub next_notification: Option<NaiveDate>,
}

impl NotificationSetting {
    /// Whether a notification should be sent on `today`.
    ///
    /// Requires a configured service and API key. A missing
    /// `next_notification` means "never sent", which is due immediately.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        if self.notification_service.is_none() || self.api_key.is_empty() {
            return false;
        }

        match self.next_notification {
            Some(next) => next <= today,
            None => true,
        }
    }
}

/// User-submitted change to the provider configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_api_key_present"))]
pub struct NotificationSettingUpdate {
    pub notification_service: Option<NotificationService>,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub api_key: String,
}

fn validate_api_key_present(update: &NotificationSettingUpdate) -> Result<(), ValidationError> {
    if update.notification_service.is_some() && update.api_key.trim().is_empty() {
        let mut err = ValidationError::new("api_key_required");
        err.message = Some("an API key is required when a notification service is selected".into());
        return Err(err);
    }
    Ok(())
}

impl NotificationSettingUpdate {
    pub fn apply_to(self, settings: &mut NotificationSetting) {
        settings.notification_service = self.notification_service;
        settings.api_key = self.api_key.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::str::FromStr;

    const API_KEY: &str = "es7sh2d-DSMR-Reader-Rulez-iweu732";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_not_due() {
        let settings = NotificationSetting::default();
        assert!(settings.notification_service.is_none());
        assert!(!settings.is_due(day(2016, 11, 17)));
    }

    #[test]
    fn test_service_without_api_key_is_not_due() {
        let settings = NotificationSetting {
            notification_service: Some(NotificationService::Nma),
            ..Default::default()
        };
        assert!(!settings.is_due(day(2016, 11, 17)));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(day(2016, 11, 16)), true)]
    #[case(Some(day(2016, 11, 17)), true)]
    #[case(Some(day(2016, 11, 18)), false)]
    #[case(Some(day(2116, 11, 17)), false)]
    fn test_due_depends_on_next_notification(
        #[case] next_notification: Option<NaiveDate>,
        #[case] expected: bool,
    ) {
        let settings = NotificationSetting {
            notification_service: Some(NotificationService::Prowl),
            api_key: API_KEY.to_string(),
            next_notification,
        };
        assert_eq!(settings.is_due(day(2016, 11, 17)), expected);
    }

    proptest! {
        #[test]
        fn never_due_without_service(
            api_key in ".*",
            offset in -3650i64..3650,
            has_next in any::<bool>(),
        ) {
            let today = day(2016, 11, 17);
            let settings = NotificationSetting {
                notification_service: None,
                api_key,
                next_notification: has_next.then(|| today + chrono::Duration::days(offset)),
            };
            prop_assert!(!settings.is_due(today));
        }
    }

    #[test]
    fn test_service_string_roundtrip() {
        assert_eq!(NotificationService::Nma.to_string(), "nma");
        assert_eq!(NotificationService::from_str("prowl").unwrap(), NotificationService::Prowl);
        assert!(NotificationService::from_str("pushover").is_err());
    }

    #[test]
    fn test_update_requires_api_key_with_service() {
        let update = NotificationSettingUpdate {
            notification_service: Some(NotificationService::Nma),
            api_key: "   ".to_string(),
        };
        assert!(update.validate().is_err());

        let update = NotificationSettingUpdate {
            notification_service: None,
            api_key: String::new(),
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_schedule() {
        let mut settings = NotificationSetting {
            next_notification: Some(day(2016, 11, 17)),
            ..Default::default()
        };
        NotificationSettingUpdate {
            notification_service: Some(NotificationService::Prowl),
            api_key: format!(" {API_KEY} "),
        }
        .apply_to(&mut settings);

        assert_eq!(settings.notification_service, Some(NotificationService::Prowl));
        assert_eq!(settings.api_key, API_KEY);
        assert_eq!(settings.next_notification, Some(day(2016, 11, 17)));
    }
}
