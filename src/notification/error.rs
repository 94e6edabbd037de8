use chrono::NaiveDate;
use thiserror::Error;

/// Failures that abort a notification run.
///
/// None of these are retried here; the next external trigger is the retry.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The statistics pipeline did not produce yesterday's aggregate.
    #[error("No day statistics found for {day}, the statistics pipeline is behind")]
    DataIntegrity { day: NaiveDate },

    /// The provider answered with a non-success status.
    #[error("Notify API call failed: {body} (HTTP{status})")]
    Delivery { status: u16, body: String },

    #[error("Notify API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl NotifyError {
    /// Whether the same request could plausibly succeed later unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            NotifyError::Delivery { status, .. } => *status >= 500 || *status == 429,
            NotifyError::Transport(_) => true,
            NotifyError::DataIntegrity { .. } | NotifyError::Database(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_display() {
        let err = NotifyError::Delivery {
            status: 403,
            body: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "Notify API call failed: Forbidden (HTTP403)");
    }

    #[test]
    fn test_transient_classification() {
        let delivery = |status| NotifyError::Delivery { status, body: String::new() };
        assert!(!delivery(400).is_transient());
        assert!(!delivery(403).is_transient());
        assert!(delivery(429).is_transient());
        assert!(delivery(503).is_transient());
        assert!(!NotifyError::DataIntegrity {
            day: NaiveDate::from_ymd_opt(2016, 11, 16).unwrap()
        }
        .is_transient());
    }
}
