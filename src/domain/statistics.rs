use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated consumption for one calendar day. Electricity is split over
/// the two meter tariffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DayStatistics {
    pub day: NaiveDate,
    pub total_cost: f64,
    pub electricity1: f64,
    pub electricity2: f64,
    pub electricity1_returned: f64,
    pub electricity2_returned: f64,
    pub gas: Option<f64>,
}

impl DayStatistics {
    pub fn electricity_merged(&self) -> f64 {
        self.electricity1 + self.electricity2
    }

    pub fn electricity_returned_merged(&self) -> f64 {
        self.electricity1_returned + self.electricity2_returned
    }
}

/// Which parts of the metering setup produce meaningful data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub any: bool,
    pub electricity_returned: bool,
    pub gas: bool,
}
