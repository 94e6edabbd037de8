/// Repositories over the SQLite pool:
/// - NotificationSetting: the solo settings row, created on first access
/// - DayStatistics: per-day aggregates and the capabilities derived from them

pub mod day_statistics;
pub mod notification_setting;

pub use day_statistics::DayStatisticsRepository;
pub use notification_setting::NotificationSettingRepository;
