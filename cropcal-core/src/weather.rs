//! Daily forecast summaries carried on schedules and reminders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast day, flattened from the provider's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: String,
    pub avg_temp_c: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub precip_mm: f64,
    pub avg_humidity: f64,
    pub uv: f64,
}

/// Today's forecast when the provider window includes it, else the first
/// day on offer.
pub fn today_or_first(days: &[ForecastDay], today: NaiveDate) -> Option<&ForecastDay> {
    days.iter().find(|d| d.date == today).or_else(|| days.first())
}

/// The leading days kept as a schedule's weather snapshot.
pub fn snapshot(days: &[ForecastDay], keep: usize) -> Vec<ForecastDay> {
    days.iter().take(keep).cloned().collect()
}
