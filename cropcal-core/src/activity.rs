//! Activity normalization: freeform generated schedule rows into dated records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::months::{MONTH_SHORT_NAMES, REFERENCE_YEAR, month_number};

/// First day of an activity's start month.
const START_DAY: u32 = 1;

/// Fixed end day-of-month. Every month is treated as ending on the 28th;
/// the range is a coarse window, not a calendar-accurate span.
const END_DAY: u32 = 28;

/// One row of a generated schedule before normalization.
///
/// Every field is optional. Generated JSON is not trusted to be complete,
/// and a bad row is dropped rather than failing the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    pub month: Option<String>,
    pub activity: Option<String>,
    pub description: Option<String>,
}

/// A farming task with a concrete date range, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}

impl Activity {
    /// Split the description into display bullets on sentence boundaries.
    pub fn description_sentences(&self) -> Vec<String> {
        self.description
            .split(". ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.ends_with('.') {
                    s.to_string()
                } else {
                    format!("{s}.")
                }
            })
            .collect()
    }

    /// Month-span label like "Jun - Jul" for list rendering.
    pub fn month_span_label(&self) -> String {
        format!(
            "{} - {}",
            MONTH_SHORT_NAMES[self.start_date.month0() as usize],
            MONTH_SHORT_NAMES[self.end_date.month0() as usize],
        )
    }
}

/// Normalize one generated row into an [`Activity`].
///
/// The month field is a range like "June - July" or a single month name.
/// It is split on `-`; the first part is the start month, the second part
/// (when present and non-empty) the end month. Start lands on day 01, end
/// on day 28 of the reference year. Rows with no month or no activity name
/// are dropped with a warning, never an error.
pub fn normalize_entry(entry: &RawScheduleEntry) -> Option<Activity> {
    let month = match entry.month.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            warn!(?entry, "skipping schedule entry without a month range");
            return None;
        }
    };

    let name = match entry.activity.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a,
        _ => {
            warn!(month, "skipping schedule entry without an activity name");
            return None;
        }
    };

    let parts: Vec<&str> = month.split('-').map(str::trim).collect();
    let start_name = parts[0];
    let end_name = parts
        .get(1)
        .copied()
        .filter(|p| !p.is_empty())
        .unwrap_or(start_name);

    let start_month = month_number(start_name);
    let end_month = month_number(end_name);

    let start_date = NaiveDate::from_ymd_opt(REFERENCE_YEAR, start_month, START_DAY)?;
    let mut end_date = NaiveDate::from_ymd_opt(REFERENCE_YEAR, end_month, END_DAY)?;
    if end_date < start_date {
        // No year-wrap semantics: "October - January" clamps to October.
        warn!(month, "end month precedes start month, clamping to start month");
        end_date = NaiveDate::from_ymd_opt(REFERENCE_YEAR, start_month, END_DAY)?;
    }

    Some(Activity {
        activity_name: name.to_string(),
        start_date,
        end_date,
        description: entry.description.clone().unwrap_or_default(),
    })
}

/// Normalize a whole generated batch, keeping input order.
///
/// Malformed rows are skipped; one bad row never affects its siblings.
pub fn normalize_entries(entries: &[RawScheduleEntry]) -> Vec<Activity> {
    entries.iter().filter_map(normalize_entry).collect()
}
