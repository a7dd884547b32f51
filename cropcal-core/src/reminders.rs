//! Reminder derivation: one-shot activity leads and recurring weather updates.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::activity::Activity;
use crate::ids::MillisIdSource;
use crate::schedule::SavedSchedule;
use crate::time::local_date_at_hour_to_utc;
use crate::weather::ForecastDay;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Characters of the activity description quoted in the reminder body.
const BODY_PREVIEW_CHARS: usize = 100;

/// Reminder families. Recurring weather updates are cancelled and re-armed
/// as a whole class whenever the schedule collection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderClass {
    ActivityStart,
    WeatherUpdate,
}

impl fmt::Display for ReminderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderClass::ActivityStart => write!(f, "activity-start"),
            ReminderClass::WeatherUpdate => write!(f, "weather-update"),
        }
    }
}

/// One scheduled notification, one-shot or recurring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderIntent {
    pub intent_id: String,
    pub class: ReminderClass,
    pub schedule_id: String,
    pub title: String,
    pub body: String,
    pub fire_at_utc: DateTime<Utc>,
    /// Some(minutes) makes the reminder recur at that interval.
    pub repeat_minutes: Option<i64>,
}

/// Knobs for the one-shot activity lead reminder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReminderPolicy {
    /// Days before the activity's start date.
    pub activity_lead_days: i64,
    /// Local hour of day the reminder fires at.
    pub activity_fire_hour: u32,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            activity_lead_days: 1,
            activity_fire_hour: 9,
        }
    }
}

/// How often recurring weather updates fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCadence {
    /// First update one interval from now, then every interval.
    EveryMinutes(i64),
    /// Daily at the given local hour, starting today or tomorrow.
    DailyAtHour(u32),
}

impl Default for WeatherCadence {
    fn default() -> Self {
        WeatherCadence::EveryMinutes(1)
    }
}

/// Derive the one-shot lead reminder for an activity.
///
/// The reminder fires `activity_lead_days` before the start date at
/// `activity_fire_hour` local time. A fire time already in the past yields
/// None: the reminder is skipped, not an error.
pub fn activity_start_reminder(
    activity: &Activity,
    schedule_id: &str,
    tz: Tz,
    now: DateTime<Utc>,
    policy: ReminderPolicy,
    intent_millis: i64,
) -> Option<ReminderIntent> {
    let fire_date = activity.start_date - Duration::days(policy.activity_lead_days);
    let fire_at = match local_date_at_hour_to_utc(fire_date, policy.activity_fire_hour, tz) {
        Ok(t) => t,
        Err(err) => {
            warn!(activity = %activity.activity_name, %err, "cannot place reminder in local time, skipping");
            return None;
        }
    };

    if fire_at < now {
        debug!(activity = %activity.activity_name, %fire_at, "skipping reminder with past fire time");
        return None;
    }

    Some(ReminderIntent {
        intent_id: format!("activity-{}-{}", slug(&activity.activity_name), intent_millis),
        class: ReminderClass::ActivityStart,
        schedule_id: schedule_id.to_string(),
        title: format!("Upcoming Activity: {}", activity.activity_name),
        body: format!(
            "Tomorrow you need to start: {}. {}...",
            activity.activity_name,
            preview(&activity.description),
        ),
        fire_at_utc: fire_at,
        repeat_minutes: None,
    })
}

/// Derive lead reminders for every activity of a saved schedule.
///
/// Past-dated reminders are skipped; each emitted intent gets a fresh id
/// from the source. Repeated calls emit fresh intents rather than deduping.
pub fn project_activity_reminders(
    saved: &SavedSchedule,
    tz: Tz,
    now: DateTime<Utc>,
    policy: ReminderPolicy,
    ids: &mut MillisIdSource,
) -> Vec<ReminderIntent> {
    saved
        .schedule
        .activities
        .iter()
        .filter_map(|a| activity_start_reminder(a, &saved.id, tz, now, policy, ids.next_millis()))
        .collect()
}

/// Derive the recurring weather update reminder for one saved schedule.
///
/// `today` supplies the initial body text; each later firing is expected to
/// rebuild the body from a fresh forecast before delivery.
pub fn weather_update_reminder(
    saved: &SavedSchedule,
    today: &ForecastDay,
    cadence: WeatherCadence,
    tz: Tz,
    now: DateTime<Utc>,
    intent_millis: i64,
) -> Option<ReminderIntent> {
    let (fire_at, repeat_minutes) = match cadence {
        WeatherCadence::EveryMinutes(minutes) => (now + Duration::minutes(minutes), minutes),
        WeatherCadence::DailyAtHour(hour) => {
            let local_today = now.with_timezone(&tz).date_naive();
            let mut fire = match local_date_at_hour_to_utc(local_today, hour, tz) {
                Ok(t) => t,
                Err(err) => {
                    warn!(location = %saved.schedule.location, %err, "cannot place weather update in local time, skipping");
                    return None;
                }
            };
            if fire <= now {
                fire = match local_date_at_hour_to_utc(local_today + Duration::days(1), hour, tz) {
                    Ok(t) => t,
                    Err(err) => {
                        warn!(location = %saved.schedule.location, %err, "cannot place weather update in local time, skipping");
                        return None;
                    }
                };
            }
            (fire, MINUTES_PER_DAY)
        }
    };

    Some(ReminderIntent {
        intent_id: format!("weather-{}-{}", saved.schedule.location, intent_millis),
        class: ReminderClass::WeatherUpdate,
        schedule_id: saved.id.clone(),
        title: format!(
            "Weather Update for {} in {}",
            saved.schedule.crop, saved.schedule.location
        ),
        body: weather_update_body(today),
        fire_at_utc: fire_at,
        repeat_minutes: Some(repeat_minutes),
    })
}

/// Compose the weather update body from a forecast day.
pub fn weather_update_body(day: &ForecastDay) -> String {
    format!("Today's forecast: {}, {}°C.", day.condition, day.avg_temp_c)
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn preview(description: &str) -> String {
    description.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Tz;

    fn activity(name: &str, start: (u32, u32), desc: &str) -> Activity {
        Activity {
            activity_name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, start.0, 28).unwrap(),
            description: desc.to_string(),
        }
    }

    fn saved(crop: &str, location: &str, activities: Vec<Activity>) -> SavedSchedule {
        SavedSchedule {
            schedule: crate::schedule::Schedule {
                crop: crop.to_string(),
                location: location.to_string(),
                activities,
                weather_snapshot: None,
            },
            id: "1000".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn fday() -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            condition: "Partly cloudy".to_string(),
            avg_temp_c: 31.5,
            min_temp_c: 26.0,
            max_temp_c: 36.0,
            precip_mm: 0.2,
            avg_humidity: 55.0,
            uv: 8.0,
        }
    }

    fn utc_tz() -> Tz {
        "UTC".parse().unwrap()
    }

    #[test]
    fn test_fires_day_before_start_at_nine_local() {
        let a = activity("Sowing", (6, 10), "Plant the setts.");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let intent =
            activity_start_reminder(&a, "1000", utc_tz(), now, ReminderPolicy::default(), 42)
                .unwrap();

        assert_eq!(intent.fire_at_utc.to_rfc3339(), "2025-06-09T09:00:00+00:00");
        assert_eq!(intent.class, ReminderClass::ActivityStart);
        assert_eq!(intent.schedule_id, "1000");
        assert_eq!(intent.repeat_minutes, None);
    }

    #[test]
    fn test_kolkata_fire_time_converts_to_utc() {
        let a = activity("Sowing", (6, 10), "");
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let intent =
            activity_start_reminder(&a, "1000", tz, now, ReminderPolicy::default(), 42).unwrap();

        // 09:00 IST on June 9 is 03:30 UTC.
        assert_eq!(intent.fire_at_utc.to_rfc3339(), "2025-06-09T03:30:00+00:00");
    }

    #[test]
    fn test_past_fire_time_is_skipped() {
        let a = activity("Sowing", (6, 10), "");
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        assert!(
            activity_start_reminder(&a, "1000", utc_tz(), now, ReminderPolicy::default(), 42)
                .is_none()
        );
    }

    #[test]
    fn test_fire_time_equal_to_now_still_schedules() {
        let a = activity("Sowing", (6, 10), "");
        let now = Utc.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap();
        assert!(
            activity_start_reminder(&a, "1000", utc_tz(), now, ReminderPolicy::default(), 42)
                .is_some()
        );
    }

    #[test]
    fn test_title_body_and_id_formats() {
        let long_desc = "d".repeat(150);
        let a = activity("Field Preparation", (6, 10), &long_desc);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let intent =
            activity_start_reminder(&a, "1000", utc_tz(), now, ReminderPolicy::default(), 77)
                .unwrap();

        assert_eq!(intent.intent_id, "activity-field-preparation-77");
        assert_eq!(intent.title, "Upcoming Activity: Field Preparation");
        let expected_body = format!("Tomorrow you need to start: Field Preparation. {}...", "d".repeat(100));
        assert_eq!(intent.body, expected_body);
    }

    #[test]
    fn test_projection_skips_past_and_keeps_future() {
        let s = saved(
            "Sugarcane",
            "Pune",
            vec![
                activity("Done", (1, 10), ""),
                activity("Soon", (6, 10), ""),
                activity("Later", (9, 1), ""),
            ],
        );
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut ids = MillisIdSource::new();

        let intents =
            project_activity_reminders(&s, utc_tz(), now, ReminderPolicy::default(), &mut ids);
        assert_eq!(intents.len(), 2);
        assert_ne!(intents[0].intent_id, intents[1].intent_id);
        assert!(intents.iter().all(|i| i.schedule_id == "1000"));
    }

    #[test]
    fn test_weather_every_minute_fires_one_interval_from_now() {
        let s = saved("Sugarcane", "Pune", vec![]);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let intent = weather_update_reminder(
            &s,
            &fday(),
            WeatherCadence::EveryMinutes(1),
            utc_tz(),
            now,
            99,
        )
        .unwrap();

        assert_eq!(intent.fire_at_utc, now + Duration::minutes(1));
        assert_eq!(intent.repeat_minutes, Some(1));
        assert_eq!(intent.intent_id, "weather-Pune-99");
        assert_eq!(intent.title, "Weather Update for Sugarcane in Pune");
        assert_eq!(intent.body, "Today's forecast: Partly cloudy, 31.5°C.");
    }

    #[test]
    fn test_weather_daily_before_hour_fires_same_day() {
        let s = saved("Rice", "Nashik", vec![]);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 5, 0, 0).unwrap();
        let intent = weather_update_reminder(
            &s,
            &fday(),
            WeatherCadence::DailyAtHour(7),
            utc_tz(),
            now,
            99,
        )
        .unwrap();

        assert_eq!(intent.fire_at_utc.to_rfc3339(), "2025-06-01T07:00:00+00:00");
        assert_eq!(intent.repeat_minutes, Some(MINUTES_PER_DAY));
    }

    #[test]
    fn test_weather_daily_after_hour_rolls_to_tomorrow() {
        let s = saved("Rice", "Nashik", vec![]);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let intent = weather_update_reminder(
            &s,
            &fday(),
            WeatherCadence::DailyAtHour(7),
            utc_tz(),
            now,
            99,
        )
        .unwrap();

        assert_eq!(intent.fire_at_utc.to_rfc3339(), "2025-06-02T07:00:00+00:00");
    }

    #[test]
    fn test_class_serializes_kebab_case() {
        let json = serde_json::to_string(&ReminderClass::ActivityStart).unwrap();
        assert_eq!(json, "\"activity-start\"");
        assert_eq!(ReminderClass::WeatherUpdate.to_string(), "weather-update");
    }
}
