//! cropcal-core: Core types and rules for the cropcal schedule assistant

pub mod months;
pub mod activity;
pub mod ids;
pub mod schedule;
pub mod selector;
pub mod weather;
pub mod time;
pub mod reminders;

pub use months::{MONTH_SHORT_NAMES, REFERENCE_YEAR, month_number};
pub use activity::{Activity, RawScheduleEntry, normalize_entries, normalize_entry};
pub use ids::MillisIdSource;
pub use schedule::{SavedSchedule, Schedule, ScheduleBook};
pub use selector::select_current_activity;
pub use weather::{ForecastDay, snapshot, today_or_first};
pub use time::{local_date_at_hour_to_utc, parse_timezone};
pub use reminders::{
    ReminderClass, ReminderIntent, ReminderPolicy, WeatherCadence, activity_start_reminder,
    project_activity_reminders, weather_update_body, weather_update_reminder,
};
