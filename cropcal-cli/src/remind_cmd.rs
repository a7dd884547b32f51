use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::Subcommand;
use tracing::warn;

use cropcal_core::{
    project_activity_reminders, today_or_first, weather_update_body, weather_update_reminder,
    MillisIdSource, ReminderClass, ReminderIntent, ScheduleBook,
};
use cropcal_weather::WeatherClient;

use crate::config::{load_config, Config};
use crate::notify::NotificationQueue;
use crate::store::load_book;

#[derive(Subcommand, Debug)]
pub enum RemindCommand {
    /// Rebuild the reminder queue from the saved schedules
    Plan {
        /// Only re-arm the recurring weather updates
        #[arg(long)]
        weather_only: bool,
    },

    /// Show queued reminders, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Queue counts by class and due state
    Status,

    /// Deliver due reminders; recurring ones are re-armed one interval out
    Dispatch {
        /// Print what would fire without touching the queue
        #[arg(long)]
        dry_run: bool,
    },

    /// Cancel queued reminders
    Cancel {
        /// "activity-start" or "weather-update"; omit to cancel everything
        #[arg(long)]
        class: Option<String>,
    },
}

pub async fn run(command: RemindCommand) -> Result<()> {
    match command {
        RemindCommand::Plan { weather_only } => plan(weather_only).await,
        RemindCommand::List { limit } => list(limit),
        RemindCommand::Status => status(),
        RemindCommand::Dispatch { dry_run } => dispatch(dry_run).await,
        RemindCommand::Cancel { class } => cancel(class.as_deref()),
    }
}

/// Arm reminders right after a generate: the new schedule's activity leads
/// plus re-derived weather updates for the whole collection.
pub async fn arm_schedule(cfg: &Config, book: &ScheduleBook, id: &str) -> Result<()> {
    let saved = match book.get(id) {
        Some(s) => s,
        None => bail!("no schedule with id {id}"),
    };

    let mut queue = NotificationQueue::open_default()?;
    let mut ids = MillisIdSource::new();
    let now = Utc::now();
    let tz = cfg.tz()?;

    let mut armed = 0;
    for intent in project_activity_reminders(saved, tz, now, cfg.reminder_policy(), &mut ids) {
        queue.schedule(intent);
        armed += 1;
    }
    let weather_armed = rearm_weather(cfg, book, &mut queue, &mut ids).await?;
    queue.save()?;

    println!("Armed {armed} activity reminders and {weather_armed} weather updates");
    Ok(())
}

async fn plan(weather_only: bool) -> Result<()> {
    let cfg = load_config()?;
    let book = load_book()?;
    let mut queue = NotificationQueue::open_default()?;
    let mut ids = MillisIdSource::new();
    let now = Utc::now();
    let tz = cfg.tz()?;

    let mut armed = 0;
    if !weather_only {
        queue.cancel_class(ReminderClass::ActivityStart);
        for saved in book.schedules() {
            for intent in
                project_activity_reminders(saved, tz, now, cfg.reminder_policy(), &mut ids)
            {
                queue.schedule(intent);
                armed += 1;
            }
        }
    }

    let weather_armed = rearm_weather(&cfg, &book, &mut queue, &mut ids).await?;
    queue.save()?;

    println!(
        "Armed {armed} activity reminders and {weather_armed} weather updates ({} queued)",
        queue.intents().len()
    );
    Ok(())
}

/// Cancel-and-recreate the recurring weather update for every saved
/// schedule. A fetch failure skips that schedule only.
async fn rearm_weather(
    cfg: &Config,
    book: &ScheduleBook,
    queue: &mut NotificationQueue,
    ids: &mut MillisIdSource,
) -> Result<usize> {
    let intents = derive_weather_intents(cfg, book, ids).await?;
    Ok(replace_weather_intents(queue, intents))
}

async fn derive_weather_intents(
    cfg: &Config,
    book: &ScheduleBook,
    ids: &mut MillisIdSource,
) -> Result<Vec<ReminderIntent>> {
    if book.is_empty() {
        return Ok(Vec::new());
    }

    let key = match cfg.weather_api_key() {
        Ok(k) => k,
        Err(err) => {
            warn!(%err, "weather api key missing, weather updates not armed");
            return Ok(Vec::new());
        }
    };
    let weather = WeatherClient::with_base_url(key, cfg.weather.base_url.clone());
    let tz = cfg.tz()?;
    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();
    let cadence = cfg.weather_cadence();

    let mut intents = Vec::new();
    for saved in book.schedules() {
        let forecast = match weather
            .forecast(&saved.schedule.location, cfg.weather.forecast_days)
            .await
        {
            Ok(days) => days,
            Err(err) => {
                warn!(location = %saved.schedule.location, %err, "forecast fetch failed, skipping weather update");
                continue;
            }
        };
        let day = match today_or_first(&forecast, today) {
            Some(d) => d,
            None => {
                warn!(location = %saved.schedule.location, "empty forecast, skipping weather update");
                continue;
            }
        };
        if let Some(intent) = weather_update_reminder(saved, day, cadence, tz, now, ids.next_millis())
        {
            intents.push(intent);
        }
    }
    Ok(intents)
}

/// Swap the queued weather updates for a freshly derived set. The whole
/// class is cancelled before the new set lands, so re-deriving an
/// unchanged collection keeps the queue count stable.
fn replace_weather_intents(queue: &mut NotificationQueue, intents: Vec<ReminderIntent>) -> usize {
    queue.cancel_class(ReminderClass::WeatherUpdate);
    let armed = intents.len();
    for intent in intents {
        queue.schedule(intent);
    }
    armed
}

async fn dispatch(dry_run: bool) -> Result<()> {
    let cfg = load_config()?;
    let book = load_book()?;
    let mut queue = NotificationQueue::open_default()?;
    let now = Utc::now();

    if dry_run {
        let due = queue.due(now);
        if due.is_empty() {
            println!("Nothing due.");
            return Ok(());
        }
        for intent in due {
            println!(
                "[{}] {} at {}",
                intent.class,
                intent.title,
                intent.fire_at_utc.to_rfc3339()
            );
        }
        return Ok(());
    }

    let due = queue.take_due(now);
    if due.is_empty() {
        println!("Nothing due.");
        return Ok(());
    }

    let weather = match cfg.weather_api_key() {
        Ok(key) => Some(WeatherClient::with_base_url(key, cfg.weather.base_url.clone())),
        Err(_) => None,
    };
    let tz = cfg.tz()?;
    let today = now.with_timezone(&tz).date_naive();

    let mut delivered = 0;
    let mut rearmed = 0;
    let mut dropped = 0;
    for mut intent in due {
        if intent.class == ReminderClass::WeatherUpdate {
            let saved = match book.get(&intent.schedule_id) {
                Some(s) => s,
                None => {
                    // The schedule was deleted; its updates die with it.
                    dropped += 1;
                    continue;
                }
            };
            // Rebuild the body from a fresh forecast; deliver the last
            // known conditions when the fetch fails.
            if let Some(weather) = &weather {
                match weather
                    .forecast(&saved.schedule.location, cfg.weather.forecast_days)
                    .await
                {
                    Ok(forecast) => {
                        if let Some(day) = today_or_first(&forecast, today) {
                            intent.body = weather_update_body(day);
                        }
                    }
                    Err(err) => {
                        warn!(location = %saved.schedule.location, %err, "forecast refresh failed, delivering stale conditions");
                    }
                }
            }
        }

        println!("[{}] {}", intent.class, intent.title);
        println!("  {}", intent.body);
        delivered += 1;

        if let Some(minutes) = intent.repeat_minutes {
            intent.fire_at_utc = now + Duration::minutes(minutes);
            queue.requeue(intent);
            rearmed += 1;
        }
    }

    queue.save()?;
    println!();
    println!(
        "Delivered {delivered}, re-armed {rearmed}, dropped {dropped} ({} still queued)",
        queue.intents().len()
    );
    Ok(())
}

fn status() -> Result<()> {
    let queue = NotificationQueue::open_default()?;
    let now = Utc::now();
    let total = queue.intents().len();
    let due = queue.due(now).len();
    let activity = queue
        .intents()
        .iter()
        .filter(|i| i.class == ReminderClass::ActivityStart)
        .count();

    println!("{total} queued ({due} due now)");
    println!("  activity-start: {activity}");
    println!("  weather-update: {}", total - activity);
    Ok(())
}

fn list(limit: usize) -> Result<()> {
    let queue = NotificationQueue::open_default()?;
    if queue.intents().is_empty() {
        println!("No reminders queued. Run: cropcal remind plan");
        return Ok(());
    }

    for intent in queue.intents().iter().rev().take(limit) {
        let recur = match intent.repeat_minutes {
            Some(m) => format!(" (every {m}m)"),
            None => String::new(),
        };
        println!(
            "[{}] {} at {}{recur}",
            intent.class,
            intent.title,
            intent.fire_at_utc.to_rfc3339()
        );
    }
    Ok(())
}

fn cancel(class: Option<&str>) -> Result<()> {
    let mut queue = NotificationQueue::open_default()?;
    let removed = match class {
        Some("activity-start") => queue.cancel_class(ReminderClass::ActivityStart),
        Some("weather-update") => queue.cancel_class(ReminderClass::WeatherUpdate),
        Some(other) => {
            bail!("unknown reminder class {other:?} (expected activity-start or weather-update)")
        }
        None => queue.cancel_all(),
    };
    queue.save()?;
    println!("Cancelled {removed} reminders");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Tz;
    use std::collections::HashSet;

    use cropcal_core::{ForecastDay, SavedSchedule, Schedule, WeatherCadence};

    fn saved(id: &str, crop: &str, location: &str) -> SavedSchedule {
        SavedSchedule {
            schedule: Schedule {
                crop: crop.to_string(),
                location: location.to_string(),
                activities: Vec::new(),
                weather_snapshot: None,
            },
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn fday() -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            condition: "Sunny".to_string(),
            avg_temp_c: 30.0,
            min_temp_c: 24.0,
            max_temp_c: 36.0,
            precip_mm: 0.0,
            avg_humidity: 50.0,
            uv: 9.0,
        }
    }

    fn derive(schedules: &[SavedSchedule], ids: &mut MillisIdSource) -> Vec<ReminderIntent> {
        let tz: Tz = "UTC".parse().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        schedules
            .iter()
            .filter_map(|s| {
                weather_update_reminder(
                    s,
                    &fday(),
                    WeatherCadence::EveryMinutes(1),
                    tz,
                    now,
                    ids.next_millis(),
                )
            })
            .collect()
    }

    #[test]
    fn test_rederiving_unchanged_collection_keeps_count_stable() {
        let dir = tempfile::tempdir().unwrap();
        let mut queue = NotificationQueue::open(dir.path().join("queue.json")).unwrap();
        let mut ids = MillisIdSource::new();

        queue.schedule(ReminderIntent {
            intent_id: "activity-sowing-1".to_string(),
            class: ReminderClass::ActivityStart,
            schedule_id: "1000".to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            fire_at_utc: Utc.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
            repeat_minutes: None,
        });

        let schedules = vec![
            saved("1000", "Sugarcane", "Pune"),
            saved("1001", "Rice", "Nashik"),
        ];

        let first = replace_weather_intents(&mut queue, derive(&schedules, &mut ids));
        assert_eq!(first, 2);
        let second = replace_weather_intents(&mut queue, derive(&schedules, &mut ids));
        assert_eq!(second, 2);

        let weather_count = queue
            .intents()
            .iter()
            .filter(|i| i.class == ReminderClass::WeatherUpdate)
            .count();
        assert_eq!(weather_count, 2);
        assert_eq!(queue.intents().len(), 3);

        let unique: HashSet<&str> = queue.intents().iter().map(|i| i.intent_id.as_str()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_replacing_with_empty_set_clears_the_class() {
        let dir = tempfile::tempdir().unwrap();
        let mut queue = NotificationQueue::open(dir.path().join("queue.json")).unwrap();
        let mut ids = MillisIdSource::new();

        let schedules = vec![saved("1000", "Sugarcane", "Pune")];
        replace_weather_intents(&mut queue, derive(&schedules, &mut ids));
        assert_eq!(queue.intents().len(), 1);

        // The last schedule was deleted; re-deriving leaves nothing behind.
        let armed = replace_weather_intents(&mut queue, Vec::new());
        assert_eq!(armed, 0);
        assert!(queue.intents().is_empty());
    }
}
