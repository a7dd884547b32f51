use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::warn;

use cropcal_advisor::{decode_generated_schedule, prompt::schedule_prompt, GeminiClient};
use cropcal_core::{normalize_entries, snapshot, Schedule};
use cropcal_weather::WeatherClient;

use crate::config::load_config;
use crate::remind_cmd;
use crate::render;
use crate::store::{load_book, save_book};

/// Generate a schedule, save it, select it, and arm its reminders.
///
/// The forecast is best-effort: a missing weather key or a failed fetch
/// degrades to generation without forecast context. The generative call
/// itself is required.
pub async fn run(crop: &str, location: &str, no_reminders: bool) -> Result<()> {
    let crop = crop.trim();
    let location = location.trim();
    if crop.is_empty() || location.is_empty() {
        bail!("both --crop and --location are required");
    }

    let cfg = load_config()?;

    let forecast = match cfg.weather_api_key() {
        Ok(key) => {
            let weather = WeatherClient::with_base_url(key, cfg.weather.base_url.clone());
            match weather.forecast(location, cfg.weather.forecast_days).await {
                Ok(days) => days,
                Err(err) => {
                    warn!(%err, "weather fetch failed, generating without forecast");
                    Vec::new()
                }
            }
        }
        Err(err) => {
            warn!(%err, "weather api key missing, generating without forecast");
            Vec::new()
        }
    };

    let gemini = GeminiClient::with_base_url(
        cfg.gemini_api_key()?,
        cfg.llm.model.clone(),
        cfg.llm.base_url.clone(),
    );
    let prompt = schedule_prompt(crop, location, cfg.weather.forecast_days, &forecast);

    println!("Generating schedule for {crop} in {location}...");
    let text = gemini.generate(&prompt).await.context("generate schedule")?;
    let generated = decode_generated_schedule(&text).context("decode generated schedule")?;
    let activities = normalize_entries(&generated.schedule);

    let mut book = load_book()?;
    let saved = book.append(
        Schedule {
            crop: generated.crop.unwrap_or_else(|| crop.to_string()),
            location: generated.location.unwrap_or_else(|| location.to_string()),
            activities,
            weather_snapshot: if forecast.is_empty() {
                None
            } else {
                Some(snapshot(&forecast, cfg.weather.snapshot_days))
            },
        },
        Utc::now(),
    );
    let saved_id = saved.id.clone();
    book.select(&saved_id);
    save_book(&book)?;

    println!(
        "Saved schedule {saved_id}: {} in {} ({} activities), now selected",
        saved.schedule.crop,
        saved.schedule.location,
        saved.schedule.activities.len()
    );
    println!();
    print!("{}", render::render_timeline(&saved.schedule.activities));

    if !no_reminders {
        println!();
        remind_cmd::arm_schedule(&cfg, &book, &saved_id).await?;
    }

    Ok(())
}
