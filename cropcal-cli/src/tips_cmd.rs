use anyhow::{bail, Context, Result};
use chrono::Utc;

use cropcal_advisor::{daily_tips, GeminiClient};
use cropcal_core::{select_current_activity, today_or_first};
use cropcal_weather::WeatherClient;

use crate::config::load_config;
use crate::store::load_book;

/// Daily tips for the selected schedule's current activity and today's
/// weather. Generation failures inside [`daily_tips`] degrade to canned
/// tips; missing preconditions are user errors.
pub async fn run() -> Result<()> {
    let cfg = load_config()?;
    let book = load_book()?;
    let saved = match book.selected() {
        Some(s) => s,
        None => bail!("no schedule selected (run: cropcal select <id>)"),
    };

    let tz = cfg.tz()?;
    let today = Utc::now().with_timezone(&tz).date_naive();
    let activity = match select_current_activity(&saved.schedule.activities, today) {
        Some(a) => a,
        None => bail!("the selected schedule has no activities"),
    };

    let weather = WeatherClient::with_base_url(cfg.weather_api_key()?, cfg.weather.base_url.clone());
    let forecast = weather
        .forecast(&saved.schedule.location, cfg.weather.forecast_days)
        .await
        .with_context(|| format!("fetch forecast for {}", saved.schedule.location))?;
    let day = match today_or_first(&forecast, today) {
        Some(d) => d,
        None => bail!("empty forecast for {}", saved.schedule.location),
    };

    let gemini = GeminiClient::with_base_url(
        cfg.gemini_api_key()?,
        cfg.llm.model.clone(),
        cfg.llm.base_url.clone(),
    );
    let tips = daily_tips(
        &gemini,
        &saved.schedule.crop,
        &saved.schedule.location,
        activity,
        day,
    )
    .await;

    println!(
        "Daily tips for {} in {} ({} phase)",
        saved.schedule.crop, saved.schedule.location, activity.activity_name
    );
    println!();
    for tip in &tips {
        println!("[{}] {}", tip.category, tip.title);
        println!("  {}", tip.description);
    }
    Ok(())
}
