use anyhow::{bail, Context, Result};

use cropcal_weather::WeatherClient;

use crate::config::load_config;
use crate::render;
use crate::store::load_book;

/// Print the forecast for a location, defaulting to the selected
/// schedule's location.
pub async fn run(location: Option<&str>, days: Option<u32>) -> Result<()> {
    let cfg = load_config()?;

    let location = match location {
        Some(l) => l.to_string(),
        None => {
            let book = load_book()?;
            match book.selected() {
                Some(s) => s.schedule.location.clone(),
                None => bail!("no schedule selected; pass --location <place>"),
            }
        }
    };
    let days = days.unwrap_or(cfg.weather.forecast_days);

    let weather = WeatherClient::with_base_url(cfg.weather_api_key()?, cfg.weather.base_url.clone());
    let forecast = weather
        .forecast(&location, days)
        .await
        .with_context(|| format!("fetch forecast for {location}"))?;

    println!("Forecast for {location}:");
    print!("{}", render::render_forecast(&forecast));
    Ok(())
}
