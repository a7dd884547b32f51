//! cropcal-weather: weatherapi.com forecast client

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use cropcal_core::ForecastDay;

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Raw weatherapi.com forecast response, reduced to the fields we keep.
#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    forecast: ApiForecast,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: ApiDay,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    avgtemp_c: f64,
    mintemp_c: f64,
    maxtemp_c: f64,
    totalprecip_mm: f64,
    avghumidity: f64,
    uv: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
}

impl From<ApiForecastDay> for ForecastDay {
    fn from(raw: ApiForecastDay) -> Self {
        ForecastDay {
            date: raw.date,
            condition: raw.day.condition.text,
            avg_temp_c: raw.day.avgtemp_c,
            min_temp_c: raw.day.mintemp_c,
            max_temp_c: raw.day.maxtemp_c,
            precip_mm: raw.day.totalprecip_mm,
            avg_humidity: raw.day.avghumidity,
            uv: raw.day.uv,
        }
    }
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Custom base URL, for pointing tests at a local stub.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch a daily forecast for a free-form location query.
    ///
    /// weatherapi.com caps the horizon by plan; asking for more days than
    /// the plan allows returns a shorter list, not an error.
    pub async fn forecast(&self, location: &str, days: u32) -> Result<Vec<ForecastDay>> {
        let days_str = days.to_string();
        let resp = self
            .client
            .get(format!("{}/forecast.json", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days_str.as_str()),
            ])
            .send()
            .await
            .context("weather request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("weather api error: {status} {txt}");
        }

        let out: ApiForecastResponse = resp.json().await.context("parse forecast response")?;
        let days: Vec<ForecastDay> = out
            .forecast
            .forecastday
            .into_iter()
            .map(ForecastDay::from)
            .collect();
        debug!(location, days = days.len(), "fetched forecast");
        Ok(days)
    }
}
