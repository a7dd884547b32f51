use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use cropcal_core::{parse_timezone, ReminderPolicy, WeatherCadence};

use crate::state::ensure_cropcal_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone the farmer plans their day in.
    pub timezone: String,
    pub llm: LlmSection,
    pub weather: WeatherSection,
    pub reminders: RemindersSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    pub model: String,
    pub base_url: String,
    /// Environment variable the API key is read from. The key itself never
    /// lands in config.toml.
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSection {
    pub base_url: String,
    pub api_key_env: String,
    /// Horizon requested from the forecast API.
    pub forecast_days: u32,
    /// Leading days kept in the schedule's stored snapshot.
    pub snapshot_days: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersSection {
    pub activity_lead_days: i64,
    pub activity_fire_hour: u32,
    /// "every-minute" or "daily".
    pub weather_cadence: String,
    pub weather_interval_minutes: i64,
    pub weather_daily_hour: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".to_string(),
            llm: LlmSection {
                model: "gemini-2.0-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
            },
            weather: WeatherSection {
                base_url: "https://api.weatherapi.com/v1".to_string(),
                api_key_env: "WEATHER_API_KEY".to_string(),
                forecast_days: 30,
                snapshot_days: 5,
            },
            reminders: RemindersSection {
                activity_lead_days: 1,
                activity_fire_hour: 9,
                weather_cadence: "every-minute".to_string(),
                weather_interval_minutes: 1,
                weather_daily_hour: 7,
            },
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn reminder_policy(&self) -> ReminderPolicy {
        ReminderPolicy {
            activity_lead_days: self.reminders.activity_lead_days,
            activity_fire_hour: self.reminders.activity_fire_hour,
        }
    }

    pub fn weather_cadence(&self) -> WeatherCadence {
        match self.reminders.weather_cadence.as_str() {
            "daily" => WeatherCadence::DailyAtHour(self.reminders.weather_daily_hour),
            "every-minute" => WeatherCadence::EveryMinutes(self.reminders.weather_interval_minutes),
            other => {
                warn!(cadence = other, "unknown weather cadence, using every-minute");
                WeatherCadence::EveryMinutes(self.reminders.weather_interval_minutes)
            }
        }
    }

    pub fn gemini_api_key(&self) -> Result<String> {
        std::env::var(&self.llm.api_key_env)
            .with_context(|| format!("{} is not set", self.llm.api_key_env))
    }

    pub fn weather_api_key(&self) -> Result<String> {
        std::env::var(&self.weather.api_key_env)
            .with_context(|| format!("{} is not set", self.weather.api_key_env))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cropcal_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    let s = toml::to_string_pretty(&cfg).context("serialize config")?;
    println!("{}", s.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.timezone, "Asia/Kolkata");
        assert_eq!(back.llm.model, "gemini-2.0-flash");
        assert_eq!(back.weather.forecast_days, 30);
        assert_eq!(back.reminders.activity_fire_hour, 9);
    }

    #[test]
    fn test_cadence_mapping() {
        let mut cfg = Config::default();
        assert_eq!(cfg.weather_cadence(), WeatherCadence::EveryMinutes(1));

        cfg.reminders.weather_cadence = "daily".to_string();
        assert_eq!(cfg.weather_cadence(), WeatherCadence::DailyAtHour(7));

        cfg.reminders.weather_cadence = "hourly".to_string();
        assert_eq!(cfg.weather_cadence(), WeatherCadence::EveryMinutes(1));
    }
}
