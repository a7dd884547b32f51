//! Prompt text for schedule generation and daily tips.

use cropcal_core::{Activity, ForecastDay};

/// Build the schedule generation prompt.
///
/// The forecast is context for description content only; the model is told
/// not to let it move the activity timeline. An empty forecast degrades to
/// a "no forecast" line rather than omitting the topic.
pub fn schedule_prompt(
    crop: &str,
    location: &str,
    forecast_days: u32,
    forecast: &[ForecastDay],
) -> String {
    let forecast_line = if forecast.is_empty() {
        "No weather forecast available.".to_string()
    } else {
        format!(
            "The weather forecast is: {}",
            serde_json::to_string(forecast).unwrap_or_else(|_| "[]".to_string())
        )
    };

    format!(
        r#"Generate a crop schedule for {crop} in {location} based on the upcoming weather forecast, return the information in JSON format.
Include tips needed for the given activity and requirements for that activity. The weather forecast should be considered only for description content (not for the crop activity timeline), for the next {forecast_days} days.
{forecast_line}
Return the schedule in strict JSON format:
{{
  "crop": "{crop}",
  "location": "{location}",
  "schedule": [
    {{
      "month": "June - July",
      "activity": "Field Preparation and Sowing",
      "description": "Deep ploughing (25-30 cm) for good root development. Treat setts with fungicide before planting. Maintain soil moisture to aid sprouting."
    }}
  ]
}}
Month values are full English month names, either a single month ("October") or a range ("June - July")."#
    )
}

/// Build the daily tips prompt from the current activity and today's weather.
pub fn tips_prompt(crop: &str, location: &str, activity: &Activity, today: &ForecastDay) -> String {
    format!(
        r#"Generate 3-5 specific daily tips for a farmer growing {crop} in {location} who is currently in the "{name}" phase.

Current weather conditions:
- Date: {date}
- Average Temperature: {avg_temp}°C
- Condition: {condition}
- Max Temperature: {max_temp}°C
- Min Temperature: {min_temp}°C
- Total Precipitation: {precip}mm
- Humidity: {humidity}%
- UV Index: {uv}

Activity description: {description}

Return the tips in JSON format:
{{
  "tips": [
    {{
      "title": "Short tip title",
      "description": "Detailed explanation with actionable advice for today's specific weather conditions",
      "category": "One of: Watering, Pest Control, Fertilization, Protection, Timing, Resource Management"
    }}
  ]
}}

Make tips extremely specific to today's weather and current activity phase."#,
        name = activity.activity_name,
        date = today.date,
        avg_temp = today.avg_temp_c,
        condition = today.condition,
        max_temp = today.max_temp_c,
        min_temp = today.min_temp_c,
        precip = today.precip_mm,
        humidity = today.avg_humidity,
        uv = today.uv,
        description = activity.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

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

    #[test]
    fn test_schedule_prompt_embeds_forecast_json() {
        let p = schedule_prompt("Sugarcane", "Pune", 30, &[fday()]);
        assert!(p.contains("Generate a crop schedule for Sugarcane in Pune"));
        assert!(p.contains("the next 30 days"));
        assert!(p.contains("The weather forecast is: ["));
        assert!(p.contains("\"condition\":\"Sunny\""));
    }

    #[test]
    fn test_schedule_prompt_without_forecast() {
        let p = schedule_prompt("Rice", "Nashik", 30, &[]);
        assert!(p.contains("No weather forecast available."));
        assert!(!p.contains("The weather forecast is:"));
    }

    #[test]
    fn test_tips_prompt_carries_activity_and_weather() {
        let a = Activity {
            activity_name: "Weeding and Thinning".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 28).unwrap(),
            description: "Remove excess shoots.".to_string(),
        };
        let p = tips_prompt("Sugarcane", "Pune", &a, &fday());
        assert!(p.contains("currently in the \"Weeding and Thinning\" phase"));
        assert!(p.contains("- Average Temperature: 30°C"));
        assert!(p.contains("- Condition: Sunny"));
        assert!(p.contains("Activity description: Remove excess shoots."));
    }
}
