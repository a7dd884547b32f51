//! Daily tips: generated per activity and weather, with canned fallback.

use serde::{Deserialize, Serialize};
use tracing::warn;

use cropcal_core::{Activity, ForecastDay};

use crate::gemini::GeminiClient;
use crate::parse::decode_tips;
use crate::prompt::tips_prompt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTip {
    pub title: String,
    pub description: String,
    pub category: String,
}

/// The two tips shown when generation fails. Generic on purpose: they have
/// to make sense regardless of crop, weather, and season.
pub fn fallback_tips() -> Vec<DailyTip> {
    vec![
        DailyTip {
            title: "Check soil moisture levels".to_string(),
            description: "With today's weather conditions, monitor soil moisture and adjust irrigation as needed.".to_string(),
            category: "Watering".to_string(),
        },
        DailyTip {
            title: "Watch for pest activity".to_string(),
            description: "Current conditions may promote pest activity. Inspect plants closely and take preventive measures.".to_string(),
            category: "Pest Control".to_string(),
        },
    ]
}

/// Generate tips for today's weather and the current activity phase.
///
/// Never fails: any generation or decode error is logged and replaced by
/// [`fallback_tips`].
pub async fn daily_tips(
    client: &GeminiClient,
    crop: &str,
    location: &str,
    activity: &Activity,
    today: &ForecastDay,
) -> Vec<DailyTip> {
    let prompt = tips_prompt(crop, location, activity, today);
    let text = match client.generate(&prompt).await {
        Ok(t) => t,
        Err(err) => {
            warn!(%err, "tip generation failed, using fallback tips");
            return fallback_tips();
        }
    };

    match decode_tips(&text) {
        Ok(tips) => tips,
        Err(err) => {
            warn!(%err, "tip decoding failed, using fallback tips");
            fallback_tips()
        }
    }
}
