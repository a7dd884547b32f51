//! Decoding of generated JSON payloads, tolerant of markdown fences.

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use cropcal_core::RawScheduleEntry;

use crate::tips::DailyTip;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("generated text is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("generated JSON has no `{0}` field")]
    MissingField(&'static str),
}

/// A schedule as the model returns it, before month normalization.
#[derive(Debug)]
pub struct GeneratedSchedule {
    pub crop: Option<String>,
    pub location: Option<String>,
    pub schedule: Vec<RawScheduleEntry>,
}

/// Pull the JSON body out of the generated text.
///
/// Models often wrap the payload in a ```json fence, sometimes with prose
/// around it. Prefer the fenced body; otherwise strip stray fence markers
/// and hope the rest is JSON.
fn extract_payload(text: &str) -> String {
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(.*?)```") {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                return m.as_str().trim().to_string();
            }
        }
    }
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decode a generated schedule payload.
///
/// A missing `schedule` field is rejected; an empty `schedule` array is
/// accepted and yields a schedule with no activities.
pub fn decode_generated_schedule(text: &str) -> Result<GeneratedSchedule, DecodeError> {
    #[derive(Deserialize)]
    struct SchedulePayload {
        crop: Option<String>,
        location: Option<String>,
        schedule: Option<Vec<RawScheduleEntry>>,
    }

    let payload = extract_payload(text);
    let parsed: SchedulePayload = serde_json::from_str(&payload)?;
    let schedule = parsed
        .schedule
        .ok_or(DecodeError::MissingField("schedule"))?;

    Ok(GeneratedSchedule {
        crop: parsed.crop,
        location: parsed.location,
        schedule,
    })
}

/// Decode a generated tips payload. Same fence handling as schedules.
pub fn decode_tips(text: &str) -> Result<Vec<DailyTip>, DecodeError> {
    #[derive(Deserialize)]
    struct TipsPayload {
        tips: Option<Vec<DailyTip>>,
    }

    let payload = extract_payload(text);
    let parsed: TipsPayload = serde_json::from_str(&payload)?;
    parsed.tips.ok_or(DecodeError::MissingField("tips"))
}
