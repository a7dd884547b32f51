use chrono::NaiveDate;
use cropcal_advisor::{decode_generated_schedule, decode_tips, DecodeError};
use cropcal_core::normalize_entries;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// End-to-end text handling: fenced model output decodes and normalizes
/// into dated activities.
#[test]
fn test_fenced_schedule_decodes_and_normalizes() {
    let text = r#"Sure! Here is the schedule you asked for:
```json
{
  "crop": "Sugarcane",
  "location": "Pune",
  "schedule": [
    {
      "month": "June - July",
      "activity": "Field Preparation and Sowing",
      "description": "Deep ploughing. Treat setts with fungicide."
    },
    {
      "month": "October",
      "activity": "Harvesting",
      "description": "Harvest at peak brix."
    }
  ]
}
```
Good luck with the season!"#;

    let generated = decode_generated_schedule(text).unwrap();
    assert_eq!(generated.crop.as_deref(), Some("Sugarcane"));
    assert_eq!(generated.location.as_deref(), Some("Pune"));

    let activities = normalize_entries(&generated.schedule);
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].activity_name, "Field Preparation and Sowing");
    assert_eq!(activities[0].start_date, ymd(2025, 6, 1));
    assert_eq!(activities[0].end_date, ymd(2025, 7, 28));
    assert_eq!(activities[1].start_date, ymd(2025, 10, 1));
    assert_eq!(activities[1].end_date, ymd(2025, 10, 28));
}

#[test]
fn test_missing_schedule_field_is_rejected() {
    let text = "{\"crop\": \"Rice\", \"location\": \"Nashik\"}";
    let err = decode_generated_schedule(text).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("schedule")));
}

#[test]
fn test_empty_schedule_array_is_accepted() {
    let text = "{\"crop\": \"Rice\", \"schedule\": []}";
    let generated = decode_generated_schedule(text).unwrap();
    assert!(generated.schedule.is_empty());
    assert!(normalize_entries(&generated.schedule).is_empty());
}

#[test]
fn test_prose_response_is_invalid_json() {
    let err = decode_generated_schedule("I cannot generate a schedule right now.").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
}

#[test]
fn test_bad_rows_are_dropped_during_normalization() {
    let text = r#"{
  "schedule": [
    {"month": "June", "activity": "Sowing", "description": "Plant."},
    {"activity": "Ghost", "description": "No month at all."},
    {"month": "July", "description": "No activity name."}
  ]
}"#;

    let generated = decode_generated_schedule(text).unwrap();
    assert_eq!(generated.schedule.len(), 3);

    let activities = normalize_entries(&generated.schedule);
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].activity_name, "Sowing");
}

#[test]
fn test_tips_payload_decodes() {
    let text = r#"```json
{
  "tips": [
    {
      "title": "Irrigate before noon",
      "description": "High UV today; water early to cut evaporation losses.",
      "category": "Watering"
    }
  ]
}
```"#;

    let tips = decode_tips(text).unwrap();
    assert_eq!(tips.len(), 1);
    assert_eq!(tips[0].title, "Irrigate before noon");
    assert_eq!(tips[0].category, "Watering");
}

#[test]
fn test_missing_tips_field_is_rejected() {
    let err = decode_tips("{\"advice\": []}").unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("tips")));
}

#[test]
fn test_empty_tips_array_is_accepted() {
    let tips = decode_tips("{\"tips\": []}").unwrap();
    assert!(tips.is_empty());
}
