//! Plain-text rendering for schedules, timelines, and forecasts.

use chrono::Datelike;

use cropcal_core::{Activity, ForecastDay, SavedSchedule, MONTH_SHORT_NAMES};

const MIN_NAME_WIDTH: usize = 8;
const MAX_NAME_WIDTH: usize = 32;

/// Year-at-a-glance month grid, one row per activity.
pub fn render_timeline(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No activities scheduled yet\n".to_string();
    }

    let name_width = activities
        .iter()
        .map(|a| a.activity_name.chars().count())
        .max()
        .unwrap_or(MIN_NAME_WIDTH)
        .clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("{:<name_width$}", "Activity"));
    for m in MONTH_SHORT_NAMES {
        out.push_str(&format!(" {m:>4}"));
    }
    out.push('\n');

    for a in activities {
        out.push_str(&format!(
            "{:<name_width$}",
            clip(&a.activity_name, name_width)
        ));
        let active = a.start_date.month0()..=a.end_date.month0();
        for month in 0..12u32 {
            let cell = if active.contains(&month) { "====" } else { "." };
            out.push_str(&format!(" {cell:>4}"));
        }
        out.push('\n');
    }
    out
}

/// Activity list with description bullets, for narrow terminals.
pub fn render_list(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No activities scheduled yet\n".to_string();
    }

    let mut out = String::new();
    for a in activities {
        out.push_str(&format!("{} ({})\n", a.activity_name, a.month_span_label()));
        for bullet in a.description_sentences() {
            out.push_str(&format!("  - {bullet}\n"));
        }
    }
    out
}

/// One line per saved schedule, with a marker on the selected one.
pub fn schedule_line(saved: &SavedSchedule, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    format!(
        "{marker} {}  {} - {}  (created {})",
        saved.id,
        saved.schedule.crop,
        saved.schedule.location,
        saved.created_at.format("%Y-%m-%d"),
    )
}

pub fn render_forecast(days: &[ForecastDay]) -> String {
    if days.is_empty() {
        return "No forecast data\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<22} {:>6} {:>6} {:>6} {:>7} {:>5} {:>4}\n",
        "Date", "Condition", "Avg°C", "Min°C", "Max°C", "Rain mm", "Hum%", "UV"
    ));
    for d in days {
        out.push_str(&format!(
            "{:<12} {:<22} {:>6.1} {:>6.1} {:>6.1} {:>7.1} {:>5.0} {:>4.1}\n",
            d.date,
            clip(&d.condition, 22),
            d.avg_temp_c,
            d.min_temp_c,
            d.max_temp_c,
            d.precip_mm,
            d.avg_humidity,
            d.uv,
        ));
    }
    out
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        s.chars().take(width).collect()
    }
}
