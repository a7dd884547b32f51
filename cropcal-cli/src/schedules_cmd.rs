use anyhow::{bail, Result};
use chrono::Utc;
use std::io::{self, Write};

use cropcal_core::select_current_activity;

use crate::config::load_config;
use crate::render;
use crate::store::{load_book, save_book};

pub fn list() -> Result<()> {
    let book = load_book()?;
    if book.is_empty() {
        println!("No saved schedules yet. Run: cropcal generate --crop <crop> --location <place>");
        return Ok(());
    }

    for saved in book.schedules() {
        let selected = book.selected_id() == Some(saved.id.as_str());
        println!("{}", render::schedule_line(saved, selected));
    }
    Ok(())
}

pub fn show(id: Option<&str>, list_view: bool) -> Result<()> {
    let book = load_book()?;
    let saved = match id {
        Some(id) => match book.get(id) {
            Some(s) => s,
            None => bail!("no schedule with id {id} (run: cropcal list)"),
        },
        None => match book.selected() {
            Some(s) => s,
            None => bail!("no schedule selected (run: cropcal select <id>)"),
        },
    };

    println!(
        "{} in {} (created {})",
        saved.schedule.crop,
        saved.schedule.location,
        saved.created_at.format("%Y-%m-%d")
    );
    println!();
    if list_view {
        print!("{}", render::render_list(&saved.schedule.activities));
    } else {
        print!("{}", render::render_timeline(&saved.schedule.activities));
    }

    if let Some(snapshot) = &saved.schedule.weather_snapshot {
        println!();
        println!("Forecast snapshot from generation time:");
        print!("{}", render::render_forecast(snapshot));
    }
    Ok(())
}

pub fn select(id: &str) -> Result<()> {
    let mut book = load_book()?;
    if !book.select(id) {
        bail!("no schedule with id {id} (run: cropcal list)");
    }
    save_book(&book)?;
    println!("Selected schedule {id}");
    Ok(())
}

pub fn delete(id: &str, yes: bool) -> Result<()> {
    let mut book = load_book()?;
    let (crop, location) = match book.get(id) {
        Some(s) => (s.schedule.crop.clone(), s.schedule.location.clone()),
        None => bail!("no schedule with id {id} (run: cropcal list)"),
    };

    if !yes {
        let answer = prompt(&format!("Delete schedule {id} ({crop} in {location})? [y/N]"))?;
        if !matches!(answer.as_str(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if book.delete_by_id(id).is_none() {
        bail!("no schedule with id {id} (run: cropcal list)");
    }
    save_book(&book)?;
    println!("Deleted schedule {id}");
    Ok(())
}

/// Print the activity the farmer should be doing right now, judged against
/// today's date in the configured timezone.
pub fn current() -> Result<()> {
    let cfg = load_config()?;
    let book = load_book()?;
    let saved = match book.selected() {
        Some(s) => s,
        None => bail!("no schedule selected (run: cropcal select <id>)"),
    };

    let today = Utc::now().with_timezone(&cfg.tz()?).date_naive();
    match select_current_activity(&saved.schedule.activities, today) {
        Some(activity) => {
            println!("{} ({})", activity.activity_name, activity.month_span_label());
            for bullet in activity.description_sentences() {
                println!("  - {bullet}");
            }
        }
        None => println!("The selected schedule has no activities."),
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{} ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}
