use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use cropcal_core::{SavedSchedule, ScheduleBook};

use crate::state::{ensure_cropcal_home, read_state, state_path, write_state, AppState};

pub const SCHEDULES_FILE: &str = "schedules.json";

pub fn schedules_path() -> Result<PathBuf> {
    Ok(ensure_cropcal_home()?.join(SCHEDULES_FILE))
}

/// Load the saved schedule collection.
///
/// A missing file is created as an empty collection. A corrupt file is
/// treated as empty rather than blocking every command; the next save
/// overwrites it.
pub fn load_schedules(path: &Path) -> Result<Vec<SavedSchedule>> {
    if !path.exists() {
        write_schedules(path, &[])?;
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match serde_json::from_str(&s) {
        Ok(schedules) => Ok(schedules),
        Err(err) => {
            warn!(path = %path.display(), %err, "schedules file is corrupt, starting empty");
            Ok(Vec::new())
        }
    }
}

/// Write the collection via temp file and rename so a crash mid-write
/// cannot leave a truncated schedules.json behind.
pub fn write_schedules(path: &Path, schedules: &[SavedSchedule]) -> Result<()> {
    let json = serde_json::to_string_pretty(schedules)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

pub fn load_book() -> Result<ScheduleBook> {
    let schedules = load_schedules(&schedules_path()?)?;
    let state = read_state(&state_path()?)?;
    Ok(ScheduleBook::new(schedules).with_selected(state.selected_id))
}

pub fn save_book(book: &ScheduleBook) -> Result<()> {
    write_schedules(&schedules_path()?, book.schedules())?;
    let state = AppState {
        selected_id: book.selected_id().map(str::to_string),
    };
    write_state(&state_path()?, &state)?;
    Ok(())
}
