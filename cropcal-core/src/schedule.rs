//! Saved schedules and the in-memory collection they live in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::ids::MillisIdSource;
use crate::weather::ForecastDay;

/// A generated schedule before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub crop: String,
    pub location: String,
    pub activities: Vec<Activity>,
    /// Leading forecast days captured at creation time; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_snapshot: Option<Vec<ForecastDay>>,
}

/// A schedule as persisted, with identity and creation time attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSchedule {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// The persisted collection, mirrored in memory for a session.
///
/// All mutations go through the book so id assignment and selection stay
/// consistent. Selection tracks the schedule id, not its position, so a
/// delete elsewhere in the list cannot move it; durable storage is a layer
/// above.
#[derive(Debug, Default)]
pub struct ScheduleBook {
    schedules: Vec<SavedSchedule>,
    selected_id: Option<String>,
    ids: MillisIdSource,
}

impl ScheduleBook {
    pub fn new(schedules: Vec<SavedSchedule>) -> Self {
        Self {
            schedules,
            selected_id: None,
            ids: MillisIdSource::new(),
        }
    }

    /// Restore a persisted selection. Ids that no longer name a schedule
    /// are discarded.
    pub fn with_selected(mut self, selected_id: Option<String>) -> Self {
        self.selected_id = selected_id.filter(|id| self.schedules.iter().any(|s| s.id == *id));
        self
    }

    pub fn schedules(&self) -> &[SavedSchedule] {
        &self.schedules
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedSchedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Append a draft, assigning a fresh id and creation time. Returns the
    /// record as stored.
    pub fn append(&mut self, schedule: Schedule, now: DateTime<Utc>) -> SavedSchedule {
        let saved = SavedSchedule {
            schedule,
            id: self.ids.next_id(),
            created_at: now,
        };
        self.schedules.push(saved.clone());
        saved
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&SavedSchedule> {
        let id = self.selected_id.as_deref()?;
        self.get(id)
    }

    /// Select by id. Unknown ids leave the selection untouched.
    pub fn select(&mut self, id: &str) -> bool {
        if self.schedules.iter().any(|s| s.id == id) {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    /// Remove the schedule at `index`, preserving the order of the rest.
    ///
    /// Deleting the selected schedule clears the selection; deleting any
    /// other schedule leaves the selection on the same logical schedule.
    pub fn delete_at(&mut self, index: usize) -> Option<SavedSchedule> {
        if index >= self.schedules.len() {
            return None;
        }
        let removed = self.schedules.remove(index);
        if self.selected_id.as_deref() == Some(removed.id.as_str()) {
            self.selected_id = None;
        }
        Some(removed)
    }

    pub fn delete_by_id(&mut self, id: &str) -> Option<SavedSchedule> {
        let index = self.schedules.iter().position(|s| s.id == id)?;
        self.delete_at(index)
    }
}
