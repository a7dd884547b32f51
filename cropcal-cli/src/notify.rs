use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use cropcal_core::{ReminderClass, ReminderIntent};

use crate::state::cropcal_home;

pub fn queue_path() -> Result<PathBuf> {
    Ok(cropcal_home()?.join("reminders").join("queue.json"))
}

/// Persisted reminder queue. All mutation is in memory; call [`save`]
/// once per command after the queue settles.
///
/// [`save`]: NotificationQueue::save
pub struct NotificationQueue {
    path: PathBuf,
    intents: Vec<ReminderIntent>,
}

impl NotificationQueue {
    /// Open the queue at a path. Missing file means an empty queue;
    /// a corrupt file is dropped with a warning.
    pub fn open(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                intents: Vec::new(),
            });
        }
        let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let intents = match serde_json::from_str(&s) {
            Ok(intents) => intents,
            Err(err) => {
                warn!(path = %path.display(), %err, "reminder queue is corrupt, starting empty");
                Vec::new()
            }
        };
        Ok(Self { path, intents })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(queue_path()?)
    }

    pub fn intents(&self) -> &[ReminderIntent] {
        &self.intents
    }

    pub fn schedule(&mut self, intent: ReminderIntent) {
        self.intents.push(intent);
    }

    /// Remove every intent of a class, returning how many went away.
    pub fn cancel_class(&mut self, class: ReminderClass) -> usize {
        let before = self.intents.len();
        self.intents.retain(|i| i.class != class);
        before - self.intents.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.intents.len();
        self.intents.clear();
        n
    }

    /// Peek at intents whose fire time has arrived.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<&ReminderIntent> {
        self.intents.iter().filter(|i| i.fire_at_utc <= now).collect()
    }

    /// Remove and return due intents. Recurring intents are expected to be
    /// requeued by the caller with a fresh fire time.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ReminderIntent> {
        let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.intents)
            .into_iter()
            .partition(|i| i.fire_at_utc <= now);
        self.intents = rest;
        due
    }

    pub fn requeue(&mut self, intent: ReminderIntent) {
        self.intents.push(intent);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.intents)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("rename {} -> {}", tmp.display(), self.path.display()))?;
        Ok(())
    }
}
