use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn cropcal_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cropcal"))
}

pub fn ensure_cropcal_home() -> Result<PathBuf> {
    let dir = cropcal_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Small bits of UI state that survive between invocations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppState {
    pub selected_id: Option<String>,
}

pub fn state_path() -> Result<PathBuf> {
    Ok(ensure_cropcal_home()?.join("state.json"))
}

/// Read persisted state. A missing file means defaults; a corrupt file is
/// dropped with a warning rather than blocking every command.
pub fn read_state(path: &Path) -> Result<AppState> {
    if !path.exists() {
        return Ok(AppState::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match serde_json::from_str(&s) {
        Ok(state) => Ok(state),
        Err(err) => {
            warn!(path = %path.display(), %err, "state file is corrupt, using defaults");
            Ok(AppState::default())
        }
    }
}

/// Write state via temp file and rename, like the schedule collection.
pub fn write_state(path: &Path, state: &AppState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_state_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = read_state(&dir.path().join("state.json")).unwrap();
        assert!(state.selected_id.is_none());
    }

    #[test]
    fn test_corrupt_state_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let state = read_state(&path).unwrap();
        assert!(state.selected_id.is_none());
    }

    #[test]
    fn test_round_trip_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = AppState {
            selected_id: Some("1718000000000".to_string()),
        };

        write_state(&path, &state).unwrap();
        let back = read_state(&path).unwrap();
        assert_eq!(back.selected_id.as_deref(), Some("1718000000000"));
        assert!(!dir.path().join("state.json.tmp").exists());
    }
}
