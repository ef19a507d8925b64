// ── Persisted client state ──
//
// Small preferences the console remembers between runs (currently the
// colour theme). Lives in `state.toml` under the platform data directory,
// separate from the user-edited `config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockdesk_core::Theme;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientState {
    #[serde(default)]
    pub theme: Theme,
}

pub fn state_path() -> PathBuf {
    crate::data_dir().join("state.toml")
}

/// Restore state from the canonical path. A missing or unreadable file
/// yields the defaults.
pub fn load_state() -> ClientState {
    load_state_from(&state_path())
}

pub fn load_state_from(path: &Path) -> ClientState {
    match read_state(path) {
        Ok(Some(state)) => state,
        Ok(None) => ClientState::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
            ClientState::default()
        }
    }
}

fn read_state(path: &Path) -> Result<Option<ClientState>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
}

pub fn save_state(state: &ClientState) -> Result<(), ConfigError> {
    save_state_to(state, &state_path())
}

pub fn save_state_to(state: &ClientState, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(state)?)?;
    debug!(path = %path.display(), theme = %state.theme, "client state saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_state_is_light() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state_from(&dir.path().join("state.toml"));
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn theme_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("state.toml");
        save_state_to(&ClientState { theme: Theme::Dark }, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "theme = \"dark\"");
        assert_eq!(load_state_from(&path).theme, Theme::Dark);
    }

    #[test]
    fn corrupt_state_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "theme = 42").unwrap();
        assert_eq!(load_state_from(&path), ClientState::default());
    }
}
