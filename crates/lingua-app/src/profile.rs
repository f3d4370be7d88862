use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lingua_config::{Config, UserPreferences};

use crate::state::AppState;

const PREFERENCES_FILE: &str = "preferences.json";

/// `<platform config dir>/lingua/preferences.json`
fn default_preferences_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lingua").map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
}

/// Configured path, or the platform default
pub fn preferences_path(config: &Config) -> Option<PathBuf> {
    config
        .preferences_path
        .clone()
        .or_else(default_preferences_path)
}

/// Defaults overlaid with the saved file. Read failures are logged, never fatal.
pub fn load_preferences(config: &Config, path: Option<&Path>) -> UserPreferences {
    let mut preferences = config.default_preferences();

    let Some(path) = path else {
        tracing::warn!("No preferences location available, using defaults");
        return preferences;
    };

    if !path.exists() {
        tracing::info!("No preferences at {}, using defaults", path.display());
        return preferences;
    }

    if let Err(e) = preferences.load_from_file(path) {
        tracing::warn!("Failed to load preferences: {e}");
    }

    preferences
}

/// Write the current preferences. Returns whether they reached the disk.
pub async fn save_preferences(state: &AppState) -> bool {
    let Some(path) = state.preferences_path.as_deref() else {
        return false;
    };

    let preferences = state.preferences.read().await;
    match preferences.save_to_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to save preferences: {e}");
            false
        }
    }
}

/// Store the languages of a successful translation, saving only on change
pub async fn remember_languages(state: &AppState, source: &str, target: &str) -> bool {
    {
        let mut preferences = state.preferences.write().await;
        if preferences.last_source_language == source && preferences.last_target_language == target
        {
            return false;
        }
        preferences.last_source_language = source.to_string();
        preferences.last_target_language = target.to_string();
    }

    save_preferences(state).await
}
