use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::translator::BackendKind;

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid preferences document: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Preferences file must hold a JSON object")]
    NotAnObject,
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    "default".to_string()
}

/// Flat key/value document remembered between sessions.
///
/// Keys this struct does not know about are kept in `extra` and written back
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub last_source_language: String,
    pub last_target_language: String,
    pub window_size: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub auto_detect_language: bool,
    #[serde(default = "default_true")]
    pub save_history: bool,
    #[serde(default)]
    pub translation_service: BackendKind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserPreferences {
    pub fn with_defaults(source: &str, target: &str, window_size: &str) -> Self {
        Self {
            last_source_language: source.to_string(),
            last_target_language: target.to_string(),
            window_size: window_size.to_string(),
            theme: default_theme(),
            auto_detect_language: true,
            save_history: true,
            translation_service: BackendKind::default(),
            extra: Map::new(),
        }
    }

    /// Read one key as it appears in the file
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(key).cloned(),
            _ => None,
        }
    }

    /// Set one key. Known keys are type-checked; unknown keys are stored as-is.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), PreferencesError> {
        let mut overlay = Map::new();
        overlay.insert(key.to_string(), value);
        self.merge(overlay)
    }

    /// Overlay the keys of `overlay` onto the current values
    pub fn merge(&mut self, overlay: Map<String, Value>) -> Result<(), PreferencesError> {
        let mut current = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => return Err(PreferencesError::NotAnObject),
        };
        current.extend(overlay);
        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data).map_err(|source| PreferencesError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Update from a file. Keys missing from the file keep their current value.
    /// On error `self` is left unchanged.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), PreferencesError> {
        let data = fs::read_to_string(path).map_err(|source| PreferencesError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let overlay = match serde_json::from_str::<Value>(&data)? {
            Value::Object(map) => map,
            _ => return Err(PreferencesError::NotAnObject),
        };

        let mut updated = self.clone();
        updated.merge(overlay)?;
        *self = updated;

        tracing::debug!("Loaded preferences from {}", path.display());
        Ok(())
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::with_defaults("auto-detect", "english", "800x600")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn file_uses_flat_keys() {
        let value = serde_json::to_value(UserPreferences::default()).unwrap();
        let map = value.as_object().unwrap();

        for key in [
            "last_source_language",
            "last_target_language",
            "window_size",
            "theme",
            "auto_detect_language",
            "save_history",
            "translation_service",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(map["translation_service"], json!("google"));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn save_then_load_restores_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut prefs = UserPreferences::default();
        prefs.last_target_language = "spanish".into();
        prefs.translation_service = BackendKind::Libre;
        prefs.save_to_file(&path).unwrap();

        let mut loaded = UserPreferences::default();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn load_overlays_only_present_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{ "theme": "dark", "font_scale": 1.5 }"#).unwrap();

        let mut prefs = UserPreferences::default();
        prefs.last_target_language = "german".into();
        prefs.load_from_file(&path).unwrap();

        assert_eq!(prefs.theme, "dark");
        assert_eq!(prefs.last_target_language, "german");
        assert_eq!(prefs.get("font_scale"), Some(json!(1.5)));
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let mut prefs = UserPreferences::default();
        prefs.set("font_scale", json!(2)).unwrap();
        prefs.save_to_file(&path).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["font_scale"], json!(2));
    }

    #[test]
    fn load_errors_are_reported_and_leave_values_alone() {
        let dir = TempDir::new().unwrap();
        let mut prefs = UserPreferences::default();

        let missing = prefs.load_from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(PreferencesError::Io { .. })));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(prefs.load_from_file(&path), Err(PreferencesError::Format(_))));

        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(prefs.load_from_file(&path), Err(PreferencesError::NotAnObject)));

        fs::write(&path, r#"{ "save_history": "sometimes" }"#).unwrap();
        assert!(prefs.load_from_file(&path).is_err());
        assert!(prefs.save_history);
    }

    #[test]
    fn set_type_checks_known_keys() {
        let mut prefs = UserPreferences::default();
        prefs.set("translation_service", json!("deepl")).unwrap();
        assert_eq!(prefs.translation_service, BackendKind::Deepl);

        assert!(prefs.set("translation_service", json!("bing")).is_err());
        assert_eq!(prefs.translation_service, BackendKind::Deepl);
    }
}
