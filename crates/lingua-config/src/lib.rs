use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::translator::BackendConfig;

pub mod preferences;
pub mod translator;
pub mod ui;

pub use self::preferences::{PreferencesError, UserPreferences};
pub use self::translator::{BackendKind, TranslatorConfig, UnknownBackend};
pub use self::ui::UiConfig;

pub const APP_NAME: &str = "Universal Language Translator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub ui: UiConfig,
    /// Preferences file location, platform config dir when unset
    pub preferences_path: Option<PathBuf>,
}

impl Config {
    /// Read the process environment once. Nothing below the app reads it again.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut translator = TranslatorConfig::default();

        if let Some(url) = get("GOOGLE_TRANSLATE_URL") {
            translator.google.base_url = url;
        }
        translator.google.set_api_key(get("GOOGLE_TRANSLATE_API_KEY"));

        if let Some(url) = get("DEEPL_API_URL") {
            translator.deepl.base_url = url;
        }
        translator.deepl.set_api_key(get("DEEPL_API_KEY"));

        if let Some(url) = get("LIBRE_TRANSLATE_URL") {
            translator.libre.base_url = url;
        }
        translator.libre.set_api_key(get("LIBRE_TRANSLATE_API_KEY"));

        // Zero would fail every request, keep the default instead
        translator.request_timeout_seconds = get("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse().ok())
            .filter(|&secs: &u64| secs > 0)
            .unwrap_or(translator.request_timeout_seconds);

        translator.max_text_length = get("MAX_TEXT_LENGTH")
            .and_then(|v| v.parse().ok())
            .filter(|&len: &usize| len > 0)
            .unwrap_or(translator.max_text_length);

        Config {
            translator,
            ui: UiConfig::default(),
            preferences_path: get("LINGUA_PREFERENCES").map(PathBuf::from),
        }
    }

    /// Swap the key of one backend for the rest of the session
    pub fn set_api_key(&mut self, kind: BackendKind, api_key: Option<String>) {
        self.translator.backend_mut(kind).set_api_key(api_key);
    }

    pub fn backend(&self, kind: BackendKind) -> &BackendConfig {
        self.translator.backend(kind)
    }

    /// Preferences as they look on first launch
    pub fn default_preferences(&self) -> UserPreferences {
        UserPreferences::with_defaults(
            &self.translator.default_source_language,
            &self.translator.default_target_language,
            &self.ui.window_size(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::translator::{DEEPL_FREE_URL, GOOGLE_FREE_URL};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.translator.google.base_url, GOOGLE_FREE_URL);
        assert_eq!(config.translator.deepl.base_url, DEEPL_FREE_URL);
        assert!(!config.translator.google.is_authenticated());
        assert!(!config.translator.deepl.is_authenticated());
        assert_eq!(config.translator.request_timeout_seconds, 10);
        assert!(config.preferences_path.is_none());
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LIBRE_TRANSLATE_URL", "http://localhost:5000/translate"),
            ("DEEPL_API_KEY", "deepl-secret"),
            ("GOOGLE_TRANSLATE_API_KEY", ""),
            ("REQUEST_TIMEOUT_SECONDS", "3"),
            ("MAX_TEXT_LENGTH", "not-a-number"),
        ]));

        assert_eq!(config.translator.libre.base_url, "http://localhost:5000/translate");
        assert_eq!(config.translator.deepl.api_key.as_deref(), Some("deepl-secret"));
        assert!(config.translator.google.api_key.is_none());
        assert_eq!(config.translator.request_timeout_seconds, 3);
        assert_eq!(config.translator.max_text_length, 5000);
    }

    #[test]
    fn zero_limits_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("REQUEST_TIMEOUT_SECONDS", "0"),
            ("MAX_TEXT_LENGTH", "0"),
        ]));

        assert_eq!(config.translator.request_timeout_seconds, 10);
        assert_eq!(config.translator.max_text_length, 5000);
    }

    #[test]
    fn set_api_key_only_touches_one_backend() {
        let mut config = Config::default();
        config.set_api_key(BackendKind::Libre, Some("test_key".into()));

        assert_eq!(config.backend(BackendKind::Libre).api_key.as_deref(), Some("test_key"));
        assert!(config.backend(BackendKind::Google).api_key.is_none());
    }

    #[test]
    fn default_preferences_follow_config() {
        let prefs = Config::default().default_preferences();
        assert_eq!(prefs.last_source_language, "auto-detect");
        assert_eq!(prefs.last_target_language, "english");
        assert_eq!(prefs.window_size, "800x600");
    }
}
