use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const GOOGLE_FREE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const GOOGLE_CLOUD_URL: &str = "https://translation.googleapis.com/language/translate/v2";
pub const DEEPL_FREE_URL: &str = "https://api-free.deepl.com/v2/translate";
pub const LIBRE_URL: &str = "https://libretranslate.com/translate";

/// Which external service performs the translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Google,
    Deepl,
    Libre,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Google, BackendKind::Deepl, BackendKind::Libre];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Google => "google",
            BackendKind::Deepl => "deepl",
            BackendKind::Libre => "libre",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown translation service '{0}' (expected google, deepl or libre)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(BackendKind::Google),
            "deepl" => Ok(BackendKind::Deepl),
            "libre" | "libretranslate" => Ok(BackendKind::Libre),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// Endpoint and credentials for one backend instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }
}

fn default_source_language() -> String {
    "auto-detect".to_string()
}

fn default_target_language() -> String {
    "english".to_string()
}

fn default_max_text_length() -> usize {
    5000
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_google() -> BackendConfig {
    BackendConfig::new(GOOGLE_FREE_URL, None)
}

fn default_deepl() -> BackendConfig {
    BackendConfig::new(DEEPL_FREE_URL, None)
}

fn default_libre() -> BackendConfig {
    BackendConfig::new(LIBRE_URL, None)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_source_language")]
    pub default_source_language: String,
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    /// Longest accepted input, in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_google")]
    pub google: BackendConfig,
    #[serde(default = "default_deepl")]
    pub deepl: BackendConfig,
    #[serde(default = "default_libre")]
    pub libre: BackendConfig,
}

impl TranslatorConfig {
    /// Configured timeout, the default one when set to zero
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_seconds {
            0 => Duration::from_secs(default_request_timeout_seconds()),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn backend(&self, kind: BackendKind) -> &BackendConfig {
        match kind {
            BackendKind::Google => &self.google,
            BackendKind::Deepl => &self.deepl,
            BackendKind::Libre => &self.libre,
        }
    }

    pub fn backend_mut(&mut self, kind: BackendKind) -> &mut BackendConfig {
        match kind {
            BackendKind::Google => &mut self.google,
            BackendKind::Deepl => &mut self.deepl,
            BackendKind::Libre => &mut self.libre,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
            max_text_length: default_max_text_length(),
            request_timeout_seconds: default_request_timeout_seconds(),
            google: default_google(),
            deepl: default_deepl(),
            libre: default_libre(),
        }
    }
}
