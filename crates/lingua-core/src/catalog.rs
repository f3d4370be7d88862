use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Source code that asks the backend to detect the language itself
pub const AUTO_DETECT: &str = "auto";

/// Returned by [`LanguageCatalog::code_for`] for unknown names
pub const DEFAULT_CODE: &str = "en";

/// Returned by [`LanguageCatalog::name_for`] for unknown codes
pub const DEFAULT_NAME: &str = "english";

const BUILTIN: &[(&str, &str)] = &[
    ("afrikaans", "af"),
    ("albanian", "sq"),
    ("amharic", "am"),
    ("arabic", "ar"),
    ("armenian", "hy"),
    ("azerbaijani", "az"),
    ("basque", "eu"),
    ("belarusian", "be"),
    ("bengali", "bn"),
    ("bosnian", "bs"),
    ("bulgarian", "bg"),
    ("catalan", "ca"),
    ("cebuano", "ceb"),
    ("chinese", "zh"),
    ("corsican", "co"),
    ("croatian", "hr"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("esperanto", "eo"),
    ("estonian", "et"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("frisian", "fy"),
    ("galician", "gl"),
    ("georgian", "ka"),
    ("german", "de"),
    ("greek", "el"),
    ("gujarati", "gu"),
    ("haitian", "ht"),
    ("hausa", "ha"),
    ("hawaiian", "haw"),
    ("hebrew", "he"),
    ("hindi", "hi"),
    ("hmong", "hmn"),
    ("hungarian", "hu"),
    ("icelandic", "is"),
    ("igbo", "ig"),
    ("indonesian", "id"),
    ("irish", "ga"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("javanese", "jv"),
    ("kannada", "kn"),
    ("kazakh", "kk"),
    ("khmer", "km"),
    ("kinyarwanda", "rw"),
    ("korean", "ko"),
    ("kurdish", "ku"),
    ("kyrgyz", "ky"),
    ("lao", "lo"),
    ("latin", "la"),
    ("latvian", "lv"),
    ("lithuanian", "lt"),
    ("luxembourgish", "lb"),
    ("macedonian", "mk"),
    ("malagasy", "mg"),
    ("malay", "ms"),
    ("malayalam", "ml"),
    ("maltese", "mt"),
    ("maori", "mi"),
    ("marathi", "mr"),
    ("mongolian", "mn"),
    ("burmese", "my"),
    ("nepali", "ne"),
    ("norwegian", "no"),
    ("odia", "or"),
    ("pashto", "ps"),
    ("persian", "fa"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("punjabi", "pa"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("samoan", "sm"),
    ("scots_gaelic", "gd"),
    ("serbian", "sr"),
    ("sesotho", "st"),
    ("shona", "sn"),
    ("sindhi", "sd"),
    ("sinhala", "si"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("somali", "so"),
    ("spanish", "es"),
    ("sundanese", "su"),
    ("swahili", "sw"),
    ("swedish", "sv"),
    ("tajik", "tg"),
    ("tamil", "ta"),
    ("tatar", "tt"),
    ("telugu", "te"),
    ("thai", "th"),
    ("turkish", "tr"),
    ("turkmen", "tk"),
    ("ukrainian", "uk"),
    ("urdu", "ur"),
    ("uyghur", "ug"),
    ("uzbek", "uz"),
    ("vietnamese", "vi"),
    ("welsh", "cy"),
    ("xhosa", "xh"),
    ("yiddish", "yi"),
    ("yoruba", "yo"),
    ("zulu", "zu"),
];

const POPULAR: &[&str] = &[
    "english",
    "spanish",
    "french",
    "german",
    "italian",
    "portuguese",
    "russian",
    "chinese",
    "japanese",
    "korean",
    "arabic",
    "hindi",
    "dutch",
    "swedish",
    "norwegian",
];

static BUILTIN_CATALOG: LazyLock<LanguageCatalog> = LazyLock::new(|| LanguageCatalog {
    entries: BUILTIN
        .iter()
        .map(|(name, code)| LanguageEntry::new(*name, *code))
        .collect(),
    popular: POPULAR.iter().map(|name| name.to_string()).collect(),
});

/// True when `name` asks for source language detection
pub fn is_auto(name: &str) -> bool {
    matches!(
        normalize_name(name).as_str(),
        "auto" | "auto_detect" | "autodetect"
    )
}

/// Lower-case, trim and join multi-word names with `_` ("Scots Gaelic" -> "scots_gaelic")
fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub code: String,
}

impl LanguageEntry {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate language name: {0}")]
    DuplicateName(String),

    #[error("Language name must be lower-case: {0}")]
    NotLowercase(String),

    #[error("Invalid language code '{code}' for {name}")]
    InvalidCode { name: String, code: String },

    #[error("Popular language is not in the catalog: {0}")]
    UnknownPopular(String),
}

/// Ordered, read-only table of language names and codes.
///
/// Lookups never fail: unknown names map to [`DEFAULT_CODE`] and unknown
/// codes to [`DEFAULT_NAME`]. Use [`LanguageCatalog::resolve`] when the
/// caller must know whether a name exists.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
    popular: Vec<String>,
}

impl LanguageCatalog {
    /// Build a catalog from custom entries, validating name and code invariants
    pub fn new(
        entries: impl IntoIterator<Item = LanguageEntry>,
        popular: impl IntoIterator<Item = String>,
    ) -> Result<Self, CatalogError> {
        let entries: Vec<LanguageEntry> = entries.into_iter().collect();
        let mut seen = HashSet::new();

        for entry in &entries {
            if entry.name != entry.name.to_lowercase() {
                return Err(CatalogError::NotLowercase(entry.name.clone()));
            }
            let code_ok = (2..=3).contains(&entry.code.len())
                && entry.code.chars().all(|c| c.is_ascii_lowercase());
            if !code_ok {
                return Err(CatalogError::InvalidCode {
                    name: entry.name.clone(),
                    code: entry.code.clone(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }

        let popular: Vec<String> = popular.into_iter().collect();
        if let Some(missing) = popular.iter().find(|name| !seen.contains(name.as_str())) {
            return Err(CatalogError::UnknownPopular(missing.clone()));
        }

        Ok(Self { entries, popular })
    }

    /// The bundled catalog
    pub fn builtin() -> &'static LanguageCatalog {
        &BUILTIN_CATALOG
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&LanguageEntry> {
        let name = normalize_name(name);
        self.entries.iter().find(|e| e.name == name)
    }

    /// Strict name lookup
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.find(name).map(|e| e.code.as_str())
    }

    /// Code for `name`, falling back to English
    pub fn code_for(&self, name: &str) -> &str {
        self.resolve(name).unwrap_or(DEFAULT_CODE)
    }

    /// Name for `code`. First entry in catalog order wins when codes are shared.
    pub fn name_for(&self, code: &str) -> &str {
        self.entry_for_code(code)
            .map(|e| e.name.as_str())
            .unwrap_or(DEFAULT_NAME)
    }

    pub fn entry_for_code(&self, code: &str) -> Option<&LanguageEntry> {
        let code = code.trim().to_lowercase();
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Shortcut list for language pickers
    pub fn popular_languages(&self) -> &[String] {
        &self.popular
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
