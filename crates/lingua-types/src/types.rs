use lingua_translator::{TranslateError, Translation};
use uuid::Uuid;

pub type RequestId = Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // UI -> app
    TranslateRequested(TranslationRequest),
    CancelRequested,
    PreferenceUpdate {
        field: String,
        value: String,
    },
    Shutdown,

    // App -> UI
    BackendReady {
        provider: String,
    },
    TranslationStarted {
        id: RequestId,
    },
    TranslationFinished {
        id: RequestId,
        result: Result<Translation, TranslateError>,
    },
    Rejected {
        id: RequestId,
        reason: String,
    },
    StatusMessage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: RequestId,
    pub text: String,
    /// Catalog name or the auto-detect sentinel
    pub source_language: String,
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// At most one translation runs at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    InFlight {
        id: RequestId,
    },
}

impl TranslationStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TranslationStatus::InFlight { .. })
    }

    /// Whether a result for `id` ends the current translation
    pub fn is_current(&self, id: RequestId) -> bool {
        matches!(self, TranslationStatus::InFlight { id: current } if *current == id)
    }
}
