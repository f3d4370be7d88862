use std::sync::Arc;

use lingua_config::{BackendKind, TranslatorConfig};

mod deepl;
mod error;
mod google;
mod http;
mod libre;
mod service;

pub use deepl::DeeplTranslator;
pub use error::{ErrorKind, TranslateError};
pub use google::GoogleTranslator;
pub use libre::LibreTranslator;
pub use service::TranslationService;

pub type LanguageCode = String;

/// Name-level translation interface used by the app
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text. `from` may be the auto-detect sentinel, `to` must be a catalog name.
    async fn translate(&self, text: &str, from: &str, to: &str)
    -> Result<Translation, TranslateError>;

    /// Detect language of text
    async fn detect_language(&self, text: &str) -> Result<LanguageCode, TranslateError>;

    /// Names of the languages that can be requested
    fn supported_languages(&self) -> Vec<String>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// Code-level interface implemented by each external service
#[async_trait::async_trait]
pub trait TranslationBackend: Send + Sync {
    /// One call to the service. `from` is a catalog code or `"auto"`.
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError>;

    async fn detect_language(&self, _text: &str) -> Result<LanguageCode, TranslateError> {
        Err(TranslateError::NotImplemented("language detection"))
    }

    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutput {
    pub text: String,
    /// Source language reported by the service, if any
    pub detected_source: Option<LanguageCode>,
}

impl BackendOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detected_source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub name: String,
    pub kind: BackendKind,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

/// Build the backend adapter for `kind` from its config section
pub fn build_backend(
    config: &TranslatorConfig,
    kind: BackendKind,
) -> Result<Arc<dyn TranslationBackend>, TranslateError> {
    let client = http::build_client(config.request_timeout())?;
    let backend_config = config.backend(kind).clone();

    tracing::debug!(
        "Building {} backend for {} (authenticated: {})",
        kind,
        backend_config.base_url,
        backend_config.is_authenticated()
    );

    let backend: Arc<dyn TranslationBackend> = match kind {
        BackendKind::Google => Arc::new(GoogleTranslator::new(backend_config, client)),
        BackendKind::Deepl => Arc::new(DeeplTranslator::new(backend_config, client)),
        BackendKind::Libre => Arc::new(LibreTranslator::new(backend_config, client)),
    };

    Ok(backend)
}

/// Service for `kind` with the limits from `config`
pub fn build_service(
    config: &TranslatorConfig,
    kind: BackendKind,
) -> Result<TranslationService, TranslateError> {
    let backend = build_backend(config, kind)?;

    Ok(TranslationService::new(backend)
        .with_max_text_length(config.max_text_length)
        .with_timeout(config.request_timeout()))
}
