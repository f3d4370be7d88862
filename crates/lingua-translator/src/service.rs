use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lingua_core::{AUTO_DETECT, LanguageCatalog, is_auto};
use tokio_util::sync::CancellationToken;

use crate::{
    LanguageCode, ProviderMetadata, TranslateError, Translation, TranslationBackend, Translator,
};

const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves language names against the catalog and dispatches to one backend.
///
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct TranslationService {
    backend: Arc<dyn TranslationBackend>,
    catalog: LanguageCatalog,
    max_text_length: usize,
    timeout: Duration,
}

impl TranslationService {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            catalog: LanguageCatalog::builtin().clone(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_catalog(mut self, catalog: LanguageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate input and turn names into codes. Never touches the backend.
    fn prepare(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<(String, String), TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyText);
        }

        let len = text.chars().count();
        if len > self.max_text_length {
            return Err(TranslateError::TextTooLong {
                len,
                max: self.max_text_length,
            });
        }

        let source = if is_auto(from) {
            AUTO_DETECT
        } else {
            self.catalog.resolve(from).unwrap_or_else(|| {
                tracing::debug!("Unknown source language '{from}', using auto-detect");
                AUTO_DETECT
            })
        };

        let target = self
            .catalog
            .resolve(to)
            .ok_or_else(|| TranslateError::UnsupportedLanguage(to.to_string()))?;

        Ok((source.to_string(), target.to_string()))
    }

    async fn dispatch(
        &self,
        text: &str,
        source: String,
        target: String,
    ) -> Result<Translation, TranslateError> {
        let provider = self.backend.metadata().name;
        tracing::debug!("Translating {} chars {source} -> {target} via {provider}", text.len());

        let call = self.backend.translate(text, &source, &target);
        let output = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TranslateError::BackendFailure(format!(
                    "{provider} did not respond within {:?}",
                    self.timeout
                )));
            }
        };

        Ok(Translation {
            text: output.text,
            from: output.detected_source.unwrap_or(source),
            to: target,
            provider,
        })
    }

    /// Same as [`Translator::translate`], abandoned as soon as `cancel` fires
    pub async fn translate_cancellable(
        &self,
        text: &str,
        from: &str,
        to: &str,
        cancel: &CancellationToken,
    ) -> Result<Translation, TranslateError> {
        let (source, target) = self.prepare(text, from, to)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Translation cancelled");
                Err(TranslateError::Cancelled)
            }
            result = self.dispatch(text, source, target) => result,
        }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        let (source, target) = self.prepare(text, from, to)?;
        self.dispatch(text, source, target).await
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageCode, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyText);
        }
        self.backend.detect_language(text).await
    }

    fn supported_languages(&self) -> Vec<String> {
        self.catalog.names().map(str::to_string).collect()
    }

    fn metadata(&self) -> ProviderMetadata {
        self.backend.metadata()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lingua_config::BackendKind;

    use super::*;
    use crate::BackendOutput;

    enum Reply {
        Text(&'static str),
        Detected(&'static str, &'static str),
        Fail(&'static str),
        Hang,
    }

    struct MockBackend {
        reply: Reply,
        calls: AtomicUsize,
        last_args: Mutex<Option<(String, String, String)>>,
    }

    impl MockBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_args: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_args(&self) -> (String, String, String) {
            self.last_args.lock().unwrap().clone().expect("backend was not called")
        }
    }

    #[async_trait]
    impl TranslationBackend for MockBackend {
        async fn translate(
            &self,
            text: &str,
            from: &str,
            to: &str,
        ) -> Result<BackendOutput, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() =
                Some((text.to_string(), from.to_string(), to.to_string()));

            match self.reply {
                Reply::Text(text) => Ok(BackendOutput::new(text)),
                Reply::Detected(text, lang) => Ok(BackendOutput {
                    text: text.to_string(),
                    detected_source: Some(lang.to_string()),
                }),
                Reply::Fail(cause) => Err(TranslateError::BackendFailure(cause.to_string())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(BackendOutput::new("too late"))
                }
            }
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "mock".to_string(),
                kind: BackendKind::Google,
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    fn service(backend: &Arc<MockBackend>) -> TranslationService {
        TranslationService::new(backend.clone())
    }

    #[tokio::test]
    async fn resolves_names_to_codes() {
        let backend = MockBackend::new(Reply::Text("Hola mundo"));
        let result = service(&backend)
            .translate("Hello world", "English", "spanish")
            .await
            .unwrap();

        assert_eq!(result.text, "Hola mundo");
        assert_eq!(result.from, "en");
        assert_eq!(result.to, "es");
        assert_eq!(result.provider, "mock");
        assert_eq!(
            backend.last_args(),
            ("Hello world".into(), "en".into(), "es".into())
        );
    }

    #[tokio::test]
    async fn auto_and_unknown_sources_request_detection() {
        let backend = MockBackend::new(Reply::Text("Bonjour le monde"));
        let service = service(&backend);

        service.translate("Hello world", "auto", "french").await.unwrap();
        assert_eq!(backend.last_args().1, "auto");

        service.translate("Hello world", "Auto-Detect", "french").await.unwrap();
        assert_eq!(backend.last_args().1, "auto");

        service.translate("Hello world", "elvish", "french").await.unwrap();
        assert_eq!(backend.last_args().1, "auto");
    }

    #[tokio::test]
    async fn detected_source_is_reported() {
        let backend = MockBackend::new(Reply::Detected("Hallo", "en"));
        let result = service(&backend).translate("Hello", "auto", "german").await.unwrap();
        assert_eq!(result.from, "en");
    }

    #[tokio::test]
    async fn unsupported_target_never_calls_backend() {
        let backend = MockBackend::new(Reply::Text("nope"));
        let err = service(&backend)
            .translate("Hello", "english", "klingon")
            .await
            .unwrap_err();

        assert_eq!(err, TranslateError::UnsupportedLanguage("klingon".into()));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn backend_failure_keeps_the_cause() {
        let backend = MockBackend::new(Reply::Fail("Network error"));
        let err = service(&backend)
            .translate("Hello", "english", "spanish")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TranslateError::BackendFailure(ref msg) if msg.contains("Network error")
        ));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_calls_backend() {
        let backend = MockBackend::new(Reply::Text("x"));
        let service = service(&backend).with_max_text_length(5);

        assert_eq!(
            service.translate("   \n", "auto", "spanish").await,
            Err(TranslateError::EmptyText)
        );
        assert_eq!(
            service.translate("abcdef", "auto", "spanish").await,
            Err(TranslateError::TextTooLong { len: 6, max: 5 })
        );
        // Limit counts characters, not bytes
        assert!(service.translate("ñandú", "auto", "english").await.is_ok());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn identical_requests_give_identical_results() {
        let backend = MockBackend::new(Reply::Text("Hola"));
        let service = service(&backend);

        let first = service.translate("Hello", "english", "spanish").await;
        let second = service.translate("Hello", "english", "spanish").await;

        assert_eq!(first, second);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let backend = MockBackend::new(Reply::Hang);
        let service = service(&backend).with_timeout(Duration::from_millis(50));

        let err = service.translate("Hello", "english", "spanish").await.unwrap_err();
        assert!(matches!(
            err,
            TranslateError::BackendFailure(ref msg) if msg.contains("did not respond")
        ));
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_call() {
        let backend = MockBackend::new(Reply::Hang);
        let service = service(&backend);
        let token = CancellationToken::new();

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            service.translate_cancellable("Hello", "english", "spanish", &token),
        )
        .await
        .expect("cancellation did not interrupt the call");

        assert_eq!(result, Err(TranslateError::Cancelled));
    }

    #[tokio::test]
    async fn validation_runs_before_cancellation() {
        let backend = MockBackend::new(Reply::Text("x"));
        let token = CancellationToken::new();
        token.cancel();

        let result = service(&backend)
            .translate_cancellable("Hello", "english", "klingon", &token)
            .await;
        assert_eq!(result, Err(TranslateError::UnsupportedLanguage("klingon".into())));
    }

    #[tokio::test]
    async fn detection_is_explicitly_unimplemented() {
        let backend = MockBackend::new(Reply::Text("x"));
        let result = service(&backend).detect_language("Hello world").await;
        assert_eq!(result, Err(TranslateError::NotImplemented("language detection")));
    }

    #[test]
    fn supported_languages_follow_the_catalog() {
        let backend = MockBackend::new(Reply::Text("x"));
        let names = service(&backend).supported_languages();
        assert_eq!(names.len(), LanguageCatalog::builtin().len());
        assert!(names.iter().any(|n| n == "spanish"));
    }
}
