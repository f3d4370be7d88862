use async_trait::async_trait;
use lingua_config::BackendKind;
use lingua_config::translator::BackendConfig;

use crate::http::{http_failure, read_json};
use crate::{BackendOutput, ProviderMetadata, TranslateError, TranslationBackend};

/// LibreTranslate REST endpoint: form-encoded POST, JSON answer
#[derive(Clone)]
pub struct LibreTranslator {
    client: reqwest::Client,
    config: BackendConfig,
}

impl LibreTranslator {
    pub fn new(config: BackendConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.config.set_api_key(api_key);
    }

    fn form<'a>(
        &'a self,
        text: &'a str,
        from: &'a str,
        to: &'a str,
    ) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("q", text),
            ("source", from),
            ("target", to),
            ("format", "text"),
        ];
        if let Some(key) = self.api_key() {
            params.push(("api_key", key));
        }
        params
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .form(&self.form(text, from, to))
            .send()
            .await?;

        let (status, json) = read_json(response).await?;
        let Some(json) = json else {
            return Err(http_failure(status, None));
        };

        if let Some(translated) = json["translatedText"].as_str() {
            let detected_source = json["detectedLanguage"]["language"]
                .as_str()
                .map(str::to_string);

            return Ok(BackendOutput {
                text: translated.to_string(),
                detected_source,
            });
        }

        tracing::debug!("LibreTranslate answered {status} without translatedText");
        Err(http_failure(status, json["error"].as_str()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "LibreTranslate".to_string(),
            kind: BackendKind::Libre,
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
