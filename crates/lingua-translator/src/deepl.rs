use async_trait::async_trait;
use lingua_config::BackendKind;
use lingua_config::translator::BackendConfig;
use lingua_core::AUTO_DETECT;

use crate::http::{http_failure, read_json};
use crate::{BackendOutput, ProviderMetadata, TranslateError, TranslationBackend};

#[derive(Clone)]
pub struct DeeplTranslator {
    client: reqwest::Client,
    config: BackendConfig,
}

impl DeeplTranslator {
    pub fn new(config: BackendConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.config.set_api_key(api_key);
    }
}

#[async_trait]
impl TranslationBackend for DeeplTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(TranslateError::BackendFailure(
                "DeepL API key is not configured".to_string(),
            ));
        };

        let target = to.to_uppercase();
        let source = from.to_uppercase();
        let mut params = vec![("text", text), ("target_lang", target.as_str())];
        if from != AUTO_DETECT {
            params.push(("source_lang", source.as_str()));
        }

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("DeepL-Auth-Key {api_key}"))
            .form(&params)
            .send()
            .await?;

        let (status, json) = read_json(response).await?;
        let Some(json) = json else {
            return Err(http_failure(status, None));
        };

        let translation = &json["translations"][0];
        match translation["text"].as_str() {
            Some(text) if status.is_success() => Ok(BackendOutput {
                text: text.to_string(),
                detected_source: translation["detected_source_language"]
                    .as_str()
                    .map(str::to_lowercase),
            }),
            _ => Err(http_failure(status, json["message"].as_str())),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            kind: BackendKind::Deepl,
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}
