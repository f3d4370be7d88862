use async_trait::async_trait;
use lingua_config::BackendKind;
use lingua_config::translator::{BackendConfig, GOOGLE_CLOUD_URL, GOOGLE_FREE_URL};
use lingua_core::AUTO_DETECT;
use serde_json::{Value, json};

use crate::http::{http_failure, read_json};
use crate::{BackendOutput, ProviderMetadata, TranslateError, TranslationBackend};

/// Google Translate.
///
/// Without an API key this uses the keyless `translate_a/single` endpoint the
/// web widget uses. With a key it calls the Cloud Translation v2 API.
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    config: BackendConfig,
}

impl GoogleTranslator {
    pub fn new(config: BackendConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.config.set_api_key(api_key);
    }

    /// Keyed requests go to the Cloud endpoint unless a custom URL was configured
    fn cloud_url(&self) -> &str {
        if self.config.base_url == GOOGLE_FREE_URL {
            GOOGLE_CLOUD_URL
        } else {
            &self.config.base_url
        }
    }

    async fn translate_free(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let (status, json) = read_json(response).await?;
        match json {
            Some(json) if status.is_success() => parse_free_response(&json),
            _ => Err(http_failure(status, None)),
        }
    }

    async fn translate_cloud(
        &self,
        api_key: &str,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError> {
        let mut body = json!({
            "q": text,
            "target": to,
            "format": "text",
        });
        if from != AUTO_DETECT {
            body["source"] = Value::String(from.to_string());
        }

        let response = self
            .client
            .post(self.cloud_url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let (status, json) = read_json(response).await?;
        let Some(json) = json else {
            return Err(http_failure(status, None));
        };

        let translation = &json["data"]["translations"][0];
        match translation["translatedText"].as_str() {
            Some(text) => Ok(BackendOutput {
                text: text.to_string(),
                detected_source: translation["detectedSourceLanguage"]
                    .as_str()
                    .map(str::to_string),
            }),
            None => Err(http_failure(status, json["error"]["message"].as_str())),
        }
    }
}

/// `[[["Hola","Hello",..], ["mundo","world",..]], null, "en", ..]`
fn parse_free_response(json: &Value) -> Result<BackendOutput, TranslateError> {
    let text: String = json[0]
        .as_array()
        .map(|sentences| {
            sentences
                .iter()
                .filter_map(|sentence| sentence[0].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(TranslateError::BackendFailure(
            "No translation in response".to_string(),
        ));
    }

    Ok(BackendOutput {
        text,
        detected_source: json[2].as_str().map(str::to_string),
    })
}

#[async_trait]
impl TranslationBackend for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<BackendOutput, TranslateError> {
        match self.config.api_key.as_deref() {
            Some(key) => self.translate_cloud(key, text, from, to).await,
            None => self.translate_free(text, from, to).await,
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Translate".to_string(),
            kind: BackendKind::Google,
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
