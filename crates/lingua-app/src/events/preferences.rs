use std::sync::Arc;

use kanal::AsyncSender;
use lingua_translator::{TranslationService, Translator, build_service};
use lingua_types::AppEvent;
use serde_json::Value;

use crate::profile::save_preferences;
use crate::state::AppState;

/// `true`, `42` and `"quoted"` are read as JSON, anything else as a plain string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub async fn handle_preference_update(
    state: &AppState,
    service: &mut Arc<TranslationService>,
    field: &str,
    value: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let updated = {
        let mut preferences = state.preferences.write().await;
        preferences.set(field, parse_value(value))
    };

    if let Err(e) = updated {
        tracing::warn!("Rejected preference {field}={value}: {e}");
        app_to_ui_tx
            .send(AppEvent::StatusMessage(format!("Invalid value for {field}: {value}")))
            .await?;
        return Ok(());
    }

    if !save_preferences(state).await {
        tracing::debug!("Preference {field} kept for this session only");
    }

    if field == "translation_service" {
        let kind = state.preferences.read().await.translation_service;
        let rebuilt = {
            let config = state.config.read().await;
            build_service(&config.translator, kind)
        };

        match rebuilt {
            Ok(rebuilt) => {
                *service = Arc::new(rebuilt);
                tracing::info!("Switched translation backend to {kind}");
                app_to_ui_tx
                    .send(AppEvent::BackendReady {
                        provider: service.metadata().name,
                    })
                    .await?;
            }
            Err(e) => {
                tracing::error!("Failed to switch backend to {kind}: {e}");
                app_to_ui_tx
                    .send(AppEvent::StatusMessage(format!("Could not switch to {kind}: {e}")))
                    .await?;
            }
        }
    }

    Ok(())
}
