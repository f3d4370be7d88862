use std::sync::Arc;

use kanal::AsyncSender;
use lingua_translator::{TranslateError, Translation, TranslationService};
use lingua_types::{AppEvent, RequestId, TranslationRequest, TranslationStatus};
use tokio_util::sync::CancellationToken;

use crate::profile::remember_languages;
use crate::state::AppState;

/// The translation currently running
pub struct InFlight {
    pub id: RequestId,
    pub cancel: CancellationToken,
    pub source_language: String,
    pub target_language: String,
}

pub async fn handle_translate_request(
    state: &AppState,
    service: Arc<TranslationService>,
    request: TranslationRequest,
    in_flight: &mut Option<InFlight>,
    ui_to_app_tx: &AsyncSender<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    parent: &CancellationToken,
) -> anyhow::Result<()> {
    let id = request.id;

    {
        let mut status = state.status.translation.write().await;
        if status.is_in_flight() {
            drop(status);
            tracing::debug!("Rejecting {id}: translation already running");
            app_to_ui_tx
                .send(AppEvent::Rejected {
                    id,
                    reason: "A translation is already in progress".to_string(),
                })
                .await?;
            state.status.mark_settled(id);
            return Ok(());
        }
        *status = TranslationStatus::InFlight { id };
    }

    let cancel = parent.child_token();
    *in_flight = Some(InFlight {
        id,
        cancel: cancel.clone(),
        source_language: request.source_language.clone(),
        target_language: request.target_language.clone(),
    });

    app_to_ui_tx.send(AppEvent::TranslationStarted { id }).await?;

    // Off the event loop so cancel and other events stay responsive
    let tx = ui_to_app_tx.clone();
    tokio::spawn(async move {
        let result = service
            .translate_cancellable(
                &request.text,
                &request.source_language,
                &request.target_language,
                &cancel,
            )
            .await;

        if let Err(e) = tx.send(AppEvent::TranslationFinished { id, result }).await {
            tracing::error!("Failed to report translation {id}: {e}");
        }
    });

    Ok(())
}

pub async fn handle_translation_finished(
    state: &AppState,
    id: RequestId,
    result: Result<Translation, TranslateError>,
    finished: Option<InFlight>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    {
        let mut status = state.status.translation.write().await;
        if !status.is_current(id) {
            tracing::warn!("Dropping result of stale translation {id}");
            return Ok(());
        }
        *status = TranslationStatus::Idle;
    }

    match &result {
        Ok(translation) => {
            tracing::info!(
                "Translated {} -> {} via {}",
                translation.from,
                translation.to,
                translation.provider
            );
            state.status.record_success();

            if let Some(finished) = finished {
                remember_languages(state, &finished.source_language, &finished.target_language)
                    .await;
            }
        }
        Err(e) => {
            tracing::warn!("Translation {id} failed ({}): {e}", e.kind());
            state.status.record_failure();
        }
    }

    app_to_ui_tx
        .send(AppEvent::TranslationFinished { id, result })
        .await?;
    state.status.mark_settled(id);

    Ok(())
}
