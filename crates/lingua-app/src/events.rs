use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingua_translator::{TranslationService, Translator};
use lingua_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod preferences;
pub mod translate;

use preferences::handle_preference_update;
use translate::{InFlight, handle_translate_request, handle_translation_finished};

/// App's main loop.
///
/// Owns the Idle/InFlight transitions. `shutdown` is the root token: it is
/// cancelled here once a requested shutdown finds no translation running.
pub async fn event_loop(
    state: Arc<AppState>,
    mut service: Arc<TranslationService>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let mut in_flight: Option<InFlight> = None;
    let mut shutdown_pending = false;

    app_to_ui_tx
        .send(AppEvent::BackendReady {
            provider: service.metadata().name,
        })
        .await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        match event {
            AppEvent::TranslateRequested(request) => {
                tracing::debug!("TranslateRequested: {} chars", request.text.len());
                if shutdown_pending {
                    tracing::warn!("Ignoring translation request during shutdown");
                    state.status.mark_settled(request.id);
                    continue;
                }
                handle_translate_request(
                    &state,
                    service.clone(),
                    request,
                    &mut in_flight,
                    &ui_to_app_tx,
                    &app_to_ui_tx,
                    &shutdown,
                )
                .await?;
            }
            AppEvent::CancelRequested => match &in_flight {
                Some(current) => {
                    tracing::info!("Cancelling translation {}", current.id);
                    current.cancel.cancel();
                }
                None => {
                    app_to_ui_tx
                        .send(AppEvent::StatusMessage("Nothing to cancel".to_string()))
                        .await?;
                }
            },
            AppEvent::TranslationFinished { id, result } => {
                let finished = in_flight.take_if(|current| current.id == id);
                handle_translation_finished(&state, id, result, finished, &app_to_ui_tx).await?;

                if shutdown_pending && in_flight.is_none() {
                    tracing::info!("Last translation finished, shutting down");
                    shutdown.cancel();
                    break;
                }
            }
            AppEvent::PreferenceUpdate { field, value } => {
                handle_preference_update(&state, &mut service, &field, &value, &app_to_ui_tx)
                    .await?;
            }
            AppEvent::Shutdown => {
                if in_flight.is_some() {
                    tracing::info!("Shutdown requested, waiting for the running translation");
                    shutdown_pending = true;
                } else {
                    tracing::info!("Shutdown requested");
                    shutdown.cancel();
                    break;
                }
            }
            AppEvent::BackendReady { .. }
            | AppEvent::TranslationStarted { .. }
            | AppEvent::Rejected { .. }
            | AppEvent::StatusMessage(_) => {
                // UI-only events, ignore in backend
            }
        }
    }

    Ok(())
}
