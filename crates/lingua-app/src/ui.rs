use std::io::Write;

use kanal::AsyncReceiver;
use lingua_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Terminal front end: translations to stdout, everything else to stderr
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    interactive: bool,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        // Drain pending results before honouring shutdown
        let event = tokio::select! {
            biased;
            event = app_to_ui_rx.recv() => event?,
            _ = cancel.cancelled() => break,
        };

        match event {
            AppEvent::BackendReady { provider } => {
                tracing::info!("Using {provider}");
                if interactive {
                    eprintln!("[{provider}]");
                }
            }
            AppEvent::TranslationStarted { .. } => {
                if interactive {
                    eprintln!("Translating...");
                }
            }
            AppEvent::TranslationFinished { result, .. } => match result {
                Ok(translation) => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{}", translation.text)?;
                    stdout.flush()?;
                }
                Err(e) => eprintln!("Error ({}): {e}", e.kind()),
            },
            AppEvent::Rejected { reason, .. } => eprintln!("{reason}"),
            AppEvent::StatusMessage(message) => eprintln!("{message}"),
            AppEvent::TranslateRequested(_)
            | AppEvent::CancelRequested
            | AppEvent::PreferenceUpdate { .. }
            | AppEvent::Shutdown => {
                // App-bound events, ignore in UI
            }
        }
    }

    Ok(())
}
