use std::sync::Arc;

use kanal::AsyncSender;
use lingua_config::BackendKind;
use lingua_core::{LanguageCatalog, is_auto};
use lingua_types::{AppEvent, TranslationRequest};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use crate::status::AppStatus;

/// Where the text to translate comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Translate one text, then shut down
    Once(String),
    /// Read requests and commands line by line from stdin
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Translate(String),
    From(String),
    To(String),
    Backend(BackendKind),
    Swap,
    Cancel,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Type text to translate it. Commands:
  :from <language>    source language (name, code or auto)
  :to <language>      target language
  :backend <name>     google, deepl or libre
  :swap               swap source and target
  :cancel             abort the running translation
  :quit               exit";

/// Accept a catalog code where a language name is expected ("es" -> "spanish")
pub fn normalize_language(catalog: &LanguageCatalog, input: &str) -> String {
    let input = input.trim();
    if is_auto(input) || catalog.is_supported(input) {
        return input.to_lowercase();
    }
    match catalog.entry_for_code(input) {
        Some(entry) => entry.name.clone(),
        None => input.to_string(),
    }
}

pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Some(Command::Translate(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let parsed = match (name, arg) {
        ("from", arg) if !arg.is_empty() => Command::From(arg.to_string()),
        ("to", arg) if !arg.is_empty() => Command::To(arg.to_string()),
        ("backend", arg) => match arg.parse() {
            Ok(kind) => Command::Backend(kind),
            Err(e) => Command::Invalid(format!("{e}")),
        },
        ("swap", _) => Command::Swap,
        ("cancel", _) => Command::Cancel,
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => Command::Invalid(format!("Unknown command ':{command}', try :help")),
    };

    Some(parsed)
}

/// Feeds requests to the event loop. Always ends by asking for shutdown.
pub async fn input_io(
    state: Arc<AppState>,
    source: InputSource,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let catalog = LanguageCatalog::builtin();
    let (mut from, mut to) = {
        let preferences = state.preferences.read().await;
        (
            preferences.last_source_language.clone(),
            preferences.last_target_language.clone(),
        )
    };

    match source {
        InputSource::Once(text) => {
            ui_to_app_tx
                .send(AppEvent::TranslateRequested(TranslationRequest::new(
                    text, from, to,
                )))
                .await?;
        }
        InputSource::Interactive => {
            // Piped lines are a batch: one request at a time, none rejected
            let batch = !atty::is(atty::Stream::Stdin);
            if !batch {
                eprintln!("{HELP}");
            }
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            loop {
                let line = tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Input reader stopping");
                        return Ok(());
                    }
                    line = lines.next_line() => line?,
                };
                let Some(line) = line else {
                    tracing::debug!("End of input");
                    break;
                };

                let event = match parse_line(&line) {
                    None => continue,
                    Some(Command::Quit) => break,
                    Some(Command::Translate(text)) if batch => {
                        let request = TranslationRequest::new(text, &from, &to);
                        let id = request.id;
                        let mut settled = state.status.subscribe_settled();
                        ui_to_app_tx.send(AppEvent::TranslateRequested(request)).await?;

                        tokio::select! {
                            _ = cancel.cancelled() => return Ok(()),
                            _ = AppStatus::wait_settled(&mut settled, id) => {}
                        }
                        continue;
                    }
                    Some(Command::Translate(text)) => {
                        AppEvent::TranslateRequested(TranslationRequest::new(text, &from, &to))
                    }
                    Some(Command::From(language)) => {
                        from = normalize_language(catalog, &language);
                        preference("last_source_language", &from)
                    }
                    Some(Command::To(language)) => {
                        to = normalize_language(catalog, &language);
                        if !catalog.is_supported(&to) {
                            eprintln!("Warning: '{to}' is not a supported target language");
                        }
                        preference("last_target_language", &to)
                    }
                    Some(Command::Swap) => {
                        if !swap_languages(&mut from, &mut to) {
                            eprintln!("Cannot swap while the source language is auto-detected");
                            continue;
                        }
                        eprintln!("{from} -> {to}");
                        ui_to_app_tx
                            .send(preference("last_source_language", &from))
                            .await?;
                        preference("last_target_language", &to)
                    }
                    Some(Command::Backend(kind)) => {
                        preference("translation_service", kind.as_str())
                    }
                    Some(Command::Cancel) => AppEvent::CancelRequested,
                    Some(Command::Help) => {
                        eprintln!("{HELP}");
                        continue;
                    }
                    Some(Command::Invalid(message)) => {
                        eprintln!("{message}");
                        continue;
                    }
                };

                ui_to_app_tx.send(event).await?;
            }
        }
    }

    ui_to_app_tx.send(AppEvent::Shutdown).await?;
    Ok(())
}

/// Swap source and target, refused while the source is auto-detected
pub fn swap_languages(from: &mut String, to: &mut String) -> bool {
    if is_auto(from) {
        return false;
    }
    std::mem::swap(from, to);
    true
}

fn preference(field: &str, value: &str) -> AppEvent {
    AppEvent::PreferenceUpdate {
        field: field.to_string(),
        value: value.to_string(),
    }
}
