use std::env;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use lingua_config::Config;
use lingua_core::LanguageCatalog;
use lingua_translator::{Translator, build_service};
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;
pub mod status;
pub mod ui;


use self::cli::Cli;
use self::controller::AppController;
use self::io::{InputSource, normalize_language};
use self::state::AppState;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    if print_catalog(&cli) {
        return ExitCode::SUCCESS;
    }

    // Blocking stdin read, done before the runtime starts
    let input = match read_input(&cli) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(async {
        match run(cli, input).await {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("{e:#}");
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        }
    });

    // The stdin reader can be parked in a blocking read
    runtime.shutdown_timeout(Duration::from_millis(200));
    code
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if env::var("LINGUA_LOG_JSON").is_ok_and(|v| v == "1") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(cli: &Cli) -> anyhow::Result<InputSource> {
    if !cli.text.is_empty() {
        return Ok(InputSource::Once(cli.text.join(" ")));
    }

    if cli.interactive || atty::is(atty::Stream::Stdin) {
        return Ok(InputSource::Interactive);
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(InputSource::Once(text.trim().to_string()))
}

/// `--list-languages` and `--popular`, true when one of them was printed
fn print_catalog(cli: &Cli) -> bool {
    let catalog = LanguageCatalog::builtin();

    if cli.list_languages {
        for entry in catalog.entries() {
            println!("{:<16}{}", entry.name, entry.code);
        }
        return true;
    }

    if cli.popular {
        for name in catalog.popular_languages() {
            println!("{:<16}{}", name, catalog.code_for(name));
        }
        return true;
    }

    false
}

async fn run(cli: Cli, input: InputSource) -> anyhow::Result<ExitCode> {
    let catalog = LanguageCatalog::builtin();

    let mut config = Config::from_env();
    if let Some(timeout) = cli.timeout {
        config.translator.request_timeout_seconds = timeout;
    }
    if let Some(path) = &cli.preferences {
        config.preferences_path = Some(path.clone());
    }

    let preferences_path = profile::preferences_path(&config);
    let mut preferences = profile::load_preferences(&config, preferences_path.as_deref());
    if let Some(from) = &cli.from {
        preferences.last_source_language = normalize_language(catalog, from);
    }
    if let Some(to) = &cli.to {
        preferences.last_target_language = normalize_language(catalog, to);
    }

    let backend = cli.backend.unwrap_or(preferences.translation_service);
    let service = build_service(&config.translator, backend)
        .with_context(|| format!("Failed to set up the {backend} backend"))?;

    if cli.detect {
        let InputSource::Once(text) = &input else {
            anyhow::bail!("--detect needs text as an argument or on stdin");
        };
        return match service.detect_language(text).await {
            Ok(code) => {
                println!("{} ({code})", catalog.name_for(&code));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Error ({}): {e}", e.kind());
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let one_shot = matches!(input, InputSource::Once(_));
    let state = Arc::new(AppState::new(config, preferences, preferences_path));
    let controller = AppController::new(state.clone());
    let mut tasks = controller.spawn_tasks(Arc::new(service), input);

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("Failed to listen for ctrl+c: {e}");
                }
                tracing::info!("Shutdown requested");
                controller.shutdown();
            }
            joined = tasks.join_next() => match joined {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    tracing::error!("task exited with error: {e:#}");
                    controller.shutdown();
                }
                Some(Err(e)) => {
                    tracing::error!("task panicked: {e}");
                    controller.shutdown();
                }
            }
        }
    }

    let failed = state.status.failed() > 0 || state.status.completed() == 0;
    if one_shot && failed {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
