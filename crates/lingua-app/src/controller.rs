use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingua_translator::TranslationService;
use lingua_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{InputSource, input_io};
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(
        &self,
        service: Arc<TranslationService>,
        input: InputSource,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();
        let interactive = input == InputSource::Interactive;

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            service,
            self.channels.ui_to_app.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.clone(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            interactive,
            self.cancel_token.child_token(),
        ));

        // Input
        tasks.spawn(input_io(
            self.state.clone(),
            input,
            self.channels.ui_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
