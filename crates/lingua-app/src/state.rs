use std::path::PathBuf;
use std::sync::Arc;

use lingua_config::{Config, UserPreferences};
use tokio::sync::RwLock;

use crate::status::AppStatus;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub preferences: RwLock<UserPreferences>,
    /// Where preferences are saved, `None` keeps them in memory only
    pub preferences_path: Option<PathBuf>,
    pub status: AppStatus,
}

impl AppState {
    pub fn new(
        config: Config,
        preferences: UserPreferences,
        preferences_path: Option<PathBuf>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            preferences: RwLock::new(preferences),
            preferences_path,
            status: AppStatus::new(),
        }
    }
}
