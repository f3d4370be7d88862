use serde::{Deserialize, Serialize};

fn default_window_width() -> u32 {
    800
}

fn default_window_height() -> u32 {
    600
}

fn default_min_width() -> u32 {
    600
}

fn default_min_height() -> u32 {
    400
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
}

impl UiConfig {
    /// Window geometry in the `WIDTHxHEIGHT` form stored in preferences
    pub fn window_size(&self) -> String {
        format!("{}x{}", self.window_width, self.window_height)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}
