use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use crate::persistence::load_json_or_default;

pub const SETTINGS_FILE: &str = "settings.json";
pub const BASE_URL_ENV: &str = "ANKIFY_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    /// Where the deck service lives. All endpoints hang off its root.
    pub base_url: String,
    /// Per-request ceiling. Unset (or 0) waits as long as the server takes; deck builds
    /// can run for minutes.
    pub timeout_secs: Option<u64>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self { base_url: "http://localhost:8020".to_string(), timeout_secs: None }
    }
}

impl SettingsData {
    /// `settings.json` from the data directory, then `ANKIFY_BASE_URL` on top.
    pub fn load() -> Self {
        load_json_or_default::<SettingsData>(SETTINGS_FILE)
            .with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}
