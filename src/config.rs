//! Configuration management for quoteseek using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::PollConfig;

/// Default backend endpoint (the search service's local port).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
/// Default filename for exported results.
pub const DEFAULT_EXPORT_FILENAME: &str = "conference_quotes.html";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the quote search backend.
    pub endpoint: String,
    /// Search index name sent as `selectedIndex`; older backends need it.
    pub search_index: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Delay between job status checks in milliseconds.
    pub poll_interval_ms: u64,
    /// Status checks before a job is declared timed out.
    pub poll_max_attempts: u32,
    /// Directory for exported HTML documents.
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Downloads for exports, like the browser UI did
        let export_dir = dirs::download_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_index: None,
            request_timeout: 30,
            poll_interval_ms: 2000,
            poll_max_attempts: 45,
            export_dir,
        }
    }
}

impl Settings {
    /// Polling parameters derived from these settings.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default()
            .with_interval(Duration::from_millis(self.poll_interval_ms))
            .with_max_attempts(self.poll_max_attempts)
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Default path for an exported document.
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(DEFAULT_EXPORT_FILENAME)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Search index name sent with queries.
    #[serde(default)]
    pub search_index: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Delay between job status checks in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    /// Status checks before a job is declared timed out.
    #[serde(default)]
    pub poll_max_attempts: Option<u32>,
    /// Directory for exported documents.
    #[serde(default)]
    pub export_dir: Option<String>,
}

impl Config {
    /// Load configuration using the prefer crate, which discovers
    /// quoteseek config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("quoteseek").await {
            Ok(pref_config) => {
                let endpoint: Option<String> = pref_config.get("endpoint").ok();
                let search_index: Option<String> = pref_config.get("search_index").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let poll_interval_ms: Option<u64> = pref_config.get("poll_interval_ms").ok();
                let poll_max_attempts: Option<u32> =
                    pref_config.get("poll_max_attempts").ok();
                let export_dir: Option<String> = pref_config.get("export_dir").ok();

                Config {
                    endpoint,
                    search_index,
                    request_timeout,
                    poll_interval_ms,
                    poll_max_attempts,
                    export_dir,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref endpoint) = self.endpoint {
            settings.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(ref index) = self.search_index {
            settings.search_index = Some(index.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(interval) = self.poll_interval_ms {
            settings.poll_interval_ms = interval;
        }
        if let Some(attempts) = self.poll_max_attempts {
            settings.poll_max_attempts = attempts;
        }
        if let Some(ref dir) = self.export_dir {
            let path = shellexpand::tilde(dir);
            settings.export_dir = PathBuf::from(path.as_ref());
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
