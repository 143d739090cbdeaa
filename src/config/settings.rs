//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Platform server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Watch-progress reporting settings
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// TUI settings
    #[serde(default)]
    pub tui: TuiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the platform API, including the API prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request (empty = unauthenticated)
    #[serde(default)]
    pub api_token: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Seconds between watch-progress reports while a video plays
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiSettings {
    /// Number of videos fetched per library page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Seconds skipped by the player's seek keys
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u64,

    /// Show the video/document scope tag next to study questions
    #[serde(default = "default_true")]
    pub show_context_tags: bool,
}

// Default value functions

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_report_interval_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    50
}

fn default_seek_step_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            seek_step_secs: default_seek_step_secs(),
            show_context_tags: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            playback: PlaybackSettings::default(),
            tui: TuiSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.server.api_token.trim().is_empty() {
            if let Ok(token) = std::env::var("LECTERN_API_TOKEN") {
                if !token.trim().is_empty() {
                    self.server.api_token = token;
                }
            }
        }

        // The URL override always wins so one-off runs can point elsewhere.
        if let Ok(url) = std::env::var("LECTERN_SERVER_URL") {
            if !url.trim().is_empty() {
                self.server.base_url = url;
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "lectern", "lectern")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.max(1))
    }

    /// Watch-report cadence as a duration
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.playback.report_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_server() {
        let settings = Settings::default();
        assert_eq!(settings.server.base_url, "http://127.0.0.1:8000/api");
        assert!(settings.server.api_token.is_empty());
    }

    #[test]
    fn reports_every_ten_seconds_by_default() {
        let settings = Settings::default();
        assert_eq!(settings.report_interval(), Duration::from_secs(10));
    }

    #[test]
    fn interval_floor_is_one_second() {
        let mut settings = Settings::default();
        settings.playback.report_interval_secs = 0;
        assert_eq!(settings.report_interval(), Duration::from_secs(1));
    }
}
