use crate::dashboard::model::WidgetKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Base URL the widget endpoints are resolved against.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Directory holding the persisted dashboard state. If `None`, a
    /// platform data directory is used.
    #[serde(default)]
    pub storage_dir: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Refresh interval in seconds per widget kind. `0` fetches once.
    #[serde(default)]
    pub refresh_overrides: HashMap<WidgetKind, u64>,
    /// Stop the runner after this many seconds. Runs until killed if `None`.
    #[serde(default)]
    pub run_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_dir: None,
            debug_logging: false,
            log_file: None,
            request_timeout_secs: default_request_timeout(),
            refresh_overrides: HashMap::new(),
            run_seconds: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn storage_path(&self) -> PathBuf {
        if let Some(dir) = &self.storage_dir {
            return PathBuf::from(dir);
        }
        dirs_next::data_dir()
            .map(|d| d.join("trading_dashboard"))
            .unwrap_or_else(|| PathBuf::from("dashboard_state"))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(PathBuf::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Configured refresh for `kind`, if overridden. The inner `None` means
    /// fetch once.
    pub fn refresh_override(&self, kind: WidgetKind) -> Option<Option<Duration>> {
        self.refresh_overrides
            .get(&kind)
            .map(|secs| (*secs > 0).then(|| Duration::from_secs(*secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::load(&path.to_string_lossy()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"storage_dir": "/tmp/board", "refresh_overrides": {"SniperWidget": 30, "TraderPiWidget": 0}}"#,
        )
        .unwrap();
        let settings = Settings::load(&path.to_string_lossy()).unwrap();
        assert_eq!(settings.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.storage_path(), PathBuf::from("/tmp/board"));
        assert_eq!(
            settings.refresh_override(WidgetKind::Sniper),
            Some(Some(Duration::from_secs(30)))
        );
        assert_eq!(settings.refresh_override(WidgetKind::TraderPi), Some(None));
        assert_eq!(settings.refresh_override(WidgetKind::MarketPulse), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.debug_logging = true;
        settings.run_seconds = Some(5);
        settings.save(&path.to_string_lossy()).unwrap();
        assert_eq!(Settings::load(&path.to_string_lossy()).unwrap(), settings);
    }
}
