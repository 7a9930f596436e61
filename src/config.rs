//! Client configuration (~/.config/wakectl/config.toml)
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! The server URL can additionally be overridden from the command line or
//! `WAKECTL_SERVER_URL` (handled by clap in `main`).

use crate::session::SessionTiming;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Poll cadences in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_slow_secs")]
    pub slow_secs: u64,
    #[serde(default = "default_fast_secs")]
    pub fast_secs: u64,
}

fn default_slow_secs() -> u64 {
    10
}

fn default_fast_secs() -> u64 {
    2
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            slow_secs: default_slow_secs(),
            fast_secs: default_fast_secs(),
        }
    }
}

/// Deadlines in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Host must show up this long after a wake
    #[serde(default = "default_wake_secs")]
    pub wake_secs: u64,
    /// System must finish booting this long after an unlock
    #[serde(default = "default_boot_secs")]
    pub boot_secs: u64,
    /// Per HTTP request
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
}

fn default_wake_secs() -> u64 {
    120
}

fn default_boot_secs() -> u64 {
    180
}

fn default_request_secs() -> u64 {
    10
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            wake_secs: default_wake_secs(),
            boot_secs: default_boot_secs(),
            request_secs: default_request_secs(),
        }
    }
}

/// wakectl configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the wake backend
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Delay before prompting for the passphrase once initrd is up
    #[serde(default = "default_prompt_debounce_ms")]
    pub prompt_debounce_ms: u64,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_prompt_debounce_ms() -> u64 {
    500
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            polling: PollingConfig::default(),
            timeouts: TimeoutConfig::default(),
            prompt_debounce_ms: default_prompt_debounce_ms(),
        }
    }
}

impl ClientConfig {
    /// `<config dir>/wakectl/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wakectl").join("config.toml"))
    }

    /// Load config from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ClientConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path or the default location
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that would make the session spin or never poll
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            anyhow::bail!("server_url must not be empty");
        }
        if self.polling.slow_secs == 0 || self.polling.fast_secs == 0 {
            anyhow::bail!("polling intervals must be at least 1 second");
        }
        if self.timeouts.request_secs == 0 {
            anyhow::bail!("timeouts.request_secs must be at least 1 second");
        }
        Ok(())
    }

    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            slow_poll: Duration::from_secs(self.polling.slow_secs),
            fast_poll: Duration::from_secs(self.polling.fast_secs),
            wake_timeout: Duration::from_secs(self.timeouts.wake_secs),
            boot_timeout: Duration::from_secs(self.timeouts.boot_secs),
            prompt_debounce: Duration::from_millis(self.prompt_debounce_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timing(), SessionTiming::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"https://wake.example.net\"\n\n[timeouts]\nwake_secs = 300\n",
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.server_url, "https://wake.example.net");
        assert_eq!(config.timeouts.wake_secs, 300);
        assert_eq!(config.timeouts.boot_secs, 180);
        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.timing().wake_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[polling]\nfast_secs = 0\n").unwrap();

        let err = ClientConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("polling intervals"));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/config.toml");

        let mut config = ClientConfig::default();
        config.prompt_debounce_ms = 250;
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.prompt_debounce_ms, 250);
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "server_url = [").unwrap();
        assert!(ClientConfig::load(&path).is_err());
    }
}
