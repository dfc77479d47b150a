use crate::error::{BrieflyError, Result};
use crate::validate::PasswordPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Client configuration, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the summarization backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Strength rules for new passwords (registration and reset).
    #[serde(default)]
    pub password_policy: PasswordPolicy,

    /// How often navigation re-reads the session, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            password_policy: PasswordPolicy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    pub const KEYS: [&'static str; 3] = ["base-url", "password-policy", "poll-interval"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BrieflyError::Io)?;
        let config: ClientConfig =
            serde_json::from_str(&content).map_err(BrieflyError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BrieflyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BrieflyError::Serialization)?;
        fs::write(config_path, content).map_err(BrieflyError::Io)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => Some(self.base_url.clone()),
            "password-policy" => Some(self.password_policy.to_string()),
            "poll-interval" => Some(self.poll_interval_ms.to_string()),
            _ => None,
        }
    }

    /// Sets a key from its textual form. The error is a user-facing message.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "base-url" => {
                let value = value.trim();
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!("base-url must start with http:// or https://: {value}"));
                }
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "password-policy" => {
                self.password_policy = value.parse()?;
            }
            "poll-interval" => {
                let ms: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("poll-interval must be a number of milliseconds: {value}"))?;
                if ms == 0 {
                    return Err("poll-interval must be greater than zero".to_string());
                }
                self.poll_interval_ms = ms;
            }
            _ => return Err(format!("Unknown config key: {key}")),
        }
        Ok(())
    }
}
