//! Runtime configuration, loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::conversation::ActivityWindows;
use crate::error::{ChatError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChatConfig {
    pub collaborator: CollaboratorConfig,
    pub activity: ActivityConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// Upper bound on one generation call; `0` waits forever.
    pub timeout_ms: u64,
    /// Artificial delay of the built-in keyword collaborator.
    pub simulated_latency_ms: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            simulated_latency_ms: 1_500,
        }
    }
}

impl CollaboratorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub active_window_secs: u64,
    pub recent_window_secs: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            active_window_secs: 30,
            recent_window_secs: 300,
        }
    }
}

impl ActivityConfig {
    /// Fails when a window is too large for `chrono::Duration`.
    pub fn windows(&self) -> Result<ActivityWindows> {
        Ok(ActivityWindows::new(
            window("activity.active_window_secs", self.active_window_secs)?,
            window("activity.recent_window_secs", self.recent_window_secs)?,
        ))
    }
}

fn window(field: &str, secs: u64) -> Result<chrono::Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| ChatError::InvalidConfig(format!("{} ({}) is out of range", field, secs)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub max_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_chars: 4_000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ChatConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ChatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.activity.active_window_secs == 0 {
            return Err(ChatError::InvalidConfig(
                "activity.active_window_secs must be positive".to_string(),
            ));
        }
        if self.activity.recent_window_secs <= self.activity.active_window_secs {
            return Err(ChatError::InvalidConfig(format!(
                "activity.recent_window_secs ({}) must exceed active_window_secs ({})",
                self.activity.recent_window_secs, self.activity.active_window_secs
            )));
        }
        self.activity.windows()?;
        if self.input.max_chars == 0 {
            return Err(ChatError::InvalidConfig("input.max_chars must be positive".to_string()));
        }
        Ok(())
    }
}
