//! Configuration loading.
//!
//! Settings live in `config.toml` inside the data directory. A missing file
//! means defaults; a present but broken file is reported.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::MergePolicy;

pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How a board's tasks are merged back into the shared collection.
    #[serde(default)]
    pub merge: MergePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Pause before the assistant's reply appears, in milliseconds.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

fn default_typing_delay_ms() -> u64 {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

impl ChatConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of tasks shown under "Recent Tasks".
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_recent_limit() -> usize {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Self::load(path)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.dashboard.recent_limit == 0 {
            return Err(Error::InvalidConfig {
                path: path.to_path_buf(),
                reason: "dashboard.recent_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Data directory: explicit override, else `$HOME/.teamboard`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".teamboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store.merge, MergePolicy::ByMembership);
        assert_eq!(config.chat.typing_delay(), Duration::from_millis(500));
        assert_eq!(config.dashboard.recent_limit, 5);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[store]\nmerge = \"upsert-by-id\"\n").unwrap();
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.store.merge, MergePolicy::UpsertById);
        assert_eq!(config.chat.typing_delay_ms, 500);
    }

    #[test]
    fn broken_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        std::fs::write(&path, "[store\n").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::TomlParse(_))));

        std::fs::write(&path, "[store]\nmerge = \"sideways\"\n").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::TomlParse(_))));

        std::fs::write(&path, "[dashboard]\nrecent_limit = 0\n").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let p = Path::new("/tmp/tb-data");
        assert_eq!(resolve_data_dir(Some(p)), p.to_path_buf());
    }
}
