use crate::mock::MockBehavior;
use crate::{MockError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".mock-dispatch.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub mock: MockSettings,
}

/// Defaults applied to every mock built from a configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MockSettings {
    /// Whether calls without a matching setup fail (`strict`) or fall back
    /// to defaults (`loose`)
    #[serde(default)]
    pub behavior: MockBehavior,
    /// Delegate unmatched calls to the base implementation when one exists
    #[serde(default)]
    pub call_base: bool,
}

impl Config {
    /// Load configuration from a file in the current directory
    pub fn load() -> Result<Self> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::from_path(config_path)
    }

    /// Load configuration from an explicit path, which must exist
    pub fn from_path(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).map_err(|e| {
            MockError::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            MockError::Config(msg) => MockError::Config(format!("{:?}: {}", config_path, msg)),
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MockError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load default config if file is missing, otherwise fall back to defaults on parse failure
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Warning: Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }
}
