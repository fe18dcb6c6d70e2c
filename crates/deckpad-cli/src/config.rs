//! Key profile configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Profile applied by `deckpadctl apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reset the panel before applying key images
    #[serde(default = "default_reset")]
    pub reset: bool,

    /// Event poll timeout in milliseconds (-1 blocks)
    #[serde(default = "default_timeout")]
    pub timeout: i32,

    /// Per-key settings
    #[serde(default)]
    pub keys: Vec<KeyConfig>,
}

/// Settings for one logical key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Logical key index, left-to-right, top-to-bottom
    pub key: u8,

    /// PNG shown on the key; blank when absent
    #[serde(default)]
    pub image: Option<PathBuf>,

    /// Name printed when the key is pressed
    #[serde(default)]
    pub label: Option<String>,
}

impl KeyConfig {
    /// Label for key press output.
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("key {}", self.key))
    }
}

fn default_reset() -> bool {
    true
}

fn default_timeout() -> i32 {
    -1
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Relative image paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).context("Failed to read configuration file")?;
        let mut config: Config =
            toml::from_str(&content).context("Failed to parse configuration")?;

        if let Some(base) = path.parent() {
            for key in &mut config.keys {
                if let Some(image) = key.image.as_mut() {
                    if image.is_relative() {
                        *image = base.join(&*image);
                    }
                }
            }
        }
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reset: default_reset(),
            timeout: default_timeout(),
            keys: Vec::new(),
        }
    }
}
