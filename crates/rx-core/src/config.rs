//! Configuration system for the retrix adapter

use crate::error::{Result, RetroError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub paths: PathConfig,
    pub options: OptionConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

/// Root directories exposed to the native core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding firmware/BIOS files
    pub system: Option<PathBuf>,
    /// Directory the core writes save files to
    pub saves: Option<PathBuf>,
}

/// Core option overrides applied after every variable declaration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OptionConfig {
    pub overrides: Vec<OptionOverride>,
}

/// Force the selected value index of one core option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionOverride {
    pub key: String,
    pub index: u32,
}

impl OptionOverride {
    pub fn new(key: impl Into<String>, index: u32) -> Self {
        Self {
            key: key.into(),
            index,
        }
    }
}

/// Input settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Native device id tried before analog and joypad when picking
    /// the device for each controller port
    pub preferred_device: Option<u32>,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
    /// Forward messages from the core's log interface
    pub log_core_messages: bool,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retrix");

        Self {
            system: Some(base.join("system")),
            saves: Some(base.join("saves")),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_core_messages: true,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject option overrides that can never apply
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for over in &self.options.overrides {
            if over.key.is_empty() {
                return Err(RetroError::Config("option override with an empty key".to_string()));
            }
            if !seen.insert(over.key.as_str()) {
                return Err(RetroError::Config(format!(
                    "option {} overridden more than once",
                    over.key
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from the default location, or create it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing the defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retrix")
            .join("config.toml")
    }
}
