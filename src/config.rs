use crate::defaults;
use crate::error::{EchoprintError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub stage: StageConfig,
    pub audio: AudioConfig,
}

/// Fingerprint stage configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StageConfig {
    /// Post a code at every 10 s boundary up to `max_seconds` instead of once.
    pub interval: bool,
    /// Window length in seconds (10..=120).
    pub max_seconds: u32,
}

/// Host-side audio delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Samples per chunk delivered to the stage.
    pub chunk_samples: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            interval: false,
            max_seconds: defaults::MAX_SECONDS,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            chunk_samples: defaults::CHUNK_SAMPLES,
        }
    }
}

impl StageConfig {
    /// Rejects a `max_seconds` outside 10..=120. Never clamps.
    pub fn validate(&self) -> Result<()> {
        validate_max_seconds(self.max_seconds)
    }
}

/// Checks a window length against the accepted range.
pub fn validate_max_seconds(seconds: u32) -> Result<()> {
    if (defaults::MIN_MAX_SECONDS..=defaults::MAX_MAX_SECONDS).contains(&seconds) {
        Ok(())
    } else {
        Err(EchoprintError::ConfigInvalidValue {
            key: "max_seconds".to_string(),
            message: format!(
                "must be between {} and {}, got {}",
                defaults::MIN_MAX_SECONDS,
                defaults::MAX_MAX_SECONDS,
                seconds
            ),
        })
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML or an out-of-range value.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e.context(format!("Failed to load config from {}", path.display())))
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - ECHOPRINT_INTERVAL → stage.interval ("1"/"true"/"0"/"false")
    /// - ECHOPRINT_MAX_SECONDS → stage.max_seconds
    ///
    /// Empty or unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(interval) = std::env::var("ECHOPRINT_INTERVAL")
            && let Some(value) = parse_bool(&interval)
        {
            self.stage.interval = value;
        }

        if let Ok(seconds) = std::env::var("ECHOPRINT_MAX_SECONDS")
            && let Ok(value) = seconds.trim().parse::<u32>()
        {
            self.stage.max_seconds = value;
        }

        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.stage.validate()?;
        if self.audio.chunk_samples == 0 {
            return Err(EchoprintError::ConfigInvalidValue {
                key: "chunk_samples".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Serialize to TOML (used by `config show`).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EchoprintError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/echoprint-stage/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("echoprint-stage").join("config.toml"))
            .ok_or_else(|| EchoprintError::Other("Could not determine config directory".to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Runtime configuration surface of the stage.
///
/// Cloneable handle shared between a control thread and the thread that
/// delivers audio. Every read and write takes the lock. The stage only reads
/// a snapshot when it starts, so changes apply from the next start.
#[derive(Debug, Clone, Default)]
pub struct StageSettings {
    inner: Arc<Mutex<StageConfig>>,
}

impl StageSettings {
    /// Creates a handle from a validated configuration.
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(config)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StageConfig> {
        // The guarded value is plain data, a poisoned lock still holds a valid config.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn interval(&self) -> bool {
        self.lock().interval
    }

    pub fn set_interval(&self, interval: bool) {
        self.lock().interval = interval;
    }

    pub fn max_seconds(&self) -> u32 {
        self.lock().max_seconds
    }

    /// Sets the window length, rejecting values outside 10..=120.
    pub fn set_max_seconds(&self, seconds: u32) -> Result<()> {
        validate_max_seconds(seconds)?;
        self.lock().max_seconds = seconds;
        Ok(())
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> StageConfig {
        *self.lock()
    }
}
