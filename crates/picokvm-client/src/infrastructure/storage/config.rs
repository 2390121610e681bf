//! TOML-based configuration persistence for the client.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%LOCALAPPDATA%\PicoKVM Client\config.toml`
//! - Linux:    `~/.config/picokvm-client/config.toml`
//! - macOS:    `~/Library/Application Support/PicoKVM Client/config.toml`
//!
//! ```toml
//! [client]
//! log_level = "info"
//!
//! [device]
//! url = "http://10.126.126.5"
//! password = ""
//! login_timeout_secs = 5
//!
//! [capture]
//! trigger_mode = "focus"
//! toggle_key = "F12"
//! alt_chord_mode = "shadow"
//! ```
//!
//! Every field has a `#[serde(default = "...")]` helper, so a missing file, a
//! missing section or a missing key all fall back to the defaults above.

use std::path::{Path, PathBuf};
use std::time::Duration;

use picokvm_core::{AltChordMode, PhysicalKey, PolicyConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::capture_controller::{CaptureSettings, TriggerMode};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `capture.toggle_key` does not name a known key.
    #[error("unknown capture toggle key `{0}`")]
    UnknownToggleKey(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// The device the client connects to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_device_url")]
    pub url: String,
    /// Login password.  Empty skips the login request.
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    #[serde(default)]
    pub trigger_mode: TriggerMode,
    /// DOM code name of the capture toggle key, e.g. `"F12"` or `"ScrollLock"`.
    #[serde(default = "default_toggle_key")]
    pub toggle_key: String,
    #[serde(default)]
    pub alt_chord_mode: AltChordMode,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_device_url() -> String {
    "http://10.126.126.5".to_string()
}
fn default_login_timeout_secs() -> u64 {
    5
}
fn default_toggle_key() -> String {
    "F12".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: default_device_url(),
            password: String::new(),
            login_timeout_secs: default_login_timeout_secs(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::default(),
            toggle_key: default_toggle_key(),
            alt_chord_mode: AltChordMode::default(),
        }
    }
}

impl DeviceConfig {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}

impl CaptureConfig {
    /// Resolves the configured key names into controller settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownToggleKey`] if `toggle_key` is not a known
    /// DOM code name.
    pub fn to_settings(&self) -> Result<CaptureSettings, ConfigError> {
        let toggle_key: PhysicalKey = self
            .toggle_key
            .parse()
            .map_err(|_| ConfigError::UnknownToggleKey(self.toggle_key.clone()))?;
        Ok(CaptureSettings {
            trigger_mode: self.trigger_mode,
            policy: PolicyConfig {
                toggle_key,
                alt_chord_mode: self.alt_chord_mode,
            },
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if it does not exist yet.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to the platform config file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Persists `config` to `path`, creating the parent directory if needed.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory for this application.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("PicoKVM Client"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("picokvm-client"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PicoKVM Client")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
