//! Configuration system for the fimg3d driver

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FimgError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub device: DeviceConfig,
    pub context: ContextConfig,
    pub debug: DebugConfig,
}

/// Register window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub backend: DeviceBackend,
    /// Device node the register window is mapped from
    pub path: PathBuf,
    /// Physical base address of the register window
    pub phys_base: u64,
    /// Size of the register window in bytes
    pub map_size: usize,
}

/// Register access back-end
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum DeviceBackend {
    #[default]
    Mmio,
    /// Capture writes in memory instead of touching hardware
    Recording,
}

/// Rendering context bring-up settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub soft_reset_on_start: bool,
    pub restore_on_start: bool,
    /// Status polls before a flush or cache operation gives up
    pub flush_timeout_spins: u32,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
    pub trace_register_writes: bool,
    /// Write the recorded register trace to this file as JSON
    pub dump_writes: Option<PathBuf>,
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
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: DeviceBackend::default(),
            path: PathBuf::from("/dev/mem"),
            phys_base: 0x7200_0000,
            map_size: 0x8_0000,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            soft_reset_on_start: true,
            restore_on_start: true,
            flush_timeout_spins: 1_000_000,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            trace_register_writes: false,
            dump_writes: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, or create it with
    /// defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FimgError::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| FimgError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fimg3d")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.device.backend, DeviceBackend::Mmio);
        assert_eq!(config.device.phys_base, 0x7200_0000);
        assert_eq!(config.device.map_size, 0x8_0000);
        assert!(config.context.soft_reset_on_start);
        assert!(config.context.restore_on_start);
        assert_eq!(config.debug.log_level, LogLevel::Info);
        assert!(config.debug.dump_writes.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.device.backend = DeviceBackend::Recording;
        config.context.flush_timeout_spins = 42;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.device.backend, DeviceBackend::Recording);
        assert_eq!(parsed.context.flush_timeout_spins, 42);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[debug]\nlog_level = \"Trace\"\n").unwrap();
        assert_eq!(parsed.debug.log_level, LogLevel::Trace);
        assert_eq!(parsed.device.path, PathBuf::from("/dev/mem"));
        assert_eq!(parsed.context.flush_timeout_spins, 1_000_000);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("fimg3d-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.debug.trace_register_writes = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.debug.trace_register_writes);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = std::env::temp_dir().join(format!("fimg3d-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[device\nbackend = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, FimgError::Config(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
