//! Server configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `BAND_*`
//! environment variables (`BAND_SERVER__ADDR`, `BAND_MODEL__PATH`, ...).

use config::{Config, ConfigError, Environment, File};
use sensor_source::RunMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storage::StorageConfig;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "BAND_CONFIG";

/// Config file read when `BAND_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "band.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BAND";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub server: ServerConfig,
    pub database: StorageConfig,
    pub model: ModelConfig,
    /// Source of `/get_sensor_data` readings
    pub mode: RunMode,
    pub log: LogConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Install the Prometheus recorder and serve `/metrics`
    pub enable_metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            enable_metrics: true,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX artifact path
    pub path: PathBuf,
    /// Load at startup instead of on the first prediction
    pub eager_load: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model/ckd_model.onnx"),
            eager_load: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Max level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl BandConfig {
    /// Load from `BAND_CONFIG` (or `band.toml`) and the `BAND_*` environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with(&file, ENV_PREFIX)
    }

    /// Load from an optional file and environment variables under `env_prefix`
    pub fn load_with(file: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&BandConfig::default())?)
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
