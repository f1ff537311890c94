//! Error types for tirectl

use std::path::PathBuf;

use thiserror::Error;
use tire_friction_plugin::{ConfigError, PluginError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Could not read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported config file extension: {0} (expected .yaml, .yml or .json)")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Plugin load failed: {0}")]
    Plugin(#[from] PluginError),

    #[error("Transport task failed: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
