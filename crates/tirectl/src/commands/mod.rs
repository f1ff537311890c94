//! Command implementations for tirectl

pub mod curve;
pub mod simulate;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tire_friction_plugin::{PhysicsBackend, PluginConfig};
use tracing::debug;

use crate::error::CliError;

#[derive(Args, Debug, Clone)]
pub struct CurveArgs {
    /// Plugin configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference speed to evaluate the curve at (m/s)
    #[arg(short, long, default_value_t = 5.0)]
    pub reference_speed: f64,

    /// Number of samples
    #[arg(short, long, default_value_t = 21)]
    pub samples: usize,

    /// Largest slip ratio sampled
    #[arg(long, default_value_t = 0.5)]
    pub max_slip: f64,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Plugin configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Simulated duration (s)
    #[arg(short, long, default_value_t = 2.0)]
    pub duration: f64,

    /// Physics step size (s)
    #[arg(long, default_value_t = 0.001)]
    pub step: f64,

    /// Contact message publish rate (Hz of simulated time)
    #[arg(long, default_value_t = 200.0)]
    pub publish_hz: f64,

    /// Physics backend reported by the synthetic host
    #[arg(short, long, default_value = "ode", value_parser = parse_backend)]
    pub backend: PhysicsBackend,

    /// Wheel hub speed (m/s)
    #[arg(long, default_value_t = 10.0)]
    pub speed: f64,

    /// Slip ratio reached at the end of the run; ramps up from zero
    #[arg(long, default_value_t = 0.3)]
    pub slip: f64,

    /// Wheel radius (m)
    #[arg(long, default_value_t = 0.3)]
    pub radius: f64,

    /// Normal load on the tire (N)
    #[arg(long, default_value_t = 3000.0)]
    pub load: f64,

    /// Wall-clock seconds per simulated second; 0 runs as fast as possible
    #[arg(long, default_value_t = 0.0)]
    pub time_scale: f64,
}

/// Load a plugin configuration, picking the parser from the file extension.
pub fn load_config(path: Option<&Path>) -> Result<PluginConfig, CliError> {
    let Some(path) = path else {
        return Ok(PluginConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let config = match extension.as_deref() {
        Some("yaml" | "yml") => PluginConfig::from_yaml_str(&text)?,
        Some("json") => PluginConfig::from_json_str(&text)?,
        _ => return Err(CliError::UnsupportedConfigFormat(path.to_path_buf())),
    };
    debug!(path = %path.display(), ?config, "Loaded configuration");
    Ok(config)
}

fn parse_backend(value: &str) -> Result<PhysicsBackend, String> {
    value.parse().map_err(|e: tire_friction_plugin::ConfigError| e.to_string())
}

pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, CliError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CliError::InvalidArgument(format!("--{name} must be positive, got {value}")))
    }
}
