//! Plugin configuration.
//!
//! The configuration can come from a YAML or JSON document or from the flat
//! string map a host hands to its plugins. All three produce the same
//! [`PluginConfig`]; range checks on the friction parameters happen later in
//! [`ParameterValidator`](tire_friction_model::ParameterValidator).

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tire_friction_model::{FrictionParameterInput, MidSpeedBlend};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Default stall diagnostic threshold in simulated seconds.
pub const DEFAULT_STALL_WARNING_SECS: f64 = 1.0;

const KEY_LINK_NAME: &str = "link_name";
const KEY_COLLISION_NAME: &str = "collision_name";
const KEY_MID_SPEED_BLEND: &str = "mid_speed_blend";
const KEY_STALL_WARNING_SECS: &str = "stall_warning_secs";

fn default_stall_warning_secs() -> f64 {
    DEFAULT_STALL_WARNING_SECS
}

/// Everything the plugin reads at load time.
///
/// # Example
///
/// ```
/// use tire_friction_plugin::PluginConfig;
///
/// let config = PluginConfig::from_yaml_str(
///     "collision_name: tire\nslip_static: 0.12\nmid_speed_blend: legacy\n",
/// )?;
/// assert_eq!(config.collision_name.as_deref(), Some("tire"));
/// assert_eq!(config.friction.slip_static, Some(0.12));
/// # Ok::<(), tire_friction_plugin::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Link carrying the tire; the model's first link when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_name: Option<String>,

    /// Collision whose surface is rewritten every tick. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_name: Option<String>,

    /// Raw friction curve parameters.
    #[serde(flatten)]
    pub friction: FrictionParameterInput,

    /// Mid-speed blend formula.
    #[serde(default)]
    pub mid_speed_blend: MidSpeedBlend,

    /// Simulated seconds without a contact message before a stall is logged.
    #[serde(default = "default_stall_warning_secs")]
    pub stall_warning_secs: f64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            link_name: None,
            collision_name: None,
            friction: FrictionParameterInput::default(),
            mid_speed_blend: MidSpeedBlend::default(),
            stall_warning_secs: DEFAULT_STALL_WARNING_SECS,
        }
    }
}

impl PluginConfig {
    /// Configuration monitoring `collision`, everything else defaulted.
    #[must_use]
    pub fn for_collision(collision: impl Into<String>) -> Self {
        Self {
            collision_name: Some(collision.into()),
            ..Self::default()
        }
    }

    /// Set the link name.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link_name = Some(link.into());
        self
    }

    /// Set the mid-speed blend.
    #[must_use]
    pub fn with_blend(mut self, blend: MidSpeedBlend) -> Self {
        self.mid_speed_blend = blend;
        self
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is not valid YAML or
    /// does not match the configuration shape.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is not valid JSON or
    /// does not match the configuration shape.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build from a flat key/value map, parsing numbers and enum names.
    ///
    /// Unknown keys are ignored. A value that does not parse is an error,
    /// never a silent default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first key whose value
    /// cannot be parsed.
    pub fn from_map(map: &BTreeMap<String, String>) -> ConfigResult<Self> {
        let mut config = Self::default();
        for (key, raw) in map {
            let value = raw.trim();
            match key.as_str() {
                KEY_LINK_NAME => config.link_name = Some(value.to_string()),
                KEY_COLLISION_NAME => config.collision_name = Some(value.to_string()),
                "friction_static" => config.friction.friction_static = Some(parse_f64(key, value)?),
                "friction_dynamic" => config.friction.friction_dynamic = Some(parse_f64(key, value)?),
                "slip_static" => config.friction.slip_static = Some(parse_f64(key, value)?),
                "slip_dynamic" => config.friction.slip_dynamic = Some(parse_f64(key, value)?),
                "speed_static" => config.friction.speed_static = Some(parse_f64(key, value)?),
                KEY_MID_SPEED_BLEND => config.mid_speed_blend = parse_blend(value)?,
                KEY_STALL_WARNING_SECS => config.stall_warning_secs = parse_f64(key, value)?,
                _ => debug!(key = %key, "Ignoring unknown plugin parameter"),
            }
        }
        Ok(config)
    }

    /// Stall threshold as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] unless `stall_warning_secs` is
    /// finite and positive.
    pub fn stall_threshold(&self) -> ConfigResult<Duration> {
        let secs = self.stall_warning_secs;
        if !(secs.is_finite() && secs > 0.0) {
            return Err(ConfigError::invalid_value(
                KEY_STALL_WARNING_SECS,
                secs,
                "must be a positive number of seconds",
            ));
        }
        Duration::try_from_secs_f64(secs)
            .map_err(|e| ConfigError::invalid_value(KEY_STALL_WARNING_SECS, secs, e.to_string()))
    }
}

fn parse_f64(key: &str, value: &str) -> ConfigResult<f64> {
    value
        .parse::<f64>()
        .map_err(|e| ConfigError::invalid_value(key, value, e.to_string()))
}

fn parse_blend(value: &str) -> ConfigResult<MidSpeedBlend> {
    match value.to_ascii_lowercase().as_str() {
        "continuous" => Ok(MidSpeedBlend::Continuous),
        "legacy" => Ok(MidSpeedBlend::Legacy),
        _ => Err(ConfigError::invalid_value(
            KEY_MID_SPEED_BLEND,
            value,
            "expected 'continuous' or 'legacy'",
        )),
    }
}
