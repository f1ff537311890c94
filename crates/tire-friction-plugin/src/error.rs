//! Error types for plugin load, configuration and surface writes.
//!
//! [`PluginError`] and [`ConfigError`] are load-time and fatal.
//! [`SurfaceWriteError`] is per-tick: the scheduler records it and moves on.

use thiserror::Error;

use crate::surface::PhysicsBackend;

/// Configuration could not be read or holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value was present but could not be used.
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value as supplied.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// YAML document failed to parse.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON document failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fatal errors while attaching the plugin to a host model.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The host has no model by that name.
    #[error("Model '{0}' is not registered with the host")]
    ModelNotFound(String),

    /// `link_name` was not given and the model has no links to default to.
    #[error("Model '{0}' has no links")]
    ModelHasNoLinks(String),

    /// The named link does not exist on the model.
    #[error("Could not find link '{link}' in model '{model}'")]
    LinkNotFound {
        /// Model name.
        model: String,
        /// Requested link name.
        link: String,
    },

    /// `collision_name` is required.
    #[error("Missing required parameter 'collision_name'")]
    MissingCollisionName,

    /// The named collision does not exist on the link.
    #[error("Could not find collision '{collision}' on link '{link}'")]
    CollisionNotFound {
        /// Scoped link name.
        link: String,
        /// Requested collision name.
        collision: String,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A friction write was skipped; the previous coefficient stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceWriteError {
    /// The active backend has no friction pyramid to write.
    #[error("Only ODE is supported right now (active backend: {0})")]
    UnsupportedBackend(PhysicsBackend),

    /// The collision has no surface parameters.
    #[error("Setting friction failed: collision '{0}' has no surface parameters")]
    MissingSurface(String),
}

/// A specialized `Result` type for plugin load operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// A specialized `Result` type for configuration parsing.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_plugin_error() {
        let err: PluginError = ConfigError::invalid_value("slip_static", "abc", "not a number").into();
        assert!(matches!(err, PluginError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for 'slip_static': not a number"
        );
    }

    #[test]
    fn test_surface_error_messages() {
        let err = SurfaceWriteError::UnsupportedBackend(PhysicsBackend::Bullet);
        assert!(err.to_string().starts_with("Only ODE is supported right now"));
        assert!(err.to_string().contains("bullet"));

        let err = SurfaceWriteError::MissingSurface("m::l::c".into());
        assert!(err.to_string().starts_with("Setting friction failed"));
    }
}
