//! Host-agnostic friction estimation: snapshot in, coefficient out.

use tire_friction_contact::{AggregateKinematics, BodyResolver, ContactSnapshot, SlipVelocityComputer};
use tire_friction_model::{FrictionModel, ParameterValidator, ParameterWarning};
use tracing::{debug, info};

use crate::config::PluginConfig;
use crate::error::{ConfigError, PluginResult};

/// Friction model plus slip computation, built once at load.
#[derive(Debug, Clone)]
pub struct FrictionEstimator {
    model: FrictionModel,
    computer: SlipVelocityComputer,
    warnings: Vec<ParameterWarning>,
}

impl FrictionEstimator {
    /// Validate the configured parameters and build the estimator.
    ///
    /// Out-of-range slip and speed parameters fall back to defaults with a
    /// warning; see [`ParameterValidator`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a friction coefficient is
    /// not finite.
    pub fn load(config: &PluginConfig) -> PluginResult<Self> {
        for (key, value) in [
            ("friction_static", config.friction.friction_static),
            ("friction_dynamic", config.friction.friction_dynamic),
        ] {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::invalid_value(key, v, "must be finite").into());
            }
        }

        let validated = ParameterValidator.validate(&config.friction);
        let model = FrictionModel::new(validated.params).with_blend(config.mid_speed_blend);
        info!(
            params = ?model.params(),
            blend = ?model.blend(),
            warnings = validated.warnings.len(),
            "Friction model loaded"
        );

        Ok(Self {
            model,
            computer: SlipVelocityComputer,
            warnings: validated.warnings,
        })
    }

    /// Estimator around an existing model.
    #[must_use]
    pub fn from_model(model: FrictionModel) -> Self {
        Self {
            model,
            computer: SlipVelocityComputer,
            warnings: Vec::new(),
        }
    }

    /// The friction model in use.
    #[must_use]
    pub fn model(&self) -> &FrictionModel {
        &self.model
    }

    /// Parameter fallbacks applied at load.
    #[must_use]
    pub fn warnings(&self) -> &[ParameterWarning] {
        &self.warnings
    }

    /// Friction coefficient for one snapshot.
    ///
    /// Returns `None` when no contact carried normal force, in which case
    /// the previous coefficient should stay in effect.
    pub fn step<R>(&self, snapshot: &ContactSnapshot, resolver: &R) -> Option<(f64, AggregateKinematics)>
    where
        R: BodyResolver + ?Sized,
    {
        let kinematics = self.computer.compute(snapshot, resolver)?;
        let coefficient = self
            .model
            .compute_friction(kinematics.slip_speed, kinematics.reference_speed);
        debug!(
            slip_speed = kinematics.slip_speed,
            reference_speed = kinematics.reference_speed,
            total_weight = kinematics.total_weight,
            coefficient,
            "Friction estimated"
        );
        Some((coefficient, kinematics))
    }
}
