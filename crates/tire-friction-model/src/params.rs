//! Friction model parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, ParameterResult};

/// Default static friction coefficient.
pub const DEFAULT_FRICTION_STATIC: f64 = 1.1;
/// Default dynamic friction coefficient.
pub const DEFAULT_FRICTION_DYNAMIC: f64 = 1.0;
/// Default slip ratio at which static friction peaks.
pub const DEFAULT_SLIP_STATIC: f64 = 0.1;
/// Default slip ratio beyond which friction is fully dynamic.
pub const DEFAULT_SLIP_DYNAMIC: f64 = 0.2;
/// Default reference speed (m/s) above which slip drives friction.
pub const DEFAULT_SPEED_STATIC: f64 = 1.0;
/// Offset added to `slip_static` when `slip_dynamic` is rejected.
pub const SLIP_DYNAMIC_FALLBACK_OFFSET: f64 = 0.1;

/// How the curve is blended between 50% and 100% of `speed_static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidSpeedBlend {
    /// Linear blend from `friction_static` at half speed to the slip-based
    /// value at full speed. Continuous at both ends.
    #[default]
    Continuous,
    /// Scaled delta only, without the `friction_static` baseline.
    ///
    /// Jumps at `speed_ratio = 0.5` and when reaching `speed_ratio = 1`.
    /// Kept for behavioral parity with existing tuned models.
    Legacy,
}

/// Validated, immutable parameters of the friction curve.
///
/// Invariants: `slip_static > 0`, `slip_dynamic > slip_static`,
/// `speed_static > 0`. Built either through [`FrictionParameters::new`]
/// (strict) or [`ParameterValidator`](crate::ParameterValidator) (lenient).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrictionParameters {
    friction_static: f64,
    friction_dynamic: f64,
    slip_static: f64,
    slip_dynamic: f64,
    speed_static: f64,
}

impl Default for FrictionParameters {
    fn default() -> Self {
        Self {
            friction_static: DEFAULT_FRICTION_STATIC,
            friction_dynamic: DEFAULT_FRICTION_DYNAMIC,
            slip_static: DEFAULT_SLIP_STATIC,
            slip_dynamic: DEFAULT_SLIP_DYNAMIC,
            speed_static: DEFAULT_SPEED_STATIC,
        }
    }
}

impl FrictionParameters {
    /// Create parameters, rejecting any that break the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if a value is non-finite, if `slip_static`
    /// or `speed_static` is not positive, or if `slip_dynamic` does not
    /// exceed `slip_static`.
    ///
    /// # Example
    ///
    /// ```
    /// use tire_friction_model::FrictionParameters;
    ///
    /// let params = FrictionParameters::new(1.1, 1.0, 0.1, 0.2, 1.0)?;
    /// assert!(FrictionParameters::new(1.1, 1.0, 0.2, 0.1, 1.0).is_err());
    /// # Ok::<(), tire_friction_model::ParameterError>(())
    /// ```
    pub fn new(
        friction_static: f64,
        friction_dynamic: f64,
        slip_static: f64,
        slip_dynamic: f64,
        speed_static: f64,
    ) -> ParameterResult<Self> {
        for (name, value) in [
            ("friction_static", friction_static),
            ("friction_dynamic", friction_dynamic),
            ("slip_static", slip_static),
            ("slip_dynamic", slip_dynamic),
            ("speed_static", speed_static),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { name, value });
            }
        }
        if slip_static <= 0.0 {
            return Err(ParameterError::NotPositive {
                name: "slip_static",
                value: slip_static,
            });
        }
        if slip_dynamic <= slip_static {
            return Err(ParameterError::SlipOrder {
                slip_static,
                slip_dynamic,
            });
        }
        if speed_static <= 0.0 {
            return Err(ParameterError::NotPositive {
                name: "speed_static",
                value: speed_static,
            });
        }
        Ok(Self {
            friction_static,
            friction_dynamic,
            slip_static,
            slip_dynamic,
            speed_static,
        })
    }

    /// Assemble already-checked values. Only the validator calls this.
    pub(crate) const fn from_checked(
        friction_static: f64,
        friction_dynamic: f64,
        slip_static: f64,
        slip_dynamic: f64,
        speed_static: f64,
    ) -> Self {
        Self {
            friction_static,
            friction_dynamic,
            slip_static,
            slip_dynamic,
            speed_static,
        }
    }

    /// Peak friction coefficient, reached at `slip_static`.
    #[must_use]
    pub const fn friction_static(&self) -> f64 {
        self.friction_static
    }

    /// Friction coefficient at and beyond `slip_dynamic`.
    #[must_use]
    pub const fn friction_dynamic(&self) -> f64 {
        self.friction_dynamic
    }

    /// Slip ratio at the static friction peak.
    #[must_use]
    pub const fn slip_static(&self) -> f64 {
        self.slip_static
    }

    /// Slip ratio where the curve flattens to `friction_dynamic`.
    #[must_use]
    pub const fn slip_dynamic(&self) -> f64 {
        self.slip_dynamic
    }

    /// Reference speed (m/s) at which slip fully drives friction.
    #[must_use]
    pub const fn speed_static(&self) -> f64 {
        self.speed_static
    }
}

/// Raw, unchecked parameter values as read from configuration.
///
/// `None` means the key was absent and the default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionParameterInput {
    /// `friction_static` key.
    pub friction_static: Option<f64>,
    /// `friction_dynamic` key.
    pub friction_dynamic: Option<f64>,
    /// `slip_static` key.
    pub slip_static: Option<f64>,
    /// `slip_dynamic` key.
    pub slip_dynamic: Option<f64>,
    /// `speed_static` key.
    pub speed_static: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let params = FrictionParameters::default();
        assert_relative_eq!(params.friction_static(), 1.1);
        assert_relative_eq!(params.friction_dynamic(), 1.0);
        assert_relative_eq!(params.slip_static(), 0.1);
        assert_relative_eq!(params.slip_dynamic(), 0.2);
        assert_relative_eq!(params.speed_static(), 1.0);
    }

    #[test]
    fn test_new_rejects_bad_order() {
        let result = FrictionParameters::new(1.1, 1.0, 0.2, 0.2, 1.0);
        assert!(matches!(result, Err(ParameterError::SlipOrder { .. })));
    }

    #[test]
    fn test_new_rejects_non_positive_speed() {
        let result = FrictionParameters::new(1.1, 1.0, 0.1, 0.2, 0.0);
        assert!(matches!(
            result,
            Err(ParameterError::NotPositive {
                name: "speed_static",
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_nan() {
        let result = FrictionParameters::new(f64::NAN, 1.0, 0.1, 0.2, 1.0);
        assert!(matches!(result, Err(ParameterError::NotFinite { .. })));
    }

    #[test]
    fn test_blend_serde_names() -> Result<(), serde_json::Error> {
        let blend: MidSpeedBlend = serde_json::from_str("\"legacy\"")?;
        assert_eq!(blend, MidSpeedBlend::Legacy);
        assert_eq!(serde_json::to_string(&MidSpeedBlend::Continuous)?, "\"continuous\"");
        Ok(())
    }
}
