//! Load-time validation of friction parameters.
//!
//! Runs exactly once when the plugin loads. Invalid values never fail the
//! load; they are replaced by a fallback and reported as a warning.

use std::fmt;

use tracing::warn;

use crate::params::{
    DEFAULT_FRICTION_DYNAMIC, DEFAULT_FRICTION_STATIC, DEFAULT_SLIP_DYNAMIC, DEFAULT_SLIP_STATIC,
    DEFAULT_SPEED_STATIC, FrictionParameterInput, FrictionParameters,
    SLIP_DYNAMIC_FALLBACK_OFFSET,
};

/// A parameter that was replaced during validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterWarning {
    /// `slip_static` was not a positive number.
    SlipStaticNotPositive {
        /// Configured value.
        value: f64,
        /// Value used instead.
        fallback: f64,
    },
    /// `slip_dynamic` did not exceed the effective `slip_static`.
    SlipDynamicNotAboveStatic {
        /// Configured (or default) value.
        value: f64,
        /// Effective `slip_static` it was compared against.
        slip_static: f64,
        /// Value used instead.
        fallback: f64,
    },
    /// `speed_static` was not a positive number.
    SpeedStaticNotPositive {
        /// Configured value.
        value: f64,
        /// Value used instead.
        fallback: f64,
    },
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlipStaticNotPositive { value, fallback } => write!(
                f,
                "slip_static parameter value [{value}] must be positive, using default value [{fallback}]"
            ),
            Self::SlipDynamicNotAboveStatic {
                value,
                slip_static,
                fallback,
            } => write!(
                f,
                "slip_dynamic parameter value [{value}] must be greater than slip_static [{slip_static}], using slip_static + {SLIP_DYNAMIC_FALLBACK_OFFSET} [{fallback}]"
            ),
            Self::SpeedStaticNotPositive { value, fallback } => write!(
                f,
                "speed_static parameter value [{value}] must be positive, using default value [{fallback}]"
            ),
        }
    }
}

/// Outcome of validation: usable parameters plus what had to be replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    /// Effective parameters.
    pub params: FrictionParameters,
    /// One entry per replaced value, in evaluation order.
    pub warnings: Vec<ParameterWarning>,
}

impl ValidatedParameters {
    /// True when every configured value was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validates and clamps the five friction model parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterValidator;

impl ParameterValidator {
    /// Resolve raw configuration into valid parameters.
    ///
    /// | Parameter | Rule | Fallback |
    /// |---|---|---|
    /// | `friction_static` | none | - |
    /// | `friction_dynamic` | none | - |
    /// | `slip_static` | `> 0` | `0.1` |
    /// | `slip_dynamic` | `> slip_static` (effective) | `slip_static + 0.1` |
    /// | `speed_static` | `> 0` | `1.0` |
    ///
    /// Each fallback is logged at `warn` level and recorded in
    /// [`ValidatedParameters::warnings`].
    ///
    /// # Example
    ///
    /// ```
    /// use tire_friction_model::{FrictionParameterInput, ParameterValidator};
    ///
    /// let input = FrictionParameterInput {
    ///     slip_static: Some(-1.0),
    ///     ..Default::default()
    /// };
    /// let validated = ParameterValidator.validate(&input);
    /// assert!((validated.params.slip_static() - 0.1).abs() < 1e-12);
    /// assert_eq!(validated.warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn validate(&self, input: &FrictionParameterInput) -> ValidatedParameters {
        let mut warnings = Vec::new();

        let friction_static = input.friction_static.unwrap_or(DEFAULT_FRICTION_STATIC);
        let friction_dynamic = input.friction_dynamic.unwrap_or(DEFAULT_FRICTION_DYNAMIC);

        let slip_static = match input.slip_static {
            Some(value) if !is_positive(value) || !value.next_up().is_finite() => {
                warnings.push(ParameterWarning::SlipStaticNotPositive {
                    value,
                    fallback: DEFAULT_SLIP_STATIC,
                });
                DEFAULT_SLIP_STATIC
            }
            Some(value) => value,
            None => DEFAULT_SLIP_STATIC,
        };

        // Checked against the effective slip_static, so a defaulted
        // slip_dynamic can still be rejected.
        let configured_dynamic = input.slip_dynamic.unwrap_or(DEFAULT_SLIP_DYNAMIC);
        let slip_dynamic = if configured_dynamic.is_finite() && configured_dynamic > slip_static {
            configured_dynamic
        } else {
            let fallback = dynamic_fallback(slip_static);
            warnings.push(ParameterWarning::SlipDynamicNotAboveStatic {
                value: configured_dynamic,
                slip_static,
                fallback,
            });
            fallback
        };

        let speed_static = match input.speed_static {
            Some(value) if !is_positive(value) => {
                warnings.push(ParameterWarning::SpeedStaticNotPositive {
                    value,
                    fallback: DEFAULT_SPEED_STATIC,
                });
                DEFAULT_SPEED_STATIC
            }
            Some(value) => value,
            None => DEFAULT_SPEED_STATIC,
        };

        for warning in &warnings {
            warn!("{warning}");
        }

        ValidatedParameters {
            params: FrictionParameters::from_checked(
                friction_static,
                friction_dynamic,
                slip_static,
                slip_dynamic,
                speed_static,
            ),
            warnings,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// `slip_static + 0.1`, or the next representable value when the offset is
/// lost to rounding.
fn dynamic_fallback(slip_static: f64) -> f64 {
    let offset = slip_static + SLIP_DYNAMIC_FALLBACK_OFFSET;
    if offset > slip_static {
        offset
    } else {
        slip_static.next_up()
    }
}
