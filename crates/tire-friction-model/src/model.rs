//! Piecewise slip/speed friction curve.
//!
//! ```text
//!   |
//!   |         friction_static
//!   |        /.\
//!   |       / . \
//!   |      /  .  \_____________ friction_dynamic
//!   |     /   .  .
//!   |    /    .  .
//!   |   /     .  .
//!   |  /      .  .
//!   | /       .  .
//!   |/        .  .
//! --+-------------------------- slip_ratio
//!   |         |  '- slip_dynamic
//!   |         '- slip_static
//! ```

use crate::params::{FrictionParameters, MidSpeedBlend};

/// Below this fraction of `speed_static` the slip ratio is not computed.
pub const LOW_SPEED_FRACTION: f64 = 0.5;

/// Friction curve bound to a fixed parameter set.
///
/// # RT Safety
///
/// `compute_friction()` is RT-safe: no allocations, O(1), no I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionModel {
    params: FrictionParameters,
    blend: MidSpeedBlend,
}

impl FrictionModel {
    /// Create a model with the default (continuous) mid-speed blend.
    #[must_use]
    pub const fn new(params: FrictionParameters) -> Self {
        Self {
            params,
            blend: MidSpeedBlend::Continuous,
        }
    }

    /// Select the mid-speed blend formula.
    #[must_use]
    pub const fn with_blend(mut self, blend: MidSpeedBlend) -> Self {
        self.blend = blend;
        self
    }

    /// Parameters the model was built with.
    #[must_use]
    pub const fn params(&self) -> &FrictionParameters {
        &self.params
    }

    /// Active mid-speed blend.
    #[must_use]
    pub const fn blend(&self) -> MidSpeedBlend {
        self.blend
    }

    /// Friction coefficient for a slip speed and a reference speed (m/s).
    ///
    /// Signs of both speeds are ignored. Non-finite inputs yield
    /// `friction_static`.
    #[must_use]
    pub fn compute_friction(&self, slip_speed: f64, reference_speed: f64) -> f64 {
        let p = &self.params;
        if !slip_speed.is_finite() || !reference_speed.is_finite() {
            return p.friction_static();
        }

        // Numerical guard: the slip ratio is meaningless near standstill.
        let reference = reference_speed.abs();
        let speed_static = p.speed_static().abs();
        if reference < LOW_SPEED_FRACTION * speed_static {
            return p.friction_static();
        }

        let slip_ratio = slip_speed.abs() / reference;
        let from_slip = self.friction_from_slip(slip_ratio);

        let speed_ratio = reference / speed_static;
        if speed_ratio < 1.0 {
            let fraction = (speed_ratio - LOW_SPEED_FRACTION) / (1.0 - LOW_SPEED_FRACTION);
            let delta = (from_slip - p.friction_static()) * fraction;
            return match self.blend {
                MidSpeedBlend::Continuous => p.friction_static() + delta,
                MidSpeedBlend::Legacy => delta,
            };
        }

        from_slip
    }

    /// Friction from the slip ratio alone, ignoring the speed guards.
    ///
    /// Coefficient magnitudes are used so the curve is always non-negative.
    #[must_use]
    pub fn friction_from_slip(&self, slip_ratio: f64) -> f64 {
        let p = &self.params;
        let mu_static = p.friction_static().abs();
        let mu_dynamic = p.friction_dynamic().abs();

        if slip_ratio < p.slip_static() {
            slip_ratio * mu_static / p.slip_static()
        } else if slip_ratio < p.slip_dynamic() {
            mu_dynamic
                + (mu_static - mu_dynamic) / (p.slip_static() - p.slip_dynamic())
                    * (slip_ratio - p.slip_dynamic())
        } else {
            mu_dynamic
        }
    }
}

impl From<FrictionParameters> for FrictionModel {
    fn from(params: FrictionParameters) -> Self {
        Self::new(params)
    }
}

/// Evaluate the continuous-blend curve for `params`.
///
/// Convenience wrapper around [`FrictionModel::compute_friction`].
#[must_use]
pub fn compute_friction(slip_speed: f64, reference_speed: f64, params: &FrictionParameters) -> f64 {
    FrictionModel::new(*params).compute_friction(slip_speed, reference_speed)
}
