//! Slip-Dependent Tire Friction Model
//!
//! This crate maps a contact's slip speed and reference speed to a scalar
//! friction coefficient, and validates the five model parameters once at load.
//!
//! # Overview
//!
//! The friction curve is a piecewise linear approximation of semi-empirical
//! tire models. Plotted against the slip ratio it connects:
//! - `(0, 0)`
//! - `(slip_static, friction_static)`
//! - `(slip_dynamic, friction_dynamic)`
//! - `(inf, friction_dynamic)`
//!
//! Those formulae misbehave at low speed, so:
//! - below 50% of `speed_static` the static coefficient is returned as-is
//! - between 50% and 100% of `speed_static` the result is blended from the
//!   static coefficient towards the slip-based value
//!
//! # RT Safety
//!
//! [`FrictionModel::compute_friction`] performs no allocation and no I/O and
//! is safe to call once per physics tick. [`ParameterValidator::validate`]
//! logs and may allocate; call it at load time only.
//!
//! # Example
//!
//! ```
//! use tire_friction_model::{FrictionModel, FrictionParameters};
//!
//! let model = FrictionModel::new(FrictionParameters::default());
//!
//! // Rolling fast with 5% slip: halfway up the static ramp.
//! let mu = model.compute_friction(0.1, 2.0);
//! assert!((mu - 0.55).abs() < 1e-9);
//!
//! // Standing still: static coefficient.
//! assert!((model.compute_friction(0.3, 0.0) - 1.1).abs() < 1e-9);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod params;
pub mod prelude;
pub mod sample;
pub mod validator;

pub use error::ParameterError;
pub use model::{FrictionModel, compute_friction};
pub use params::{FrictionParameterInput, FrictionParameters, MidSpeedBlend};
pub use sample::{CurveSample, linspace, sample_curve};
pub use validator::{ParameterValidator, ParameterWarning, ValidatedParameters};
