//! Convenience re-exports.
//!
//! ```
//! use tire_friction_model::prelude::*;
//!
//! let validated = ParameterValidator.validate(&FrictionParameterInput::default());
//! let model = FrictionModel::new(validated.params).with_blend(MidSpeedBlend::Continuous);
//! assert!(model.compute_friction(0.0, 0.0) > 1.0);
//! ```

pub use crate::error::{ParameterError, ParameterResult};
pub use crate::model::{FrictionModel, LOW_SPEED_FRACTION, compute_friction};
pub use crate::params::{FrictionParameterInput, FrictionParameters, MidSpeedBlend};
pub use crate::sample::{CurveSample, linspace, sample_curve};
pub use crate::validator::{ParameterValidator, ParameterWarning, ValidatedParameters};
