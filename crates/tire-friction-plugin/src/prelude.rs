//! Convenience re-exports.
//!
//! ```
//! use tire_friction_plugin::prelude::*;
//!
//! let host = HostRegistry::new(PhysicsBackend::Ode, std::time::Duration::from_millis(1));
//! assert!(host.backend().supports_friction_pyramid());
//! ```

pub use crate::config::PluginConfig;
pub use crate::error::{ConfigError, PluginError, PluginResult, SurfaceWriteError};
pub use crate::estimator::FrictionEstimator;
pub use crate::registry::HostRegistry;
pub use crate::scheduler::{
    ContactSubscription, HostWorld, SchedulerStats, StepOutcome, TireFrictionPlugin, UpdateScheduler,
};
pub use crate::surface::{
    FrictionPyramid, PhysicsBackend, SurfaceCoefficientWriter, SurfaceParams, SurfaceSink,
};
