//! Tire Friction Plugin
//!
//! Attaches the slip-dependent friction model to one tire collision of a
//! host model and rewrites that collision's friction coefficients once per
//! physics tick.
//!
//! # Lifecycle
//!
//! 1. [`TireFrictionPlugin::load`]: resolve link and collision, validate
//!    parameters. Errors here are fatal.
//! 2. [`TireFrictionPlugin::init`]: hand a [`ContactSubscription`] to the
//!    transport, which posts contact messages from its own thread.
//! 3. [`TireFrictionPlugin::on_update`]: called at the start of every tick.
//!    Never fails; returns a [`StepOutcome`] describing what happened.
//!
//! # Host adapter
//!
//! [`HostRegistry`] is an in-process model of the host's entities addressed
//! by scoped names. Any host can be used instead by implementing
//! [`HostWorld`].

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod estimator;
pub mod prelude;
pub mod registry;
pub mod scheduler;
pub mod surface;

pub use config::{DEFAULT_STALL_WARNING_SECS, PluginConfig};
pub use error::{ConfigError, ConfigResult, PluginError, PluginResult, SurfaceWriteError};
pub use estimator::FrictionEstimator;
pub use registry::{DEFAULT_MAX_STEP_SIZE, HostRegistry, SCOPE_SEPARATOR, scoped_name};
pub use scheduler::{
    ContactSubscription, HostWorld, SchedulerStats, StepOutcome, TireFrictionPlugin, UpdateScheduler,
};
pub use surface::{
    FrictionPyramid, PhysicsBackend, SurfaceCoefficientWriter, SurfaceParams, SurfaceSink,
};
