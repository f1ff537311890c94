//! Writing the friction coefficient into the host's surface parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::error::{ConfigError, SurfaceWriteError};

/// Physics engines a host may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsBackend {
    /// Open Dynamics Engine.
    #[default]
    Ode,
    /// Bullet.
    Bullet,
    /// Simbody.
    Simbody,
    /// DART.
    Dart,
}

impl PhysicsBackend {
    /// All known backends.
    pub const ALL: [Self; 4] = [Self::Ode, Self::Bullet, Self::Simbody, Self::Dart];

    /// Lowercase engine name as used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ode => "ode",
            Self::Bullet => "bullet",
            Self::Simbody => "simbody",
            Self::Dart => "dart",
        }
    }

    /// True if the engine exposes a writable two-axis friction pyramid.
    #[must_use]
    pub const fn supports_friction_pyramid(self) -> bool {
        matches!(self, Self::Ode)
    }
}

impl fmt::Display for PhysicsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhysicsBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::invalid_value("backend", s, "expected one of ode, bullet, simbody, dart"))
    }
}

/// Coulomb friction coefficients along the two tangential directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionPyramid {
    /// Coefficient along the primary friction direction.
    pub mu_primary: f64,
    /// Coefficient along the secondary friction direction.
    pub mu_secondary: f64,
}

impl Default for FrictionPyramid {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl FrictionPyramid {
    /// Same coefficient on both axes.
    #[must_use]
    pub const fn uniform(mu: f64) -> Self {
        Self {
            mu_primary: mu,
            mu_secondary: mu,
        }
    }
}

/// Host-owned contact surface parameters of one collision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceParams {
    /// Friction pyramid coefficients.
    pub friction: FrictionPyramid,
}

/// Host side of a friction write.
pub trait SurfaceSink {
    /// Engine currently simulating the world.
    fn backend(&self) -> PhysicsBackend;

    /// Mutable surface parameters of a scoped collision, if it has any.
    fn surface_mut(&mut self, collision: &str) -> Option<&mut SurfaceParams>;
}

/// Writes a friction coefficient to one collision's surface.
#[derive(Debug, Clone)]
pub struct SurfaceCoefficientWriter {
    collision: String,
}

impl SurfaceCoefficientWriter {
    /// Writer targeting the scoped collision name.
    pub fn new(collision: impl Into<String>) -> Self {
        Self {
            collision: collision.into(),
        }
    }

    /// Scoped collision this writer targets.
    #[must_use]
    pub fn collision(&self) -> &str {
        &self.collision
    }

    /// Set both friction-pyramid axes to `coefficient`.
    ///
    /// On an unsupported backend or a collision without surface parameters
    /// nothing is written and one error is logged.
    ///
    /// # Errors
    ///
    /// Returns the [`SurfaceWriteError`] that caused the skip. Callers
    /// should not log it again.
    pub fn apply_friction(
        &self,
        surface: &mut dyn SurfaceSink,
        coefficient: f64,
    ) -> Result<(), SurfaceWriteError> {
        let backend = surface.backend();
        if !backend.supports_friction_pyramid() {
            let err = SurfaceWriteError::UnsupportedBackend(backend);
            error!("{err}");
            return Err(err);
        }

        let Some(params) = surface.surface_mut(&self.collision) else {
            let err = SurfaceWriteError::MissingSurface(self.collision.clone());
            error!("{err}");
            return Err(err);
        };

        params.friction = FrictionPyramid::uniform(coefficient);
        trace!(collision = %self.collision, coefficient, "Friction applied");
        Ok(())
    }
}
