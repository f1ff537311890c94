//! In-process stand-in for the host's entity tree.
//!
//! Models own an ordered list of links, links own collisions. Entities are
//! addressed by scoped names (`model::link` and `model::link::collision`),
//! the same strings that appear in contact messages.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tire_friction_contact::{BodyResolver, BodyState};

use crate::error::{PluginError, PluginResult};
use crate::surface::{PhysicsBackend, SurfaceParams, SurfaceSink};

/// Separator between the parts of a scoped name.
pub const SCOPE_SEPARATOR: &str = "::";

/// Default physics step: 1 ms.
pub const DEFAULT_MAX_STEP_SIZE: Duration = Duration::from_millis(1);

/// Join name parts with [`SCOPE_SEPARATOR`].
pub fn scoped_name(parts: &[&str]) -> String {
    parts.join(SCOPE_SEPARATOR)
}

#[derive(Debug, Clone)]
struct CollisionEntry {
    link: String,
    surface: Option<SurfaceParams>,
}

/// Models, links, collisions and world settings of a simulated host.
#[derive(Debug, Clone)]
pub struct HostRegistry {
    backend: PhysicsBackend,
    max_step_size: Duration,
    /// Model name to scoped link names, in insertion order.
    models: BTreeMap<String, Vec<String>>,
    links: HashMap<String, BodyState>,
    collisions: HashMap<String, CollisionEntry>,
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new(PhysicsBackend::default(), DEFAULT_MAX_STEP_SIZE)
    }
}

impl HostRegistry {
    /// Empty world simulated by `backend` at a fixed step.
    #[must_use]
    pub fn new(backend: PhysicsBackend, max_step_size: Duration) -> Self {
        Self {
            backend,
            max_step_size,
            models: BTreeMap::new(),
            links: HashMap::new(),
            collisions: HashMap::new(),
        }
    }

    /// Active physics engine.
    #[must_use]
    pub fn backend(&self) -> PhysicsBackend {
        self.backend
    }

    /// Switch physics engine.
    pub fn set_backend(&mut self, backend: PhysicsBackend) {
        self.backend = backend;
    }

    /// Duration of one physics tick.
    #[must_use]
    pub fn max_step_size(&self) -> Duration {
        self.max_step_size
    }

    /// Register a model. Registering an existing model is a no-op.
    pub fn add_model(&mut self, model: impl Into<String>) -> &mut Self {
        self.models.entry(model.into()).or_default();
        self
    }

    /// Register a link on a model and return its scoped name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ModelNotFound`] if the model is unknown.
    pub fn add_link(&mut self, model: &str, link: &str, state: BodyState) -> PluginResult<String> {
        let links = self
            .models
            .get_mut(model)
            .ok_or_else(|| PluginError::ModelNotFound(model.to_string()))?;
        let scoped = scoped_name(&[model, link]);
        if !links.contains(&scoped) {
            links.push(scoped.clone());
        }
        self.links.insert(scoped.clone(), state);
        Ok(scoped)
    }

    /// Register a collision on a link and return its scoped name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LinkNotFound`] if the link is unknown.
    pub fn add_collision(
        &mut self,
        model: &str,
        link: &str,
        collision: &str,
        surface: Option<SurfaceParams>,
    ) -> PluginResult<String> {
        let link_scoped = self.link(model, link)?;
        let scoped = scoped_name(&[link_scoped.as_str(), collision]);
        self.collisions.insert(
            scoped.clone(),
            CollisionEntry {
                link: link_scoped,
                surface,
            },
        );
        Ok(scoped)
    }

    /// True if the model is registered.
    #[must_use]
    pub fn has_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Scoped name of the model's first link.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ModelNotFound`] or
    /// [`PluginError::ModelHasNoLinks`].
    pub fn first_link(&self, model: &str) -> PluginResult<String> {
        self.models
            .get(model)
            .ok_or_else(|| PluginError::ModelNotFound(model.to_string()))?
            .first()
            .cloned()
            .ok_or_else(|| PluginError::ModelHasNoLinks(model.to_string()))
    }

    /// Scoped name of a named link.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ModelNotFound`] or [`PluginError::LinkNotFound`].
    pub fn link(&self, model: &str, link: &str) -> PluginResult<String> {
        let links = self
            .models
            .get(model)
            .ok_or_else(|| PluginError::ModelNotFound(model.to_string()))?;
        let scoped = scoped_name(&[model, link]);
        if links.contains(&scoped) {
            Ok(scoped)
        } else {
            Err(PluginError::LinkNotFound {
                model: model.to_string(),
                link: link.to_string(),
            })
        }
    }

    /// Scoped name of a collision on a scoped link.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::CollisionNotFound`] if the link has no such
    /// collision.
    pub fn collision(&self, scoped_link: &str, collision: &str) -> PluginResult<String> {
        let scoped = scoped_name(&[scoped_link, collision]);
        match self.collisions.get(&scoped) {
            Some(entry) if entry.link == scoped_link => Ok(scoped),
            _ => Err(PluginError::CollisionNotFound {
                link: scoped_link.to_string(),
                collision: collision.to_string(),
            }),
        }
    }

    /// Current state of a scoped link.
    #[must_use]
    pub fn link_state(&self, scoped_link: &str) -> Option<&BodyState> {
        self.links.get(scoped_link)
    }

    /// Update a link's pose and twist. Returns `false` for an unknown link.
    pub fn set_link_state(&mut self, scoped_link: &str, state: BodyState) -> bool {
        match self.links.get_mut(scoped_link) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Surface parameters of a scoped collision.
    #[must_use]
    pub fn surface(&self, scoped_collision: &str) -> Option<&SurfaceParams> {
        self.collisions.get(scoped_collision)?.surface.as_ref()
    }
}

impl BodyResolver for HostRegistry {
    fn resolve_body(&self, collision: &str) -> Option<BodyState> {
        let entry = self.collisions.get(collision)?;
        self.links.get(&entry.link).copied()
    }
}

impl SurfaceSink for HostRegistry {
    fn backend(&self) -> PhysicsBackend {
        self.backend
    }

    fn surface_mut(&mut self, collision: &str) -> Option<&mut SurfaceParams> {
        self.collisions.get_mut(collision)?.surface.as_mut()
    }
}
