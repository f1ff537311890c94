//! Per-tick orchestration and the plugin lifecycle.
//!
//! ```text
//! transport ──on_contact_message──▶ ContactIngestor
//!                                        │ take_snapshot_if_dirty (once per tick)
//!                                        ▼
//!                     FrictionEstimator::step ──▶ SurfaceCoefficientWriter
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tire_friction_contact::{
    AggregateKinematics, BodyResolver, Contact, ContactIngestor, ContactsMessage,
};
use tracing::{debug, info, trace};

use crate::config::PluginConfig;
use crate::error::{PluginError, PluginResult};
use crate::estimator::FrictionEstimator;
use crate::registry::HostRegistry;
use crate::surface::{SurfaceCoefficientWriter, SurfaceSink};

/// What the host world must offer the step path.
pub trait HostWorld: BodyResolver + SurfaceSink {
    /// Simulated duration of one tick.
    fn max_step_size(&self) -> Duration;
}

impl HostWorld for HostRegistry {
    fn max_step_size(&self) -> Duration {
        HostRegistry::max_step_size(self)
    }
}

/// Result of one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// No new contact message since the previous tick.
    Stalled,
    /// A snapshot arrived but nothing in it carried normal force.
    NoLoad,
    /// The coefficient was written to the surface.
    Applied {
        /// Coefficient written.
        coefficient: f64,
        /// Kinematics it was computed from.
        kinematics: AggregateKinematics,
    },
    /// A coefficient was computed but the host refused the write.
    WriteSkipped {
        /// Coefficient that could not be written.
        coefficient: f64,
    },
}

/// Tick counters by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// Ticks run.
    pub ticks: u64,
    /// Ticks without a new snapshot.
    pub stalled: u64,
    /// Ticks whose snapshot carried no load.
    pub no_load: u64,
    /// Ticks that wrote a coefficient.
    pub applied: u64,
    /// Ticks whose write was refused.
    pub write_skipped: u64,
}

impl SchedulerStats {
    fn record(&mut self, outcome: &StepOutcome) {
        self.ticks += 1;
        match outcome {
            StepOutcome::Stalled => self.stalled += 1,
            StepOutcome::NoLoad => self.no_load += 1,
            StepOutcome::Applied { .. } => self.applied += 1,
            StepOutcome::WriteSkipped { .. } => self.write_skipped += 1,
        }
    }
}

/// Drives ingestion, estimation and the surface write once per tick.
#[derive(Debug)]
pub struct UpdateScheduler {
    ingestor: Arc<ContactIngestor>,
    estimator: FrictionEstimator,
    writer: SurfaceCoefficientWriter,
    last_coefficient: Option<f64>,
    stats: SchedulerStats,
}

impl UpdateScheduler {
    /// Scheduler reading from `ingestor` and writing to `writer`'s collision.
    #[must_use]
    pub fn new(
        ingestor: Arc<ContactIngestor>,
        estimator: FrictionEstimator,
        writer: SurfaceCoefficientWriter,
    ) -> Self {
        Self {
            ingestor,
            estimator,
            writer,
            last_coefficient: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Run one tick. Never fails; problems are logged where they occur and
    /// the previous coefficient stays in effect.
    pub fn tick<W: HostWorld>(&mut self, world: &mut W) -> StepOutcome {
        let outcome = self.run_tick(world);
        self.stats.record(&outcome);
        outcome
    }

    fn run_tick<W: HostWorld>(&mut self, world: &mut W) -> StepOutcome {
        let Some(snapshot) = self.ingestor.take_snapshot_if_dirty(world.max_step_size()) else {
            return StepOutcome::Stalled;
        };

        let Some((coefficient, kinematics)) = self.estimator.step(&snapshot, &*world) else {
            trace!(contacts = snapshot.len(), "No loaded contacts, keeping previous coefficient");
            return StepOutcome::NoLoad;
        };

        match self.writer.apply_friction(world, coefficient) {
            Ok(()) => {
                self.last_coefficient = Some(coefficient);
                StepOutcome::Applied {
                    coefficient,
                    kinematics,
                }
            }
            Err(_) => StepOutcome::WriteSkipped { coefficient },
        }
    }

    /// Last coefficient successfully written, if any.
    #[must_use]
    pub fn last_coefficient(&self) -> Option<f64> {
        self.last_coefficient
    }

    /// Tick counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// The estimator in use.
    #[must_use]
    pub fn estimator(&self) -> &FrictionEstimator {
        &self.estimator
    }

    /// Shared ingestor.
    #[must_use]
    pub fn ingestor(&self) -> &Arc<ContactIngestor> {
        &self.ingestor
    }
}

/// Handle given to the transport: which contacts to deliver and where.
///
/// Cloning is cheap; every clone feeds the same ingestor.
#[derive(Debug, Clone)]
pub struct ContactSubscription {
    collision: String,
    ingestor: Arc<ContactIngestor>,
}

impl ContactSubscription {
    /// Scoped name of the monitored collision.
    #[must_use]
    pub fn collision(&self) -> &str {
        &self.collision
    }

    /// True if `contact` involves the monitored collision.
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        contact.collision1 == self.collision || contact.collision2 == self.collision
    }

    /// Post a contact message, keeping only contacts this subscription
    /// filters for.
    pub fn deliver(&self, msg: &ContactsMessage) {
        if msg.contacts.iter().all(|c| self.matches(c)) {
            self.ingestor.on_contact_message(msg);
            return;
        }
        let filtered = ContactsMessage {
            sim_time: msg.sim_time,
            contacts: msg
                .contacts
                .iter()
                .filter(|c| self.matches(c))
                .cloned()
                .collect(),
        };
        self.ingestor.on_contact_message(&filtered);
    }

    /// The ingestor behind this subscription.
    #[must_use]
    pub fn ingestor(&self) -> &Arc<ContactIngestor> {
        &self.ingestor
    }
}

/// Tire friction plugin attached to one model's tire collision.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
/// use tire_friction_contact::{BodyState, Contact, ContactPoint, ContactsMessage};
/// use tire_friction_plugin::prelude::*;
///
/// let mut host = HostRegistry::default();
/// host.add_model("car");
/// host.add_link("car", "wheel", BodyState::new(
///     Point3::new(0.0, 0.0, 0.3),
///     UnitQuaternion::identity(),
///     Vector3::new(2.0, 0.0, 0.0),
///     Vector3::new(0.0, 2.1 / 0.3, 0.0),
/// ))?;
/// host.add_collision("car", "wheel", "tire", Some(SurfaceParams::default()))?;
/// host.add_model("ground");
/// host.add_link("ground", "link", BodyState::default())?;
/// host.add_collision("ground", "link", "collision", None)?;
///
/// let mut plugin = TireFrictionPlugin::load(&host, "car", &PluginConfig::for_collision("tire"))?;
/// let subscription = plugin.init();
/// subscription.deliver(&ContactsMessage::new(vec![
///     Contact::new("car::wheel::tire", "ground::link::collision").with_point(ContactPoint {
///         position: Point3::origin(),
///         normal: Vector3::z(),
///         force_on_body1: Vector3::new(0.0, 0.0, 100.0),
///     }),
/// ]));
///
/// assert!(matches!(plugin.on_update(&mut host), StepOutcome::Applied { .. }));
/// let mu = plugin.last_coefficient().unwrap_or_default();
/// assert!((mu - 0.55).abs() < 1e-9);
/// # Ok::<(), PluginError>(())
/// ```
#[derive(Debug)]
pub struct TireFrictionPlugin {
    link: String,
    collision: String,
    scheduler: UpdateScheduler,
}

impl TireFrictionPlugin {
    /// Resolve the link and collision on `model` and build the estimator.
    ///
    /// # Errors
    ///
    /// - [`PluginError::ModelNotFound`] for an unknown model
    /// - [`PluginError::LinkNotFound`] / [`PluginError::ModelHasNoLinks`]
    ///   when the link cannot be resolved
    /// - [`PluginError::MissingCollisionName`] /
    ///   [`PluginError::CollisionNotFound`] for the collision
    /// - [`PluginError::Config`] for unusable configuration values
    pub fn load(host: &HostRegistry, model: &str, config: &PluginConfig) -> PluginResult<Self> {
        let link = match config.link_name.as_deref() {
            Some(name) => host.link(model, name)?,
            None => host.first_link(model)?,
        };
        let collision_name = config
            .collision_name
            .as_deref()
            .ok_or(PluginError::MissingCollisionName)?;
        let collision = host.collision(&link, collision_name)?;

        let estimator = FrictionEstimator::load(config)?;
        let ingestor = Arc::new(ContactIngestor::with_stall_threshold(config.stall_threshold()?));
        let writer = SurfaceCoefficientWriter::new(collision.clone());

        info!(%link, %collision, backend = %host.backend(), "Tire friction plugin loaded");
        Ok(Self {
            link,
            collision,
            scheduler: UpdateScheduler::new(ingestor, estimator, writer),
        })
    }

    /// Contact filter for the monitored collision against anything.
    #[must_use]
    pub fn init(&self) -> ContactSubscription {
        debug!(collision = %self.collision, "Contact subscription created");
        ContactSubscription {
            collision: self.collision.clone(),
            ingestor: Arc::clone(self.scheduler.ingestor()),
        }
    }

    /// Start-of-step hook. See [`UpdateScheduler::tick`].
    pub fn on_update<W: HostWorld>(&mut self, world: &mut W) -> StepOutcome {
        self.scheduler.tick(world)
    }

    /// Last coefficient written to the surface.
    #[must_use]
    pub fn last_coefficient(&self) -> Option<f64> {
        self.scheduler.last_coefficient()
    }

    /// Scoped name of the tire link.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Scoped name of the monitored collision.
    #[must_use]
    pub fn collision(&self) -> &str {
        &self.collision
    }

    /// The underlying scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceParams;
    use tire_friction_contact::BodyState;

    fn host() -> PluginResult<HostRegistry> {
        let mut host = HostRegistry::default();
        host.add_model("car");
        host.add_link("car", "chassis", BodyState::default())?;
        host.add_link("car", "wheel", BodyState::default())?;
        host.add_collision("car", "wheel", "tire", Some(SurfaceParams::default()))?;
        Ok(host)
    }

    #[test]
    fn test_load_defaults_to_first_link() -> PluginResult<()> {
        let mut host = host()?;
        host.add_collision("car", "chassis", "tire", None)?;
        let plugin = TireFrictionPlugin::load(&host, "car", &PluginConfig::for_collision("tire"))?;
        assert_eq!(plugin.link(), "car::chassis");
        assert_eq!(plugin.collision(), "car::chassis::tire");
        Ok(())
    }

    #[test]
    fn test_stalled_tick_without_messages() -> PluginResult<()> {
        let mut host = host()?;
        let config = PluginConfig::for_collision("tire").with_link("wheel");
        let mut plugin = TireFrictionPlugin::load(&host, "car", &config)?;
        assert_eq!(plugin.on_update(&mut host), StepOutcome::Stalled);
        assert_eq!(plugin.scheduler().stats().stalled, 1);
        assert_eq!(plugin.last_coefficient(), None);
        Ok(())
    }

    #[test]
    fn test_subscription_filters_other_collisions() -> PluginResult<()> {
        let host = host()?;
        let config = PluginConfig::for_collision("tire").with_link("wheel");
        let plugin = TireFrictionPlugin::load(&host, "car", &config)?;
        let subscription = plugin.init();
        assert_eq!(subscription.collision(), "car::wheel::tire");

        subscription.deliver(&ContactsMessage::new(vec![
            Contact::new("a", "b"),
            Contact::new("ground", "car::wheel::tire"),
        ]));
        let snapshot = subscription.ingestor().take_snapshot_if_dirty(Duration::from_millis(1));
        assert_eq!(snapshot.map(|s| s.len()), Some(1));
        Ok(())
    }

    #[test]
    fn test_outcome_serializes_tagged() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(StepOutcome::WriteSkipped { coefficient: 0.5 })?;
        assert_eq!(json["outcome"], "write_skipped");
        assert_eq!(json["coefficient"], 0.5);
        Ok(())
    }
}
