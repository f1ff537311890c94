//! `tirectl simulate`: a synthetic rolling wheel driven through the plugin.
//!
//! Two contexts run concurrently, as they would inside a simulator:
//! - a transport task publishing contact messages at `--publish-hz` of
//!   simulated time
//! - the step loop, which advances simulated time by `--step` and calls
//!   `on_update` once per tick
//!
//! The step loop shares its clock with the transport through a watch
//! channel; the transport only ever sees the latest value.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Serialize;
use tire_friction_contact::{BodyState, Contact, ContactPoint, ContactsMessage, IngestStats};
use tire_friction_plugin::{
    ContactSubscription, HostRegistry, PhysicsBackend, PluginConfig, SchedulerStats,
    StepOutcome, SurfaceParams, TireFrictionPlugin,
};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::commands::{SimulateArgs, load_config, require_positive};
use crate::error::CliError;
use crate::output;

const VEHICLE_MODEL: &str = "vehicle";
const DEFAULT_LINK: &str = "wheel";
const DEFAULT_COLLISION: &str = "tire";
const GROUND_MODEL: &str = "ground_plane";
const GROUND_LINK: &str = "link";
const GROUND_COLLISION: &str = "collision";

/// Summary printed at the end of a run.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub backend: PhysicsBackend,
    pub sim_time: f64,
    pub published: u64,
    pub ingest: IngestStats,
    pub ticks: SchedulerStats,
    pub final_coefficient: Option<f64>,
    pub min_coefficient: Option<f64>,
    pub max_coefficient: Option<f64>,
    pub final_slip_ratio: f64,
}

/// Wheel state at `time` for a hub speed held constant and a slip ratio
/// ramping linearly to `final_slip` over `duration`.
fn wheel_state(args: &SimulateArgs, time: f64) -> BodyState {
    let slip = slip_at(args, time);
    BodyState::new(
        Point3::new(0.0, 0.0, args.radius),
        UnitQuaternion::identity(),
        Vector3::new(args.speed, 0.0, 0.0),
        Vector3::new(0.0, args.speed * (1.0 + slip) / args.radius, 0.0),
    )
}

fn slip_at(args: &SimulateArgs, time: f64) -> f64 {
    args.slip * (time / args.duration).clamp(0.0, 1.0)
}

fn build_host(
    args: &SimulateArgs,
    config: &PluginConfig,
    step: Duration,
) -> Result<(HostRegistry, String), CliError> {
    let link = config.link_name.as_deref().unwrap_or(DEFAULT_LINK);
    let collision = config.collision_name.as_deref().unwrap_or(DEFAULT_COLLISION);

    let mut host = HostRegistry::new(args.backend, step);
    host.add_model(VEHICLE_MODEL);
    host.add_link(VEHICLE_MODEL, link, wheel_state(args, 0.0))?;
    host.add_collision(VEHICLE_MODEL, link, collision, Some(SurfaceParams::default()))?;
    host.add_model(GROUND_MODEL);
    host.add_link(GROUND_MODEL, GROUND_LINK, BodyState::default())?;
    let ground = host.add_collision(GROUND_MODEL, GROUND_LINK, GROUND_COLLISION, None)?;
    Ok((host, ground))
}

/// First multiple of `period` strictly after `now`, or `now` itself when
/// `period` is below the resolution of `now`.
fn next_publish_after(now: f64, period: f64) -> f64 {
    ((now / period).floor() + 1.0) * period
}

/// Publishes a contact message every `period` of simulated time until the
/// clock sender is dropped. Returns the number of messages published.
async fn run_transport(
    mut clock: watch::Receiver<f64>,
    subscription: ContactSubscription,
    ground: String,
    period: f64,
    load: f64,
) -> u64 {
    let mut published = 0u64;
    let mut next_publish = 0.0;
    while clock.changed().await.is_ok() {
        let now = *clock.borrow_and_update();
        if now + f64::EPSILON < next_publish {
            continue;
        }
        let contact = Contact::new(subscription.collision(), ground.as_str()).with_point(ContactPoint {
            position: Point3::origin(),
            normal: Vector3::z(),
            force_on_body1: Vector3::new(0.0, 0.0, load),
        });
        subscription.deliver(&ContactsMessage::new(vec![contact]).at(now));
        published += 1;
        next_publish = next_publish_after(now, period);
    }
    debug!(published, "Transport stopped");
    published
}

pub async fn run(args: &SimulateArgs) -> Result<SimulationReport, CliError> {
    let duration = require_positive("duration", args.duration)?;
    let step_secs = require_positive("step", args.step)?;
    let publish_hz = require_positive("publish-hz", args.publish_hz)?;
    require_positive("radius", args.radius)?;
    if !(args.time_scale.is_finite() && args.time_scale >= 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "--time-scale must be non-negative, got {}",
            args.time_scale
        )));
    }
    let step = Duration::try_from_secs_f64(step_secs)
        .map_err(|e| CliError::InvalidArgument(format!("--step: {e}")))?;

    let mut config = load_config(args.config.as_deref())?;
    if config.link_name.is_none() {
        config.link_name = Some(DEFAULT_LINK.to_string());
    }
    if config.collision_name.is_none() {
        config.collision_name = Some(DEFAULT_COLLISION.to_string());
    }

    let (mut host, ground) = build_host(args, &config, step)?;
    let mut plugin = TireFrictionPlugin::load(&host, VEHICLE_MODEL, &config)?;
    let subscription = plugin.init();
    let ingestor = Arc::clone(subscription.ingestor());
    let tire_link = plugin.link().to_string();

    let (clock_tx, clock_rx) = watch::channel(0.0_f64);
    let transport = tokio::spawn(run_transport(
        clock_rx,
        subscription,
        ground,
        1.0 / publish_hz,
        args.load,
    ));

    let mut pacer = (args.time_scale > 0.0).then(|| {
        let mut interval = tokio::time::interval(step.mul_f64(args.time_scale));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval
    });

    let total_ticks = (duration / step_secs).round() as u64;
    info!(total_ticks, backend = %args.backend, "Starting synthetic run");

    let mut min_coefficient: Option<f64> = None;
    let mut max_coefficient: Option<f64> = None;
    let mut sim_time = 0.0;
    for tick in 1..=total_ticks {
        host.set_link_state(&tire_link, wheel_state(args, sim_time));
        if let StepOutcome::Applied { coefficient, .. } = plugin.on_update(&mut host) {
            min_coefficient = Some(min_coefficient.map_or(coefficient, |m| m.min(coefficient)));
            max_coefficient = Some(max_coefficient.map_or(coefficient, |m| m.max(coefficient)));
        }

        sim_time = tick as f64 * step_secs;
        if clock_tx.send(sim_time).is_err() {
            debug!("Transport no longer listening");
        }
        match pacer.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
    drop(clock_tx);

    let published = transport
        .await
        .map_err(|e| CliError::Transport(e.to_string()))?;

    Ok(SimulationReport {
        backend: args.backend,
        sim_time,
        published,
        ingest: ingestor.stats(),
        ticks: plugin.scheduler().stats(),
        final_coefficient: plugin.last_coefficient(),
        min_coefficient,
        max_coefficient,
        final_slip_ratio: slip_at(args, sim_time),
    })
}

pub async fn execute(args: &SimulateArgs, json: bool) -> Result<()> {
    let report = run(args).await?;
    output::print_simulation(&report, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            config: None,
            duration: 0.1,
            step: 0.001,
            publish_hz: 100.0,
            backend: PhysicsBackend::Ode,
            speed: 10.0,
            slip: 0.3,
            radius: 0.3,
            load: 1000.0,
            time_scale: 0.0,
        }
    }

    #[test]
    fn test_slip_ramps_to_final_value() {
        let args = args();
        assert!(slip_at(&args, 0.0).abs() < 1e-12);
        assert!((slip_at(&args, 0.05) - 0.15).abs() < 1e-12);
        assert!((slip_at(&args, 1.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_patch_velocity_matches_slip() {
        let args = args();
        let state = wheel_state(&args, 0.1);
        let patch = state.velocity_at_point(&Point3::origin());
        assert!((patch.x + 0.3 * 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_run_counts_every_tick() -> Result<(), CliError> {
        let report = run(&args()).await?;
        assert_eq!(report.ticks.ticks, 100);
        assert_eq!(
            report.ticks.ticks,
            report.ticks.applied + report.ticks.stalled + report.ticks.no_load + report.ticks.write_skipped
        );
        assert_eq!(report.ingest.received, report.published);
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_backend_never_applies() -> Result<(), CliError> {
        let args = SimulateArgs {
            backend: PhysicsBackend::Dart,
            ..args()
        };
        let report = run(&args).await?;
        assert_eq!(report.ticks.applied, 0);
        assert_eq!(report.final_coefficient, None);
        Ok(())
    }

    #[test]
    fn test_next_publish_after() {
        assert!((next_publish_after(0.0, 0.01) - 0.01).abs() < 1e-12);
        assert!((next_publish_after(0.025, 0.01) - 0.03).abs() < 1e-12);
        assert!(next_publish_after(1.0, 1e-20).is_finite());
    }

    #[tokio::test]
    async fn test_publish_rate_above_step_rate_completes() -> Result<(), CliError> {
        let args = SimulateArgs {
            duration: 0.01,
            publish_hz: 1e20,
            ..args()
        };
        let report = tokio::time::timeout(Duration::from_secs(10), run(&args))
            .await
            .map_err(|e| CliError::Transport(e.to_string()))??;
        assert_eq!(report.ticks.ticks, 10);
        assert_eq!(report.ingest.received, report.published);
        assert!(report.published >= 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_non_positive_step() {
        let args = SimulateArgs { step: 0.0, ..args() };
        assert!(matches!(run(&args).await, Err(CliError::InvalidArgument(_))));
    }
}
