//! Plugin lifecycle tests against an in-process host.

use std::collections::BTreeMap;
use std::time::Duration;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use tire_friction_contact::prelude::*;
use tire_friction_model::MidSpeedBlend;
use tire_friction_plugin::prelude::*;
use tire_friction_test_helpers::prelude::*;
use tracing::Level;

const RADIUS: f64 = 0.3;
const STEP: Duration = Duration::from_millis(1);

fn host_with(tire: BodyState, backend: PhysicsBackend) -> PluginResult<HostRegistry> {
    let mut host = HostRegistry::new(backend, STEP);
    host.add_model("vehicle");
    host.add_link("vehicle", "chassis", BodyState::default())?;
    host.add_link("vehicle", "wheel", tire)?;
    host.add_collision("vehicle", "wheel", "tire", Some(SurfaceParams::default()))?;
    host.add_collision("vehicle", "chassis", "body", None)?;
    host.add_model("ground_plane");
    host.add_link("ground_plane", "link", ground_state())?;
    host.add_collision("ground_plane", "link", "collision", None)?;
    Ok(host)
}

fn tire_config() -> PluginConfig {
    PluginConfig::for_collision("tire").with_link("wheel")
}

fn surface_mu(host: &HostRegistry) -> Option<f64> {
    host.surface(TIRE).map(|s| s.friction.mu_primary)
}

#[test]
fn test_two_point_contact_yields_055() -> TestResult {
    // Pure rolling at 2 m/s. Points at height z move at omega * z, giving
    // slip speeds of 0.05 and 0.15 under equal 10 N loads.
    let omega = 2.0 / RADIUS;
    let mut host = host_with(rolling_wheel(2.0, 0.0, RADIUS), PhysicsBackend::Ode)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    let subscription = plugin.init();

    let point = |z: f64| ContactPoint {
        position: Point3::new(0.0, 0.0, z),
        normal: Vector3::z(),
        force_on_body1: Vector3::new(0.0, 0.0, 10.0),
    };
    subscription.deliver(&ContactsMessage::new(vec![
        Contact::new(TIRE, GROUND)
            .with_point(point(0.05 / omega))
            .with_point(point(0.15 / omega)),
    ]));

    let StepOutcome::Applied {
        coefficient,
        kinematics,
    } = plugin.on_update(&mut host)
    else {
        return Err("expected the coefficient to be applied".into());
    };
    assert_relative_eq!(kinematics.slip_speed, 0.10, epsilon = 1e-12);
    assert_relative_eq!(kinematics.reference_speed, 2.0, epsilon = 1e-12);
    assert_relative_eq!(coefficient, 0.55, epsilon = 1e-9);

    let surface = must_some(host.surface(TIRE), "tire surface");
    assert_relative_eq!(surface.friction.mu_primary, 0.55, epsilon = 1e-9);
    assert_relative_eq!(surface.friction.mu_secondary, 0.55, epsilon = 1e-9);
    assert_eq!(plugin.last_coefficient(), Some(coefficient));
    Ok(())
}

#[test]
fn test_each_snapshot_applied_once() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.05, RADIUS), PhysicsBackend::Ode)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    let subscription = plugin.init();

    subscription.deliver(&TireContactFixture::new().point(0.0, 10.0).message());
    assert!(matches!(plugin.on_update(&mut host), StepOutcome::Applied { .. }));
    assert_eq!(plugin.on_update(&mut host), StepOutcome::Stalled);

    let stats = plugin.scheduler().stats();
    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.stalled, 1);
    Ok(())
}

#[test]
fn test_latest_message_wins_between_ticks() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.05, RADIUS), PhysicsBackend::Ode)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    let subscription = plugin.init();

    // Superseded before any tick: a heavy contact against the chassis.
    subscription.deliver(&ContactsMessage::new(vec![
        Contact::new(TIRE, "vehicle::chassis::body").with_point(ContactPoint {
            position: Point3::origin(),
            normal: Vector3::z(),
            force_on_body1: Vector3::new(0.0, 0.0, 1000.0),
        }),
    ]));
    subscription.deliver(&TireContactFixture::new().point(0.0, 10.0).message());

    let outcome = plugin.on_update(&mut host);
    assert!(matches!(outcome, StepOutcome::Applied { coefficient, .. } if (coefficient - 0.55).abs() < 1e-9));
    assert_eq!(subscription.ingestor().stats().superseded, 1);
    Ok(())
}

#[test]
fn test_unloaded_snapshot_keeps_previous_coefficient() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.05, RADIUS), PhysicsBackend::Ode)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    let subscription = plugin.init();

    subscription.deliver(&TireContactFixture::new().point(0.0, 10.0).message());
    plugin.on_update(&mut host);

    host.set_link_state("vehicle::wheel", rolling_wheel(2.0, 0.5, RADIUS));
    subscription.deliver(&TireContactFixture::new().point(0.0, 0.0).message());
    assert_eq!(plugin.on_update(&mut host), StepOutcome::NoLoad);

    assert_relative_eq!(must_some(surface_mu(&host), "surface"), 0.55, epsilon = 1e-9);
    assert_relative_eq!(must_some(plugin.last_coefficient(), "coefficient"), 0.55, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_unsupported_backend_never_mutates_and_logs_once() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.05, RADIUS), PhysicsBackend::Bullet)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    let subscription = plugin.init();
    subscription.deliver(&TireContactFixture::new().point(0.0, 10.0).message());

    let (outcome, logs) = capture_logs(|| plugin.on_update(&mut host));

    assert!(matches!(outcome, StepOutcome::WriteSkipped { coefficient } if (coefficient - 0.55).abs() < 1e-9));
    assert_eq!(logs.count(Level::ERROR), 1);
    assert!(logs.contains(Level::ERROR, "Only ODE is supported right now"));
    assert_eq!(host.surface(TIRE), Some(&SurfaceParams::default()));
    assert_eq!(plugin.last_coefficient(), None);
    Ok(())
}

#[test]
fn test_missing_surface_logs_once() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.05, RADIUS), PhysicsBackend::Ode)?;
    host.add_collision("vehicle", "wheel", "tire", None)?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config())?;
    plugin.init().deliver(&TireContactFixture::new().point(0.0, 10.0).message());

    let (outcome, logs) = capture_logs(|| plugin.on_update(&mut host));
    assert!(matches!(outcome, StepOutcome::WriteSkipped { .. }));
    assert_eq!(logs.count(Level::ERROR), 1);
    assert!(logs.contains(Level::ERROR, "Setting friction failed"));
    Ok(())
}

#[test]
fn test_stall_reported_after_threshold_of_step_time() -> TestResult {
    let mut host = host_with(ground_state(), PhysicsBackend::Ode)?;
    let config = PluginConfig {
        stall_warning_secs: 0.01,
        ..tire_config()
    };
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &config)?;

    let ((), logs) = capture_logs(|| {
        for _ in 0..25 {
            assert_eq!(plugin.on_update(&mut host), StepOutcome::Stalled);
        }
    });
    assert_eq!(logs.count(Level::WARN), 2);
    assert!(logs.contains(Level::WARN, "without a contact message"));
    Ok(())
}

#[test]
fn test_mid_speed_blend_selected_by_config() -> TestResult {
    for (blend, expected) in [
        (MidSpeedBlend::Continuous, 0.825),
        (MidSpeedBlend::Legacy, -0.275),
    ] {
        let mut host = host_with(rolling_wheel(0.75, 0.05, RADIUS), PhysicsBackend::Ode)?;
        let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &tire_config().with_blend(blend))?;
        plugin.init().deliver(&TireContactFixture::new().point(0.0, 10.0).message());
        plugin.on_update(&mut host);
        assert_relative_eq!(must_some(surface_mu(&host), "surface"), expected, epsilon = 1e-9);
    }
    Ok(())
}

#[test]
fn test_validator_fallback_through_parameter_map() -> TestResult {
    let host = host_with(ground_state(), PhysicsBackend::Ode)?;
    let map: BTreeMap<String, String> = [
        ("link_name", "wheel"),
        ("collision_name", "tire"),
        ("slip_static", "-1"),
        ("slip_dynamic", "0.05"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let config = PluginConfig::from_map(&map)?;

    let (plugin, logs) = capture_logs(|| TireFrictionPlugin::load(&host, "vehicle", &config));
    let plugin = plugin?;
    let params = plugin.scheduler().estimator().model().params();
    assert_relative_eq!(params.slip_static(), 0.1);
    assert_relative_eq!(params.slip_dynamic(), 0.2, epsilon = 1e-12);
    assert_eq!(plugin.scheduler().estimator().warnings().len(), 2);
    assert_eq!(logs.count(Level::WARN), 2);
    Ok(())
}

#[test]
fn test_fatal_load_errors() -> TestResult {
    let mut host = host_with(ground_state(), PhysicsBackend::Ode)?;
    host.add_model("empty");

    let missing = PluginConfig::default().with_link("wheel");
    assert!(matches!(
        TireFrictionPlugin::load(&host, "vehicle", &missing),
        Err(PluginError::MissingCollisionName)
    ));
    assert!(matches!(
        TireFrictionPlugin::load(&host, "vehicle", &PluginConfig::for_collision("tire").with_link("rotor")),
        Err(PluginError::LinkNotFound { .. })
    ));
    assert!(matches!(
        TireFrictionPlugin::load(&host, "vehicle", &PluginConfig::for_collision("rim").with_link("wheel")),
        Err(PluginError::CollisionNotFound { .. })
    ));
    // First link is the chassis, which has no "tire" collision.
    assert!(matches!(
        TireFrictionPlugin::load(&host, "vehicle", &PluginConfig::for_collision("tire")),
        Err(PluginError::CollisionNotFound { .. })
    ));
    assert!(matches!(
        TireFrictionPlugin::load(&host, "empty", &PluginConfig::for_collision("tire")),
        Err(PluginError::ModelHasNoLinks(_))
    ));
    assert!(matches!(
        TireFrictionPlugin::load(&host, "trailer", &tire_config()),
        Err(PluginError::ModelNotFound(_))
    ));
    let bad_stall = PluginConfig {
        stall_warning_secs: -1.0,
        ..tire_config()
    };
    assert!(matches!(
        TireFrictionPlugin::load(&host, "vehicle", &bad_stall),
        Err(PluginError::Config(ConfigError::InvalidValue { .. }))
    ));
    Ok(())
}

#[test]
fn test_yaml_config_end_to_end() -> TestResult {
    let mut host = host_with(rolling_wheel(2.0, 0.15, RADIUS), PhysicsBackend::Ode)?;
    let config = PluginConfig::from_yaml_str(
        "link_name: wheel\ncollision_name: tire\nfriction_static: 1.2\nfriction_dynamic: 0.8\n",
    )?;
    let mut plugin = TireFrictionPlugin::load(&host, "vehicle", &config)?;
    plugin.init().deliver(&TireContactFixture::new().point(0.0, 10.0).message());
    plugin.on_update(&mut host);
    // Halfway between (0.1, 1.2) and (0.2, 0.8).
    assert_relative_eq!(must_some(surface_mu(&host), "surface"), 1.0, epsilon = 1e-9);
    Ok(())
}
