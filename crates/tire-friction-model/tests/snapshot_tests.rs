//! Snapshot tests for the sampled friction curve using insta.

use tire_friction_model::prelude::*;

fn render(samples: &[CurveSample]) -> String {
    samples
        .iter()
        .map(|s| format!("{:.3} {:.4}", s.slip_ratio, s.friction))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_default_curve_full_speed() {
    let model = FrictionModel::new(FrictionParameters::default());
    let table = render(&sample_curve(&model, 2.0, linspace(0.3, 7)));
    insta::assert_snapshot!("default_curve_full_speed", table);
}

#[test]
fn snapshot_default_curve_mid_speed_continuous() {
    let model = FrictionModel::new(FrictionParameters::default());
    let table = render(&sample_curve(&model, 0.75, linspace(0.3, 7)));
    insta::assert_snapshot!("default_curve_mid_speed_continuous", table);
}

#[test]
fn sampling_helpers_available_at_crate_root() {
    let model = tire_friction_model::FrictionModel::new(FrictionParameters::default());
    let slips = tire_friction_model::linspace(0.1, 3);
    let samples = tire_friction_model::sample_curve(&model, 2.0, slips);
    assert_eq!(samples.len(), 3);
}
