//! Tabulation of the friction curve for tooling and inspection.

use serde::Serialize;

use crate::model::FrictionModel;

/// One point of a sampled friction curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    /// Slip ratio the curve was evaluated at.
    pub slip_ratio: f64,
    /// Resulting friction coefficient.
    pub friction: f64,
}

/// Evaluate `model` at a fixed reference speed for each slip ratio.
///
/// Not RT-safe: allocates the result.
///
/// # Example
///
/// ```
/// use tire_friction_model::{FrictionModel, FrictionParameters, sample_curve};
///
/// let model = FrictionModel::new(FrictionParameters::default());
/// let samples = sample_curve(&model, 2.0, [0.0, 0.1, 0.3]);
/// assert_eq!(samples.len(), 3);
/// assert!((samples[1].friction - 1.1).abs() < 1e-9);
/// ```
pub fn sample_curve(
    model: &FrictionModel,
    reference_speed: f64,
    slip_ratios: impl IntoIterator<Item = f64>,
) -> Vec<CurveSample> {
    slip_ratios
        .into_iter()
        .map(|slip_ratio| CurveSample {
            slip_ratio,
            friction: model.compute_friction(slip_ratio * reference_speed, reference_speed),
        })
        .collect()
}

/// `count` evenly spaced slip ratios from 0 to `max_ratio` inclusive.
#[must_use]
pub fn linspace(max_ratio: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (count - 1) as f64;
            (0..count).map(|i| max_ratio * i as f64 / last).collect()
        }
    }
}
