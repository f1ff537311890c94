//! `tirectl curve`: tabulate the friction curve for a configuration.

use anyhow::Result;
use serde::Serialize;
use tire_friction_model::{CurveSample, MidSpeedBlend, ParameterWarning, linspace, sample_curve};
use tire_friction_plugin::FrictionEstimator;

use crate::commands::{CurveArgs, load_config};
use crate::error::CliError;
use crate::output;

/// Sampled curve plus the parameters that produced it.
#[derive(Debug, Serialize)]
pub struct CurveReport {
    pub reference_speed: f64,
    pub blend: MidSpeedBlend,
    pub friction_static: f64,
    pub friction_dynamic: f64,
    pub slip_static: f64,
    pub slip_dynamic: f64,
    pub speed_static: f64,
    pub warnings: Vec<String>,
    pub samples: Vec<CurveSample>,
}

pub fn build_report(args: &CurveArgs) -> Result<CurveReport, CliError> {
    if args.samples == 0 {
        return Err(CliError::InvalidArgument("--samples must be at least 1".into()));
    }
    if !(args.max_slip.is_finite() && args.max_slip >= 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "--max-slip must be non-negative, got {}",
            args.max_slip
        )));
    }

    let config = load_config(args.config.as_deref())?;
    let estimator = FrictionEstimator::load(&config)?;
    let model = estimator.model();
    let params = model.params();

    Ok(CurveReport {
        reference_speed: args.reference_speed,
        blend: model.blend(),
        friction_static: params.friction_static(),
        friction_dynamic: params.friction_dynamic(),
        slip_static: params.slip_static(),
        slip_dynamic: params.slip_dynamic(),
        speed_static: params.speed_static(),
        warnings: estimator.warnings().iter().map(ParameterWarning::to_string).collect(),
        samples: sample_curve(model, args.reference_speed, linspace(args.max_slip, args.samples)),
    })
}

pub fn execute(args: &CurveArgs, json: bool) -> Result<()> {
    let report = build_report(args)?;
    output::print_curve(&report, json)?;
    Ok(())
}
