//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

use crate::commands::curve::CurveReport;
use crate::commands::simulate::SimulationReport;
use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::ConfigRead { .. }) => "config_read",
        Some(CliError::UnsupportedConfigFormat(_)) => "unsupported_config_format",
        Some(CliError::InvalidArgument(_)) => "invalid_argument",
        Some(CliError::Config(_)) => "invalid_config",
        Some(CliError::Plugin(_)) => "plugin_load",
        Some(CliError::Transport(_)) => "transport",
        Some(CliError::JsonError(_)) => "json",
        None => "unknown",
    }
}

/// Render a success envelope around `value` under `key`.
pub fn json_success<T: Serialize>(key: &str, value: &T) -> Result<String, CliError> {
    let output = json!({
        "success": true,
        key: serde_json::to_value(value)?
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn fmt_coefficient(value: Option<f64>) -> String {
    value.map_or_else(|| "-".dimmed().to_string(), |v| format!("{v:.4}"))
}

/// Print a sampled friction curve
pub fn print_curve(report: &CurveReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", json_success("curve", report)?);
        return Ok(());
    }

    println!(
        "{} at reference speed {:.3} m/s ({:?} blend)",
        "Friction curve".bold(),
        report.reference_speed,
        report.blend
    );
    println!(
        "  static {:.3} @ slip {:.3}, dynamic {:.3} @ slip {:.3}, speed_static {:.3} m/s",
        report.friction_static,
        report.slip_static,
        report.friction_dynamic,
        report.slip_dynamic,
        report.speed_static
    );
    for warning in &report.warnings {
        println!("  {} {}", "Warning:".yellow(), warning);
    }
    println!();
    println!("  {:>10}  {:>10}", "slip".bold(), "friction".bold());
    for sample in &report.samples {
        println!("  {:>10.4}  {:>10.4}", sample.slip_ratio, sample.friction);
    }
    Ok(())
}

/// Print the summary of a synthetic run
pub fn print_simulation(report: &SimulationReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", json_success("simulation", report)?);
        return Ok(());
    }

    println!(
        "{} {:.3} s simulated on {}",
        "Simulation:".bold(),
        report.sim_time,
        report.backend.to_string().cyan()
    );
    println!(
        "  Messages: {} published, {} consumed, {} superseded",
        report.published, report.ingest.consumed, report.ingest.superseded
    );
    println!(
        "  Ticks:    {} total, {} applied, {} stalled, {} no load, {} write skipped",
        report.ticks.ticks,
        report.ticks.applied.to_string().green(),
        report.ticks.stalled,
        report.ticks.no_load,
        report.ticks.write_skipped.to_string().red()
    );
    if report.ingest.stall_warnings > 0 {
        println!(
            "  {} {} stall warning(s)",
            "Warning:".yellow(),
            report.ingest.stall_warnings
        );
    }
    println!(
        "  Friction: final {}, range [{}, {}] at final slip ratio {:.3}",
        fmt_coefficient(report.final_coefficient),
        fmt_coefficient(report.min_coefficient),
        fmt_coefficient(report.max_coefficient),
        report.final_slip_ratio
    );
    Ok(())
}
