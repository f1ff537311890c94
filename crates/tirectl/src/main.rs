//! tirectl - Tire Friction Control CLI
//!
//! Inspect friction curves and exercise the tire friction plugin against a
//! synthetic rolling wheel.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CurveArgs, SimulateArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tirectl")]
#[command(about = "Tire friction CLI - inspect friction curves and run synthetic simulations")]
#[command(version)]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabulate the friction curve for a configuration
    Curve(CurveArgs),

    /// Drive the plugin with a synthetic rolling wheel
    Simulate(SimulateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "tirectl={level},tire_friction_plugin={level},tire_friction_contact={level},tire_friction_model={level}",
                    level = log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let result = execute_command(&cli).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = match e.downcast_ref::<CliError>() {
                Some(CliError::Plugin(_)) => 3,
                Some(CliError::Config(_))
                | Some(CliError::ConfigRead { .. })
                | Some(CliError::UnsupportedConfigFormat(_)) => 4,
                Some(CliError::InvalidArgument(_)) => 5,
                _ => 1,
            };

            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Curve(args) => commands::curve::execute(args, cli.json),
        Commands::Simulate(args) => commands::simulate::execute(args, cli.json).await,
    }
}
