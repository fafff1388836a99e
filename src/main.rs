//! goap-sim - a woodcutter driven by goal-oriented action planning
//!
//! Loads settings, runs the simulation, and logs a summary.

mod settings;
mod sim;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SimSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting woodcutter simulation...");

    let settings = SimSettings::load();
    let report = sim::run(&settings).context("Invalid action setup")?;

    info!(
        ticks = report.ticks,
        delivered = report.logs_delivered,
        completed = report.plans_completed,
        aborted = report.plans_aborted,
        axes_left = report.axes_left,
        standing = report.logs_standing,
        "Simulation finished"
    );

    if std::env::args().any(|a| a == "--save-settings") {
        settings.save()?;
    }

    Ok(())
}
