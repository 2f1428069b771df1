//! Application entry point for the 2D particle viewer.
//!
//! This binary parses the command line, sets up logging and eframe/egui,
//! and delegates all interactive logic and rendering to [`Viewer`].

mod viewer;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use sim_core::scenario::Scenario;
use tracing::info;
use tracing_subscriber::EnvFilter;

use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Interactive 2D particle system viewer")]
struct Args {
    /// YAML scenario to load instead of the default preset.
    #[arg(short, long)]
    scene: Option<PathBuf>,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the scenario cannot be loaded or eframe fails to create the
///   native window or event loop.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let viewer = match &args.scene {
        Some(path) => {
            let viewer = Viewer::with_scenario(Scenario::from_path(path)?)?;
            info!(path = %path.display(), "loaded scenario");
            viewer
        }
        None => Viewer::new(),
    };

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "2D Particles",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
