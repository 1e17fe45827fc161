/// Airship Terminal Demo - a hull and fins swaying side to side
///
/// Controls:
///   - Q/ESC: Quit
///
/// Logs go to stderr; raise the level with RUST_LOG and redirect stderr to
/// keep them off the rendered frames.
use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use airship_core::{Airship, ExtrudeSettings, OscillationController};
use airship_terminal::{Args, TerminalApp};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.oscillation().context("invalid sweep configuration")?;

    let mut airship =
        Airship::assemble(&ExtrudeSettings::default()).context("failed to build airship meshes")?;

    // A broken label leaves the airship bare, it never stops the demo
    match args.label_mesh() {
        Ok(mesh) => airship.attach_label(mesh),
        Err(e) => warn!("skipping label: {}", e),
    }

    let mut app = TerminalApp::new(airship, OscillationController::new(config), args.fps)
        .context("failed to query terminal size")?;
    app.run().context("terminal frame loop failed")?;

    Ok(())
}
