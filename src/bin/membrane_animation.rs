use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

use membrane_modes::app::MembraneApp;
use membrane_modes::config::ResonanceConfig;
use membrane_modes::simulation::{ModeResonanceModel, PolarGrid};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ResonanceConfig::default();
    let model = ModeResonanceModel::new(&config).context("invalid membrane configuration")?;
    log::info!(
        "Mode (m={}, n={}): k = {:.6} 1/m, f = {:.3} Hz, omega = {:.3} rad/s",
        model.angular_number(),
        model.radial_number(),
        model.radial_eigenvalue(),
        model.resonant_frequency(),
        model.angular_frequency()
    );

    let grid = PolarGrid::new(config.radius, config.grid_resolution, config.grid_resolution)
        .context("invalid polar grid")?;
    let animation = model
        .animate(&grid, config.frame_count, config.frames_per_second)
        .context("invalid animation settings")?;
    log::info!(
        "Animating {} frames at {} fps over {} grid points",
        animation.frame_count(),
        animation.frames_per_second(),
        grid.len()
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = MembraneApp::new(model, grid, animation);
    event_loop.run_app(&mut app).context("event loop failed")?;
    app.into_result().context("renderer failed")?;
    Ok(())
}
