use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

use membrane_modes::app::LaserApp;
use membrane_modes::config::ReflectionConfig;
use membrane_modes::simulation::MultiModeReflectionModel;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ReflectionConfig::default();
    let (model, times) =
        MultiModeReflectionModel::from_config(&config).context("invalid reflection configuration")?;

    for mode in model.modes() {
        log::info!(
            "Mode ({},{}): alpha = {:.6}, A = {} m, omega = {} rad/s",
            mode.angular_number(),
            mode.radial_number(),
            mode.radial_eigenvalue(),
            mode.amplitude(),
            mode.angular_frequency()
        );
    }

    let trajectory = model.trajectory(times.as_slice());
    if let Some([x0, y0, x1, y1]) = trajectory.bounds() {
        log::info!(
            "Traced {} samples: x in [{:.4}, {:.4}] m, y in [{:.4}, {:.4}] m",
            trajectory.len(),
            x0,
            x1,
            y0,
            y1
        );
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LaserApp::new(trajectory, model.mode_labels());
    event_loop.run_app(&mut app).context("event loop failed")?;
    app.into_result().context("renderer failed")?;
    Ok(())
}
