use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::FpsCounter;
use crate::config::{GRID_DIVISIONS, TRACE_POINTS_PER_FRAME, WINDOW_SIZE};
use crate::error::RenderError;
use crate::gpu::{
    grid_lines, nice_step, GpuContext, TraceBindGroups, TraceBuffers, TracePipeline,
    ViewTransform,
};
use crate::simulation::ScreenTrajectory;

/// GPU resources created once the window exists
struct TraceState {
    window: Arc<Window>,
    gpu: GpuContext,
    buffers: TraceBuffers,
    pipeline: TracePipeline,
    bind_groups: TraceBindGroups,
}

/// 2-D plot of the laser spot trajectory on the screen
pub struct LaserApp {
    trajectory: ScreenTrajectory,
    bounds: [f64; 4],
    mode_labels: String,
    state: Option<TraceState>,
    error: Option<RenderError>,
    progressive: bool,
    visible: usize,
    fps_counter: FpsCounter,
}

impl LaserApp {
    pub fn new(trajectory: ScreenTrajectory, mode_labels: String) -> Self {
        let bounds = trajectory.bounds().unwrap_or([0.0; 4]);
        let visible = trajectory.len();
        Self {
            trajectory,
            bounds,
            mode_labels,
            state: None,
            error: None,
            progressive: false,
            visible,
            fps_counter: FpsCounter::new(),
        }
    }

    /// Error that stopped the event loop, if any
    pub fn into_result(self) -> Result<(), RenderError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn title(&self, fps: f64) -> String {
        format!(
            "Laser Reflection Pattern (m,n) Modes: {} - {:.0} FPS",
            self.mode_labels, fps
        )
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<TraceState, RenderError> {
        let window_attrs = Window::default_attributes()
            .with_title("Laser Reflection Pattern - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let [x0, y0, x1, y1] = self.bounds;
        let step = nice_step((x1 - x0).max(y1 - y0), GRID_DIVISIONS);
        let grid = grid_lines(self.bounds, step);
        log::info!(
            "Creating trace buffers ({} points, grid step {:e} m)...",
            self.trajectory.len(),
            step
        );
        let buffers = TraceBuffers::new(&gpu.device, &self.trajectory, &grid);
        buffers.update_transform(&gpu.queue, ViewTransform::fit(self.bounds, gpu.aspect()));

        log::info!("Creating trace pipeline...");
        let pipeline = TracePipeline::new(&gpu.device, gpu.format());
        let bind_groups = pipeline.create_bind_groups(&gpu.device, &buffers);

        Ok(TraceState {
            window,
            gpu,
            buffers,
            pipeline,
            bind_groups,
        })
    }

    fn render(&mut self) {
        if self.progressive && self.visible < self.trajectory.len() {
            self.visible = (self.visible + TRACE_POINTS_PER_FRAME).min(self.trajectory.len());
        }
        let fps = self.fps_counter.tick();

        let Some(state) = &self.state else {
            return;
        };
        let gpu = &state.gpu;

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        state.pipeline.draw(
            &mut encoder,
            &view,
            &state.bind_groups,
            &state.buffers,
            self.visible as u32,
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = fps {
            state.window.set_title(&self.title(fps));
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            // Toggle progressive tracing
            KeyCode::Space => {
                self.progressive = !self.progressive;
                self.visible = if self.progressive { 0 } else { self.trajectory.len() };
                log::info!(
                    "Progressive tracing: {}",
                    if self.progressive { "ON" } else { "OFF" }
                );
            }

            // Restart the trace
            KeyCode::KeyR => {
                self.visible = if self.progressive { 0 } else { self.trajectory.len() };
                log::info!("Trace reset");
            }

            _ => {}
        }
    }
}

impl ApplicationHandler for LaserApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Initializing laser reflection view (modes {})...", self.mode_labels);

        match self.init(event_loop) {
            Ok(state) => {
                log::info!("Initialization complete!");
                log::info!("Controls:");
                log::info!("  Space: Toggle progressive tracing");
                log::info!("  R: Restart trace");
                log::info!("  Escape: Quit");
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("Initialization failed: {}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(state) = &mut self.state {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    state.gpu.resize(new_size);
                    let transform = ViewTransform::fit(self.bounds, state.gpu.aspect());
                    state.buffers.update_transform(&state.gpu.queue, transform);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(state) = &self.state {
                    state.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
