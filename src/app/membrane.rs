use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::FpsCounter;
use crate::config::{WINDOW_SIZE, WIRE_STRIDE, Z_LIMIT, Z_SCALE};
use crate::error::RenderError;
use crate::gpu::{GpuContext, MeshBuffers, OrbitCamera, SurfacePipeline};
use crate::simulation::{ModeAnimation, ModeResonanceModel, PolarGrid};

/// GPU resources created once the window exists
struct SurfaceState {
    window: Arc<Window>,
    gpu: GpuContext,
    mesh: MeshBuffers,
    pipeline: SurfacePipeline,
    bind_group: wgpu::BindGroup,
}

/// Animated 3-D view of a single membrane mode
pub struct MembraneApp {
    model: ModeResonanceModel,
    grid: PolarGrid,
    animation: ModeAnimation,
    state: Option<SurfaceState>,
    error: Option<RenderError>,
    camera: OrbitCamera,
    frame_index: u32,
    frame_interval: Duration,
    last_frame: Instant,
    paused: bool,
    fps_counter: FpsCounter,
    fps: f64,
}

impl MembraneApp {
    pub fn new(model: ModeResonanceModel, grid: PolarGrid, animation: ModeAnimation) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / animation.frames_per_second() as f64);
        Self {
            model,
            grid,
            animation,
            state: None,
            error: None,
            camera: OrbitCamera::default(),
            frame_index: 0,
            frame_interval,
            last_frame: Instant::now(),
            paused: false,
            fps_counter: FpsCounter::new(),
            fps: 0.0,
        }
    }

    /// Error that stopped the event loop, if any
    pub fn into_result(self) -> Result<(), RenderError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn title(&self) -> String {
        format!(
            "Vibrating Circular Membrane (m={}, n={}) at t={:.2}s - {:.0} FPS{}",
            self.model.angular_number(),
            self.model.radial_number(),
            self.animation.time_of(self.frame_index),
            self.fps,
            if self.paused { " [Paused]" } else { "" }
        )
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<SurfaceState, RenderError> {
        let window_attrs = Window::default_attributes()
            .with_title("Vibrating Circular Membrane - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        log::info!(
            "Creating mesh buffers ({} radii x {} angles)...",
            self.grid.radii().len(),
            self.grid.angles().len()
        );
        let mesh = MeshBuffers::new(&gpu.device, &self.grid, WIRE_STRIDE);
        mesh.update_displacement(&gpu.queue, &self.animation.frame(0));

        log::info!("Creating surface pipeline...");
        let pipeline = SurfacePipeline::new(&gpu.device, gpu.format());
        let bind_group = pipeline.create_bind_group(&gpu.device, &mesh.uniform_buffer);

        Ok(SurfaceState {
            window,
            gpu,
            mesh,
            pipeline,
            bind_group,
        })
    }

    /// Move to the next frame once the frame interval has elapsed
    fn advance(&mut self) -> bool {
        if self.paused || self.last_frame.elapsed() < self.frame_interval {
            return false;
        }
        self.last_frame = Instant::now();
        self.frame_index = (self.frame_index + 1) % self.animation.frame_count();
        true
    }

    fn render(&mut self) {
        let advanced = self.advance();
        if advanced {
            if let Some(state) = &self.state {
                let frame = self.animation.frame(self.frame_index);
                state.mesh.update_displacement(&state.gpu.queue, &frame);
            }
        }

        let ticked = match self.fps_counter.tick() {
            Some(fps) => {
                self.fps = fps;
                true
            }
            None => false,
        };
        let title = (advanced || ticked).then(|| self.title());

        let Some(state) = &self.state else {
            return;
        };
        let gpu = &state.gpu;

        state.mesh.update_uniforms(
            &gpu.queue,
            self.camera.view_projection(gpu.aspect()),
            Z_SCALE,
            Z_LIMIT,
        );

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

        state
            .pipeline
            .draw(&mut encoder, &view, &gpu.depth_view, &state.bind_group, &state.mesh);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(title) = title {
            state.window.set_title(&title);
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("Animation {}", if self.paused { "paused" } else { "resumed" });
            }

            // Orbit (WASD/arrows)
            KeyCode::KeyA | KeyCode::ArrowLeft => self.camera.orbit(-1.0, 0.0),
            KeyCode::KeyD | KeyCode::ArrowRight => self.camera.orbit(1.0, 0.0),
            KeyCode::KeyW | KeyCode::ArrowUp => self.camera.orbit(0.0, 1.0),
            KeyCode::KeyS | KeyCode::ArrowDown => self.camera.orbit(0.0, -1.0),

            // Zoom (Q/E or +/-)
            KeyCode::KeyQ | KeyCode::Minus => {
                self.camera.zoom_out();
                log::info!("Camera distance: {:.2}", self.camera.distance);
            }
            KeyCode::KeyE | KeyCode::Equal => {
                self.camera.zoom_in();
                log::info!("Camera distance: {:.2}", self.camera.distance);
            }

            KeyCode::KeyR => {
                self.camera = OrbitCamera::default();
                self.frame_index = 0;
                if let Some(state) = &self.state {
                    state
                        .mesh
                        .update_displacement(&state.gpu.queue, &self.animation.frame(0));
                }
                log::info!("View reset");
            }

            _ => {}
        }
    }
}

impl ApplicationHandler for MembraneApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!(
            "Initializing membrane animation (m={}, n={})...",
            self.model.angular_number(),
            self.model.radial_number()
        );

        match self.init(event_loop) {
            Ok(state) => {
                log::info!("Initialization complete!");
                log::info!("Controls:");
                log::info!("  Space: Pause/resume");
                log::info!("  WASD/Arrows: Orbit camera");
                log::info!("  Q/E: Zoom out/in");
                log::info!("  R: Reset view");
                log::info!("  Escape: Quit");
                self.last_frame = Instant::now();
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
