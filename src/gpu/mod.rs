mod buffers;
mod camera;
mod context;
mod render;
mod trace;

pub use buffers::{grid_lines, nice_step, MeshBuffers, TraceBuffers, ViewTransform};
pub use camera::OrbitCamera;
pub use context::GpuContext;
pub use render::SurfacePipeline;
pub use trace::{TraceBindGroups, TracePipeline};
