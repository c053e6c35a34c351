use glam::Mat4;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{GRID_COLOR, TRACE_COLOR, TRACE_MARGIN};
use crate::simulation::{PolarGrid, ScreenTrajectory};

/// Surface shader uniforms (80 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub z_scale: f32,
    pub z_limit: f32,
    pub _padding: [f32; 2],
}

/// Trace shader uniforms (32 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TraceUniforms {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
    pub color: [f32; 4],
}

/// Static (X, Y) mesh plus the per-frame displacement buffer
pub struct MeshBuffers {
    pub position_buffer: Buffer,
    pub displacement_buffer: Buffer,
    pub triangle_index_buffer: Buffer,
    pub wire_index_buffer: Buffer,
    pub uniform_buffer: Buffer,
    pub triangle_index_count: u32,
    pub wire_index_count: u32,
    vertex_count: usize,
}

impl MeshBuffers {
    /// Upload the grid, normalized so the membrane spans the unit disk
    pub fn new(device: &Device, grid: &PolarGrid, wire_stride: usize) -> Self {
        let scale = 1.0 / grid.radius();
        let positions: Vec<[f32; 2]> = grid
            .cartesian()
            .into_iter()
            .map(|[x, y]| [(x * scale) as f32, (y * scale) as f32])
            .collect();

        let (angles, radii) = (grid.angles().len(), grid.radii().len());
        let triangles = surface_indices(angles, radii);
        let wires = wire_indices(angles, radii, wire_stride);

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh-position-buffer"),
            contents: bytemuck::cast_slice(&positions),
            usage: BufferUsages::VERTEX,
        });

        let displacement_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh-displacement-buffer"),
            size: (positions.len() * std::mem::size_of::<f32>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let triangle_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh-triangle-index-buffer"),
            contents: bytemuck::cast_slice(&triangles),
            usage: BufferUsages::INDEX,
        });

        let wire_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh-wire-index-buffer"),
            contents: bytemuck::cast_slice(&wires),
            usage: BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("surface-uniform-buffer"),
            size: std::mem::size_of::<SurfaceUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            position_buffer,
            displacement_buffer,
            triangle_index_buffer,
            wire_index_buffer,
            uniform_buffer,
            triangle_index_count: triangles.len() as u32,
            wire_index_count: wires.len() as u32,
            vertex_count: positions.len(),
        }
    }

    /// Replace the displacement of every vertex
    pub fn update_displacement(&self, queue: &Queue, displacement: &[f64]) {
        assert_eq!(displacement.len(), self.vertex_count, "Displacement size mismatch");
        let values: Vec<f32> = displacement.iter().map(|&z| z as f32).collect();
        queue.write_buffer(&self.displacement_buffer, 0, bytemuck::cast_slice(&values));
    }

    pub fn update_uniforms(&self, queue: &Queue, view_proj: Mat4, z_scale: f32, z_limit: f32) {
        let uniforms = SurfaceUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            z_scale,
            z_limit,
            _padding: [0.0, 0.0],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

/// Two triangles per grid cell, wrapping around in angle
pub fn surface_indices(angles: usize, radii: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(angles * radii.saturating_sub(1) * 6);
    for a in 0..angles {
        let next = (a + 1) % angles;
        for r in 0..radii.saturating_sub(1) {
            let i00 = (a * radii + r) as u32;
            let i01 = (a * radii + r + 1) as u32;
            let i10 = (next * radii + r) as u32;
            let i11 = (next * radii + r + 1) as u32;
            indices.extend_from_slice(&[i00, i01, i11, i00, i11, i10]);
        }
    }
    indices
}

/// Line pairs along every `stride`-th ring and spoke, plus the rim
pub fn wire_indices(angles: usize, radii: usize, stride: usize) -> Vec<u32> {
    let stride = stride.max(1);
    let mut rings: Vec<usize> = (0..radii).step_by(stride).collect();
    if radii > 0 && rings.last() != Some(&(radii - 1)) {
        rings.push(radii - 1);
    }

    let mut indices = Vec::new();
    for &r in &rings {
        for a in 0..angles {
            let next = (a + 1) % angles;
            indices.push((a * radii + r) as u32);
            indices.push((next * radii + r) as u32);
        }
    }
    for a in (0..angles).step_by(stride) {
        for r in 0..radii.saturating_sub(1) {
            indices.push((a * radii + r) as u32);
            indices.push((a * radii + r + 1) as u32);
        }
    }
    indices
}

/// Equal-aspect mapping from screen metres to clip space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl ViewTransform {
    /// Fit `[min_x, min_y, max_x, max_y]` into clip space, same scale on both axes
    pub fn fit(bounds: [f64; 4], aspect: f32) -> Self {
        let [x0, y0, x1, y1] = bounds;
        let (cx, cy) = (0.5 * (x0 + x1), 0.5 * (y0 + y1));
        let half_extent = (0.5 * (x1 - x0)).max(0.5 * (y1 - y0));
        let half_extent = if half_extent > 0.0 { half_extent } else { 1.0 };

        let fill = 1.0 - TRACE_MARGIN as f64;
        let aspect = aspect.max(1e-6) as f64;
        // Clip space is stretched by the aspect ratio; shrink the wider axis.
        let (sx, sy) = if aspect >= 1.0 {
            (fill / (half_extent * aspect), fill / half_extent)
        } else {
            (fill / half_extent, fill * aspect / half_extent)
        };

        Self {
            scale: [sx as f32, sy as f32],
            offset: [(-cx * sx) as f32, (-cy * sy) as f32],
        }
    }
}

/// 1, 2 or 5 times a power of ten, close to `span / divisions`
pub fn nice_step(span: f64, divisions: f64) -> f64 {
    if !(span > 0.0) || !span.is_finite() {
        return 1.0;
    }
    let raw = span / divisions.max(1.0);
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Axis-aligned grid line segments at multiples of `step` covering `bounds`
pub fn grid_lines(bounds: [f64; 4], step: f64) -> Vec<[f32; 2]> {
    let [x0, y0, x1, y1] = bounds;
    let (first_x, last_x) = ((x0 / step).floor() as i64, (x1 / step).ceil() as i64);
    let (first_y, last_y) = ((y0 / step).floor() as i64, (y1 / step).ceil() as i64);
    let (left, right) = (first_x as f64 * step, last_x as f64 * step);
    let (bottom, top) = (first_y as f64 * step, last_y as f64 * step);

    let mut vertices = Vec::new();
    for i in first_x..=last_x {
        let x = (i as f64 * step) as f32;
        vertices.push([x, bottom as f32]);
        vertices.push([x, top as f32]);
    }
    for j in first_y..=last_y {
        let y = (j as f64 * step) as f32;
        vertices.push([left as f32, y]);
        vertices.push([right as f32, y]);
    }
    vertices
}

/// Trajectory line strip and background grid line list
pub struct TraceBuffers {
    pub trace_buffer: Buffer,
    pub grid_buffer: Buffer,
    pub trace_uniform_buffer: Buffer,
    pub grid_uniform_buffer: Buffer,
    pub trace_vertex_count: u32,
    pub grid_vertex_count: u32,
}

impl TraceBuffers {
    pub fn new(device: &Device, trajectory: &ScreenTrajectory, grid: &[[f32; 2]]) -> Self {
        let points: Vec<[f32; 2]> = trajectory
            .points()
            .map(|(x, y)| [x as f32, y as f32])
            .collect();

        // Zero-sized buffers are not allowed; pad with a single vertex.
        let trace_contents = if points.is_empty() { vec![[0.0; 2]] } else { points.clone() };
        let grid_contents = if grid.is_empty() { vec![[0.0; 2]] } else { grid.to_vec() };

        let trace_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trace-vertex-buffer"),
            contents: bytemuck::cast_slice(&trace_contents),
            usage: BufferUsages::VERTEX,
        });

        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid-vertex-buffer"),
            contents: bytemuck::cast_slice(&grid_contents),
            usage: BufferUsages::VERTEX,
        });

        let uniform_buffer = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<TraceUniforms>() as u64,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        Self {
            trace_buffer,
            grid_buffer,
            trace_uniform_buffer: uniform_buffer("trace-uniform-buffer"),
            grid_uniform_buffer: uniform_buffer("grid-uniform-buffer"),
            trace_vertex_count: points.len() as u32,
            grid_vertex_count: grid.len() as u32,
        }
    }

    /// Update both uniform buffers with a new view transform
    pub fn update_transform(&self, queue: &Queue, transform: ViewTransform) {
        let trace = TraceUniforms {
            scale: transform.scale,
            offset: transform.offset,
            color: TRACE_COLOR,
        };
        let grid = TraceUniforms { color: GRID_COLOR, ..trace };
        queue.write_buffer(&self.trace_uniform_buffer, 0, bytemuck::bytes_of(&trace));
        queue.write_buffer(&self.grid_uniform_buffer, 0, bytemuck::bytes_of(&grid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl ViewTransform {
        /// CPU copy of the trace vertex shader mapping
        fn apply(&self, x: f64, y: f64) -> [f32; 2] {
            [
                x as f32 * self.scale[0] + self.offset[0],
                y as f32 * self.scale[1] + self.offset[1],
            ]
        }
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 80);
        assert_eq!(std::mem::size_of::<TraceUniforms>(), 32);
    }

    #[test]
    fn test_surface_indices_cover_every_cell() {
        let indices = surface_indices(8, 5);
        // 8 angular cells (wrapping) x 4 radial cells x 2 triangles x 3 indices
        assert_eq!(indices.len(), 8 * 4 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < 8 * 5));
        // The seam connects the last angle back to the first.
        assert!(indices.chunks(6).any(|quad| quad.contains(&35) && quad.contains(&0)));
    }

    #[test]
    fn test_wire_indices_include_rim() {
        let indices = wire_indices(8, 10, 4);
        assert_eq!(indices.len() % 2, 0);
        // rings at r = 0, 4, 8 and the rim r = 9; spokes at a = 0, 4
        assert_eq!(indices.len(), 4 * 8 * 2 + 2 * 9 * 2);
        assert!(indices.contains(&9));
    }

    #[test]
    fn test_fit_keeps_equal_aspect() {
        let transform = ViewTransform::fit([-2.0, -1.0, 2.0, 1.0], 2.0);
        // Same data length maps to the same pixel length on both axes.
        assert!((transform.scale[0] * 2.0 - transform.scale[1]).abs() < 1e-6);
        let [x, y] = transform.apply(2.0, 0.0);
        assert!(x <= 1.0 && x > 0.0 && y.abs() < 1e-6);
        let [x, y] = transform.apply(0.0, 0.0);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    }

    #[test]
    fn test_fit_contains_bounds() {
        let bounds = [0.01, -0.03, 0.05, 0.02];
        for aspect in [0.5, 1.0, 1.7] {
            let transform = ViewTransform::fit(bounds, aspect);
            for (x, y) in [(0.01, -0.03), (0.05, 0.02), (0.01, 0.02), (0.05, -0.03)] {
                let [cx, cy] = transform.apply(x, y);
                let inside = cx.abs() <= 1.0 && cy.abs() <= 1.0;
                assert!(inside, "({}, {}) at aspect {}", cx, cy, aspect);
            }
        }
    }

    #[test]
    fn test_fit_degenerate_bounds() {
        let transform = ViewTransform::fit([0.0, 0.0, 0.0, 0.0], 1.0);
        assert!(transform.scale.iter().all(|s| s.is_finite() && *s > 0.0));
        assert_eq!(transform.apply(0.0, 0.0), [0.0, 0.0]);
    }

    #[test]
    fn test_nice_step() {
        assert!((nice_step(10.0, 8.0) - 1.0).abs() < 1e-12);
        assert!((nice_step(0.16, 8.0) - 0.02).abs() < 1e-12);
        assert!((nice_step(0.4, 8.0) - 0.05).abs() < 1e-12);
        assert_eq!(nice_step(0.0, 8.0), 1.0);
    }

    #[test]
    fn test_grid_lines_cover_bounds() {
        let lines = grid_lines([-0.25, -0.1, 0.3, 0.1], 0.1);
        assert_eq!(lines.len() % 2, 0);
        // x from -0.3 to 0.3 (7 lines), y from -0.1 to 0.1 (3 lines)
        assert_eq!(lines.len(), (7 + 3) * 2);
    }
}
