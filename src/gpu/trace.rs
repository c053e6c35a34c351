use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline as WgpuRenderPipeline,
    TextureFormat, TextureView,
};

use crate::gpu::buffers::TraceBuffers;

/// Line pipelines for the laser trajectory and its background grid
pub struct TracePipeline {
    strip_pipeline: WgpuRenderPipeline,
    list_pipeline: WgpuRenderPipeline,
    bind_group_layout: BindGroupLayout,
}

/// Bind groups for the trace and grid colours
pub struct TraceBindGroups {
    pub trace: BindGroup,
    pub grid: BindGroup,
}

impl TracePipeline {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trace-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/trace.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trace-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trace-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        }];

        let build = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Self {
            strip_pipeline: build("trace-strip-pipeline", wgpu::PrimitiveTopology::LineStrip),
            list_pipeline: build("grid-list-pipeline", wgpu::PrimitiveTopology::LineList),
            bind_group_layout,
        }
    }

    fn bind_group(&self, device: &Device, label: &str, uniform_buffer: &Buffer) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        })
    }

    pub fn create_bind_groups(&self, device: &Device, buffers: &TraceBuffers) -> TraceBindGroups {
        TraceBindGroups {
            trace: self.bind_group(device, "trace-bind-group", &buffers.trace_uniform_buffer),
            grid: self.bind_group(device, "grid-bind-group", &buffers.grid_uniform_buffer),
        }
    }

    /// Draw the grid, then the first `visible` points of the trajectory
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        bind_groups: &TraceBindGroups,
        buffers: &TraceBuffers,
        visible: u32,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trace-render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if buffers.grid_vertex_count > 0 {
            pass.set_pipeline(&self.list_pipeline);
            pass.set_bind_group(0, &bind_groups.grid, &[]);
            pass.set_vertex_buffer(0, buffers.grid_buffer.slice(..));
            pass.draw(0..buffers.grid_vertex_count, 0..1);
        }

        let visible = visible.min(buffers.trace_vertex_count);
        if visible > 1 {
            pass.set_pipeline(&self.strip_pipeline);
            pass.set_bind_group(0, &bind_groups.trace, &[]);
            pass.set_vertex_buffer(0, buffers.trace_buffer.slice(..));
            pass.draw(0..visible, 0..1);
        }
    }
}
