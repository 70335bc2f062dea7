use glam::Mat4;
use waves_core::{UniformStore, WaveLayer, WaveUniforms};
use wgpu::util::DeviceExt;

/// Purple and white point pipelines for one color target format.
pub(crate) struct PointPipelines {
    pub(crate) purple: wgpu::RenderPipeline,
    pub(crate) white: wgpu::RenderPipeline,
}

pub(crate) fn create_layer_bgl(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("wave_layer_bgl"),
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
    })
}

pub(crate) fn create_point_pipelines(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    bgl: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> PointPipelines {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("wave_points_pl"),
        bind_group_layouts: &[bgl],
        push_constant_ranges: &[],
    });
    let make = |frag_entry: &str| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(frag_entry),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_points"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(frag_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        })
    };
    PointPipelines {
        purple: make("fs_purple"),
        white: make("fs_white"),
    }
}

/// GPU buffers for one wave layer.
pub(crate) struct LayerGpu {
    layer: WaveLayer,
    vertices: wgpu::Buffer,
    vertex_count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl LayerGpu {
    pub(crate) fn new(device: &wgpu::Device, bgl: &wgpu::BindGroupLayout, layer: WaveLayer) -> Self {
        let grid = layer.geometry();
        let positions = grid.positions();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(layer.prefix()),
            contents: bytemuck::cast_slice(&positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("wave_uniforms"),
            size: std::mem::size_of::<WaveUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wave_layer_bg"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        log::info!("[gpu] layer {} with {} points", layer.prefix(), positions.len());
        Self {
            layer,
            vertices,
            vertex_count: positions.len() as u32,
            uniforms,
            bind_group,
        }
    }

    pub(crate) fn upload(&self, queue: &wgpu::Queue, store: &UniformStore, view_proj: Mat4) {
        let u = WaveUniforms::gather(store, self.layer, view_proj);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &PointPipelines) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        for pipeline in [&pipelines.purple, &pipelines.white] {
            pass.set_pipeline(pipeline);
            pass.draw(0..self.vertex_count, 0..1);
        }
    }

    pub(crate) fn destroy(&self) {
        self.vertices.destroy();
        self.uniforms.destroy();
    }
}
