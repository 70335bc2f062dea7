use super::helpers;
use super::targets::{RenderTargets, HDR_FORMAT};
use super::GpuRenderer;
use waves_core::constants::{BLOOM_RADIUS, BLOOM_STRENGTH, BLOOM_THRESHOLD};
use waves_core::{FrameInputs, PostProcessing, SurfaceSize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomParams {
    pub strength: f32,
    pub threshold: f32,
    /// 0..1, widens the blur kernel.
    pub radius: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            strength: BLOOM_STRENGTH,
            threshold: BLOOM_THRESHOLD,
            radius: BLOOM_RADIUS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    radius: f32,
    _pad: f32,
}

// one buffer per pass; queue writes land before the whole encoder runs
#[derive(Clone, Copy)]
enum Pass {
    Bright,
    BlurH,
    BlurV,
    Composite,
}

impl Pass {
    const ALL: [Pass; 4] = [Pass::Bright, Pass::BlurH, Pass::BlurV, Pass::Composite];

    fn label(self) -> &'static str {
        match self {
            Pass::Bright => "bright_pass",
            Pass::BlurH => "blur_h",
            Pass::BlurV => "blur_v",
            Pass::Composite => "composite",
        }
    }

    fn blur_dir(self) -> [f32; 2] {
        match self {
            Pass::BlurH => [1.0, 0.0],
            Pass::BlurV => [0.0, 1.0],
            _ => [0.0, 0.0],
        }
    }
}

struct PassBindings {
    // Bright, BlurH, BlurV, Composite
    group0: [wgpu::BindGroup; 4],
    bloom_only: wgpu::BindGroup,
}

/// Bright pass, separable blur and tone-mapped composite over an HDR copy of
/// the scene.
pub struct BloomComposer {
    params: BloomParams,
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    uniforms: [wgpu::Buffer; 4],
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    targets: RenderTargets,
    bindings: PassBindings,
}

impl BloomComposer {
    pub fn new(renderer: &GpuRenderer, params: BloomParams) -> Self {
        let device = renderer.device();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(super::POST_WGSL.into()),
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let tex_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                tex_entry(0),
                sampler_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[tex_entry(0), sampler_entry(1)],
        });
        let uniforms = Pass::ALL.map(|pass| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(pass.label()),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_bright", HDR_FORMAT);
        let blur_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_blur", HDR_FORMAT);
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            &shader,
            "fs_composite",
            renderer.surface_format(),
        );
        let size = renderer.size();
        let targets = RenderTargets::new(device, size.width, size.height);
        let bindings = build_bindings(device, &bgl0, &bgl1, &sampler, &uniforms, &targets);

        Self {
            params,
            bgl0,
            bgl1,
            sampler,
            uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            targets,
            bindings,
        }
    }

    fn write_uniforms(&self, queue: &wgpu::Queue) {
        let (bw, bh) = RenderTargets::bloom_size(self.targets.width, self.targets.height);
        for (pass, buffer) in Pass::ALL.iter().zip(&self.uniforms) {
            let u = PostUniforms {
                resolution: [bw as f32, bh as f32],
                blur_dir: pass.blur_dir(),
                bloom_strength: self.params.strength,
                threshold: self.params.threshold,
                radius: self.params.radius,
                _pad: 0.0,
            };
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&u));
        }
    }
}

fn build_bindings(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    uniforms: &[wgpu::Buffer; 4],
    targets: &RenderTargets,
) -> PassBindings {
    let sources = [
        &targets.hdr_view,
        &targets.bloom_a_view,
        &targets.bloom_b_view,
        &targets.hdr_view,
    ];
    let group0 = [0usize, 1, 2, 3].map(|i| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(Pass::ALL[i].label()),
            layout: bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(sources[i]),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms[i].as_entire_binding(),
                },
            ],
        })
    });
    let bloom_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout: bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    PassBindings { group0, bloom_only }
}

impl PostProcessing<GpuRenderer> for BloomComposer {
    // Targets are rebuilt lazily in `render`, from the renderer's clamped size.
    fn set_size(&mut self, size: SurfaceSize) {
        if size.width != self.targets.width || size.height != self.targets.height {
            log::debug!("[post] targets stale, want {}x{}", size.width, size.height);
        }
    }

    fn render(&mut self, renderer: &mut GpuRenderer, frame: &FrameInputs<'_>) -> anyhow::Result<()> {
        let size = renderer.size();
        if size.width != self.targets.width || size.height != self.targets.height {
            self.resize_targets(renderer.device(), size);
        }
        let output = renderer.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("post_encoder"),
            });

        renderer.encode_scene(&mut encoder, &self.targets.hdr_view, frame, true);
        self.write_uniforms(renderer.queue());

        let [bright, blur_h, blur_v, composite] = &self.bindings.group0;
        helpers::blit(
            &mut encoder,
            Pass::Bright.label(),
            &self.targets.bloom_a_view,
            &self.bright_pipeline,
            bright,
            None,
        );
        helpers::blit(
            &mut encoder,
            Pass::BlurH.label(),
            &self.targets.bloom_b_view,
            &self.blur_pipeline,
            blur_h,
            None,
        );
        helpers::blit(
            &mut encoder,
            Pass::BlurV.label(),
            &self.targets.bloom_a_view,
            &self.blur_pipeline,
            blur_v,
            None,
        );
        helpers::blit(
            &mut encoder,
            Pass::Composite.label(),
            &view,
            &self.composite_pipeline,
            composite,
            Some(&self.bindings.bloom_only),
        );

        renderer.queue().submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        self.targets.destroy();
        for b in &self.uniforms {
            b.destroy();
        }
        log::info!("[post] composer disposed");
    }
}

impl BloomComposer {
    fn resize_targets(&mut self, device: &wgpu::Device, size: SurfaceSize) {
        let old = std::mem::replace(
            &mut self.targets,
            RenderTargets::new(device, size.width, size.height),
        );
        old.destroy();
        self.bindings = build_bindings(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            &self.uniforms,
            &self.targets,
        );
    }
}
