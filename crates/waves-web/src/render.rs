mod helpers;
mod points;
mod post;
mod targets;

pub use post::{BloomComposer, BloomParams};

use points::{LayerGpu, PointPipelines};
use waves_core::constants::CLEAR_COLOR;
use waves_core::{FrameInputs, Renderer, SurfaceSize, WaveLayer};
use web_sys as web;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

/// WebGPU surface plus the two point-cloud wave layers.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    layers: Vec<LayerGpu>,
    // the same layers drawn straight to the swapchain or into the HDR target
    direct: PointPipelines,
    offscreen: PointPipelines,
    clear_color: wgpu::Color,
    disposed: bool,
}

impl GpuRenderer {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // default limits; older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });
        let bgl = points::create_layer_bgl(&device);
        let direct = points::create_point_pipelines(&device, &shader, &bgl, format);
        let offscreen = points::create_point_pipelines(&device, &shader, &bgl, targets::HDR_FORMAT);
        let layers = WaveLayer::ALL
            .iter()
            .map(|&layer| LayerGpu::new(&device, &bgl, layer))
            .collect();
        let [r, g, b] = CLEAR_COLOR;
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            layers,
            direct,
            offscreen,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            disposed: false,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.config.width,
            height: self.config.height,
        }
    }

    /// Clamp a requested size to what the device can allocate.
    pub(crate) fn fit(&self, size: SurfaceSize) -> SurfaceSize {
        let max = self.device.limits().max_texture_dimension_2d;
        SurfaceSize {
            width: size.width.clamp(1, max),
            height: size.height.clamp(1, max),
        }
    }

    pub(crate) fn acquire(&mut self) -> anyhow::Result<wgpu::SurfaceTexture> {
        if self.disposed {
            anyhow::bail!("renderer disposed");
        }
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                // reconfigure now; the next frame picks it up
                self.surface.configure(&self.device, &self.config);
                Err(anyhow::anyhow!("surface {:?}, reconfigured", e))
            }
            Err(e) => Err(anyhow::anyhow!("surface error: {:?}", e)),
        }
    }

    /// Clear `target` and draw every layer into it.
    pub(crate) fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &FrameInputs<'_>,
        offscreen: bool,
    ) {
        for layer in &self.layers {
            layer.upload(&self.queue, frame.uniforms, frame.view_proj);
        }
        let pipelines = if offscreen { &self.offscreen } else { &self.direct };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        for layer in &self.layers {
            layer.draw(&mut pass, pipelines);
        }
    }
}

impl Renderer for GpuRenderer {
    fn set_size(&mut self, size: SurfaceSize) {
        let size = self.fit(size);
        if size == self.size() {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, frame: &FrameInputs<'_>) -> anyhow::Result<()> {
        let output = self.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.encode_scene(&mut encoder, &view, frame, false);
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        for layer in &self.layers {
            layer.destroy();
        }
        self.layers.clear();
        self.disposed = true;
        log::info!("[gpu] renderer disposed");
    }
}
