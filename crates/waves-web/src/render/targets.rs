use super::helpers;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen color targets for the bloom chain.
///
/// - `hdr_*` hold the scene at full resolution in Rgba16Float.
/// - `bloom_*` are half-res ping-pong buffers for the bright pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b_view: wgpu::TextureView,
    // views keep their textures alive; held for explicit destroy on dispose
    textures: [wgpu::Texture; 3],
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT);
        let (bw, bh) = Self::bloom_size(width, height);
        let (bloom_a, bloom_a_view) = helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT);
        let (bloom_b, bloom_b_view) = helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT);
        Self {
            width,
            height,
            hdr_view,
            bloom_a_view,
            bloom_b_view,
            textures: [hdr_tex, bloom_a, bloom_b],
        }
    }

    pub(crate) fn bloom_size(width: u32, height: u32) -> (u32, u32) {
        ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
    }

    pub(crate) fn destroy(&self) {
        for t in &self.textures {
            t.destroy();
        }
    }
}
