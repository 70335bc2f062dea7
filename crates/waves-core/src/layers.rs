//! The two point-cloud wave layers and their uniforms.
//!
//! Every layer owns a namespaced copy of the shader inputs, e.g.
//! `back.u_noise_amp_1`. Purple and white materials of a layer share them.

use crate::constants::*;
use crate::error::UniformError;
use crate::scene::Viewport;
use crate::uniforms::{UniformRole, UniformStore, UniformStoreBuilder};
use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveLayer {
    Back,
    Front,
}

impl WaveLayer {
    pub const ALL: [WaveLayer; 2] = [WaveLayer::Back, WaveLayer::Front];

    pub fn prefix(self) -> &'static str {
        match self {
            WaveLayer::Back => "back",
            WaveLayer::Front => "front",
        }
    }

    pub fn params(self) -> LayerParams {
        match self {
            WaveLayer::Back => LayerParams {
                noise_freq: [0.3, 0.3],
                noise_amp: [0.2, 0.2],
                spd_modifier: [0.4, 0.3],
                point_size: 1.0,
                position: Vec3::new(0.0, 0.0, -1.0),
            },
            WaveLayer::Front => LayerParams {
                noise_freq: [0.5, 0.5],
                noise_amp: [0.2, 0.2],
                spd_modifier: [0.5, 0.3],
                point_size: 1.0,
                position: Vec3::ZERO,
            },
        }
    }

    pub fn geometry(self) -> PlaneGrid {
        match self {
            WaveLayer::Back => PlaneGrid {
                width: 3.0,
                height: 10.0,
                segments_x: 70,
                segments_y: 4000,
            },
            WaveLayer::Front => PlaneGrid {
                width: 2.0,
                height: 6.0,
                segments_x: 150,
                segments_y: 2000,
            },
        }
    }

    pub fn style(self) -> LayerStyle {
        match self {
            WaveLayer::Back => LayerStyle {
                purple_peak: 0.08,
                purple_bias: 0.05,
                white_peak: 0.04,
                white_bias: -0.01,
            },
            WaveLayer::Front => LayerStyle {
                purple_peak: 0.015,
                purple_bias: 0.0,
                white_peak: 0.02,
                white_bias: -0.007,
            },
        }
    }
}

/// Namespaced uniform key, e.g. `key(WaveLayer::Front, U_TIME)`.
pub fn key(layer: WaveLayer, name: &str) -> String {
    format!("{}.{}", layer.prefix(), name)
}

/// Starting values for one layer's shader inputs.
#[derive(Clone, Debug)]
pub struct LayerParams {
    pub noise_freq: [f32; 2],
    pub noise_amp: [f32; 2],
    pub spd_modifier: [f32; 2],
    pub point_size: f32,
    pub position: Vec3,
}

/// Subdivided plane in the XY plane, one point per vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneGrid {
    pub width: f32,
    pub height: f32,
    pub segments_x: u32,
    pub segments_y: u32,
}

impl PlaneGrid {
    pub fn vertex_count(&self) -> u32 {
        (self.segments_x + 1) * (self.segments_y + 1)
    }

    /// Row-major vertex positions, top row first, centred on the origin.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        let mut out = Vec::with_capacity(self.vertex_count() as usize);
        let sx = self.width / self.segments_x.max(1) as f32;
        let sy = self.height / self.segments_y.max(1) as f32;
        for iy in 0..=self.segments_y {
            let y = self.height * 0.5 - iy as f32 * sy;
            for ix in 0..=self.segments_x {
                let x = ix as f32 * sx - self.width * 0.5;
                out.push([x, y, 0.0]);
            }
        }
        out
    }
}

/// Horizontal alpha shaping of the purple and white materials.
///
/// alpha = max(peak * tent(x) + bias, 0) where tent rises to 0.5 at mid-screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    pub purple_peak: f32,
    pub purple_bias: f32,
    pub white_peak: f32,
    pub white_bias: f32,
}

impl LayerStyle {
    pub fn purple_alpha(&self, x: f32) -> f32 {
        shaped_alpha(self.purple_peak, self.purple_bias, x)
    }

    pub fn white_alpha(&self, x: f32) -> f32 {
        shaped_alpha(self.white_peak, self.white_bias, x)
    }
}

fn shaped_alpha(peak: f32, bias: f32, x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let tent = if x < 0.5 { x } else { 1.0 - x };
    (tent * peak + bias).max(0.0)
}

/// Uniform store holding both layers' inputs at their starting values.
pub fn wave_uniforms(viewport: Viewport) -> Result<UniformStore, UniformError> {
    let mut builder = UniformStore::builder();
    for layer in WaveLayer::ALL {
        builder = declare_layer(builder, layer, viewport);
    }
    builder.build()
}

fn declare_layer(b: UniformStoreBuilder, layer: WaveLayer, viewport: Viewport) -> UniformStoreBuilder {
    let p = layer.params();
    let k = |name| key(layer, name);
    b.float(k(U_TIME), 0.0, UniformRole::Time)
        .vec2(k(U_RESOLUTION), viewport.clamped().resolution(), UniformRole::Resolution)
        .vec2(k(U_MOUSE), Vec2::ZERO, UniformRole::Pointer)
        .float(k(U_POINTSIZE), p.point_size, UniformRole::Param)
        .float(k(U_NOISE_FREQ_1), p.noise_freq[0], UniformRole::Param)
        .float(k(U_NOISE_FREQ_2), p.noise_freq[1], UniformRole::Param)
        .float(k(U_NOISE_AMP_1), p.noise_amp[0], UniformRole::Param)
        .float(k(U_NOISE_AMP_2), p.noise_amp[1], UniformRole::Param)
        .float(k(U_SPD_MODIFIER_1), p.spd_modifier[0], UniformRole::Param)
        .float(k(U_SPD_MODIFIER_2), p.spd_modifier[1], UniformRole::Param)
        .float(k(U_OFFSET_Y), 0.0, UniformRole::Param)
}

/// GPU layout of one layer's uniforms (WGSL `WaveUniforms`).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaveUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub point_size: f32,
    pub noise_freq: [f32; 2],
    pub noise_amp: [f32; 2],
    pub spd_modifier: [f32; 2],
    pub pointer: [f32; 2],
    /// purple peak, purple bias, white peak, white bias
    pub shade: [f32; 4],
    /// near, far, unused, unused
    pub fog: [f32; 4],
    /// rgb, unused
    pub fog_color: [f32; 4],
}

impl WaveUniforms {
    /// Snapshot `layer`'s uniforms; missing keys fall back to zero.
    pub fn gather(store: &UniformStore, layer: WaveLayer, view_proj: Mat4) -> Self {
        let f = |name| store.float(&key(layer, name)).unwrap_or(0.0);
        let v = |name| store.vec2(&key(layer, name)).unwrap_or(Vec2::ZERO);
        let style = layer.style();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: layer_model(layer, f(U_OFFSET_Y)).to_cols_array_2d(),
            resolution: v(U_RESOLUTION).to_array(),
            time: f(U_TIME),
            point_size: f(U_POINTSIZE),
            noise_freq: [f(U_NOISE_FREQ_1), f(U_NOISE_FREQ_2)],
            noise_amp: [f(U_NOISE_AMP_1), f(U_NOISE_AMP_2)],
            spd_modifier: [f(U_SPD_MODIFIER_1), f(U_SPD_MODIFIER_2)],
            pointer: v(U_MOUSE).to_array(),
            shade: [
                style.purple_peak,
                style.purple_bias,
                style.white_peak,
                style.white_bias,
            ],
            fog: [FOG_NEAR, FOG_FAR, 0.0, 0.0],
            fog_color: [CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], 1.0],
        }
    }
}

/// Translate by the layer position (lifted by `offset_y`), then rotate X then Z.
pub fn layer_model(layer: WaveLayer, offset_y: f32) -> Mat4 {
    let position = layer.params().position + Vec3::new(0.0, offset_y, 0.0);
    Mat4::from_translation(position)
        * Mat4::from_rotation_x(LAYER_ROTATION_X)
        * Mat4::from_rotation_z(LAYER_ROTATION_Z)
}
