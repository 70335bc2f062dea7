//! Seams to the rendering side: renderer, post-processing and camera are
//! supplied by the front-end and owned by one [`SceneContext`].

use crate::clock::FrameTime;
use crate::constants::{CAMERA_EYE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::uniforms::UniformStore;
use glam::{Mat4, Vec2, Vec3};

/// Display area in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
        .clamped()
    }

    /// Degenerate sizes become 1 CSS pixel and a bad ratio becomes 1.
    pub fn clamped(self) -> Self {
        let side = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        let ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        Self {
            width: side(self.width),
            height: side(self.height),
            pixel_ratio: ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Drawing-buffer size as written into resolution uniforms.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(
            self.width * self.pixel_ratio,
            self.height * self.pixel_ratio,
        )
    }

    pub fn surface_size(&self) -> SurfaceSize {
        let r = self.resolution();
        SurfaceSize {
            width: (r.x.round() as u32).max(1),
            height: (r.y.round() as u32).max(1),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
        }
    }
}

/// Physical pixel size of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Everything a draw call reads.
pub struct FrameInputs<'a> {
    pub uniforms: &'a UniformStore,
    pub view_proj: Mat4,
    pub time: FrameTime,
}

pub trait Renderer {
    fn set_size(&mut self, size: SurfaceSize);
    /// Draw the scene straight to the output.
    fn render(&mut self, frame: &FrameInputs<'_>) -> anyhow::Result<()>;
    fn dispose(&mut self) {}
}

/// Full-screen passes that take over drawing when present.
pub trait PostProcessing<R> {
    fn set_size(&mut self, size: SurfaceSize);
    fn render(&mut self, renderer: &mut R, frame: &FrameInputs<'_>) -> anyhow::Result<()>;
    fn dispose(&mut self) {}
}

pub trait CameraRig {
    fn set_aspect(&mut self, aspect: f32);
    fn update_projection(&mut self);
    fn view_projection(&self) -> Mat4;
}

/// Lens and placement of the scene camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub eye: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fovy_degrees: CAMERA_FOV_DEG,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
            eye: Vec3::from_array(CAMERA_EYE),
        }
    }
}

/// Right-handed perspective camera looking at `target`.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fovy_degrees: f32, aspect: f32, znear: f32, zfar: f32, eye: Vec3) -> Self {
        let mut camera = Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fovy_degrees.to_radians(),
            znear,
            zfar,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn from_params(params: CameraParams, aspect: f32) -> Self {
        Self::new(params.fovy_degrees, aspect, params.znear, params.zfar, params.eye)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_params(CameraParams::default(), 1.0)
    }
}

impl CameraRig for PerspectiveCamera {
    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Projection is cached; call after changing fov, aspect or clip planes.
    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar);
    }

    fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

/// Renderer, camera and optional composer, with caller-owned lifecycle.
pub struct SceneContext<R, C> {
    pub renderer: R,
    pub camera: C,
    composer: Option<Box<dyn PostProcessing<R>>>,
    viewport: Viewport,
    live: bool,
}

impl<R: Renderer, C: CameraRig> SceneContext<R, C> {
    pub fn new(renderer: R, camera: C) -> Self {
        Self {
            renderer,
            camera,
            composer: None,
            viewport: Viewport::default(),
            live: false,
        }
    }

    pub fn with_composer(mut self, composer: Box<dyn PostProcessing<R>>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn has_composer(&self) -> bool {
        self.composer.is_some()
    }

    pub fn init(&mut self, viewport: Viewport) {
        self.resize(viewport);
        self.live = true;
    }

    pub fn dispose(&mut self) {
        if !self.live {
            return;
        }
        if let Some(c) = self.composer.as_mut() {
            c.dispose();
        }
        self.renderer.dispose();
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.clamped();
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.camera.update_projection();
        let size = viewport.surface_size();
        self.renderer.set_size(size);
        if let Some(c) = self.composer.as_mut() {
            c.set_size(size);
        }
    }

    pub fn draw(&mut self, uniforms: &UniformStore, time: FrameTime) -> anyhow::Result<()> {
        let frame = FrameInputs {
            uniforms,
            view_proj: self.camera.view_projection(),
            time,
        };
        match self.composer.as_mut() {
            Some(c) => c.render(&mut self.renderer, &frame),
            None => self.renderer.render(&frame),
        }
    }
}
