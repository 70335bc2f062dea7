// Host-side stand-ins for the GPU, camera and audio seams.
#![allow(dead_code)]

use glam::{Mat4, Vec2};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use waves_core::*;

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Records sizes and every draw, with the uniform values seen at draw time.
#[derive(Default)]
pub struct MockRenderer {
    pub log: EventLog,
    pub size: Option<SurfaceSize>,
    pub draws: Vec<UniformStore>,
    pub fail_draws: bool,
    pub disposed: bool,
}

impl MockRenderer {
    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }
}

impl Renderer for MockRenderer {
    fn set_size(&mut self, size: SurfaceSize) {
        self.size = Some(size);
    }

    fn render(&mut self, frame: &FrameInputs<'_>) -> anyhow::Result<()> {
        self.log.borrow_mut().push("draw".into());
        if self.fail_draws {
            anyhow::bail!("device lost");
        }
        self.draws.push(frame.uniforms.clone());
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

pub struct MockComposer {
    pub log: EventLog,
}

impl PostProcessing<MockRenderer> for MockComposer {
    fn set_size(&mut self, size: SurfaceSize) {
        self.log
            .borrow_mut()
            .push(format!("composer-size {}x{}", size.width, size.height));
    }

    fn render(&mut self, renderer: &mut MockRenderer, frame: &FrameInputs<'_>) -> anyhow::Result<()> {
        self.log.borrow_mut().push("composer".into());
        renderer.render(frame)
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push("composer-dispose".into());
    }
}

#[derive(Default)]
pub struct MockCamera {
    pub aspect: f32,
    pub projection_updates: u32,
}

impl CameraRig for MockCamera {
    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    fn update_projection(&mut self) {
        self.projection_updates += 1;
    }

    fn view_projection(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// Shared knobs so a test can change the signal after the sampler is spawned.
#[derive(Default)]
pub struct SourceState {
    pub level: u8,
    pub ended: bool,
    pub reads: u32,
}

#[derive(Clone, Default)]
pub struct MockSource {
    pub state: Rc<RefCell<SourceState>>,
}

impl MockSource {
    pub fn set_level(&self, level: u8) {
        self.state.borrow_mut().level = level;
    }

    pub fn end(&self) {
        self.state.borrow_mut().ended = true;
    }

    pub fn reads(&self) -> u32 {
        self.state.borrow().reads
    }
}

impl FrequencySource for MockSource {
    fn frequency_data(&mut self, bins: &mut [u8]) {
        let mut s = self.state.borrow_mut();
        s.reads += 1;
        bins.fill(s.level);
    }

    fn ended(&self) -> bool {
        self.state.borrow().ended
    }
}

pub fn simple_store() -> UniformStore {
    UniformStore::builder()
        .float("u_time", 0.0, UniformRole::Time)
        .vec2("u_resolution", Vec2::ONE, UniformRole::Resolution)
        .float("amp", 0.0, UniformRole::Param)
        .build()
        .expect("store")
}

pub fn mock_loop(log: EventLog, uniforms: UniformStore) -> FrameLoop<MockRenderer, MockCamera> {
    let mut scene = SceneContext::new(MockRenderer::with_log(log), MockCamera::default());
    scene.init(Viewport::new(800.0, 600.0, 1.0));
    FrameLoop::new(scene, uniforms)
}

/// Instants at a fixed offset from one origin, in milliseconds.
pub struct Timeline {
    origin: Instant,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn at_ms(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}
