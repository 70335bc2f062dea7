//! The render loop.
//!
//! One `tick` per display refresh, always in this order:
//! time uniforms, per-frame hook, queued commands, cooperative tasks,
//! transition sweep, draw. Shaders only read uniforms at draw time, so every
//! writer has finished before the draw call.

use crate::clock::{FrameClock, FrameTime};
use crate::command::{Command, CommandQueue};
use crate::error::UniformError;
use crate::scene::{CameraRig, Renderer, SceneContext, Viewport};
use crate::tween::Tweens;
use crate::uniforms::{UniformRole, UniformStore, UniformValue};
use instant::Instant;

/// Uniform access for code running inside a tick.
pub struct Animator<'a> {
    now: f64,
    store: &'a mut UniformStore,
    tweens: &'a mut Tweens,
}

impl<'a> Animator<'a> {
    pub(crate) fn new(now: f64, store: &'a mut UniformStore, tweens: &'a mut Tweens) -> Self {
        Self { now, store, tweens }
    }

    pub fn uniforms(&self) -> &UniformStore {
        &*self.store
    }

    pub fn transition(
        &mut self,
        key: &str,
        target: UniformValue,
        duration: f32,
    ) -> Result<(), UniformError> {
        self.tweens
            .transition(self.store, key, target, duration, self.now)
    }

    pub fn set(&mut self, key: &str, value: UniformValue) -> Result<(), UniformError> {
        self.tweens.set(self.store, key, value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// Work re-armed by the loop every tick until it reports `Done`.
pub trait FrameTask {
    fn name(&self) -> &str {
        "task"
    }
    fn run(&mut self, time: FrameTime, anim: &mut Animator<'_>) -> anyhow::Result<TaskStatus>;
}

/// User code called once per tick, after the time uniforms are written.
/// An error here is fatal for the loop.
pub trait FrameHook<C> {
    fn update(
        &mut self,
        time: FrameTime,
        camera: &mut C,
        anim: &mut Animator<'_>,
    ) -> anyhow::Result<()>;
}

impl<C, F> FrameHook<C> for F
where
    F: FnMut(FrameTime, &mut C, &mut Animator<'_>) -> anyhow::Result<()>,
{
    fn update(
        &mut self,
        time: FrameTime,
        camera: &mut C,
        anim: &mut Animator<'_>,
    ) -> anyhow::Result<()> {
        self(time, camera, anim)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    Animated,
    /// Render a single frame and stop.
    Static,
}

/// What the host should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    Next,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    Running,
    Halted,
}

pub struct FrameLoop<R, C> {
    scene: SceneContext<R, C>,
    uniforms: UniformStore,
    tweens: Tweens,
    clock: FrameClock,
    mode: LoopMode,
    state: LoopState,
    hook: Option<Box<dyn FrameHook<C>>>,
    tasks: Vec<Box<dyn FrameTask>>,
    commands: CommandQueue,
}

impl<R: Renderer, C: CameraRig> FrameLoop<R, C> {
    pub fn new(scene: SceneContext<R, C>, uniforms: UniformStore) -> Self {
        Self {
            scene,
            uniforms,
            tweens: Tweens::new(),
            clock: FrameClock::new(),
            mode: LoopMode::Animated,
            state: LoopState::Running,
            hook: None,
            tasks: Vec::new(),
            commands: CommandQueue::default(),
        }
    }

    pub fn with_mode(mut self, mode: LoopMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tweens(mut self, tweens: Tweens) -> Self {
        self.tweens = tweens;
        self
    }

    pub fn with_hook(mut self, hook: impl FrameHook<C> + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Handle for UI code; commands are applied at the next tick.
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    pub fn scene(&self) -> &SceneContext<R, C> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneContext<R, C> {
        &mut self.scene
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_transitioning(&self, key: &str) -> bool {
        self.tweens.is_active(key)
    }

    /// Schedule a transition starting at the current loop time.
    pub fn transition(
        &mut self,
        key: &str,
        target: UniformValue,
        duration: f32,
    ) -> Result<(), UniformError> {
        let now = self.clock.elapsed();
        self.tweens
            .transition(&mut self.uniforms, key, target, duration, now)
    }

    pub fn set(&mut self, key: &str, value: UniformValue) -> Result<(), UniformError> {
        self.tweens.set(&mut self.uniforms, key, value)
    }

    pub fn spawn(&mut self, task: Box<dyn FrameTask>) {
        log::info!("[loop] task armed: {}", task.name());
        self.tasks.push(task);
    }

    /// Stop rescheduling. Running transitions are abandoned where they are.
    pub fn stop(&mut self) {
        self.state = LoopState::Halted;
    }

    /// Apply a viewport change before the next tick draws.
    pub fn resize(&mut self, viewport: Viewport) {
        self.scene.resize(viewport);
        let resolution = self.scene.viewport().resolution();
        self.uniforms
            .set_role(UniformRole::Resolution, UniformValue::Vec2(resolution));
        log::debug!(
            "[loop] resize {}x{} @{} -> {:?}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            resolution
        );
    }

    pub fn tick(&mut self, now: Instant) -> anyhow::Result<Schedule> {
        if self.state == LoopState::Halted {
            return Ok(Schedule::Stop);
        }
        let time = self.clock.tick(now);
        self.uniforms
            .set_role(UniformRole::Time, UniformValue::Float(time.elapsed as f32));

        if let Some(hook) = self.hook.as_mut() {
            let mut anim = Animator::new(time.elapsed, &mut self.uniforms, &mut self.tweens);
            if let Err(e) = hook.update(time, &mut self.scene.camera, &mut anim) {
                self.state = LoopState::Halted;
                return Err(e.context("frame hook failed; loop halted"));
            }
        }

        self.apply_commands(time.elapsed);
        self.run_tasks(time);
        self.tweens.advance(&mut self.uniforms, time.elapsed);

        if let Err(e) = self.scene.draw(&self.uniforms, time) {
            log::error!("render error: {:?}", e);
        }

        match self.mode {
            LoopMode::Animated => Ok(Schedule::Next),
            LoopMode::Static => {
                self.state = LoopState::Halted;
                Ok(Schedule::Stop)
            }
        }
    }

    fn apply_commands(&mut self, now: f64) {
        for command in self.commands.drain() {
            let result = match command {
                Command::Transition {
                    key,
                    value,
                    duration,
                } => self
                    .tweens
                    .transition(&mut self.uniforms, &key, value, duration, now),
                Command::Set { key, value } => self.tweens.set(&mut self.uniforms, &key, value),
                Command::Spawn(task) => {
                    self.spawn(task);
                    Ok(())
                }
            };
            if let Err(e) = result {
                log::warn!("[loop] command ignored: {}", e);
            }
        }
    }

    fn run_tasks(&mut self, time: FrameTime) {
        let mut anim = Animator::new(time.elapsed, &mut self.uniforms, &mut self.tweens);
        self.tasks.retain_mut(|task| match task.run(time, &mut anim) {
            Ok(TaskStatus::Continue) => true,
            Ok(TaskStatus::Done) => {
                log::info!("[loop] task finished: {}", task.name());
                false
            }
            Err(e) => {
                log::warn!("[loop] task {} retired: {:?}", task.name(), e);
                false
            }
        });
    }
}
