use instant::Instant;
use std::time::Duration;

/// Timing handed to everything that runs inside one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick (0 on the first tick).
    pub delta: f32,
    /// Seconds since the first tick.
    pub elapsed: f64,
    pub frame: u64,
}

/// Monotonic frame clock. Starts on the first tick, never runs backwards.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    elapsed: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let last = *self.last.get_or_insert(now);
        let delta = if now > last {
            self.last = Some(now);
            now - last
        } else {
            Duration::ZERO
        };
        let since_start = if now > start {
            (now - start).as_secs_f64()
        } else {
            0.0
        };
        self.elapsed = self.elapsed.max(since_start);
        let time = FrameTime {
            delta: delta.as_secs_f32(),
            elapsed: self.elapsed,
            frame: self.frames,
        };
        self.frames += 1;
        time
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
