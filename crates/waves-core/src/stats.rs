use crate::clock::FrameTime;
use crate::constants::FPS_REPORT_INTERVAL_SEC;

/// Frame-rate counter, reported at `debug` once per interval.
#[derive(Clone, Debug)]
pub struct FpsMeter {
    interval: f64,
    window_start: Option<f64>,
    frames: u32,
    last_fps: Option<f32>,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(FPS_REPORT_INTERVAL_SEC)
    }
}

impl FpsMeter {
    pub fn new(interval_sec: f64) -> Self {
        Self {
            interval: interval_sec.max(1e-3),
            window_start: None,
            frames: 0,
            last_fps: None,
        }
    }

    /// Count a frame; returns the rate when a window closes.
    pub fn record(&mut self, time: FrameTime) -> Option<f32> {
        let start = *self.window_start.get_or_insert(time.elapsed);
        self.frames += 1;
        let span = time.elapsed - start;
        if span < self.interval {
            return None;
        }
        let fps = (self.frames as f64 / span) as f32;
        log::debug!("[stats] {:.1} fps", fps);
        self.last_fps = Some(fps);
        self.window_start = Some(time.elapsed);
        self.frames = 0;
        Some(fps)
    }

    pub fn last_fps(&self) -> Option<f32> {
        self.last_fps
    }
}
