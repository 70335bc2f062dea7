//! Time-based uniform transitions.
//!
//! At most one transition runs per key. Retargeting a key starts from the value
//! the running transition has reached at that moment. Progress is computed from
//! loop-elapsed seconds, so durations hold regardless of frame rate. The frame
//! loop owns the sweep; callers only schedule.

use crate::error::UniformError;
use crate::uniforms::{UniformStore, UniformValue};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out.
    #[default]
    QuadOut,
    Smoothstep,
    CubicInOut,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Transition {
    key: String,
    from: UniformValue,
    to: UniformValue,
    start: f64,
    duration: f32,
    easing: Easing,
}

impl Transition {
    /// Value at `now` and whether the transition has run its course.
    fn sample(&self, now: f64) -> (UniformValue, bool) {
        let progress = ((now - self.start) / self.duration as f64).max(0.0);
        if progress >= 1.0 {
            return (self.to, true);
        }
        let eased = self.easing.sample(progress as f32);
        (self.from.lerp(self.to, eased).unwrap_or(self.to), false)
    }
}

#[derive(Debug, Default)]
pub struct Tweens {
    active: SmallVec<[Transition; 16]>,
    easing: Easing,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            active: SmallVec::new(),
            easing,
        }
    }

    /// Schedule `key` to move to `target` over `duration` seconds, starting at
    /// loop time `now`. Any running transition on the same key is cancelled and
    /// the new one starts from its value at `now`, even when the target is the
    /// same.
    pub fn transition(
        &mut self,
        store: &mut UniformStore,
        key: &str,
        target: UniformValue,
        duration: f32,
        now: f64,
    ) -> Result<(), UniformError> {
        let stored = store
            .get(key)
            .ok_or_else(|| UniformError::InvalidKey(key.to_owned()))?;
        if stored.kind() != target.kind() {
            return Err(UniformError::TypeMismatch {
                key: key.to_owned(),
                expected: stored.kind(),
                found: target.kind(),
            });
        }
        let from = match self.take(key) {
            Some(prev) => prev.sample(now).0,
            None => stored,
        };
        // NaN durations land here too
        if duration.is_nan() || duration <= 0.0 || from == target {
            return store.set(key, target);
        }
        // keep the store consistent with where the cancelled tween had got to
        store.set(key, from)?;
        self.active.push(Transition {
            key: key.to_owned(),
            from,
            to: target,
            start: now,
            duration,
            easing: self.easing,
        });
        Ok(())
    }

    /// Cancel any transition on `key`, then write `value` directly.
    pub fn set(
        &mut self,
        store: &mut UniformStore,
        key: &str,
        value: UniformValue,
    ) -> Result<(), UniformError> {
        store.set(key, value)?;
        self.take(key);
        Ok(())
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.iter().any(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop every running transition; values stay where they are.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Sweep: write every running transition's value at `now` into the store and
    /// retire the finished ones. Returns how many finished.
    pub fn advance(&mut self, store: &mut UniformStore, now: f64) -> usize {
        let before = self.active.len();
        self.active.retain(|t| {
            let (value, done) = t.sample(now);
            if let Err(e) = store.set(&t.key, value) {
                log::warn!("[tween] dropping `{}`: {}", t.key, e);
                return false;
            }
            !done
        });
        before - self.active.len()
    }

    fn take(&mut self, key: &str) -> Option<Transition> {
        let i = self.active.iter().position(|t| t.key == key)?;
        Some(self.active.swap_remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::UniformRole;

    fn store() -> UniformStore {
        UniformStore::builder()
            .float("amp", 0.0, UniformRole::Param)
            .vec2("pos", glam::Vec2::ZERO, UniformRole::Param)
            .build()
            .unwrap()
    }

    #[test]
    fn curves_start_at_zero_and_end_at_one() {
        for easing in [
            Easing::Linear,
            Easing::QuadOut,
            Easing::Smoothstep,
            Easing::CubicInOut,
        ] {
            assert!(easing.sample(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in [
            Easing::Linear,
            Easing::QuadOut,
            Easing::Smoothstep,
            Easing::CubicInOut,
        ] {
            let mut last = 0.0;
            for step in 0..=100 {
                let v = easing.sample(step as f32 / 100.0);
                assert!(v >= last - f32::EPSILON, "{easing:?} dipped at step {step}");
                last = v;
            }
        }
    }

    #[test]
    fn cubic_in_out_is_symmetric_at_midpoint() {
        assert!((Easing::CubicInOut.sample(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::CubicInOut.sample(0.25) < 0.25);
        assert!(Easing::CubicInOut.sample(0.75) > 0.75);
    }

    #[test]
    fn transition_samples_exact_target_when_done() {
        let t = Transition {
            key: "amp".into(),
            from: UniformValue::Float(0.1),
            to: UniformValue::Float(0.7),
            start: 2.0,
            duration: 0.5,
            easing: Easing::QuadOut,
        };
        assert_eq!(t.sample(2.5), (UniformValue::Float(0.7), true));
        assert_eq!(t.sample(9.0), (UniformValue::Float(0.7), true));
        let (mid, done) = t.sample(2.25);
        assert!(!done);
        let v = mid.as_float().unwrap();
        assert!(v > 0.1 && v < 0.7);
    }

    #[test]
    fn sample_before_start_holds_origin() {
        let t = Transition {
            key: "amp".into(),
            from: UniformValue::Float(0.3),
            to: UniformValue::Float(1.0),
            start: 5.0,
            duration: 1.0,
            easing: Easing::Linear,
        };
        assert_eq!(t.sample(4.0).0, UniformValue::Float(0.3));
    }

    #[test]
    fn advance_retires_finished_transitions() {
        let mut s = store();
        let mut tw = Tweens::new();
        tw.transition(&mut s, "amp", 1.0_f32.into(), 1.0, 0.0).unwrap();
        tw.transition(&mut s, "pos", glam::Vec2::ONE.into(), 2.0, 0.0)
            .unwrap();
        assert_eq!(tw.advance(&mut s, 1.0), 1);
        assert!(!tw.is_active("amp"));
        assert!(tw.is_active("pos"));
        assert_eq!(s.float("amp"), Some(1.0));
        assert_eq!(tw.advance(&mut s, 2.0), 1);
        assert_eq!(s.vec2("pos"), Some(glam::Vec2::ONE));
        assert!(tw.is_empty());
    }

    #[test]
    fn vec2_transitions_move_componentwise() {
        let mut s = store();
        let mut tw = Tweens::with_easing(Easing::Linear);
        tw.transition(&mut s, "pos", glam::Vec2::new(2.0, -4.0).into(), 1.0, 0.0)
            .unwrap();
        tw.advance(&mut s, 0.5);
        let p = s.vec2("pos").unwrap();
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y + 2.0).abs() < 1e-6);
    }

    #[test]
    fn same_target_restarts_with_new_duration() {
        let mut s = store();
        let mut tw = Tweens::with_easing(Easing::Linear);
        tw.transition(&mut s, "amp", 1.0_f32.into(), 1.0, 0.0).unwrap();
        tw.advance(&mut s, 0.5);
        tw.transition(&mut s, "amp", 1.0_f32.into(), 10.0, 0.5).unwrap();
        assert_eq!(tw.advance(&mut s, 1.0), 1);
        // 0.5 + 0.5 * (0.5 / 10)
        let v = s.float("amp").unwrap();
        assert!((v - 0.525).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn set_cancels_running_transition() {
        let mut s = store();
        let mut tw = Tweens::new();
        tw.transition(&mut s, "amp", 1.0_f32.into(), 1.0, 0.0).unwrap();
        tw.set(&mut s, "amp", 0.25_f32.into()).unwrap();
        assert!(!tw.is_active("amp"));
        tw.advance(&mut s, 0.5);
        assert_eq!(s.float("amp"), Some(0.25));
    }
}
