use glam::Vec2;
use waves_core::*;

fn store() -> UniformStore {
    UniformStore::builder()
        .float("amp", 0.0, UniformRole::Param)
        .float("freq", 0.3, UniformRole::Param)
        .vec2("mouse", Vec2::ZERO, UniformRole::Pointer)
        .build()
        .unwrap()
}

#[test]
fn amp_reaches_half_after_one_second() {
    let mut s = store();
    let mut tw = Tweens::new();
    tw.transition(&mut s, "amp", UniformValue::Float(0.5), 1.0, 0.0)
        .unwrap();

    tw.advance(&mut s, 0.5);
    let mid = s.float("amp").unwrap();
    assert!(mid > 0.0 && mid < 0.5, "mid-flight value {mid}");

    tw.advance(&mut s, 1.0);
    assert_eq!(s.float("amp"), Some(0.5));
    assert!(!tw.is_active("amp"));
}

#[test]
fn every_easing_lands_exactly_on_target() {
    for easing in [
        Easing::Linear,
        Easing::QuadOut,
        Easing::Smoothstep,
        Easing::CubicInOut,
    ] {
        let mut s = store();
        let mut tw = Tweens::with_easing(easing);
        tw.transition(&mut s, "freq", UniformValue::Float(1.6), 3.0, 10.0)
            .unwrap();
        let mut last = 0.3;
        for i in 1..=31 {
            tw.advance(&mut s, 10.0 + i as f64 * 0.1);
            let v = s.float("freq").unwrap();
            assert!(v >= last - 1e-6, "{easing:?} went backwards at step {i}");
            last = v;
        }
        assert_eq!(s.float("freq"), Some(1.6), "{easing:?}");
    }
}

#[test]
fn retarget_continues_from_current_value() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    tw.advance(&mut s, 0.4);
    let reached = s.float("amp").unwrap();
    assert!((reached - 0.4).abs() < 1e-6);

    tw.transition(&mut s, "amp", UniformValue::Float(2.0), 1.0, 0.4)
        .unwrap();
    assert!((s.float("amp").unwrap() - reached).abs() < 1e-6, "no jump on retarget");
    tw.advance(&mut s, 0.5);
    assert!(s.float("amp").unwrap() >= reached);
    assert_eq!(tw.len(), 1, "one transition per key");
}

#[test]
fn retarget_between_sweeps_uses_time_not_stored_value() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    // no sweep ran, but half the duration has passed
    tw.transition(&mut s, "amp", UniformValue::Float(0.0), 1.0, 0.5)
        .unwrap();
    assert!((s.float("amp").unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn zero_or_negative_duration_applies_immediately() {
    for duration in [0.0, -1.0, f32::NAN] {
        let mut s = store();
        let mut tw = Tweens::new();
        tw.transition(&mut s, "amp", UniformValue::Float(0.8), duration, 2.0)
            .unwrap();
        assert_eq!(s.float("amp"), Some(0.8), "duration {duration}");
        assert!(tw.is_empty());
    }
}

#[test]
fn unknown_key_is_rejected_without_side_effects() {
    let mut s = store();
    let mut tw = Tweens::new();
    let err = tw
        .transition(&mut s, "ampp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap_err();
    assert_eq!(err, UniformError::InvalidKey("ampp".into()));
    assert!(tw.is_empty());
}

#[test]
fn kind_mismatch_is_rejected() {
    let mut s = store();
    let mut tw = Tweens::new();
    let err = tw
        .transition(&mut s, "mouse", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, UniformError::TypeMismatch { .. }));
}

#[test]
fn independent_keys_run_concurrently() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    tw.transition(&mut s, "mouse", UniformValue::Vec2(Vec2::new(4.0, 2.0)), 2.0, 0.0)
        .unwrap();
    tw.advance(&mut s, 1.0);
    assert_eq!(s.float("amp"), Some(1.0));
    assert_eq!(s.vec2("mouse"), Some(Vec2::new(2.0, 1.0)));
    assert_eq!(tw.len(), 1);
}

#[test]
fn clear_freezes_values_in_place() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    tw.advance(&mut s, 0.25);
    tw.clear();
    tw.advance(&mut s, 1.0);
    assert!((s.float("amp").unwrap() - 0.25).abs() < 1e-6);
}

#[test]
fn target_equal_to_current_value_cancels_running_transition() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    tw.advance(&mut s, 0.5);
    assert!((s.float("amp").unwrap() - 0.5).abs() < 1e-6);

    tw.transition(&mut s, "amp", UniformValue::Float(0.5), 1.0, 0.5)
        .unwrap();
    assert!(!tw.is_active("amp"));
    tw.advance(&mut s, 2.0);
    assert_eq!(s.float("amp"), Some(0.5));
}

#[test]
fn repeating_a_target_honours_the_new_duration() {
    let mut s = store();
    let mut tw = Tweens::with_easing(Easing::Linear);
    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 1.0, 0.0)
        .unwrap();
    tw.advance(&mut s, 0.5);

    tw.transition(&mut s, "amp", UniformValue::Float(1.0), 10.0, 0.5)
        .unwrap();
    tw.advance(&mut s, 1.0);
    let v = s.float("amp").unwrap();
    assert!((v - 0.525).abs() < 1e-6, "restarted from 0.5 over 10 s, got {v}");
    assert!(tw.is_active("amp"));

    tw.advance(&mut s, 10.5);
    assert_eq!(s.float("amp"), Some(1.0));
}
