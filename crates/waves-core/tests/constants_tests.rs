// Sanity checks on the tuning constants and their relationships.

use waves_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_constants_are_consistent() {
    // bins are taken from the analyser's half-size spectrum
    assert!(AUDIO_BIN_COUNT as u32 <= ANALYSER_FFT_SIZE / 2);
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!(AUDIO_NORMALIZER > 0.0);
    assert!(AUDIO_MIN_AMPLITUDE <= AUDIO_NOISE_FLOOR);
    assert!(AUDIO_NOISE_FLOOR < AUDIO_MAX_AMPLITUDE);
    assert!(AUDIO_QUANTUM > 0.0);
    assert!(AUDIO_TWEEN_SEC > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_clip_planes_are_ordered() {
    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_FAR > CAMERA_NEAR);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn speed_buttons_move_in_opposite_directions() {
    assert!(SPEED_UP_SPD > SPEED_DOWN_SPD_1);
    assert!(SPEED_UP_SPD > SPEED_DOWN_SPD_2);
    assert!(SPEED_UP_FREQ > SPEED_DOWN_FREQ);
    assert!(CONTROL_TWEEN_SEC > 0.0);
}

#[test]
fn mapped_targets_stay_positive_over_amplitude_range() {
    for amp in [AUDIO_MIN_AMPLITUDE, AUDIO_NOISE_FLOOR, AUDIO_MAX_AMPLITUDE] {
        for (scale, offset) in [
            (BACK_AMP_SCALE, BACK_AMP_OFFSET),
            (FRONT_AMP_SCALE, FRONT_AMP_OFFSET),
            (BACK_FREQ_SCALE, BACK_FREQ_OFFSET),
            (FRONT_FREQ_SCALE, FRONT_FREQ_OFFSET),
        ] {
            assert!(amp * scale + offset > 0.0);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn bloom_defaults_are_sane() {
    assert!(BLOOM_THRESHOLD >= 0.0 && BLOOM_THRESHOLD < 1.0);
    assert!(BLOOM_STRENGTH > 0.0);
    assert!(BLOOM_RADIUS >= 0.0 && BLOOM_RADIUS <= 1.0);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
}
