//! Audio amplitude sampling.
//!
//! Armed once by the user, then re-armed by the frame loop every tick until the
//! audio source ends. Each tick reduces a handful of frequency bins to one
//! bounded amplitude and retargets the mapped uniforms.

use crate::clock::FrameTime;
use crate::constants::*;
use crate::error::SamplerConfigError;
use crate::frame::{Animator, FrameTask, TaskStatus};
use crate::layers::{key, WaveLayer};
use crate::uniforms::UniformValue;
use smallvec::SmallVec;

/// Byte frequency data from a spectral analyser.
pub trait FrequencySource {
    /// Fill `bins` with the lowest `bins.len()` frequency bins.
    fn frequency_data(&mut self, bins: &mut [u8]);
    /// The underlying track has finished playing.
    fn ended(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerConfig {
    pub bin_count: usize,
    pub normalizer: f32,
    pub min_amplitude: f32,
    pub max_amplitude: f32,
    /// Clamped samples below this snap to zero.
    pub noise_floor: f32,
    /// Samples are rounded to a multiple of this before clamping.
    pub quantum: Option<f32>,
    pub tween_sec: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            bin_count: AUDIO_BIN_COUNT,
            normalizer: AUDIO_NORMALIZER,
            min_amplitude: AUDIO_MIN_AMPLITUDE,
            max_amplitude: AUDIO_MAX_AMPLITUDE,
            noise_floor: AUDIO_NOISE_FLOOR,
            quantum: Some(AUDIO_QUANTUM),
            tween_sec: AUDIO_TWEEN_SEC,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<(), SamplerConfigError> {
        if self.bin_count == 0 {
            return Err(SamplerConfigError::NoBins);
        }
        if !self.normalizer.is_finite() || self.normalizer <= 0.0 {
            return Err(SamplerConfigError::BadNormalizer(self.normalizer));
        }
        if !self.min_amplitude.is_finite()
            || !self.max_amplitude.is_finite()
            || self.min_amplitude > self.max_amplitude
        {
            return Err(SamplerConfigError::BadRange {
                min: self.min_amplitude,
                max: self.max_amplitude,
            });
        }
        if let Some(q) = self.quantum {
            if !q.is_finite() || q <= 0.0 {
                return Err(SamplerConfigError::BadQuantum(q));
            }
        }
        Ok(())
    }

    /// Reduce raw bins to a sample inside `[min_amplitude, max_amplitude]`.
    pub fn amplitude(&self, bins: &[u8]) -> f32 {
        let sum: u32 = bins.iter().map(|&b| b as u32).sum();
        let mut amp = sum as f32 / self.normalizer;
        if let Some(q) = self.quantum {
            amp = (amp / q).round() * q;
        }
        amp = amp.clamp(self.min_amplitude, self.max_amplitude);
        if amp < self.noise_floor {
            amp = 0.0;
        }
        // a snapped zero still has to respect a positive minimum
        amp.clamp(self.min_amplitude, self.max_amplitude)
    }
}

/// `target = amplitude * scale + offset` for one uniform.
#[derive(Clone, Debug, PartialEq)]
pub struct AmplitudeMapping {
    pub key: String,
    pub scale: f32,
    pub offset: f32,
}

impl AmplitudeMapping {
    pub fn new(key: impl Into<String>, scale: f32, offset: f32) -> Self {
        Self {
            key: key.into(),
            scale,
            offset,
        }
    }

    pub fn apply(&self, amplitude: f32) -> f32 {
        amplitude * self.scale + self.offset
    }
}

pub type Mappings = SmallVec<[AmplitudeMapping; 12]>;

/// The wave scene's amplitude routing.
pub fn wave_mappings() -> Mappings {
    let mut m = Mappings::new();
    let back = WaveLayer::Back;
    let front = WaveLayer::Front;
    for name in [U_NOISE_AMP_1, U_NOISE_AMP_2] {
        m.push(AmplitudeMapping::new(key(back, name), BACK_AMP_SCALE, BACK_AMP_OFFSET));
        m.push(AmplitudeMapping::new(key(front, name), FRONT_AMP_SCALE, FRONT_AMP_OFFSET));
    }
    for name in [U_NOISE_FREQ_1, U_NOISE_FREQ_2] {
        m.push(AmplitudeMapping::new(key(back, name), BACK_FREQ_SCALE, BACK_FREQ_OFFSET));
        m.push(AmplitudeMapping::new(key(front, name), FRONT_FREQ_SCALE, FRONT_FREQ_OFFSET));
    }
    m.push(AmplitudeMapping::new(key(back, U_OFFSET_Y), BACK_LIFT_SCALE, BACK_LIFT_OFFSET));
    m.push(AmplitudeMapping::new(key(front, U_OFFSET_Y), FRONT_LIFT_SCALE, FRONT_LIFT_OFFSET));
    m
}

pub struct AmplitudeSampler<S> {
    source: S,
    config: SamplerConfig,
    mappings: Mappings,
    bins: Vec<u8>,
    last: Option<f32>,
}

impl<S: FrequencySource> AmplitudeSampler<S> {
    pub fn new(
        source: S,
        config: SamplerConfig,
        mappings: Mappings,
    ) -> Result<Self, SamplerConfigError> {
        config.validate()?;
        Ok(Self {
            bins: vec![0; config.bin_count],
            source,
            config,
            mappings,
            last: None,
        })
    }

    /// Turn the outcome of opening an audio source into a sampler. A source
    /// that failed to open arms nothing; uniforms keep their values.
    pub fn arm<E: std::fmt::Display>(
        source: Result<S, E>,
        config: SamplerConfig,
        mappings: Mappings,
    ) -> Option<Self> {
        let source = match source {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[audio] source unavailable, sampling disabled: {}", e);
                return None;
            }
        };
        match Self::new(source, config, mappings) {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("[audio] bad sampler config, sampling disabled: {}", e);
                None
            }
        }
    }

    /// Most recent amplitude, if any sample has been taken.
    pub fn last_amplitude(&self) -> Option<f32> {
        self.last
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: FrequencySource> FrameTask for AmplitudeSampler<S> {
    fn name(&self) -> &str {
        "amplitude-sampler"
    }

    fn run(&mut self, _time: FrameTime, anim: &mut Animator<'_>) -> anyhow::Result<TaskStatus> {
        if self.source.ended() {
            return Ok(TaskStatus::Done);
        }
        self.source.frequency_data(&mut self.bins);
        let amp = self.config.amplitude(&self.bins);
        if self.last != Some(amp) {
            log::debug!("[audio] amplitude {:.1}", amp);
        }
        self.last = Some(amp);
        for m in &self.mappings {
            anim.transition(&m.key, UniformValue::Float(m.apply(amp)), self.config.tween_sec)?;
        }
        Ok(TaskStatus::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SamplerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_broken_configs() {
        let base = SamplerConfig::default();
        let no_bins = SamplerConfig {
            bin_count: 0,
            ..base.clone()
        };
        assert_eq!(no_bins.validate(), Err(SamplerConfigError::NoBins));
        let zero_norm = SamplerConfig {
            normalizer: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            zero_norm.validate(),
            Err(SamplerConfigError::BadNormalizer(_))
        ));
        let inverted = SamplerConfig {
            min_amplitude: 2.0,
            max_amplitude: 1.0,
            ..base.clone()
        };
        assert!(matches!(
            inverted.validate(),
            Err(SamplerConfigError::BadRange { .. })
        ));
        let bad_q = SamplerConfig {
            quantum: Some(-0.1),
            ..base
        };
        assert!(matches!(bad_q.validate(), Err(SamplerConfigError::BadQuantum(_))));
    }

    #[test]
    fn amplitude_rounds_to_one_decimal() {
        let cfg = SamplerConfig::default();
        // 12 bins * 100 = 1200 / 1000 = 1.2
        let v = cfg.amplitude(&[100; 12]);
        assert!((v - 1.2).abs() < 1e-5);
        // 1249 / 1000 rounds down to 1.2
        let mut bins = [100u8; 12];
        bins[0] = 149;
        assert!((cfg.amplitude(&bins) - 1.2).abs() < 1e-5);
    }

    #[test]
    fn quiet_input_snaps_to_zero() {
        let cfg = SamplerConfig::default();
        // 240 / 1000 = 0.24 -> 0.2 < noise floor
        assert_eq!(cfg.amplitude(&[20; 12]), 0.0);
    }

    #[test]
    fn loud_input_is_capped() {
        let cfg = SamplerConfig::default();
        assert_eq!(cfg.amplitude(&[255; 12]), AUDIO_MAX_AMPLITUDE);
    }

    #[test]
    fn snapped_zero_respects_positive_minimum() {
        let cfg = SamplerConfig {
            min_amplitude: 0.1,
            ..SamplerConfig::default()
        };
        assert!((cfg.amplitude(&[0; 12]) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn wave_mappings_cover_both_layers() {
        let m = wave_mappings();
        assert_eq!(m.len(), 10);
        assert!(m.iter().any(|x| x.key == "back.u_offset_y"));
        assert!(m.iter().any(|x| x.key == "front.u_noise_freq_2"));
    }

    #[test]
    fn mapping_reproduces_tuned_values() {
        let amp = 2.5;
        let m = wave_mappings();
        let get = |k: &str| m.iter().find(|x| x.key == k).unwrap().apply(amp);
        // amplitude / 10 + 0.4
        assert!((get("back.u_noise_amp_1") - 0.65).abs() < 1e-6);
        // amplitude / 2.5 + 0.3
        assert!((get("back.u_noise_freq_1") - 1.3).abs() < 1e-6);
        // amplitude / 50 + 0.5
        assert!((get("front.u_noise_freq_1") - 0.55).abs() < 1e-6);
        // (amplitude / 10 + 0.4) * 1.15 - 0.15
        assert!((get("back.u_offset_y") - 0.5975).abs() < 1e-5);
    }
}
