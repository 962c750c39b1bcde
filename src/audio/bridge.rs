//! Mapping from wave metrics and ripple state to synthesis parameters.
//!
//! `map_interaction_to_audio_params` is the raw, total mapping. `AudioBridge`
//! wraps it with a sampler snapshot and is the one place parameters are
//! validated and clamped before a voice is built from them.

use tracing::warn;

use crate::error::{AudioError, ConfigError};
use crate::ocean::{RippleEntity, WaveMetricsSampler, WaveSample};
use crate::params::BridgeLimits;

/// Fraction of the base frequency lost over a voice's lifetime
pub const SWEEP_DEPTH: f64 = 0.6;

/// Ripples above this terminal radius get the richer harmonic blend
pub const LARGE_RIPPLE_RADIUS: f64 = 100.0;

/// Lowest filter Q handed to a voice
const MIN_FILTER_Q: f64 = 0.1;

/// Ripple properties that shape its sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleMeta {
    pub max_radius: f64,
    pub energy: f64,
    pub slope: f64,
    pub curvature: f64,
    pub vert_vel: f64,
}

impl RippleMeta {
    /// Combine a ripple's terminal radius with the surface metrics at its center
    pub fn new(ripple: &RippleEntity, sample: &WaveSample) -> Self {
        Self {
            max_radius: ripple.max_radius(),
            energy: sample.energy,
            slope: sample.slope,
            curvature: sample.curvature,
            vert_vel: sample.vertical_velocity,
        }
    }
}

/// Relative weights of the three sine partials
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicMix {
    /// Swept fundamental
    pub fundamental: f64,
    /// 2x partial
    pub second: f64,
    /// 0.5x partial
    pub sub: f64,
}

impl HarmonicMix {
    /// Fundamental-dominant blend for small ripples and plain interactions
    pub const SMALL: Self = Self {
        fundamental: 1.0,
        second: 0.3,
        sub: 0.1,
    };

    /// Richer blend for large ripples
    pub const LARGE: Self = Self {
        fundamental: 1.0,
        second: 0.4,
        sub: 0.3,
    };

    pub fn for_max_radius(max_radius: f64) -> Self {
        if max_radius > LARGE_RIPPLE_RADIUS {
            Self::LARGE
        } else {
            Self::SMALL
        }
    }

    /// Sum of weights, for normalising the partial mix
    pub fn total(&self) -> f64 {
        self.fundamental + self.second + self.sub
    }
}

/// Synthesis parameters for one interaction sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioParameterSet {
    /// Starting oscillator frequency (Hz)
    pub base_frequency: f64,
    /// Low-pass resonance
    pub filter_q: f64,
    /// Voice length (seconds)
    pub duration_seconds: f64,
    /// Output amplitude multiplier
    pub intensity: f64,
    /// Stereo position, -1 (left) to 1 (right)
    pub pan: f64,
    /// Surface energy driving the filter opening, [0, 1]
    pub brightness: f64,
    pub harmonics: HarmonicMix,
}

impl AudioParameterSet {
    /// Swept fundamental at `progress` through the voice, in [0, 1]
    ///
    /// Falls linearly from `base` to `base * (1 - SWEEP_DEPTH)`.
    pub fn frequency_at(&self, progress: f64) -> f64 {
        self.base_frequency * (1.0 - progress.clamp(0.0, 1.0) * SWEEP_DEPTH)
    }
}

/// Raw interaction mapping; total over its numeric inputs, no clamping
pub fn map_interaction_to_audio_params(
    intensity: f64,
    pan: f64,
    sample: &WaveSample,
    ripple: Option<&RippleMeta>,
) -> AudioParameterSet {
    match ripple {
        Some(meta) => {
            let size_scale = (meta.max_radius / 100.0).min(2.0);
            AudioParameterSet {
                // Larger ripples sound lower
                base_frequency: 200.0 - meta.max_radius * 0.5,
                filter_q: 0.3 + intensity * 0.7,
                duration_seconds: 0.4 + size_scale * 0.6,
                intensity,
                pan,
                brightness: meta.energy,
                harmonics: HarmonicMix::for_max_radius(meta.max_radius),
            }
        }
        None => AudioParameterSet {
            base_frequency: 120.0 + intensity * 80.0,
            filter_q: 0.5,
            duration_seconds: 0.3,
            intensity,
            pan,
            brightness: sample.energy,
            harmonics: HarmonicMix::SMALL,
        },
    }
}

/// Interaction-to-sound bridge over a sampler snapshot
#[derive(Debug, Clone)]
pub struct AudioBridge {
    sampler: WaveMetricsSampler,
    limits: BridgeLimits,
}

impl AudioBridge {
    pub fn new(sampler: WaveMetricsSampler, limits: BridgeLimits) -> Result<Self, ConfigError> {
        limits.validate()?;
        Ok(Self { sampler, limits })
    }

    pub fn limits(&self) -> &BridgeLimits {
        &self.limits
    }

    /// Sample the surface at (x, z, t) and map an interaction there to a voice
    ///
    /// When a ripple is given its terminal radius shapes the sound. Rejects
    /// the event if any parameter comes out NaN or infinite; otherwise clamps
    /// to the bridge limits.
    pub fn params_for(
        &self,
        x: f64,
        z: f64,
        t: f64,
        intensity: f64,
        pan: f64,
        ripple: Option<&RippleEntity>,
    ) -> Result<AudioParameterSet, AudioError> {
        let sample = self.sampler.sample(x, z, t);
        let meta = ripple.map(|ripple| RippleMeta::new(ripple, &sample));
        let raw = map_interaction_to_audio_params(intensity, pan, &sample, meta.as_ref());
        self.sanitize(raw)
    }

    /// Validate and clamp raw parameters to audible, stable ranges
    pub fn sanitize(&self, raw: AudioParameterSet) -> Result<AudioParameterSet, AudioError> {
        let fields = [
            ("base_frequency", raw.base_frequency),
            ("filter_q", raw.filter_q),
            ("duration_seconds", raw.duration_seconds),
            ("intensity", raw.intensity),
            ("pan", raw.pan),
            ("brightness", raw.brightness),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            warn!(field, value, "rejecting interaction with non-finite audio parameter");
            return Err(AudioError::NonFiniteParameter { field });
        }

        let limits = &self.limits;
        Ok(AudioParameterSet {
            base_frequency: raw
                .base_frequency
                .clamp(limits.min_frequency_hz, limits.max_frequency_hz),
            filter_q: raw.filter_q.max(MIN_FILTER_Q),
            duration_seconds: raw
                .duration_seconds
                .clamp(limits.min_duration_s, limits.max_duration_s),
            intensity: raw.intensity.clamp(0.0, 1.0),
            pan: raw.pan.clamp(-1.0, 1.0),
            brightness: raw.brightness.clamp(0.0, 1.0),
            harmonics: raw.harmonics,
        })
    }
}
