//! Interaction voices: swept three-partial tone through a resonant low-pass.
//!
//! Each voice is built once from an `AudioParameterSet`, renders itself sample
//! by sample and retires when its duration runs out. There is no cancellation;
//! the pool only drops a voice early when it has to make room.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_4, TAU};

use tracing::debug;

use super::bridge::AudioParameterSet;
use crate::error::ConfigError;
use crate::params::AudioConfig;

/// Envelope level reached at the end of a voice (-60 dB)
const DECAY_FLOOR: f64 = 0.001;

/// Filter cutoff at the end of the sweep, as a multiple of the base frequency
const CUTOFF_END_RATIO: f64 = 1.5;

/// Filter coefficients are refreshed every this many samples
const FILTER_UPDATE_INTERVAL: usize = 16;

/// RBJ biquad low-pass (transposed direct form II)
#[derive(Debug, Clone, Default)]
struct LowPass {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl LowPass {
    fn set(&mut self, cutoff_hz: f64, q: f64, sample_rate: f64) {
        // Keep the cutoff below Nyquist
        let cutoff = cutoff_hz.clamp(10.0, sample_rate * 0.45);
        let w0 = TAU * cutoff / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;

        self.b0 = (1.0 - cos_w0) / 2.0 / a0;
        self.b1 = (1.0 - cos_w0) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// One sounding interaction
#[derive(Debug, Clone)]
pub struct Voice {
    params: AudioParameterSet,
    sample_rate: f64,
    total_samples: usize,
    attack_samples: usize,
    elapsed: usize,
    /// Phases of fundamental, 2nd harmonic, sub-harmonic (radians)
    phases: [f64; 3],
    filter: LowPass,
    cutoff_start: f64,
    gain_left: f64,
    gain_right: f64,
}

impl Voice {
    /// Build a voice from sanitised parameters
    pub fn new(params: AudioParameterSet, sample_rate: u32, attack_s: f32) -> Self {
        let sample_rate = sample_rate as f64;
        let total_samples = (params.duration_seconds * sample_rate).ceil().max(1.0) as usize;
        let attack_samples = ((attack_s as f64 * sample_rate) as usize).clamp(1, total_samples);

        // Equal-power pan
        let angle = (params.pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;

        let mut voice = Self {
            params,
            sample_rate,
            total_samples,
            attack_samples,
            elapsed: 0,
            phases: [0.0; 3],
            filter: LowPass::default(),
            cutoff_start: params.base_frequency * (2.0 + 6.0 * params.brightness),
            gain_left: angle.cos(),
            gain_right: angle.sin(),
        };
        voice.update_filter();
        voice
    }

    pub fn params(&self) -> &AudioParameterSet {
        &self.params
    }

    /// Fraction of the voice already rendered, [0, 1]
    pub fn progress(&self) -> f64 {
        self.elapsed as f64 / self.total_samples as f64
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total_samples
    }

    /// Samples left before the voice retires
    pub fn remaining_samples(&self) -> usize {
        self.total_samples - self.elapsed.min(self.total_samples)
    }

    /// Gain envelope: linear attack, then exponential decay to -60 dB
    fn envelope(&self) -> f64 {
        if self.elapsed < self.attack_samples {
            return self.elapsed as f64 / self.attack_samples as f64;
        }
        let decay_len = (self.total_samples - self.attack_samples).max(1) as f64;
        let decay_progress = (self.elapsed - self.attack_samples) as f64 / decay_len;
        DECAY_FLOOR.powf(decay_progress)
    }

    fn update_filter(&mut self) {
        let progress = self.progress();
        let cutoff_end = self.params.base_frequency * CUTOFF_END_RATIO;
        let cutoff = self.cutoff_start + (cutoff_end - self.cutoff_start) * progress;
        self.filter.set(cutoff, self.params.filter_q, self.sample_rate);
    }

    /// Render the next stereo frame, or None once finished
    pub fn next_frame(&mut self) -> Option<(f32, f32)> {
        if self.is_finished() {
            return None;
        }
        if self.elapsed % FILTER_UPDATE_INTERVAL == 0 {
            self.update_filter();
        }

        let frequency = self.params.frequency_at(self.progress());
        let mix = self.params.harmonics;
        let tone = (self.phases[0].sin() * mix.fundamental
            + self.phases[1].sin() * mix.second
            + self.phases[2].sin() * mix.sub)
            / mix.total();

        let step = TAU * frequency / self.sample_rate;
        for (phase, ratio) in self.phases.iter_mut().zip([1.0, 2.0, 0.5]) {
            *phase = (*phase + step * ratio) % TAU;
        }

        let sample = self.filter.process(tone) * self.envelope() * self.params.intensity;
        self.elapsed += 1;

        Some(((sample * self.gain_left) as f32, (sample * self.gain_right) as f32))
    }
}

/// Fixed-capacity set of sounding voices with oldest-first eviction
#[derive(Debug)]
pub struct VoicePool {
    voices: VecDeque<Voice>,
    capacity: usize,
    sample_rate: u32,
    attack_s: f32,
    evictions: u64,
}

impl VoicePool {
    pub fn new(config: &AudioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            voices: VecDeque::with_capacity(config.max_voices),
            capacity: config.max_voices,
            sample_rate: config.sample_rate_hz,
            attack_s: config.attack_s,
            evictions: 0,
        })
    }

    /// Start a voice, cutting off the oldest one when at capacity
    pub fn trigger(&mut self, params: AudioParameterSet) {
        if self.voices.len() >= self.capacity {
            self.voices.pop_front();
            self.evictions += 1;
            debug!(evictions = self.evictions, "voice pool full, dropping oldest voice");
        }
        self.voices.push_back(Voice::new(params, self.sample_rate, self.attack_s));
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Sum the next frame of every voice and drop the finished ones
    pub fn next_frame(&mut self) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for voice in self.voices.iter_mut() {
            if let Some((l, r)) = voice.next_frame() {
                left += l;
                right += r;
            }
        }
        self.voices.retain(|voice| !voice.is_finished());
        (left, right)
    }
}
