//! Final mix: interaction voices over the ambient bed.

use super::bridge::AudioParameterSet;
use super::synthesis::AmbientBed;
use super::voice::VoicePool;
use crate::error::AudioError;
use crate::params::AudioConfig;

/// Hard clip applied to every output sample (hearing safety)
pub const OUTPUT_LIMIT: f32 = 0.5;

/// Voice pool plus optional ambient bed, rendered into interleaved buffers
#[derive(Debug)]
pub struct Mixer {
    voices: VoicePool,
    ambient: Option<AmbientBed>,
    master_gain: f32,
}

impl Mixer {
    /// Create a mixer, starting the glicol bed if the config asks for it
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        let ambient = if config.ambient {
            Some(AmbientBed::glicol(config.sample_rate_hz)?)
        } else {
            None
        };
        Self::with_ambient(config, ambient)
    }

    /// Create a mixer with an explicit (or no) ambient bed
    pub fn with_ambient(
        config: &AudioConfig,
        ambient: Option<AmbientBed>,
    ) -> Result<Self, AudioError> {
        Ok(Self {
            voices: VoicePool::new(config)?,
            ambient,
            master_gain: config.master_gain,
        })
    }

    /// Start a voice for one interaction
    pub fn trigger(&mut self, params: AudioParameterSet) {
        self.voices.trigger(params);
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn sample_rate(&self) -> u32 {
        self.voices.sample_rate()
    }

    /// Fill an interleaved buffer with `channels` channels per frame
    ///
    /// Mono gets the average of left and right; channels past the second are
    /// silent.
    pub fn fill(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in data.chunks_mut(channels) {
            let (mut left, mut right) = self.voices.next_frame();
            left *= self.master_gain;
            right *= self.master_gain;

            if let Some(ambient) = self.ambient.as_mut() {
                let (bed_left, bed_right) = ambient.next_frame();
                left += bed_left;
                right += bed_right;
            }

            // Safety limiter: hard clip to prevent ear damage
            let left = left.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
            let right = right.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);

            match frame {
                [mono] => *mono = (left + right) * 0.5,
                [l, r, rest @ ..] => {
                    *l = left;
                    *r = right;
                    rest.fill(0.0);
                }
                [] => {}
            }
        }
    }
}
