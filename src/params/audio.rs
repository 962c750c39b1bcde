//! Audio synthesis, bridge clamping and analysis configuration.

use std::ops::Range;

use crate::error::ConfigError;

/// Synthesis and output configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Output sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Maximum concurrently sounding voices (oldest is evicted beyond this)
    pub max_voices: usize,

    /// Gain applied to the summed voices before clipping
    pub master_gain: f32,

    /// Voice attack time (seconds)
    pub attack_s: f32,

    /// Mix the glicol ambient bed under the voices
    pub ambient: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            max_voices: 24,
            master_gain: 0.6,
            attack_s: 0.01,
            ambient: true,
        }
    }
}

impl AudioConfig {
    /// Validate configuration (positive sample rate and voice cap)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::new("sample_rate_hz", "must be > 0"));
        }
        if self.max_voices == 0 {
            return Err(ConfigError::new("max_voices", "must be > 0"));
        }
        if !(self.master_gain >= 0.0) {
            return Err(ConfigError::new(
                "master_gain",
                format!("must be >= 0, got {}", self.master_gain),
            ));
        }
        if !(self.attack_s > 0.0) {
            return Err(ConfigError::new(
                "attack_s",
                format!("must be > 0, got {}", self.attack_s),
            ));
        }
        Ok(())
    }
}

/// Audible/stable ranges applied at the audio bridge boundary
///
/// The raw mapping lets frequency go to zero or below for very large ripples;
/// these limits are where that gets pinned before reaching an oscillator.
#[derive(Debug, Clone)]
pub struct BridgeLimits {
    /// Lowest frequency handed to a voice (Hz)
    pub min_frequency_hz: f64,

    /// Highest frequency handed to a voice (Hz)
    pub max_frequency_hz: f64,

    /// Shortest voice (seconds)
    pub min_duration_s: f64,

    /// Longest voice (seconds)
    pub max_duration_s: f64,
}

impl Default for BridgeLimits {
    fn default() -> Self {
        Self {
            min_frequency_hz: 20.0,
            max_frequency_hz: 8000.0,
            min_duration_s: 0.05,
            max_duration_s: 4.0,
        }
    }
}

impl BridgeLimits {
    /// Validate configuration (ordered, positive bounds)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_frequency_hz > 0.0 && self.min_frequency_hz < self.max_frequency_hz) {
            return Err(ConfigError::new(
                "min_frequency_hz",
                format!(
                    "need 0 < min < max, got {}..{}",
                    self.min_frequency_hz, self.max_frequency_hz
                ),
            ));
        }
        if !(self.min_duration_s > 0.0 && self.min_duration_s < self.max_duration_s) {
            return Err(ConfigError::new(
                "min_duration_s",
                format!(
                    "need 0 < min < max, got {}..{}",
                    self.min_duration_s, self.max_duration_s
                ),
            ));
        }
        Ok(())
    }
}

/// FFT analysis configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct FFTConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// High frequency range (Hz)
    pub high_range_hz: (f32, f32),
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            bass_range_hz: (20.0, 200.0),
            mid_range_hz: (200.0, 1000.0),
            high_range_hz: (1000.0, 4000.0),
        }
    }
}

impl FFTConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Frequency at the center of an FFT bin (Hz)
    pub fn bin_to_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Highest meaningful bin (Nyquist)
    pub fn nyquist_bin(&self) -> usize {
        self.fft_size / 2
    }

    /// Bin range for a band, clamped to `..=nyquist_bin()`
    ///
    /// Bands above Nyquist come out empty rather than reading mirrored bins.
    pub fn band_bins(&self, (low_hz, high_hz): (f32, f32)) -> Range<usize> {
        let limit = self.nyquist_bin() + 1;
        let end = self.hz_to_bin(high_hz).min(limit);
        let start = self.hz_to_bin(low_hz).min(end);
        start..end
    }

    /// Get FFT bin range for bass frequencies
    pub fn bass_bins(&self) -> Range<usize> {
        self.band_bins(self.bass_range_hz)
    }

    /// Get FFT bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.band_bins(self.mid_range_hz)
    }

    /// Get FFT bin range for high frequencies
    pub fn high_bins(&self) -> Range<usize> {
        self.band_bins(self.high_range_hz)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2 {
            return Err(ConfigError::new(
                "fft_size",
                format!("must be a power of 2 and >= 2, got {}", self.fft_size),
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::new("sample_rate_hz", "must be > 0"));
        }
        let bands = [
            ("bass_range_hz", self.bass_range_hz),
            ("mid_range_hz", self.mid_range_hz),
            ("high_range_hz", self.high_range_hz),
        ];
        for (field, (low, high)) in bands {
            if !(low >= 0.0 && low < high && high.is_finite()) {
                return Err(ConfigError::new(
                    field,
                    format!("need 0 <= low < high, got {}..{}", low, high),
                ));
            }
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}
