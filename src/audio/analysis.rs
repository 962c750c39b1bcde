//! FFT band analysis of rendered audio.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::ConfigError;
use crate::params::FFTConfig;

/// Audio frequency band energies (mean bin magnitude per band)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioBands {
    pub low: f32,  // Bass (20-200 Hz)
    pub mid: f32,  // Mids (200-1000 Hz)
    pub high: f32, // Highs (1000-4000 Hz)
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Windowed FFT over fixed-size frames
pub struct SpectrumAnalyzer {
    config: FFTConfig,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(config: FFTConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        Ok(Self {
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            fft,
            config,
        })
    }

    pub fn config(&self) -> &FFTConfig {
        &self.config
    }

    /// Transform one frame (zero-padded if short) in place
    fn transform(&mut self, frame: &[f32]) {
        let size = self.config.fft_size;
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * hann_window(i, size), 0.0);
        }
        self.fft.process(&mut self.buffer);
    }

    fn band_mean(&self, bins: std::ops::Range<usize>) -> f32 {
        if bins.is_empty() {
            return 0.0;
        }
        let len = bins.len() as f32;
        self.buffer[bins].iter().map(|c| c.norm()).sum::<f32>() / len
    }

    /// Band energies of a single frame
    pub fn frame_bands(&mut self, frame: &[f32]) -> AudioBands {
        self.transform(frame);
        AudioBands {
            low: self.band_mean(self.config.bass_bins()),
            mid: self.band_mean(self.config.mid_bins()),
            high: self.band_mean(self.config.high_bins()),
        }
    }

    /// Band energies averaged over 50%-overlapping frames
    pub fn bands(&mut self, samples: &[f32]) -> AudioBands {
        let size = self.config.fft_size;
        let hop = (size / 2).max(1);

        let mut total = AudioBands::default();
        let mut frames = 0usize;
        let mut start = 0;
        while start + size <= samples.len() {
            let bands = self.frame_bands(&samples[start..start + size]);
            total.low += bands.low;
            total.mid += bands.mid;
            total.high += bands.high;
            frames += 1;
            start += hop;
        }

        if frames == 0 {
            return self.frame_bands(samples);
        }
        let n = frames as f32;
        AudioBands {
            low: total.low / n,
            mid: total.mid / n,
            high: total.high / n,
        }
    }

    /// Frequency of the strongest bin in the first frame (Hz), ignoring DC
    pub fn dominant_frequency(&mut self, samples: &[f32]) -> Option<f32> {
        self.transform(samples);
        let half = self.config.fft_size / 2;
        let (bin, magnitude) = self.buffer[1..half]
            .iter()
            .enumerate()
            .map(|(i, c)| (i + 1, c.norm()))
            .fold((0, 0.0f32), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });
        (magnitude > 0.0).then(|| self.config.bin_to_hz(bin))
    }
}
