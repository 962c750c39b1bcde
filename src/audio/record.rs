//! Offline recording of the mix to a WAV file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AudioError;

/// Stereo 32-bit float WAV writer
pub struct WavRecorder {
    writer: WavWriter<BufWriter<File>>,
    frames_written: u64,
}

impl WavRecorder {
    /// Create the output file, making parent directories as needed
    pub fn create(path: &Path, sample_rate_hz: u32) -> Result<Self, AudioError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let spec = WavSpec {
            channels: 2,
            sample_rate: sample_rate_hz,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        Ok(Self {
            writer: WavWriter::create(path, spec)?,
            frames_written: 0,
        })
    }

    /// Append interleaved stereo samples
    pub fn write_interleaved(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        for &sample in samples {
            self.writer.write_sample(sample)?;
        }
        self.frames_written += samples.len() as u64 / 2;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush and patch the WAV header
    pub fn finalize(self) -> Result<u64, AudioError> {
        self.writer.finalize()?;
        Ok(self.frames_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_writes_readable_wav() {
        let dir = std::env::temp_dir().join(format!("bloodtide-record-{}", std::process::id()));
        let path = dir.join("audio.wav");

        let mut recorder = WavRecorder::create(&path, 22050).unwrap();
        let samples: Vec<f32> = (0..200).map(|i| (i as f32 / 200.0) - 0.5).collect();
        recorder.write_interleaved(&samples).unwrap();
        assert_eq!(recorder.finalize().unwrap(), 100);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.duration(), 100);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
