//! Session pacing and recording configuration.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Frame loop and scripted interaction configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulation frame rate (FPS)
    pub fps: u32,

    /// Mean scripted pointer interactions per second
    pub interactions_per_second: f64,

    /// Half-width of the square region interactions land in (world units)
    pub field_extent: f64,

    /// Seed for the interaction script (None = entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            interactions_per_second: 1.5,
            field_extent: 400.0,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Frame step (seconds)
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Validate configuration (positive rates and extent)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::new("fps", "must be > 0"));
        }
        if !(self.interactions_per_second > 0.0) || !self.interactions_per_second.is_finite() {
            return Err(ConfigError::new(
                "interactions_per_second",
                format!("must be finite and > 0, got {}", self.interactions_per_second),
            ));
        }
        if !(self.field_extent > 0.0) || !self.field_extent.is_finite() {
            return Err(ConfigError::new(
                "field_extent",
                format!("must be finite and > 0, got {}", self.field_extent),
            ));
        }
        Ok(())
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for audio
    pub output_dir: PathBuf,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
        }
    }

    /// Total number of simulation frames to run at `fps`
    pub fn total_frames(&self, fps: u32) -> usize {
        (self.duration_secs * fps as f32).ceil() as usize
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frames() {
        let config = RecordingConfig::new(2.5);
        assert_eq!(config.total_frames(60), 150);
        assert!(config.audio_path().ends_with("audio.wav"));
    }

    #[test]
    fn test_session_validate() {
        assert!(SessionConfig::default().validate().is_ok());
        let config = SessionConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
