//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{AudioConfig, RecordingConfig, RippleParams, SessionConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bloodtide")]
#[command(about = "Blood-ocean ripples with reactive audio", long_about = None)]
pub struct Args {
    /// Render offline to a WAV file instead of playing live (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Live session length (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    pub duration: f64,

    /// Seed for ripple draws and the interaction script
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum live ripples
    #[arg(long, default_value = "400")]
    pub capacity: usize,

    /// Maximum concurrently sounding voices
    #[arg(long, default_value = "24")]
    pub max_voices: usize,

    /// Mean scripted interactions per second
    #[arg(long, value_name = "PER_SECOND", default_value = "1.5")]
    pub rate: f64,

    /// Disable the ambient drone bed
    #[arg(long)]
    pub no_ambient: bool,

    /// Output directory for recordings
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn ripple_params(&self) -> RippleParams {
        RippleParams {
            capacity: self.capacity,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            max_voices: self.max_voices,
            ambient: !self.no_ambient,
            ..Default::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            interactions_per_second: self.rate,
            // Keep the script distinct from the ripple draws
            seed: self.seed.map(|seed| seed.wrapping_add(1)),
            ..Default::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| RecordingConfig {
            output_dir: self.output_dir.clone(),
            ..RecordingConfig::new(duration)
        })
    }
}
