//! Error types for configuration and audio output.
//!
//! The wave field, sampler and ripple pool are total and never fail; errors only
//! arise from bad configuration, the audio device, and WAV output.

use thiserror::Error;

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid {field}: {reason}")]
pub struct ConfigError {
    /// Name of the offending field
    pub field: &'static str,
    /// Why the value was rejected
    pub reason: String,
}

impl ConfigError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Audio bridge, synthesis and output errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// No default output device on this host
    #[error("No audio output device found")]
    NoOutputDevice,

    /// Device query failed
    #[error("Audio device error: {0}")]
    Device(String),

    /// Stream could not be built or started
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// Ambient synthesis engine rejected its composition
    #[error("Glicol engine error: {0}")]
    Engine(String),

    /// WAV writer failure
    #[error("WAV output failed: {0}")]
    Wav(#[from] hound::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An interaction produced a NaN or infinite synthesis parameter
    #[error("Non-finite audio parameter: {field}")]
    NonFiniteParameter {
        /// Parameter that failed validation
        field: &'static str,
    },

    /// Invalid audio configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}
