//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants live here with:
//! - Units (world units, seconds, Hz)
//! - Documented ranges and meanings
//! - A `validate()` per struct

mod audio;
mod ocean;
mod ripple;
mod session;

// Re-export all types
pub use audio::{audio_constants, AudioConfig, BridgeLimits, FFTConfig};
pub use ocean::{
    WaveFieldParams, WaveShape, WaveTerm, REFERENCE_TIME_PERIOD_S, REFERENCE_WAVE_TERMS,
};
pub use ripple::RippleParams;
pub use session::{RecordingConfig, SessionConfig};
