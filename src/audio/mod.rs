//! Reactive audio: interaction-to-synthesis bridge, voices and output.
//!
//! Wave metrics and ripple state are mapped to voice parameters by the
//! bridge; voices are mixed over a glicol ambient bed and sent to a cpal
//! stream or rendered offline to WAV.

mod analysis;
mod bridge;
mod mixer;
mod record;
mod synthesis;
mod system;
mod voice;

// Re-export public types
pub use analysis::{hann_window, AudioBands, SpectrumAnalyzer};
pub use bridge::{
    map_interaction_to_audio_params, AudioBridge, AudioParameterSet, HarmonicMix, RippleMeta,
    LARGE_RIPPLE_RADIUS, SWEEP_DEPTH,
};
pub use mixer::{Mixer, OUTPUT_LIMIT};
pub use record::WavRecorder;
pub use synthesis::{AmbientBed, AMBIENT_COMPOSITION};
pub use system::AudioSystem;
pub use voice::{Voice, VoicePool};
