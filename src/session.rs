//! Frame-driven session: scripted interactions, ripples and their sounds.
//!
//! Stands in for the pointer-driven page loop. Each frame advances the
//! simulation, then turns any due interactions into a splash plus one voice.

use std::thread;
use std::time::{Duration, Instant};

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::audio::{
    AudioBands, AudioBridge, AudioParameterSet, AudioSystem, Mixer, SpectrumAnalyzer, WavRecorder,
};
use crate::error::{AudioError, ConfigError};
use crate::ocean::Simulation;
use crate::params::{
    BridgeLimits, FFTConfig, RecordingConfig, RippleParams, SessionConfig, WaveFieldParams,
};

/// Range scripted interaction intensities are drawn from
const INTENSITY_RANGE: std::ops::Range<f64> = 0.4..1.0;

/// One pointer press in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub x: f64,
    pub z: f64,
    pub intensity: f64,
    /// Stereo position, [-1, 1]
    pub pan: f64,
    /// Session time the press lands (seconds)
    pub at_s: f64,
}

/// Seeded stream of interactions with exponential gaps
#[derive(Debug)]
pub struct InteractionScript {
    rng: StdRng,
    rate: f64,
    extent: f64,
    next_at_s: f64,
}

impl InteractionScript {
    pub fn new(config: &SessionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let first_gap = exponential_gap(&mut rng, config.interactions_per_second);
        Self {
            rng,
            rate: config.interactions_per_second,
            extent: config.field_extent,
            next_at_s: first_gap,
        }
    }

    /// Time of the next scheduled interaction
    pub fn next_at(&self) -> f64 {
        self.next_at_s
    }

    /// Pop every interaction scheduled at or before `now_s`
    pub fn due(&mut self, now_s: f64) -> Vec<Interaction> {
        let mut due = Vec::new();
        while self.next_at_s <= now_s {
            let x = self.rng.gen_range(-self.extent..self.extent);
            let z = self.rng.gen_range(-self.extent..self.extent);
            due.push(Interaction {
                x,
                z,
                intensity: self.rng.gen_range(INTENSITY_RANGE),
                pan: (x / self.extent).clamp(-1.0, 1.0),
                at_s: self.next_at_s,
            });
            self.next_at_s += exponential_gap(&mut self.rng, self.rate);
        }
        due
    }
}

fn exponential_gap(rng: &mut StdRng, rate: f64) -> f64 {
    let u: f64 = rng.gen();
    -(1.0 - u).ln() / rate
}

/// Anything that can start a voice
pub trait VoiceSink {
    fn trigger(&mut self, params: AudioParameterSet);
}

impl VoiceSink for Mixer {
    fn trigger(&mut self, params: AudioParameterSet) {
        Mixer::trigger(self, params);
    }
}

impl VoiceSink for AudioSystem {
    fn trigger(&mut self, params: AudioParameterSet) {
        AudioSystem::trigger(self, params);
    }
}

impl VoiceSink for Vec<AudioParameterSet> {
    fn trigger(&mut self, params: AudioParameterSet) {
        self.push(params);
    }
}

/// Running counts for a session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub frames: u64,
    pub interactions: u64,
    pub voices: u64,
    pub rejected: u64,
    pub ripples_retired: u64,
}

/// Result of an offline recording
#[derive(Debug, Clone, Copy)]
pub struct RecordingSummary {
    pub frames_written: u64,
    pub bands: AudioBands,
    pub stats: SessionStats,
}

/// Simulation + bridge + interaction script, advanced one frame at a time
pub struct Session {
    config: SessionConfig,
    simulation: Simulation,
    bridge: AudioBridge,
    script: InteractionScript,
    stats: SessionStats,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        wave: &WaveFieldParams,
        ripples: RippleParams,
        limits: BridgeLimits,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulation = Simulation::new(wave, ripples)?;
        let bridge = AudioBridge::new(simulation.sampler(), limits)?;
        let script = InteractionScript::new(&config);
        Ok(Self {
            config,
            simulation,
            bridge,
            script,
            stats: SessionStats::default(),
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Splash at the interaction point and trigger its voice
    pub fn interact<S: VoiceSink>(
        &mut self,
        interaction: &Interaction,
        sink: &mut S,
    ) -> Result<AudioParameterSet, AudioError> {
        self.stats.interactions += 1;
        let center = DVec2::new(interaction.x, interaction.z);
        let handle = self.simulation.splash(center, interaction.intensity, None);

        let result = self.bridge.params_for(
            interaction.x,
            interaction.z,
            self.simulation.time(),
            interaction.intensity,
            interaction.pan,
            self.simulation.ripple(handle),
        );
        match result {
            Ok(params) => {
                debug!(
                    x = interaction.x,
                    z = interaction.z,
                    frequency = params.base_frequency,
                    duration = params.duration_seconds,
                    "interaction"
                );
                sink.trigger(params);
                self.stats.voices += 1;
                Ok(params)
            }
            Err(e) => {
                self.stats.rejected += 1;
                Err(e)
            }
        }
    }

    /// Advance one frame and handle due interactions
    pub fn step<S: VoiceSink>(&mut self, sink: &mut S) {
        let dt = self.config.frame_dt();
        self.stats.frames += 1;
        let now = self.stats.frames as f64 * dt;

        self.stats.ripples_retired += self.simulation.tick(dt, now) as u64;
        for interaction in self.script.due(now) {
            if let Err(e) = self.interact(&interaction, sink) {
                warn!("dropped interaction sound: {}", e);
            }
        }
    }

    /// Run against the live audio system, paced in real time
    pub fn run_live(&mut self, audio: &mut AudioSystem, duration_s: f64) {
        let frame = Duration::from_secs_f64(self.config.frame_dt());
        let total_frames = (duration_s * self.config.fps as f64).ceil() as u64;
        let start = Instant::now();

        info!(duration_s, "live session started");
        for i in 0..total_frames {
            self.step(audio);

            // Sleep until this frame's deadline
            let deadline = frame * (i as u32 + 1);
            if let Some(remaining) = deadline.checked_sub(start.elapsed()) {
                thread::sleep(remaining);
            }

            if (i + 1) % (self.config.fps as u64 * 5) == 0 {
                info!(
                    t = self.simulation.time(),
                    ripples = self.simulation.pool().len(),
                    voices = audio.active_voices(),
                    "session"
                );
            }
        }
        info!(stats = ?self.stats, "live session finished");
    }

    /// Run without pacing, rendering the mix to `<output_dir>/audio.wav`
    pub fn record(
        &mut self,
        mut mixer: Mixer,
        recording: &RecordingConfig,
    ) -> Result<RecordingSummary, AudioError> {
        let sample_rate = mixer.sample_rate();
        let path = recording.audio_path();
        let mut recorder = WavRecorder::create(&path, sample_rate)?;
        info!(path = %path.display(), duration_s = recording.duration_secs, "recording");

        let total_frames = recording.total_frames(self.config.fps) as u64;
        let fps = self.config.fps as u64;

        let mut buffer = Vec::new();
        let mut mono = Vec::new();
        let mut written = 0u64;

        for frame in 1..=total_frames {
            self.step(&mut mixer);

            // Sample count tracks the frame clock without drift
            let target = frame * sample_rate as u64 / fps;
            let count = (target - written) as usize;
            written = target;

            buffer.resize(count * 2, 0.0);
            mixer.fill(&mut buffer, 2);
            recorder.write_interleaved(&buffer)?;
            mono.extend(buffer.chunks(2).map(|frame| (frame[0] + frame[1]) * 0.5));
        }

        let frames_written = recorder.finalize()?;
        let mut analyzer = SpectrumAnalyzer::new(FFTConfig {
            sample_rate_hz: sample_rate as usize,
            ..Default::default()
        })?;
        let bands = analyzer.bands(&mono);

        info!(
            frames_written,
            low = bands.low,
            mid = bands.mid,
            high = bands.high,
            stats = ?self.stats,
            "recording finished"
        );
        Ok(RecordingSummary {
            frames_written,
            bands,
            stats: self.stats,
        })
    }
}
