//! Bloodtide - a blood-red ocean that answers every touch with a ripple and a tone
//!
//! Runs a scripted interaction session either live through the default output
//! device or offline into a WAV file.

use std::error::Error;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bloodtide::audio::{AudioSystem, Mixer};
use bloodtide::cli::Args;
use bloodtide::params::{AudioConfig, BridgeLimits, WaveFieldParams};
use bloodtide::session::Session;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Bloodtide - ripples on a blood ocean");

    let audio_config = args.audio_config();
    let mut session = Session::new(
        args.session_config(),
        &WaveFieldParams::default(),
        args.ripple_params(),
        BridgeLimits::default(),
    )?;

    match args.recording_config() {
        Some(recording) => {
            let mixer = Mixer::new(&audio_config)?;
            let summary = session.record(mixer, &recording)?;
            info!(
                path = %recording.audio_path().display(),
                frames = summary.frames_written,
                voices = summary.stats.voices,
                "done"
            );
        }
        None => run_live(&mut session, &audio_config, args.duration)?,
    }
    Ok(())
}

fn run_live(
    session: &mut Session,
    config: &AudioConfig,
    duration_s: f64,
) -> Result<(), Box<dyn Error>> {
    let mut audio = AudioSystem::new(config)?;
    session.run_live(&mut audio, duration_s);
    Ok(())
}
