//! Live audio output through the default cpal device.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use super::bridge::AudioParameterSet;
use super::mixer::Mixer;
use crate::error::AudioError;
use crate::params::AudioConfig;

/// Audio system owning the output stream and the shared mixer
pub struct AudioSystem {
    /// Mixer shared with the audio callback
    mixer: Arc<Mutex<Mixer>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    sample_rate_hz: u32,
}

impl AudioSystem {
    /// Open the default output device and start streaming the mix
    ///
    /// The mixer runs at the device's sample rate, not the configured one.
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        config.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::Device(format!(
                "unsupported sample format {:?}, need f32",
                supported.sample_format()
            )));
        }

        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            channels,
            "audio output"
        );

        let device_config = AudioConfig {
            sample_rate_hz,
            ..config.clone()
        };
        let mixer = Arc::new(Mutex::new(Mixer::new(&device_config)?));
        let mixer_callback = Arc::clone(&mixer);

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match mixer_callback
                    .lock()
                {
                    Ok(mut mixer) => mixer.fill(data, channels),
                    Err(_) => data.fill(0.0),
                },
                |err| error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        Ok(Self {
            mixer,
            _stream: stream,
            sample_rate_hz,
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Start a voice (fire-and-forget)
    pub fn trigger(&self, params: AudioParameterSet) {
        let mut mixer = self.mixer.lock().unwrap_or_else(|e| e.into_inner());
        mixer.trigger(params);
    }

    /// Voices currently sounding
    pub fn active_voices(&self) -> usize {
        let mixer = self.mixer.lock().unwrap_or_else(|e| e.into_inner());
        mixer.voices().len()
    }
}
