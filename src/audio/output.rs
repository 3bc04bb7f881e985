//! Speaker output for synthesized speech
//!
//! The cpal callback pulls mono sample batches straight off the playback
//! channel, carrying leftovers between callbacks. Mono samples are duplicated
//! across the device's channels, and the stream emits silence whenever the
//! channel runs dry.

use crate::{Result, VistaError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Receiver;
use std::collections::VecDeque;
use tracing::{error, info};

pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioOutput {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| VistaError::AudioDeviceError("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                VistaError::AudioDeviceError(format!("Failed to get output config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Sample rate the device expects
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Channel count of the device
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Build and start the output stream, fed from `audio_rx`
    pub fn start_playback(&mut self, audio_rx: Receiver<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        // Samples received but not yet written to the device
        let mut carry: VecDeque<f32> = VecDeque::new();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;

                    while carry.len() < frames {
                        match audio_rx.try_recv() {
                            Ok(samples) => carry.extend(samples),
                            Err(_) => break,
                        }
                    }

                    for frame in data.chunks_mut(channels) {
                        let sample = carry.pop_front().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                |err| error!("Audio output stream error: {}", err),
                None,
            )
            .map_err(|e| {
                VistaError::AudioDeviceError(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            VistaError::AudioDeviceError(format!("Failed to start output stream: {}", e))
        })?;

        self.stream = Some(stream);

        info!("Started speech playback");
        Ok(())
    }

    /// Tear down the output stream
    pub fn stop_playback(&mut self) {
        if self.stream.take().is_some() {
            info!("Stopped speech playback");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    // These tests are no-ops on machines without an audio device (CI)

    #[test]
    fn test_audio_output_creation() {
        if let Ok(output) = AudioOutput::new() {
            assert!(output.sample_rate() > 0);
            assert!(output.channels() > 0);
        }
    }

    #[test]
    fn test_playback_state() {
        if let Ok(mut output) = AudioOutput::new() {
            assert!(!output.is_playing());

            let (_tx, rx) = bounded(10);
            if output.start_playback(rx).is_ok() {
                assert!(output.is_playing());

                output.stop_playback();
                assert!(!output.is_playing());
            }
        }
    }
}
