//! Sample-rate conversion between the TTS voice and the output device
//!
//! Speech audio in Vista is always mono, so the converter works on a single
//! channel and interleaving never comes into it.

use crate::{Result, VistaError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Mono sinc resampler
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    ratio: f64,
}

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(VistaError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, 1024, 1).map_err(|e| {
            VistaError::AudioProcessingError(format!("Failed to create resampler: {}", e))
        })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self { resampler, ratio })
    }

    /// Convert a block of mono samples
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        // SincFixedIn consumes a fixed number of frames per call; the tail
        // of the final chunk is zero-padded and the surplus output dropped
        let chunk_size = self.resampler.input_frames_max();
        let mut output = Vec::with_capacity((input.len() as f64 * self.ratio * 1.1) as usize);

        for chunk in input.chunks(chunk_size) {
            let mut padded = vec![0.0f32; chunk_size];
            padded[..chunk.len()].copy_from_slice(chunk);

            let processed = self.resampler.process(&[padded], None).map_err(|e| {
                VistaError::AudioProcessingError(format!("Resampling failed: {}", e))
            })?;

            let produced = processed[0].len();
            let wanted = if chunk.len() < chunk_size {
                ((chunk.len() as f64) * self.ratio).ceil() as usize
            } else {
                produced
            };

            output.extend_from_slice(&processed[0][..wanted.min(produced)]);
        }

        debug!("Resampled {} samples -> {} samples", input.len(), output.len());

        Ok(output)
    }
}

/// Convert a block of mono samples in one step
///
/// Returns the input unchanged when the rates already match.
pub fn resample_audio(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    AudioResampler::new(input_rate, output_rate)?.resample(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_creation() {
        assert!(AudioResampler::new(22050, 48000).is_ok());
    }

    #[test]
    fn test_zero_rates_rejected() {
        assert!(AudioResampler::new(0, 48000).is_err());
        assert!(AudioResampler::new(22050, 0).is_err());
    }

    #[test]
    fn test_upsampling_grows_output() {
        let input: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_audio(&input, 16000, 48000).unwrap();

        // 48000/16000 = 3x, minus filter edges
        assert!(output.len() > input.len() * 2);
    }

    #[test]
    fn test_downsampling_shrinks_output() {
        let input: Vec<f32> = (0..3072).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_audio(&input, 48000, 16000).unwrap();

        assert!(!output.is_empty());
        assert!(output.len() < input.len());
    }

    #[test]
    fn test_empty_input() {
        let mut resampler = AudioResampler::new(22050, 48000).unwrap();
        assert!(resampler.resample(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_matching_rates_pass_through() {
        let input: Vec<f32> = (0..256).map(|i| i as f32 / 256.0).collect();
        let output = resample_audio(&input, 22050, 22050).unwrap();
        assert_eq!(output, input);
    }
}
