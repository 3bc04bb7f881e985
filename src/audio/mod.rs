//! Audio playback for spoken descriptions

#[cfg(feature = "audio-io")]
pub mod output;
pub mod resampler;

#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use resampler::{resample_audio, AudioResampler};
