//! Speech output for accessibility
//!
//! Every description returned by the assist service is spoken aloud using
//! VITS neural TTS models via sherpa-rs.

pub mod tts;

// Re-export commonly used types
pub use tts::{
    normalize_speech_text, SpeechQueue, TTSAudio, TTSCommand, TTSConfig, TTSEngine, TTSEvent,
    TTSPipeline, VITS_SAMPLE_RATE,
};
