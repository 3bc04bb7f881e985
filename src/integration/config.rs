//! Top-level configuration
//!
//! One struct covering the assist client, the TTS voice, and the speech
//! on/off switch, with environment overrides for the values that differ
//! between installs.

use crate::assist::client::AssistConfig;
use crate::speech::tts::TTSConfig;
use reqwest::Url;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct IntegrationConfig {
    /// Assist service configuration
    pub assist: AssistConfig,

    /// TTS voice configuration
    pub tts: TTSConfig,

    /// Whether descriptions are spoken aloud
    pub enable_speech: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            assist: AssistConfig::default(),
            tts: TTSConfig::default(),
            enable_speech: true,
        }
    }
}

impl IntegrationConfig {
    /// Create a configuration with TTS voice paths
    pub fn with_models(tts_model: impl Into<String>, tts_tokens: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.tts.model_path = tts_model.into();
        config.tts.tokens_path = tts_tokens.into();
        config
    }

    /// Set the assist endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.assist.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.assist.request_timeout = timeout;
        self
    }

    /// Disable speech output (text-only mode)
    pub fn without_speech(mut self) -> Self {
        self.enable_speech = false;
        self
    }

    /// Defaults plus environment overrides
    ///
    /// `VISTA_ENDPOINT` replaces the assist endpoint; `VISTA_TTS_MODEL` and
    /// `VISTA_TTS_TOKENS` point at the voice files.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("VISTA_ENDPOINT") {
            config.assist.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("VISTA_TTS_MODEL") {
            config.tts.model_path = model;
        }
        if let Ok(tokens) = std::env::var("VISTA_TTS_TOKENS") {
            config.tts.tokens_path = tokens;
        }

        config
    }

    /// Check the endpoint parses and, when speech is on, the voice files
    /// exist on disk
    pub fn validate(&self) -> Result<(), String> {
        if Url::parse(&self.assist.endpoint).is_err() {
            return Err(format!("Invalid assist endpoint: {}", self.assist.endpoint));
        }

        if self.enable_speech {
            if self.tts.model_path.is_empty() {
                return Err("TTS model path is required".to_string());
            }
            for (path, what) in [
                (&self.tts.model_path, "TTS model"),
                (&self.tts.tokens_path, "TTS tokens file"),
            ] {
                if !Path::new(path).exists() {
                    return Err(format!("{} not found: {}", what, path));
                }
            }
        }

        Ok(())
    }
}
