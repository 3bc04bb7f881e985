pub mod assist;
pub mod audio;
pub mod integration;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VistaError {
    /// The assist service answered with an error body
    #[error("Assist service error: {0}")]
    ServiceError(String),

    /// The request never produced a usable reply (transport, timeout, bad body)
    #[error("Request error: {0}")]
    RequestError(String),

    #[error("TTS error: {0}")]
    TTSError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl VistaError {
    /// Whether retrying the same interaction can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The service may reject one request and accept the next
            VistaError::ServiceError(_) => true,
            // Typically transient network failures
            VistaError::RequestError(_) => true,
            VistaError::TTSError(_) => true,
            VistaError::AudioProcessingError(_) => true,
            // Model errors require restarting
            VistaError::ModelLoadError(_) => false,
            // Hardware/device errors may require user intervention
            VistaError::AudioDeviceError(_) => false,
            VistaError::ConfigError(_) => false,
        }
    }

    /// The text shown (and spoken) to the user for this error
    pub fn user_message(&self) -> String {
        match self {
            VistaError::ServiceError(message) => format!("Error: {}", message),
            VistaError::RequestError(_) => {
                "Connection failed. Check that the assist service is running.".to_string()
            }
            VistaError::TTSError(_) => {
                "Text-to-speech failed. The description will be shown as text.".to_string()
            }
            VistaError::ModelLoadError(_) => {
                "Failed to load the speech model. Please verify model files are present.".to_string()
            }
            VistaError::AudioDeviceError(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            VistaError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            VistaError::ConfigError(_) => "Configuration error. Please check settings.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VistaError>;
