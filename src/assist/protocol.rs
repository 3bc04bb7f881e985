//! Wire types for the assist endpoint
//!
//! The service speaks a single POST with a multipart form (`mode` field,
//! optional `image` part) answered by a JSON body. Error responses carry a
//! JSON body too, so replies are parsed regardless of HTTP status. Nothing
//! here outlives one request/response cycle.

use crate::{Result, VistaError};
use serde::Deserialize;

/// Image bytes attached to an assist request
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// File name sent with the multipart part
    pub file_name: String,

    /// Raw image bytes
    pub data: Vec<u8>,

    /// MIME type of the image
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Guess the MIME type from a file extension, defaulting to JPEG
    pub fn mime_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "image/jpeg",
        }
    }
}

/// Status flag in every reply body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// JSON body returned by the assist endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AssistReply {
    pub status: ReplyStatus,

    /// Echo of the requested mode (success replies only)
    #[serde(default)]
    pub mode: Option<String>,

    /// The generated description (success replies only)
    #[serde(default)]
    pub description: Option<String>,

    /// Human-readable failure reason (error replies only)
    #[serde(default)]
    pub message: Option<String>,
}

impl AssistReply {
    /// Extract the description, mapping error replies to a service error
    ///
    /// A success reply without a description is treated as an error; the
    /// caller has nothing to display or speak.
    pub fn into_description(self) -> Result<String> {
        match self.status {
            ReplyStatus::Success => self.description.ok_or_else(|| {
                VistaError::ServiceError("Reply contained no description".to_string())
            }),
            ReplyStatus::Error => Err(VistaError::ServiceError(
                self.message
                    .unwrap_or_else(|| "The assist service reported an error".to_string()),
            )),
        }
    }
}

/// JSON body returned by the service health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: String,
}

impl ServiceHealth {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_reply() {
        let json = r#"{"status": "success", "mode": "text", "description": "A page of notes."}"#;
        let reply: AssistReply = serde_json::from_str(json).unwrap();

        assert_eq!(reply.status, ReplyStatus::Success);
        assert_eq!(reply.mode.as_deref(), Some("text"));
        assert_eq!(reply.into_description().unwrap(), "A page of notes.");
    }

    #[test]
    fn test_parse_error_reply() {
        let json = r#"{"status": "error", "message": "Missing image file or assistance mode"}"#;
        let reply: AssistReply = serde_json::from_str(json).unwrap();

        let err = reply.into_description().unwrap_err();
        assert!(matches!(err, VistaError::ServiceError(_)));
        assert!(err.to_string().contains("Missing image file"));
    }

    #[test]
    fn test_success_without_description_is_error() {
        let json = r#"{"status": "success", "mode": "diagram"}"#;
        let reply: AssistReply = serde_json::from_str(json).unwrap();

        assert!(reply.into_description().is_err());
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let json = r#"{"status": "error"}"#;
        let reply: AssistReply = serde_json::from_str(json).unwrap();

        let err = reply.into_description().unwrap_err();
        assert!(err.to_string().contains("reported an error"));
    }

    #[test]
    fn test_parse_service_health() {
        let json = r#"{"status": "active", "service": "Vista Assist Backend"}"#;
        let health: ServiceHealth = serde_json::from_str(json).unwrap();

        assert!(health.is_active());
        assert_eq!(health.service, "Vista Assist Backend");
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(ImageAttachment::mime_for_extension("PNG"), "image/png");
        assert_eq!(ImageAttachment::mime_for_extension("jpg"), "image/jpeg");
        assert_eq!(ImageAttachment::mime_for_extension("unknown"), "image/jpeg");
    }
}
