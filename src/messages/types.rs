use crate::assist::AssistMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// Reference to an attached image; the bytes themselves only live in the
/// request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    Image(ImageRef),
}

/// Extra context attached to a log entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Assistance mode this entry belongs to
    pub mode: Option<AssistMode>,

    /// Service round-trip time for assistant entries
    pub processing_time_ms: Option<u64>,

    /// Whether the entry was sent to the speech synthesizer
    pub spoken: bool,
}

/// One entry in the session interaction log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    pub metadata: MessageMetadata,
}

impl Message {
    pub fn new(sender: Sender, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content,
            timestamp: Utc::now(),
            metadata: MessageMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// A user entry recording an attached image
    pub fn attachment(image: ImageRef) -> Self {
        Self::new(Sender::User, MessageContent::Image(image))
    }

    /// A user entry recording which mode was requested
    pub fn mode_request(mode: AssistMode) -> Self {
        Self::new(Sender::User, MessageContent::Text(mode.label().to_string())).with_metadata(
            MessageMetadata {
                mode: Some(mode),
                ..Default::default()
            },
        )
    }

    /// An assistant entry carrying the returned description
    pub fn description(mode: AssistMode, text: String, elapsed_ms: u64, spoken: bool) -> Self {
        Self::new(Sender::Assistant, MessageContent::Text(text)).with_metadata(MessageMetadata {
            mode: Some(mode),
            processing_time_ms: Some(elapsed_ms),
            spoken,
        })
    }
}
