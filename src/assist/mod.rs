//! Assist service integration
//!
//! This module provides:
//! - The assistance modes a user can request
//! - Wire types for the assist endpoint
//! - An HTTP client and a channel-based request pipeline

pub mod client;
pub mod mode;
pub mod pipeline;
pub mod protocol;

// Re-export commonly used types
pub use client::AssistClient;
pub use mode::AssistMode;
pub use pipeline::{AssistCommand, AssistEvent, AssistPipeline};
pub use protocol::{AssistReply, ImageAttachment, ReplyStatus, ServiceHealth};
