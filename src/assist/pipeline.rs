//! Channel-based worker for assist requests
//!
//! A dedicated thread owns the HTTP client and a tokio runtime, and processes
//! Describe commands strictly in order. That serial loop is what keeps at
//! most one request in flight; the mode bar additionally refuses to enqueue
//! while a request is pending.

use crate::assist::client::{AssistClient, AssistConfig};
use crate::assist::mode::AssistMode;
use crate::assist::protocol::ImageAttachment;
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the assist pipeline
#[derive(Debug, Clone)]
pub enum AssistCommand {
    /// Ask the service to describe for the given mode
    Describe {
        mode: AssistMode,
        /// Image to analyze, when one is attached
        image: Option<ImageAttachment>,
        request_id: Uuid,
    },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the assist pipeline
#[derive(Debug, Clone)]
pub enum AssistEvent {
    /// The worker picked the request up
    Started { mode: AssistMode, request_id: Uuid },

    /// The service answered with a description
    Description {
        text: String,
        mode: AssistMode,
        request_id: Uuid,
        /// Service round-trip time
        elapsed_ms: u64,
    },

    /// The request failed; `error` is already user-facing text
    Error {
        error: String,
        request_id: Option<Uuid>,
    },

    /// Pipeline has shut down
    Shutdown,
}

/// Assist pipeline with channel-based communication
pub struct AssistPipeline {
    config: AssistConfig,
    command_tx: Sender<AssistCommand>,
    command_rx: Receiver<AssistCommand>,
    event_tx: Sender<AssistEvent>,
    event_rx: Receiver<AssistEvent>,
}

impl AssistPipeline {
    pub fn new(config: AssistConfig) -> Self {
        let (command_tx, command_rx) = bounded(8);
        let (event_tx, event_rx) = bounded(32);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<AssistCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<AssistEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || run_worker(config, command_rx, event_tx));

        Ok(())
    }
}

fn run_worker(
    config: AssistConfig,
    command_rx: Receiver<AssistCommand>,
    event_tx: Sender<AssistEvent>,
) {
    info!("Assist pipeline worker starting");

    // Construction failures surface as events, never panics
    let fail = |message: String| {
        error!("{}", message);
        let _ = event_tx.send(AssistEvent::Error {
            error: message,
            request_id: None,
        });
        let _ = event_tx.send(AssistEvent::Shutdown);
    };

    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => return fail(format!("Runtime creation failed: {}", e)),
    };

    let client = match AssistClient::new(&config) {
        Ok(client) => client,
        Err(e) => return fail(e.to_string()),
    };

    // Probe the service so a dead backend shows up in the logs before the
    // first button press
    match runtime.block_on(client.health()) {
        Ok(health) if health.is_active() => {
            info!("Assist service reachable: {}", health.service);
        }
        Ok(health) => {
            warn!("Assist service reports status '{}'", health.status);
        }
        Err(e) => {
            warn!("Assist service not reachable yet: {}", e);
        }
    }

    info!("Assist pipeline worker ready");

    while let Ok(command) = command_rx.recv() {
        match command {
            AssistCommand::Describe {
                mode,
                image,
                request_id,
            } => {
                debug!("Processing describe request {} ({})", request_id, mode);

                let _ = event_tx.send(AssistEvent::Started { mode, request_id });

                let started = Instant::now();
                let result = runtime.block_on(client.describe(mode, image));
                let elapsed_ms = started.elapsed().as_millis() as u64;

                match result {
                    Ok(text) => {
                        debug!("Description received: {} chars in {}ms", text.len(), elapsed_ms);
                        let _ = event_tx.send(AssistEvent::Description {
                            text,
                            mode,
                            request_id,
                            elapsed_ms,
                        });
                    }
                    Err(e) => {
                        error!("Describe request failed: {}", e);
                        let _ = event_tx.send(AssistEvent::Error {
                            error: e.user_message(),
                            request_id: Some(request_id),
                        });
                    }
                }
            }

            AssistCommand::Shutdown => {
                info!("Assist pipeline worker shutting down");
                let _ = event_tx.send(AssistEvent::Shutdown);
                break;
            }
        }
    }

    info!("Assist pipeline worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_creation() {
        let pipeline = AssistPipeline::new(AssistConfig::default());

        let _cmd_tx = pipeline.command_sender();
        let _event_rx = pipeline.event_receiver();
    }

    #[test]
    fn test_command_variants() {
        let cmd = AssistCommand::Describe {
            mode: AssistMode::ReadText,
            image: None,
            request_id: Uuid::new_v4(),
        };

        match cmd {
            AssistCommand::Describe { mode, image, .. } => {
                assert_eq!(mode, AssistMode::ReadText);
                assert!(image.is_none());
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_worker_reports_bad_endpoint_as_event() {
        let pipeline = AssistPipeline::new(AssistConfig::new("not a url"));
        let event_rx = pipeline.event_receiver();

        pipeline.start_worker().unwrap();

        // Client construction fails inside the worker; the failure must
        // arrive as an error event followed by shutdown
        let first = event_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert!(matches!(first, AssistEvent::Error { request_id: None, .. }));

        let second = event_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert!(matches!(second, AssistEvent::Shutdown));
    }
}
