//! Central UI state
//!
//! `AppState` owns the interaction log, the single-outstanding-request
//! state, and the channel endpoints into both pipelines. The frame loop
//! calls `poll_events` once per frame to drain backend events.

use crate::assist::pipeline::{AssistCommand, AssistEvent};
use crate::assist::protocol::ImageAttachment;
use crate::assist::AssistMode;
use crate::integration::OrchestratorHandle;
use crate::messages::{ImageRef, Message, MessageLog};
use crate::speech::tts::{SpeechQueue, TTSCommand, TTSEvent};
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::path::Path;
use uuid::Uuid;

/// Shown while a request is in flight
pub const PROCESSING_TEXT: &str = "AI: Processing your request...";

/// Shown before the first request
const WELCOME_TEXT: &str = "Select an assistance mode to begin.";

/// State of the single outstanding assist request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// No request in flight
    Idle,
    /// A request is in flight; mode buttons are disabled
    Pending {
        /// The requested mode
        mode: AssistMode,
        /// Request ID to match the reply against
        request_id: Uuid,
    },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending { .. })
    }
}

/// Internal state surfaced in the debug panel
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    /// Last assist request outcome, human-readable
    pub assist_status: String,
    /// Speech queue depth and duration
    pub speech_queue_status: String,
    /// Smoothed frame rate
    pub fps: f32,
    /// Tail of recent log lines
    pub log_messages: VecDeque<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self {
            log_messages: VecDeque::with_capacity(100),
            ..Default::default()
        }
    }

    pub fn add_log(&mut self, message: String) {
        if self.log_messages.len() >= 100 {
            self.log_messages.pop_front();
        }
        self.log_messages.push_back(message);
    }
}

/// Central application state
pub struct AppState {
    /// Interaction log (thread-safe)
    pub messages: MessageLog,

    /// Current request state
    pub request_state: RequestState,

    /// The insight line shown in the central panel
    pub insight_text: String,

    /// Whether the insight line is an error
    pub insight_is_error: bool,

    /// Image attached to the next request
    pub attached_image: Option<ImageAttachment>,

    /// Whether descriptions are spoken aloud
    pub speech_enabled: bool,

    /// Debug information
    pub debug_info: DebugInfo,

    /// Whether to show the debug panel
    pub show_debug_panel: bool,

    /// Queue of synthesized utterances
    pub speech_queue: SpeechQueue,

    /// Command channel into the assist pipeline
    pub assist_command_tx: Option<Sender<AssistCommand>>,

    /// Event channel out of the assist pipeline
    pub assist_event_rx: Option<Receiver<AssistEvent>>,

    /// Command channel into the TTS pipeline
    pub tts_command_tx: Option<Sender<TTSCommand>>,

    /// Event channel out of the TTS pipeline
    pub tts_event_rx: Option<Receiver<TTSEvent>>,

    /// Samples headed for the output device
    pub playback_tx: Option<Sender<Vec<f32>>>,

    /// Most recent error shown to the user
    pub last_error: Option<String>,

    /// Recent frame durations for the FPS readout
    frame_times: VecDeque<f64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: MessageLog::new(),
            request_state: RequestState::Idle,
            insight_text: WELCOME_TEXT.to_string(),
            insight_is_error: false,
            attached_image: None,
            speech_enabled: true,
            debug_info: DebugInfo::new(),
            show_debug_panel: false,
            speech_queue: SpeechQueue::new(),
            assist_command_tx: None,
            assist_event_rx: None,
            tts_command_tx: None,
            tts_event_rx: None,
            playback_tx: None,
            last_error: None,
            frame_times: VecDeque::with_capacity(60),
        }
    }

    /// Wire the state to the orchestrator channels
    pub fn connect(&mut self, handle: &OrchestratorHandle) {
        self.assist_command_tx = Some(handle.assist_command_sender());
        self.assist_event_rx = Some(handle.assist_event_receiver());
        self.tts_command_tx = Some(handle.tts_command_sender());
        self.tts_event_rx = Some(handle.tts_event_receiver());
        self.playback_tx = Some(handle.playback_sender());
        self.speech_queue = handle.speech_queue();
        self.speech_enabled = handle.speech_enabled();
    }

    /// Fold one frame duration into the FPS average
    pub fn update_fps(&mut self, delta_time: f64) {
        self.frame_times.push_back(delta_time);
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if !self.frame_times.is_empty() {
            let avg_time: f64 =
                self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
            self.debug_info.fps = if avg_time > 0.0 { 1.0 / avg_time as f32 } else { 0.0 };
        }
    }

    /// Send an assist request for the given mode
    ///
    /// Only one request may be in flight; further clicks are ignored until
    /// the reply (or error) arrives.
    pub fn request_description(&mut self, mode: AssistMode) {
        if self.request_state.is_pending() {
            self.debug_info
                .add_log("Request already in flight, ignoring".to_string());
            return;
        }

        let Some(tx) = &self.assist_command_tx else {
            self.debug_info
                .add_log("Assist pipeline not connected".to_string());
            return;
        };

        let request_id = Uuid::new_v4();
        let sent = tx.send(AssistCommand::Describe {
            mode,
            image: self.attached_image.clone(),
            request_id,
        });

        if sent.is_err() {
            self.set_error("Connection failed. Check that the assist service is running.");
            return;
        }

        self.messages.add(Message::mode_request(mode));
        self.insight_text = PROCESSING_TEXT.to_string();
        self.insight_is_error = false;
        self.last_error = None;
        self.request_state = RequestState::Pending { mode, request_id };
        self.debug_info.add_log(format!("Requested: {}", mode.label()));
    }

    /// Attach an image file to subsequent requests
    pub fn attach_image(&mut self, path: &Path) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture.jpg".to_string());

        let mime_type = path
            .extension()
            .map(|e| ImageAttachment::mime_for_extension(&e.to_string_lossy()))
            .unwrap_or("image/jpeg");

        match std::fs::read(path) {
            Ok(data) => {
                self.debug_info
                    .add_log(format!("Attached {} ({} bytes)", file_name, data.len()));
                self.messages.add(Message::attachment(ImageRef {
                    file_name: file_name.clone(),
                    mime_type: mime_type.to_string(),
                    size_bytes: data.len(),
                }));
                self.attached_image = Some(ImageAttachment::new(file_name, data, mime_type));
            }
            Err(e) => {
                self.debug_info
                    .add_log(format!("Failed to read {}: {}", file_name, e));
            }
        }
    }

    /// Remove the attached image
    pub fn clear_attachment(&mut self) {
        self.attached_image = None;
    }

    /// Toggle speech output
    pub fn toggle_speech(&mut self) {
        self.speech_enabled = !self.speech_enabled;
        if !self.speech_enabled {
            self.speech_queue.clear();
        }
        self.debug_info.add_log(format!(
            "Speech {}",
            if self.speech_enabled { "on" } else { "off" }
        ));
    }

    /// Clear the interaction log
    pub fn clear_log(&mut self) {
        self.messages.clear();
        self.insight_text = WELCOME_TEXT.to_string();
        self.insight_is_error = false;
    }

    /// Drain pending events from both pipelines
    pub fn poll_events(&mut self) {
        if let Some(rx) = self.assist_event_rx.clone() {
            while let Ok(event) = rx.try_recv() {
                self.handle_assist_event(event);
            }
        }

        if let Some(rx) = self.tts_event_rx.clone() {
            while let Ok(event) = rx.try_recv() {
                self.handle_tts_event(event);
            }
        }

        // Forward synthesized audio to the playback thread
        if self.speech_enabled {
            if let Some(tx) = &self.playback_tx {
                let samples = self.speech_queue.drain_available();
                if !samples.is_empty() {
                    let _ = tx.send(samples);
                }
            }
        }
    }

    fn handle_assist_event(&mut self, event: AssistEvent) {
        match event {
            AssistEvent::Started { mode, .. } => {
                self.debug_info.assist_status = format!("Processing {} request", mode);
            }
            AssistEvent::Description {
                text,
                mode,
                request_id,
                elapsed_ms,
            } => {
                let expected = match self.request_state {
                    RequestState::Pending { request_id, .. } => Some(request_id),
                    RequestState::Idle => None,
                };
                if expected != Some(request_id) {
                    self.debug_info
                        .add_log("Dropping reply for a superseded request".to_string());
                    return;
                }

                self.insight_text = format!("AI ({}): \"{}\"", mode.label(), text);
                self.insight_is_error = false;
                self.request_state = RequestState::Idle;
                self.debug_info.assist_status = format!("{} reply in {}ms", mode, elapsed_ms);

                // Speak the description aloud
                let mut spoken = false;
                if self.speech_enabled {
                    if let Some(tx) = &self.tts_command_tx {
                        spoken = tx
                            .send(TTSCommand::Speak {
                                text: text.clone(),
                                request_id,
                            })
                            .is_ok();
                    }
                }

                self.messages
                    .add(Message::description(mode, text, elapsed_ms, spoken));
            }
            AssistEvent::Error { error, .. } => {
                self.set_error(&error);
                self.debug_info.add_log(format!("Assist error: {}", error));
            }
            AssistEvent::Shutdown => {
                self.debug_info.add_log("Assist pipeline shutdown".to_string());
            }
        }
    }

    fn handle_tts_event(&mut self, event: TTSEvent) {
        match event {
            TTSEvent::Audio(audio) => {
                self.speech_queue.enqueue(audio);
                self.debug_info.speech_queue_status = format!(
                    "Queue: {} utterances, {:.1}s",
                    self.speech_queue.len(),
                    self.speech_queue.total_duration_secs()
                );
            }
            TTSEvent::Error { error, .. } => {
                self.debug_info.add_log(format!("TTS error: {}", error));
            }
            TTSEvent::Shutdown => {
                self.debug_info.add_log("TTS pipeline shutdown".to_string());
            }
        }
    }

    fn set_error(&mut self, message: &str) {
        self.insight_text = message.to_string();
        self.insight_is_error = true;
        self.last_error = Some(message.to_string());
        self.request_state = RequestState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn connected_state() -> (
        AppState,
        Receiver<AssistCommand>,
        Sender<AssistEvent>,
        Receiver<TTSCommand>,
    ) {
        let mut state = AppState::new();

        let (cmd_tx, cmd_rx) = bounded(8);
        let (event_tx, event_rx) = bounded(8);
        let (tts_cmd_tx, tts_cmd_rx) = bounded(8);

        state.assist_command_tx = Some(cmd_tx);
        state.assist_event_rx = Some(event_rx);
        state.tts_command_tx = Some(tts_cmd_tx);

        (state, cmd_rx, event_tx, tts_cmd_rx)
    }

    #[test]
    fn test_request_sets_pending_and_sends_command() {
        let (mut state, cmd_rx, _event_tx, _tts_rx) = connected_state();

        state.request_description(AssistMode::ReadText);

        assert!(state.request_state.is_pending());
        assert_eq!(state.insight_text, PROCESSING_TEXT);
        assert_eq!(state.messages.len(), 1);

        match cmd_rx.try_recv().unwrap() {
            AssistCommand::Describe { mode, image, .. } => {
                assert_eq!(mode, AssistMode::ReadText);
                assert!(image.is_none());
            }
            _ => panic!("Expected describe command"),
        }
    }

    #[test]
    fn test_second_request_while_pending_is_ignored() {
        let (mut state, cmd_rx, _event_tx, _tts_rx) = connected_state();

        state.request_description(AssistMode::ReadText);
        state.request_description(AssistMode::Navigation);

        // Only the first command was sent
        assert!(cmd_rx.try_recv().is_ok());
        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_description_event_completes_request_and_speaks() {
        let (mut state, cmd_rx, event_tx, tts_rx) = connected_state();

        state.request_description(AssistMode::ExplainDiagram);
        let request_id = match cmd_rx.try_recv().unwrap() {
            AssistCommand::Describe { request_id, .. } => request_id,
            _ => panic!("Expected describe command"),
        };

        event_tx
            .send(AssistEvent::Description {
                text: "This diagram contains: axes, bars, legend.".to_string(),
                mode: AssistMode::ExplainDiagram,
                request_id,
                elapsed_ms: 300,
            })
            .unwrap();

        state.poll_events();

        assert!(!state.request_state.is_pending());
        assert_eq!(
            state.insight_text,
            "AI (Explain Diagram): \"This diagram contains: axes, bars, legend.\""
        );
        assert_eq!(state.messages.len(), 2);

        // The description was forwarded to TTS
        match tts_rx.try_recv().unwrap() {
            TTSCommand::Speak { text, .. } => assert!(text.starts_with("This diagram")),
            _ => panic!("Expected speak command"),
        }
    }

    #[test]
    fn test_speech_disabled_skips_tts() {
        let (mut state, cmd_rx, event_tx, tts_rx) = connected_state();
        state.speech_enabled = false;

        state.request_description(AssistMode::ReadText);
        let request_id = match cmd_rx.try_recv().unwrap() {
            AssistCommand::Describe { request_id, .. } => request_id,
            _ => panic!("Expected describe command"),
        };

        event_tx
            .send(AssistEvent::Description {
                text: "No text detected.".to_string(),
                mode: AssistMode::ReadText,
                request_id,
                elapsed_ms: 120,
            })
            .unwrap();

        state.poll_events();

        assert!(tts_rx.try_recv().is_err());
        assert!(!state.messages.latest().unwrap().metadata.spoken);
    }

    #[test]
    fn test_error_event_shows_error_and_resets() {
        let (mut state, _cmd_rx, event_tx, _tts_rx) = connected_state();

        state.request_description(AssistMode::Navigation);

        event_tx
            .send(AssistEvent::Error {
                error: "Connection failed. Check that the assist service is running.".to_string(),
                request_id: None,
            })
            .unwrap();

        state.poll_events();

        assert!(!state.request_state.is_pending());
        assert!(state.insight_is_error);
        assert!(state.insight_text.starts_with("Connection failed."));
        assert!(state.last_error.is_some());
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let (mut state, cmd_rx, event_tx, _tts_rx) = connected_state();

        state.request_description(AssistMode::ReadText);
        let _ = cmd_rx.try_recv();

        // A reply for some other request id must not change the insight
        event_tx
            .send(AssistEvent::Description {
                text: "stale".to_string(),
                mode: AssistMode::ReadText,
                request_id: Uuid::new_v4(),
                elapsed_ms: 5,
            })
            .unwrap();

        state.poll_events();

        assert!(state.request_state.is_pending());
        assert_eq!(state.insight_text, PROCESSING_TEXT);
    }

    #[test]
    fn test_toggle_speech_clears_queue() {
        let mut state = AppState::new();
        assert!(state.speech_enabled);

        state.toggle_speech();
        assert!(!state.speech_enabled);

        state.toggle_speech();
        assert!(state.speech_enabled);
    }

    #[test]
    fn test_clear_log_resets_insight() {
        let (mut state, _cmd_rx, _event_tx, _tts_rx) = connected_state();

        state.request_description(AssistMode::ReadText);
        state.clear_log();

        assert!(state.messages.is_empty());
        assert_eq!(state.insight_text, WELCOME_TEXT);
    }
}
