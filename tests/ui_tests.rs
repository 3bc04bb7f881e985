//! UI automation tests driven through the accessibility tree
//!
//! Vista is an accessibility tool, so every control must be reachable via
//! AccessKit. The tests inject backend events over the same channels the
//! orchestrator would use and watch the rendered tree react.

use crossbeam_channel::{bounded, Receiver, Sender};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use vista::assist::pipeline::{AssistCommand, AssistEvent};
use vista::assist::AssistMode;
use vista::speech::tts::TTSCommand;
use vista::ui::components::{InsightPanel, ModeBar};
use vista::ui::state::PROCESSING_TEXT;
use vista::ui::{AppState, Theme};

/// Application state plus our ends of the pipeline channels
struct TestApp {
    state: AppState,
    theme: Theme,
    assist_commands: Receiver<AssistCommand>,
    assist_events: Sender<AssistEvent>,
    tts_commands: Receiver<TTSCommand>,
}

impl TestApp {
    fn new() -> Self {
        let mut state = AppState::new();

        let (cmd_tx, cmd_rx) = bounded(8);
        let (event_tx, event_rx) = bounded(8);
        let (tts_cmd_tx, tts_cmd_rx) = bounded(8);

        state.assist_command_tx = Some(cmd_tx);
        state.assist_event_rx = Some(event_rx);
        state.tts_command_tx = Some(tts_cmd_tx);

        Self {
            state,
            theme: Theme::dark(),
            assist_commands: cmd_rx,
            assist_events: event_tx,
            tts_commands: tts_cmd_rx,
        }
    }
}

fn build_harness() -> Harness<'static, TestApp> {
    let mut harness = Harness::builder()
        .with_size(egui::Vec2::new(700.0, 500.0))
        .build_state(
            |ctx, app: &mut TestApp| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    InsightPanel::new(&app.state, &app.theme).show(ui);
                    ui.separator();
                    ModeBar::new(&mut app.state, &app.theme).show(ui);
                });
            },
            TestApp::new(),
        );
    harness.run();
    harness
}

/// Pop the describe command the UI just sent and return its request id
fn sent_request_id(harness: &Harness<'_, TestApp>) -> uuid::Uuid {
    match harness.state().assist_commands.try_recv().unwrap() {
        AssistCommand::Describe { request_id, .. } => request_id,
        other => panic!("Expected describe command, got {:?}", other),
    }
}

#[test]
fn test_mode_buttons_exist() {
    let harness = build_harness();

    let _read = harness.get_by_label("Read Text");
    let _diagram = harness.get_by_label("Explain Diagram");
    let _navigation = harness.get_by_label("Navigation & People");
}

#[test]
fn test_welcome_insight_accessible() {
    let harness = build_harness();

    let _insight = harness.get_by_label("Insight: Select an assistance mode to begin.");
}

#[test]
fn test_clicking_mode_button_sends_request() {
    let mut harness = build_harness();

    harness.get_by_label("Read Text").click();
    harness.run();

    assert!(harness.state().state.request_state.is_pending());
    assert_eq!(harness.state().state.insight_text, PROCESSING_TEXT);

    match harness.state().assist_commands.try_recv().unwrap() {
        AssistCommand::Describe { mode, image, .. } => {
            assert_eq!(mode, AssistMode::ReadText);
            assert!(image.is_none());
        }
        other => panic!("Expected describe command, got {:?}", other),
    }

    // The progress line is accessible too
    let _processing = harness.get_by_label(&format!("Insight: {}", PROCESSING_TEXT));
}

#[test]
fn test_one_request_in_flight() {
    let mut harness = build_harness();

    harness.get_by_label("Read Text").click();
    harness.run();

    harness.get_by_label("Navigation & People").click();
    harness.run();

    // Only the first click produced a command
    assert!(harness.state().assist_commands.try_recv().is_ok());
    assert!(harness.state().assist_commands.try_recv().is_err());
}

#[test]
fn test_description_flow() {
    let mut harness = build_harness();

    harness.get_by_label("Explain Diagram").click();
    harness.run();

    let request_id = sent_request_id(&harness);

    harness
        .state()
        .assist_events
        .send(AssistEvent::Description {
            text: "This diagram contains: axes, bars, legend.".to_string(),
            mode: AssistMode::ExplainDiagram,
            request_id,
            elapsed_ms: 250,
        })
        .unwrap();

    harness.state_mut().state.poll_events();
    harness.run();

    assert!(!harness.state().state.request_state.is_pending());

    // Insight shows the description in the "AI (mode)" form
    let _insight = harness.get_by_label(
        "Insight: AI (Explain Diagram): \"This diagram contains: axes, bars, legend.\"",
    );

    // The description appears in the history
    let _entry = harness.get_by_label("Description: This diagram contains: axes, bars, legend.");

    // And was forwarded to the speech synthesizer
    match harness.state().tts_commands.try_recv().unwrap() {
        TTSCommand::Speak { text, .. } => {
            assert_eq!(text, "This diagram contains: axes, bars, legend.");
        }
        other => panic!("Expected speak command, got {:?}", other),
    }
}

#[test]
fn test_error_is_shown() {
    let mut harness = build_harness();

    harness.get_by_label("Navigation & People").click();
    harness.run();

    harness
        .state()
        .assist_events
        .send(AssistEvent::Error {
            error: "Connection failed. Check that the assist service is running.".to_string(),
            request_id: None,
        })
        .unwrap();

    harness.state_mut().state.poll_events();
    harness.run();

    assert!(harness.state().state.insight_is_error);
    assert!(!harness.state().state.request_state.is_pending());

    let _insight = harness
        .get_by_label("Insight: Connection failed. Check that the assist service is running.");
}

#[test]
fn test_speech_toggle() {
    let mut harness = build_harness();

    assert!(harness.state().state.speech_enabled);

    harness.get_by_label("Toggle speech").click();
    harness.run();

    assert!(!harness.state().state.speech_enabled);

    harness.get_by_label("Toggle speech").click();
    harness.run();

    assert!(harness.state().state.speech_enabled);
}

#[test]
fn test_mode_request_appears_in_history() {
    let mut harness = build_harness();

    harness.get_by_label("Read Text").click();
    harness.run();

    let _entry = harness.get_by_label("Mode request: Read Text");
}
