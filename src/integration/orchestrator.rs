//! Wiring for the end-to-end assist flow
//!
//! Mode button -> assist service -> description -> TTS -> playback. The
//! orchestrator constructs the pipelines and starts their workers; the UI
//! drives them through the channel endpoints on [`OrchestratorHandle`].

use crate::assist::pipeline::{AssistCommand, AssistEvent, AssistPipeline};
use crate::integration::config::IntegrationConfig;
use crate::speech::tts::{SpeechQueue, TTSCommand, TTSEvent, TTSPipeline};
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::info;

#[cfg(feature = "audio-io")]
use crate::audio::{resample_audio, AudioOutput};
#[cfg(feature = "audio-io")]
use tracing::warn;

/// Channel endpoints the UI uses to drive the pipelines
pub struct OrchestratorHandle {
    assist_command_tx: Sender<AssistCommand>,
    assist_event_rx: Receiver<AssistEvent>,
    tts_command_tx: Sender<TTSCommand>,
    tts_event_rx: Receiver<TTSEvent>,
    playback_tx: Sender<Vec<f32>>,
    speech_queue: SpeechQueue,
    speech_enabled: bool,
}

impl OrchestratorHandle {
    pub fn assist_command_sender(&self) -> Sender<AssistCommand> {
        self.assist_command_tx.clone()
    }

    pub fn assist_event_receiver(&self) -> Receiver<AssistEvent> {
        self.assist_event_rx.clone()
    }

    pub fn tts_command_sender(&self) -> Sender<TTSCommand> {
        self.tts_command_tx.clone()
    }

    pub fn tts_event_receiver(&self) -> Receiver<TTSEvent> {
        self.tts_event_rx.clone()
    }

    pub fn playback_sender(&self) -> Sender<Vec<f32>> {
        self.playback_tx.clone()
    }

    pub fn speech_queue(&self) -> SpeechQueue {
        self.speech_queue.clone()
    }

    /// Whether speech output was enabled in the configuration
    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    /// Ask both pipelines to shut down
    pub fn shutdown(&self) {
        let _ = self.assist_command_tx.send(AssistCommand::Shutdown);
        let _ = self.tts_command_tx.send(TTSCommand::Shutdown);
    }
}

pub struct Orchestrator {
    config: IntegrationConfig,
    assist_pipeline: Option<AssistPipeline>,
    tts_pipeline: Option<TTSPipeline>,
    playback_rx: Receiver<Vec<f32>>,
}

impl Orchestrator {
    /// Construct the pipelines and the handle the UI will hold
    pub fn new(config: IntegrationConfig) -> Result<(Self, OrchestratorHandle)> {
        let (playback_tx, playback_rx) = bounded(64);

        let assist_pipeline = AssistPipeline::new(config.assist.clone());
        let tts_pipeline = TTSPipeline::new(config.tts.clone());

        let handle = OrchestratorHandle {
            assist_command_tx: assist_pipeline.command_sender(),
            assist_event_rx: assist_pipeline.event_receiver(),
            tts_command_tx: tts_pipeline.command_sender(),
            tts_event_rx: tts_pipeline.event_receiver(),
            playback_tx,
            speech_queue: SpeechQueue::new(),
            speech_enabled: config.enable_speech,
        };

        let orchestrator = Self {
            config,
            assist_pipeline: Some(assist_pipeline),
            tts_pipeline: Some(tts_pipeline),
            playback_rx,
        };

        Ok((orchestrator, handle))
    }

    /// Start all workers
    ///
    /// The assist worker always runs. The TTS worker and the playback thread
    /// only start when speech output is enabled.
    pub fn start(mut self) -> Result<()> {
        if let Some(assist_pipeline) = self.assist_pipeline.take() {
            assist_pipeline.start_worker()?;
            info!("Assist pipeline started");
        }

        if self.config.enable_speech {
            if let Some(tts_pipeline) = self.tts_pipeline.take() {
                tts_pipeline.start_worker()?;
                info!("TTS pipeline started");
            }

            #[cfg(feature = "audio-io")]
            spawn_playback_thread(self.playback_rx.clone(), self.config.tts.output_sample_rate);
        }

        Ok(())
    }
}

/// Thread owning the output device
///
/// Samples arriving on the playback channel are resampled to the device rate
/// and forwarded to the cpal stream. The thread ends when every playback
/// sender is dropped. A missing or broken device downgrades speech to
/// text-only rather than failing startup.
#[cfg(feature = "audio-io")]
fn spawn_playback_thread(playback_rx: Receiver<Vec<f32>>, tts_sample_rate: u32) {
    std::thread::spawn(move || {
        let mut output = match AudioOutput::new() {
            Ok(output) => output,
            Err(e) => {
                warn!("Speech playback unavailable: {}", e);
                return;
            }
        };

        let device_rate = output.sample_rate();
        let (device_tx, device_rx) = bounded(64);

        if let Err(e) = output.start_playback(device_rx) {
            warn!("Speech playback unavailable: {}", e);
            return;
        }

        while let Ok(samples) = playback_rx.recv() {
            match resample_audio(&samples, tts_sample_rate, device_rate) {
                Ok(resampled) => {
                    let _ = device_tx.send(resampled);
                }
                Err(e) => warn!("Failed to resample speech audio: {}", e),
            }
        }

        info!("Playback thread stopped");
    });
}
