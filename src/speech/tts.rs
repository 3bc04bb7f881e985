//! Text-to-speech for assist descriptions (sherpa-rs VITS models)
//!
//! One description becomes one utterance. There is no streaming or segment
//! ordering here: the assist service replies with a complete description, and
//! audio from a newer request always supersedes anything still queued.

use crate::audio::resample_audio;
use crate::{Result, VistaError};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Native output rate of the Piper-style VITS voices Vista ships with
pub const VITS_SAMPLE_RATE: u32 = 22050;

/// Configuration for the TTS engine
#[derive(Clone, Debug)]
pub struct TTSConfig {
    /// Path to the ONNX model file
    pub model_path: String,

    /// Path to the tokens file
    pub tokens_path: String,

    /// Lexicon file, required by some voices
    pub lexicon_path: Option<String>,

    /// espeak-ng data directory, required by some voices
    pub data_dir: Option<String>,

    /// Length scale; 1.0 is normal speed, lower is faster
    pub length_scale: f32,

    /// Noise scale for variation
    pub noise_scale: f32,

    /// Noise scale width
    pub noise_scale_w: f32,

    /// Speaker ID for multi-speaker voices
    pub speaker_id: i32,

    /// Rate to resample to after synthesis
    pub output_sample_rate: u32,

    /// Channel capacity for pending utterances
    pub queue_size: usize,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            tokens_path: String::new(),
            lexicon_path: None,
            data_dir: None,
            length_scale: 1.0,
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            speaker_id: 0,
            output_sample_rate: VITS_SAMPLE_RATE,
            queue_size: 16,
        }
    }
}

impl TTSConfig {
    /// Create a new TTS config with required paths
    pub fn new(model_path: impl Into<String>, tokens_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            ..Default::default()
        }
    }

    /// Set the lexicon path
    pub fn with_lexicon(mut self, lexicon_path: impl Into<String>) -> Self {
        self.lexicon_path = Some(lexicon_path.into());
        self
    }

    /// Set the speaker ID for multi-speaker voices
    pub fn with_speaker(mut self, speaker_id: i32) -> Self {
        self.speaker_id = speaker_id;
        self
    }

    /// Set the speech rate (length scale)
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.length_scale = 1.0 / speed.max(0.1); // Invert: higher speed = lower length_scale
        self
    }

    /// Set the output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.output_sample_rate = sample_rate;
        self
    }
}

/// One synthesized description, mono f32
#[derive(Clone, Debug)]
pub struct TTSAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,

    /// The assist request this utterance answers
    pub request_id: Uuid,
}

impl TTSAudio {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn duration_ms(&self) -> u64 {
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }
}

/// Command sent to the TTS pipeline
#[derive(Clone, Debug)]
pub enum TTSCommand {
    /// Speak a description aloud
    Speak { text: String, request_id: Uuid },

    /// Shutdown the pipeline
    Shutdown,
}

/// Event emitted by the TTS pipeline
#[derive(Clone, Debug)]
pub enum TTSEvent {
    /// A description was synthesized
    Audio(TTSAudio),

    /// Synthesis failed
    Error {
        error: String,
        request_id: Option<Uuid>,
    },

    /// Pipeline has shut down
    Shutdown,
}

fn require_file(path: &str, what: &str) -> Result<()> {
    if path.is_empty() {
        return Err(VistaError::ConfigError(format!("{} path is required", what)));
    }
    if !Path::new(path).exists() {
        return Err(VistaError::ModelLoadError(format!(
            "{} not found: {}",
            what, path
        )));
    }
    Ok(())
}

/// TTS engine wrapping sherpa-rs VitsTts
pub struct TTSEngine {
    tts: VitsTts,
    config: TTSConfig,
}

impl TTSEngine {
    pub fn new(config: TTSConfig) -> Result<Self> {
        require_file(&config.model_path, "Model")?;
        require_file(&config.tokens_path, "Tokens file")?;

        info!("Loading VITS TTS model from: {}", config.model_path);

        let vits_config = VitsTtsConfig {
            model: config.model_path.clone(),
            tokens: config.tokens_path.clone(),
            lexicon: config.lexicon_path.clone().unwrap_or_default(),
            data_dir: config.data_dir.clone().unwrap_or_default(),
            length_scale: config.length_scale,
            noise_scale: config.noise_scale,
            noise_scale_w: config.noise_scale_w,
            ..Default::default()
        };

        let tts = VitsTts::new(vits_config);

        info!("TTS engine initialized successfully");

        Ok(Self { tts, config })
    }

    /// Synthesize one complete description
    ///
    /// Returns empty audio when the text normalizes to nothing; the caller
    /// should not enqueue it.
    pub fn synthesize(&mut self, text: &str, request_id: Uuid) -> Result<TTSAudio> {
        let normalized = normalize_speech_text(text);
        if normalized.is_empty() {
            return Ok(TTSAudio {
                samples: Vec::new(),
                sample_rate: self.config.output_sample_rate,
                request_id,
            });
        }

        debug!("Synthesizing: {}", normalized);

        let audio = self
            .tts
            .create(&normalized, self.config.speaker_id, 1.0)
            .map_err(|e| VistaError::TTSError(format!("Synthesis failed: {}", e)))?;

        let mut samples = audio.samples;
        let model_sample_rate = audio.sample_rate as u32;

        if self.config.output_sample_rate != model_sample_rate {
            samples = resample_audio(&samples, model_sample_rate, self.config.output_sample_rate)?;
        }

        debug!(
            "Synthesized {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / self.config.output_sample_rate as f32
        );

        Ok(TTSAudio {
            samples,
            sample_rate: self.config.output_sample_rate,
            request_id,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.output_sample_rate
    }
}

/// TTS pipeline with channel-based communication
///
/// The worker thread owns the engine; one Speak command yields at most one
/// Audio event.
pub struct TTSPipeline {
    config: TTSConfig,
    command_tx: Sender<TTSCommand>,
    command_rx: Receiver<TTSCommand>,
    event_tx: Sender<TTSEvent>,
    event_rx: Receiver<TTSEvent>,
}

impl TTSPipeline {
    pub fn new(config: TTSConfig) -> Self {
        let (command_tx, command_rx) = bounded(config.queue_size);
        let (event_tx, event_rx) = bounded(config.queue_size);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<TTSCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<TTSEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread
    pub fn start_worker(self) -> Result<thread::JoinHandle<()>> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        let handle = thread::spawn(move || {
            info!("TTS pipeline worker starting");

            let mut engine = match TTSEngine::new(config) {
                Ok(engine) => engine,
                Err(e) => {
                    error!("Failed to initialize TTS engine: {}", e);
                    let _ = event_tx.send(TTSEvent::Error {
                        error: e.to_string(),
                        request_id: None,
                    });
                    let _ = event_tx.send(TTSEvent::Shutdown);
                    return;
                }
            };

            info!("TTS pipeline worker ready");

            while let Ok(command) = command_rx.recv() {
                match command {
                    TTSCommand::Speak { text, request_id } => {
                        debug!(
                            "Speaking request {}: {}",
                            request_id,
                            text.chars().take(50).collect::<String>()
                        );

                        match engine.synthesize(&text, request_id) {
                            Ok(audio) if audio.samples.is_empty() => {}
                            Ok(audio) => {
                                let _ = event_tx.send(TTSEvent::Audio(audio));
                            }
                            Err(e) => {
                                warn!("TTS synthesis failed for request {}: {}", request_id, e);
                                let _ = event_tx.send(TTSEvent::Error {
                                    error: e.to_string(),
                                    request_id: Some(request_id),
                                });
                            }
                        }
                    }

                    TTSCommand::Shutdown => {
                        info!("TTS pipeline worker shutting down");
                        let _ = event_tx.send(TTSEvent::Shutdown);
                        break;
                    }
                }
            }

            info!("TTS pipeline worker stopped");
        });

        Ok(handle)
    }
}

#[derive(Default)]
struct QueueInner {
    /// Request currently owning the queue
    owner: Option<Uuid>,
    utterances: VecDeque<TTSAudio>,
}

/// Queue of synthesized utterances awaiting playback
///
/// Audio for a new request evicts whatever the previous request left behind,
/// so a stale description is never spoken over a fresh one.
#[derive(Clone)]
pub struct SpeechQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl SpeechQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner::default())),
        }
    }

    pub fn enqueue(&self, audio: TTSAudio) {
        let mut inner = self.inner.lock();

        if inner.owner != Some(audio.request_id) {
            inner.utterances.clear();
            inner.owner = Some(audio.request_id);
        }

        inner.utterances.push_back(audio);
    }

    pub fn dequeue(&self) -> Option<TTSAudio> {
        self.inner.lock().utterances.pop_front()
    }

    /// Collect every queued sample for playback, oldest first
    pub fn drain_available(&self) -> Vec<f32> {
        let mut inner = self.inner.lock();
        let mut samples = Vec::new();

        while let Some(audio) = inner.utterances.pop_front() {
            samples.extend(audio.samples);
        }

        samples
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.utterances.clear();
        inner.owner = None;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().utterances.is_empty()
    }

    pub fn total_duration_secs(&self) -> f32 {
        self.inner
            .lock()
            .utterances
            .iter()
            .map(|s| s.duration_secs())
            .sum()
    }
}

impl Default for SpeechQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Abbreviations that show up in descriptions of signs, documents, and rooms
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Dr.", "Doctor"),
    ("Mr.", "Mister"),
    ("Mrs.", "Misses"),
    ("Ms.", "Miss"),
    ("St.", "Street"),
    ("Ave.", "Avenue"),
    ("Rm.", "Room"),
    ("No.", "Number"),
    ("fig.", "figure"),
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    ("etc.", "etcetera"),
    ("vs.", "versus"),
    ("ft.", "feet"),
    ("in.", "inches"),
    ("m.", "meters"),
    ("km.", "kilometers"),
];

const SYMBOLS: &[(char, &str)] = &[
    ('&', " and "),
    ('%', " percent"),
    ('@', " at "),
    ('#', " number "),
    ('$', " dollars "),
    ('€', " euros "),
    ('£', " pounds "),
    ('+', " plus "),
    ('=', " equals "),
];

const ORDINALS: &[(&str, &str)] = &[
    ("1st", "first"),
    ("2nd", "second"),
    ("3rd", "third"),
    ("4th", "fourth"),
    ("5th", "fifth"),
    ("6th", "sixth"),
    ("7th", "seventh"),
    ("8th", "eighth"),
    ("9th", "ninth"),
    ("10th", "tenth"),
];

/// Normalize a description so it reads naturally when spoken
///
/// Expands abbreviations, symbols, and small ordinals, then strips characters
/// the voice would stumble over.
pub fn normalize_speech_text(text: &str) -> String {
    let mut result = text.to_string();

    for (abbrev, expansion) in ABBREVIATIONS {
        result = result.replace(abbrev, expansion);
    }

    let mut expanded = String::with_capacity(result.len());
    for c in result.chars() {
        match SYMBOLS.iter().find(|(symbol, _)| *symbol == c) {
            Some((_, replacement)) => expanded.push_str(replacement),
            None => expanded.push(c),
        }
    }

    let expanded = expanded
        .split_whitespace()
        .map(|word| {
            for (ordinal, spoken) in ORDINALS {
                if word == *ordinal {
                    return spoken.to_string();
                }
            }
            word.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ");

    expanded
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,!?;:'-\"".contains(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
