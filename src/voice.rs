//! Voice input and spoken replies.
//!
//! The adapter never touches a platform API directly: recognition and
//! synthesis come from an injected [`SpeechPlatform`]. Platforms without speech
//! use [`NullSpeechPlatform`], which reports recognition as unsupported and
//! ignores playback. The listening flag is published on a `watch` channel so
//! a view can follow recognizer callbacks.

use std::sync::Arc;
use tokio::sync::watch;

use crate::types::Language;

pub const UNSUPPORTED_MESSAGE: &str = "Speech recognition not supported in this browser.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("recognizer failed to start: {0}")]
    Start(String),

    #[error("recognizer failed to stop: {0}")]
    Stop(String),

    #[error("recognition error: {0}")]
    Recognition(String),
}

/// Callbacks a recognizer fires while it runs.
pub trait RecognitionListener: Send + Sync {
    fn on_start(&self);
    fn on_end(&self);
    fn on_error(&self, error: VoiceError);
    /// The final transcript of one utterance.
    fn on_result(&self, transcript: &str);
}

/// A single-result, non-interim speech recognizer.
pub trait Recognizer: Send {
    fn set_language(&mut self, language: Language);
    fn start(&mut self) -> Result<(), VoiceError>;
    fn stop(&mut self) -> Result<(), VoiceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `hi-IN`.
    pub lang: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    /// `None` plays with the platform default voice.
    pub voice: Option<Voice>,
}

/// Speech capabilities of the host platform.
pub trait SpeechPlatform: Send + Sync {
    /// `None` when the platform cannot recognize speech.
    fn recognizer(
        &self,
        language: Language,
        listener: Arc<dyn RecognitionListener>,
    ) -> Option<Box<dyn Recognizer>>;

    fn voices(&self) -> Vec<Voice>;

    fn speak(&self, utterance: Utterance);

    fn cancel_speech(&self);

    /// Platform-level notice. The caller still shows the message itself
    /// when [`VoiceAdapter::toggle_listening`] reports [`Toggle::Unsupported`].
    fn alert(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeechPlatform;

impl SpeechPlatform for NullSpeechPlatform {
    fn recognizer(
        &self,
        _language: Language,
        _listener: Arc<dyn RecognitionListener>,
    ) -> Option<Box<dyn Recognizer>> {
        None
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _utterance: Utterance) {}

    fn cancel_speech(&self) {}

    fn alert(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Receives each non-empty transcript, already trimmed.
pub type TranscriptSink = Arc<dyn Fn(String) + Send + Sync>;

/// What a press of the listen button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Stopped,
    /// No recognizer on this platform. The user must be told
    /// [`UNSUPPORTED_MESSAGE`].
    Unsupported,
    /// The recognizer refused to start or stop; already logged.
    Failed,
}

struct AdapterListener {
    listening: watch::Sender<bool>,
    transcripts: TranscriptSink,
}

impl RecognitionListener for AdapterListener {
    fn on_start(&self) {
        self.listening.send_replace(true);
    }

    fn on_end(&self) {
        self.listening.send_replace(false);
    }

    fn on_error(&self, error: VoiceError) {
        tracing::warn!(%error, "speech recognition error");
    }

    fn on_result(&self, transcript: &str) {
        let text = transcript.trim();
        if !text.is_empty() {
            (self.transcripts)(text.to_string());
        }
    }
}

/// Picks the first voice whose language tag starts with `language`.
pub fn best_voice(voices: &[Voice], language: &str) -> Option<Voice> {
    voices
        .iter()
        .find(|voice| voice.lang.starts_with(language))
        .cloned()
}

/// Cancels any playback in flight and speaks `text`, preferring a voice
/// whose tag starts with the language code.
pub fn speak(platform: &dyn SpeechPlatform, text: &str, language: Language) {
    let code = language.code();
    let voice = best_voice(&platform.voices(), code);
    platform.cancel_speech();
    platform.speak(Utterance {
        text: text.to_string(),
        lang: code.to_string(),
        voice,
    });
}

pub struct VoiceAdapter {
    platform: Arc<dyn SpeechPlatform>,
    recognizer: Option<Box<dyn Recognizer>>,
    listener: Arc<AdapterListener>,
    language: Language,
    open: bool,
}

impl VoiceAdapter {
    pub fn new(
        platform: Arc<dyn SpeechPlatform>,
        language: Language,
        transcripts: TranscriptSink,
    ) -> Self {
        let (listening, _) = watch::channel(false);
        let listener = Arc::new(AdapterListener {
            listening,
            transcripts,
        });
        Self {
            platform,
            recognizer: None,
            listener,
            language,
            open: false,
        }
    }

    fn ensure_recognizer(&mut self) -> bool {
        if self.recognizer.is_none() {
            let listener: Arc<dyn RecognitionListener> = self.listener.clone();
            self.recognizer = self.platform.recognizer(self.language, listener);
        }
        self.recognizer.is_some()
    }

    /// Shows the overlay and lazily builds a recognizer for the current
    /// language. An unsupported platform is only reported on toggle.
    pub fn open(&mut self) {
        self.open = true;
        self.ensure_recognizer();
    }

    pub fn close(&mut self) {
        if let Some(mut recognizer) = self.recognizer.take()
            && let Err(err) = recognizer.stop()
        {
            tracing::debug!(error = %err, "stopping recognizer on close");
        }
        self.listener.listening.send_replace(false);
        self.open = false;
    }

    pub fn toggle_listening(&mut self) -> Toggle {
        if !self.ensure_recognizer() {
            self.platform.alert(UNSUPPORTED_MESSAGE);
            return Toggle::Unsupported;
        }
        let listening = self.is_listening();
        let language = self.language;
        let Some(recognizer) = self.recognizer.as_mut() else {
            return Toggle::Unsupported;
        };
        let (result, done) = if listening {
            (recognizer.stop(), Toggle::Stopped)
        } else {
            recognizer.set_language(language);
            (recognizer.start(), Toggle::Started)
        };
        match result {
            Ok(()) => done,
            Err(err) => {
                tracing::warn!(error = %err, "toggle listening failed");
                Toggle::Failed
            }
        }
    }

    pub fn speak(&self, text: &str, language: Language) {
        speak(self.platform.as_ref(), text, language);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_listening(&self) -> bool {
        *self.listener.listening.borrow()
    }

    /// Follows the listening flag as recognizer callbacks flip it.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.listener.listening.subscribe()
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }
}
