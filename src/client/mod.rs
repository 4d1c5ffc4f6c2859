//! Chat client.
//!
//! [`ChatWidget`] owns the conversation transcript and talks to the assist
//! service through an [`AssistTransport`]. Every assistant reply is spoken
//! through the configured [`SpeechSynthesizer`]; speech recognition and media
//! capture are optional capabilities that silently stay off when missing.

pub mod capture;
pub mod voice;

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assist::LanguageHint;
use crate::web::protocol::{AssistRequest, AssistResponse};

pub use capture::{MediaDevices, MediaStream, NullMediaDevices, NullRecognizer, SpeechRecognizer};
pub use voice::{NullSynthesizer, SpeechSynthesizer};

/// First message of every conversation.
pub const GREETING: &str =
    "Hi, I'm Saathi. How are you feeling today? You can tell me anything, in English or Hindi.";

/// Substituted when the service answers without a usable reply.
pub const EMPTY_REPLY: &str = "I'm here for you.";

/// Appended when the service cannot be reached.
pub const OFFLINE_REPLY: &str = "I'm here to support you. While I couldn't reach the server, we can try a breathing exercise: inhale for 4, hold 4, exhale 6—repeat 3 times.";

/// Locale used for speech recognition sessions.
pub const RECOGNITION_LOCALE: &str = "en-IN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Sends one assist request and returns the decoded response.
pub trait AssistTransport {
    fn send(&self, request: &AssistRequest) -> Result<AssistResponse>;
}

/// `POST {base_url}/api/assist` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the service answers `GET /api/ping`.
    pub fn is_reachable(&self) -> bool {
        let url = format!("{}/api/ping", self.base_url);
        ureq::get(&url)
            .timeout(Duration::from_secs(3))
            .call()
            .is_ok()
    }
}

impl AssistTransport for HttpTransport {
    fn send(&self, request: &AssistRequest) -> Result<AssistResponse> {
        let url = format!("{}/api/assist", self.base_url);

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(request)
            .with_context(|| format!("assist request to {url} failed"))?;

        resp.into_json()
            .context("failed to parse assist response")
    }
}

// ---------------------------------------------------------------------------
// Chat widget
// ---------------------------------------------------------------------------

/// Conversation state plus the capabilities it drives.
pub struct ChatWidget {
    transport: Box<dyn AssistTransport>,
    speech: Box<dyn SpeechSynthesizer>,
    recognizer: Box<dyn SpeechRecognizer>,
    media: Box<dyn MediaDevices>,

    transcript: Vec<ChatMessage>,
    input: String,
    loading: bool,
    lang: Option<LanguageHint>,
    listening: bool,
    stream: Option<Box<dyn MediaStream>>,
}

impl ChatWidget {
    /// A widget with no speech, recognition or camera. The transcript
    /// starts with [`GREETING`].
    pub fn new(transport: Box<dyn AssistTransport>) -> Self {
        Self {
            transport,
            speech: Box::new(NullSynthesizer),
            recognizer: Box::new(NullRecognizer),
            media: Box::new(NullMediaDevices),
            transcript: vec![ChatMessage::assistant(GREETING)],
            input: String::new(),
            loading: false,
            lang: None,
            listening: false,
            stream: None,
        }
    }

    pub fn with_speech(mut self, speech: Box<dyn SpeechSynthesizer>) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_media(mut self, media: Box<dyn MediaDevices>) -> Self {
        self.media = media;
        self
    }

    /// Send this language hint with every request.
    pub fn with_language(mut self, lang: LanguageHint) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_camera_on(&self) -> bool {
        self.stream.is_some()
    }

    // -----------------------------------------------------------------------
    // Messaging
    // -----------------------------------------------------------------------

    /// Submit the current input buffer.
    pub fn submit_input(&mut self) -> Option<&ChatMessage> {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Send `text` and append the assistant's answer.
    ///
    /// Blank text is ignored. A pending request does not block a new one.
    /// A transport failure appends [`OFFLINE_REPLY`] instead of an error;
    /// the conversation always continues. Returns the appended assistant
    /// message.
    pub fn submit(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));
        self.input.clear();
        self.loading = true;

        let request = AssistRequest::new(text, self.lang.map(|l| l.as_str().to_string()));
        let reply = match self.transport.send(&request) {
            Ok(resp) => resp
                .reply
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "assist service unreachable, using local reply");
                OFFLINE_REPLY.to_string()
            }
        };

        self.loading = false;
        self.speak(&reply);
        self.transcript.push(ChatMessage::assistant(reply));
        self.transcript.last()
    }

    /// Speak `text`; speech failures are logged and otherwise ignored.
    fn speak(&mut self, text: &str) {
        if let Err(e) = self.speech.speak(text) {
            tracing::debug!(error = %e, "speech synthesis failed");
        }
    }

    // -----------------------------------------------------------------------
    // Speech recognition
    // -----------------------------------------------------------------------

    /// Start or stop a recognition session. Without a recognizer this does
    /// nothing.
    pub fn toggle_listening(&mut self) {
        if !self.recognizer.is_available() {
            return;
        }

        if self.listening {
            self.recognizer.stop();
            self.listening = false;
            return;
        }

        match self.recognizer.start(RECOGNITION_LOCALE) {
            Ok(()) => self.listening = true,
            Err(e) => tracing::warn!(error = %e, "could not start speech recognition"),
        }
    }

    /// Collect a finished transcript into the input buffer. The session
    /// ends with its first final result.
    pub fn poll_recognition(&mut self) -> bool {
        if !self.listening {
            return false;
        }
        match self.recognizer.poll_result() {
            Some(transcript) => {
                self.input = transcript;
                self.listening = false;
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Media capture
    // -----------------------------------------------------------------------

    /// Turn the camera on or off.
    pub fn toggle_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            return;
        }

        match self.media.acquire() {
            Ok(stream) => self.stream = Some(stream),
            Err(e) => tracing::warn!(error = %e, "could not access camera"),
        }
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
        self.speech.cancel();
    }
}
