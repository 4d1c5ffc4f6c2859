//! Speech synthesis for assistant replies.
//!
//! Replies are spoken through an external TTS program (`espeak` on Linux,
//! `say` on macOS). At most one utterance is live: every `speak` cancels the
//! previous child process first.

use std::process::{Child, Command, Stdio};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::schema::{VoiceConfig, VoiceEngine};
use crate::utils::process;

/// Voices matching this pattern (on `"name lang"`) are preferred.
static PREFERRED_VOICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)female|woman|en-IN|india|english").expect("voice pattern must compile")
});

/// Speech output capability.
pub trait SpeechSynthesizer {
    /// Speak `text`, cancelling any utterance still in flight.
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Stop the current utterance, if any.
    fn cancel(&mut self);
}

/// Synthesizer used when no engine is available or speech is muted.
#[derive(Debug, Default)]
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cancel(&mut self) {}
}

// ---------------------------------------------------------------------------
// Voice selection
// ---------------------------------------------------------------------------

/// A voice offered by the TTS engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Choose a voice: first preferred match, else first voice whose language
/// starts with `locale`, else the first voice.
pub fn pick_voice<'a>(voices: &'a [Voice], locale: &str) -> Option<&'a Voice> {
    let locale = normalize_locale(locale);

    voices
        .iter()
        .find(|v| PREFERRED_VOICE.is_match(&format!("{} {}", v.name, v.lang)))
        .or_else(|| {
            voices
                .iter()
                .find(|v| normalize_locale(&v.lang).starts_with(&locale))
        })
        .or_else(|| voices.first())
}

/// `en_IN` and `en-in` both compare equal to `en-IN`.
fn normalize_locale(raw: &str) -> String {
    raw.trim().replace('_', "-").to_ascii_lowercase()
}

/// Parse `espeak --voices` output.
///
/// ```text
/// Pty Language Age/Gender VoiceName          File          Other Languages
///  5  en-in          M  english-indian       other/en-in
/// ```
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [_, lang, _, name, ..] => Some(Voice::new(*name, *lang)),
                _ => None,
            }
        })
        .collect()
}

/// Parse `say -v ?` output.
///
/// ```text
/// Veena               en_IN    # Hello, my name is Veena.
/// ```
pub fn parse_say_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim_end();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            (!name.is_empty()).then(|| Voice::new(name, lang))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Command-backed synthesizer
// ---------------------------------------------------------------------------

/// Speaks by spawning a TTS program with the text as its last argument.
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSynthesizer {
    /// `args` come before the text on every invocation.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }

    /// Full argument list for one utterance. `--` keeps text that starts
    /// with `-` from being read as an option.
    fn utterance_args<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        let mut args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        args.push("--");
        args.push(text);
        args
    }

    /// True while the last utterance is still running.
    pub fn is_speaking(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.cancel();

        let child = Command::new(&self.program)
            .args(self.utterance_args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;

        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Engine resolution
// ---------------------------------------------------------------------------

const ESPEAK_BASE_WPM: f32 = 175.0;
const ESPEAK_BASE_PITCH: f32 = 50.0;
const SAY_BASE_WPM: f32 = 175.0;

/// Resolve `auto` to an installed engine, or `None` if nothing usable is found.
pub fn resolve_engine(engine: VoiceEngine) -> VoiceEngine {
    match engine {
        VoiceEngine::Auto => {
            if process::is_command_available("espeak") {
                VoiceEngine::Espeak
            } else if process::is_command_available("say") {
                VoiceEngine::Say
            } else {
                VoiceEngine::None
            }
        }
        other => other,
    }
}

/// Build the synthesizer described by `config`.
///
/// Disabled speech, a missing engine, or a failure to list voices all
/// degrade to [`NullSynthesizer`] or the engine's default voice.
pub fn synthesizer_from_config(config: &VoiceConfig) -> Box<dyn SpeechSynthesizer> {
    if !config.enabled {
        return Box::new(NullSynthesizer);
    }

    match resolve_engine(config.engine) {
        VoiceEngine::Espeak => {
            let voices = list_voices("espeak", &["--voices"], parse_espeak_voices);
            let mut args = vec![
                "-s".to_string(),
                ((ESPEAK_BASE_WPM * config.rate).round() as u32).to_string(),
                "-p".to_string(),
                ((ESPEAK_BASE_PITCH * config.pitch).round().clamp(0.0, 99.0) as u32).to_string(),
            ];
            if let Some(voice) = pick_voice(&voices, &config.locale) {
                args.extend(["-v".to_string(), voice.name.clone()]);
            }
            Box::new(CommandSynthesizer::new("espeak", args))
        }
        VoiceEngine::Say => {
            let voices = list_voices("say", &["-v", "?"], parse_say_voices);
            // `say` has no pitch control.
            let mut args = vec![
                "-r".to_string(),
                ((SAY_BASE_WPM * config.rate).round() as u32).to_string(),
            ];
            if let Some(voice) = pick_voice(&voices, &config.locale) {
                args.extend(["-v".to_string(), voice.name.clone()]);
            }
            Box::new(CommandSynthesizer::new("say", args))
        }
        VoiceEngine::Auto | VoiceEngine::None => {
            tracing::debug!("no speech engine available, replies will not be spoken");
            Box::new(NullSynthesizer)
        }
    }
}

fn list_voices(program: &str, args: &[&str], parse: fn(&str) -> Vec<Voice>) -> Vec<Voice> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => parse(&String::from_utf8_lossy(&output.stdout)),
        Ok(_) | Err(_) => {
            tracing::debug!(program, "could not list voices");
            Vec::new()
        }
    }
}
