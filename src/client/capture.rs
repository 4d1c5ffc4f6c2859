//! Speech recognition and media capture capabilities.
//!
//! The terminal client has neither, so the provided implementations report
//! themselves unavailable. Richer front ends plug in their own.

use anyhow::{Result, bail};

/// Speech-to-text capability producing a single final transcript per session.
pub trait SpeechRecognizer {
    fn is_available(&self) -> bool;

    /// Start one recognition session in `locale`.
    fn start(&mut self, locale: &str) -> Result<()>;

    fn stop(&mut self);

    /// Take the final transcript once the session has produced one.
    fn poll_result(&mut self) -> Option<String>;
}

/// A live media stream (camera/microphone).
pub trait MediaStream {
    /// Stop every track of the stream.
    fn stop_tracks(&mut self);
}

/// Access to capture devices.
pub trait MediaDevices {
    fn acquire(&mut self) -> Result<Box<dyn MediaStream>>;
}

#[derive(Debug, Default)]
pub struct NullRecognizer;

impl SpeechRecognizer for NullRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _locale: &str) -> Result<()> {
        bail!("speech recognition is not available")
    }

    fn stop(&mut self) {}

    fn poll_result(&mut self) -> Option<String> {
        None
    }
}

#[derive(Debug, Default)]
pub struct NullMediaDevices;

impl MediaDevices for NullMediaDevices {
    fn acquire(&mut self) -> Result<Box<dyn MediaStream>> {
        bail!("no camera available")
    }
}
