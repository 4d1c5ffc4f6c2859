/// Configuration schema and defaults for saathi.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[server]`, `[assist]`, `[client]`, `[voice]`, `[storage]` and
/// `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::assist::LanguageHint;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level saathi configuration.
///
/// Maps directly to `~/.saathi/config.toml` and `.saathi.toml`. All sections
/// and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaathiConfig {
    pub server: ServerConfig,
    pub assist: AssistConfig,
    pub client: ClientConfig,
    pub voice: VoiceConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for `saathi serve`.
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [assist]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Hint used when a request carries no `lang` field.
    pub default_lang: LanguageHint,
}

// ---------------------------------------------------------------------------
// [client]
// ---------------------------------------------------------------------------

/// Terminal chat client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the saathi service.
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [voice]
// ---------------------------------------------------------------------------

/// Which speech synthesis backend the chat client uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceEngine {
    /// Use whichever supported engine is installed.
    #[default]
    Auto,
    Espeak,
    Say,
    None,
}

impl std::fmt::Display for VoiceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Espeak => write!(f, "espeak"),
            Self::Say => write!(f, "say"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Speech output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speak assistant replies aloud.
    pub enabled: bool,
    pub engine: VoiceEngine,
    /// Preferred voice locale.
    pub locale: String,
    /// Speaking rate multiplier (1.0 = normal).
    pub rate: f32,
    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: VoiceEngine::default(),
            locale: "en-IN".to_string(),
            rate: 1.0,
            pitch: 1.1,
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

/// Key-value store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON store file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.saathi/storage.json".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether the assist event log is written.
    pub enabled: bool,
    /// Path to the assist event log. `~` is expanded to the home directory.
    pub path: String,
    /// Log level: `"info"`, `"debug"`, `"warn"`, `"error"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.saathi/assist-log.jsonl".to_string(),
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

impl SaathiConfig {
    /// Annotated default configuration written by `saathi config init`.
    pub fn default_toml() -> String {
        r#"# saathi configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SAATHI_*)
#   2. Project config (.saathi.toml in current directory)
#   3. User global config (~/.saathi/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:8080"

[assist]
default_lang = "auto"     # auto | en-IN | hi-IN

[client]
server_url = "http://127.0.0.1:8080"

[voice]
enabled = true
engine = "auto"           # auto | espeak | say | none
locale = "en-IN"
rate = 1.0
pitch = 1.1

[storage]
path = "~/.saathi/storage.json"

[logging]
enabled = true
path = "~/.saathi/assist-log.jsonl"
level = "info"            # error | warn | info | debug
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
