use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::Mood;

/// Body of `POST /api/assist`.
///
/// Decoding is lenient: a missing or non-string `message` becomes the empty
/// string and a missing or non-string `lang` is `None`. Only a body that is
/// not JSON at all fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssistRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl AssistRequest {
    pub fn new(message: impl Into<String>, lang: Option<String>) -> Self {
        Self {
            message: message.into(),
            lang,
        }
    }

    /// Decode a raw request body. An empty body reads as `{}`.
    pub fn from_body(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(raw).context("assist request body is not JSON")?;
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            message: field("message").unwrap_or_default(),
            lang: field("lang"),
        })
    }
}

/// Body returned by `POST /api/assist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistResponse {
    /// Missing on malformed replies; the client substitutes its own text.
    #[serde(default)]
    pub reply: Option<String>,
}

impl AssistResponse {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

/// Body of `PUT /api/moods/today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodUpdateRequest {
    pub mood: Mood,
}
