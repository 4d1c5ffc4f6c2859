//! Language hints and template-language selection.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Client-supplied language preference.
///
/// Deserializes through [`LanguageHint::parse`], so case does not matter and
/// unknown tags read as `Auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LanguageHint {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "en-IN")]
    EnglishIndia,
    #[serde(rename = "hi-IN")]
    HindiIndia,
}

impl LanguageHint {
    /// Parse a hint string, ignoring ASCII case. Unknown values are `Auto`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("hi-IN") {
            Self::HindiIndia
        } else if raw.eq_ignore_ascii_case("en-IN") {
            Self::EnglishIndia
        } else {
            Self::Auto
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::EnglishIndia => "en-IN",
            Self::HindiIndia => "hi-IN",
        }
    }
}

impl<'de> Deserialize<'de> for LanguageHint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the reply templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `text` contains any character from the Devanagari block.
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

/// Pick the template language: Hindi when the text is written in Devanagari
/// or the hint asks for `hi-IN`, English otherwise.
pub fn detect(text: &str, hint: LanguageHint) -> Language {
    if contains_devanagari(text) || hint == LanguageHint::HindiIndia {
        Language::Hindi
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_ascii_case() {
        assert_eq!(LanguageHint::parse("hi-IN"), LanguageHint::HindiIndia);
        assert_eq!(LanguageHint::parse("HI-in"), LanguageHint::HindiIndia);
        assert_eq!(LanguageHint::parse("en-in"), LanguageHint::EnglishIndia);
        assert_eq!(LanguageHint::parse("auto"), LanguageHint::Auto);
    }

    #[test]
    fn parse_unknown_is_auto() {
        assert_eq!(LanguageHint::parse("fr-FR"), LanguageHint::Auto);
        assert_eq!(LanguageHint::parse(""), LanguageHint::Auto);
    }

    #[test]
    fn devanagari_selects_hindi() {
        assert_eq!(detect("मैं ठीक हूँ", LanguageHint::Auto), Language::Hindi);
        assert_eq!(detect("मैं ठीक हूँ", LanguageHint::EnglishIndia), Language::Hindi);
    }

    #[test]
    fn hint_selects_hindi_for_latin_text() {
        assert_eq!(detect("main theek hoon", LanguageHint::HindiIndia), Language::Hindi);
    }

    #[test]
    fn latin_text_defaults_to_english() {
        assert_eq!(detect("hello there", LanguageHint::Auto), Language::English);
        assert_eq!(detect("", LanguageHint::EnglishIndia), Language::English);
    }

    #[test]
    fn hint_deserializes_ignoring_case() {
        let hint: LanguageHint = serde_json::from_str("\"hi-in\"").unwrap();
        assert_eq!(hint, LanguageHint::HindiIndia);
        let hint: LanguageHint = serde_json::from_str("\"EN-in\"").unwrap();
        assert_eq!(hint, LanguageHint::EnglishIndia);
        let hint: LanguageHint = serde_json::from_str("\"tamil\"").unwrap();
        assert_eq!(hint, LanguageHint::Auto);
    }

    #[test]
    fn hint_serde_uses_locale_tags() {
        let json = serde_json::to_string(&LanguageHint::HindiIndia).unwrap();
        assert_eq!(json, "\"hi-IN\"");
        let back: LanguageHint = serde_json::from_str("\"en-IN\"").unwrap();
        assert_eq!(back, LanguageHint::EnglishIndia);
    }
}
