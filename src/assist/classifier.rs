/// Mood classification for assist replies.
///
/// Classifies free text into one of four categories by running an ordered
/// list of patterns: crisis first, then negative affect, then positive
/// affect. The first pattern that matches decides the category; text that
/// matches nothing is `Neutral`. Crisis terms therefore always win over
/// co-occurring negative or positive terms.
///
/// Each pattern covers English terms and their common Hindi (Devanagari)
/// counterparts.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classification result for a piece of user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Self-harm, suicide or death-related language.
    Crisis,
    Negative,
    Neutral,
    Positive,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crisis => "crisis",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority-ordered `(pattern, category)` pairs. Order is the tie-break.
static RULES: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    vec![
        (
            rule(
                r"(?i)suicid|kill myself|end my life|self[- ]?harm|cutting|jump|\bdi(?:e|es|ed|ing)\b|\bdying\b|death|आत्महत्या|मरना|मर जा|जान दे|खुद को नुकसान",
            ),
            Category::Crisis,
        ),
        (
            rule(
                r"(?i)anxious|sad|depressed|overwhelmed|stressed|panic|lonely|worthless|fail|useless|उदास|चिंता|परेशान|तनाव|अकेला|अकेली|घबराहट|बेकार|दुखी",
            ),
            Category::Negative,
        ),
        (
            rule(
                r"(?i)grateful|happy|calm|okay|fine|better|hopeful|relieved|खुश|शांत|ठीक|बेहतर|आभारी|उम्मीद|राहत",
            ),
            Category::Positive,
        ),
    ]
});

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("classifier pattern must compile")
}

/// Classify user text. Total: every input maps to exactly one category.
pub fn classify(text: &str) -> Category {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Crisis ---

    #[test]
    fn crisis_terms_are_detected() {
        assert_eq!(classify("I want to end my life"), Category::Crisis);
        assert_eq!(classify("thinking about suicide"), Category::Crisis);
        assert_eq!(classify("I feel suicidal today"), Category::Crisis);
        assert_eq!(classify("I keep cutting myself"), Category::Crisis);
        assert_eq!(classify("sometimes I want to die"), Category::Crisis);
        assert_eq!(classify("I think about death a lot"), Category::Crisis);
    }

    #[test]
    fn crisis_overrides_other_categories() {
        assert_eq!(
            classify("I'm happy and grateful but I want to kill myself"),
            Category::Crisis
        );
        assert_eq!(
            classify("so sad and lonely, thinking of self-harm"),
            Category::Crisis
        );
    }

    #[test]
    fn short_crisis_stem_needs_word_boundary() {
        assert_eq!(classify("I started a new diet"), Category::Neutral);
        assert_eq!(classify("I studied all night"), Category::Neutral);
    }

    #[test]
    fn hindi_crisis_terms_are_detected() {
        assert_eq!(classify("मैं आत्महत्या के बारे में सोच रहा हूँ"), Category::Crisis);
        assert_eq!(classify("मुझे मरना है"), Category::Crisis);
    }

    // --- Negative / positive ---

    #[test]
    fn negative_terms_are_detected() {
        assert_eq!(classify("I feel anxious about exams"), Category::Negative);
        assert_eq!(classify("I failed my test"), Category::Negative);
        assert_eq!(classify("मैं बहुत उदास हूँ"), Category::Negative);
    }

    #[test]
    fn negative_wins_over_positive() {
        assert_eq!(classify("not okay, just stressed"), Category::Negative);
    }

    #[test]
    fn positive_terms_are_detected() {
        assert_eq!(classify("Feeling calm and hopeful"), Category::Positive);
        assert_eq!(classify("आज मैं खुश हूँ"), Category::Positive);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("SUICIDE"), Category::Crisis);
        assert_eq!(classify("So OVERWHELMED"), Category::Negative);
        assert_eq!(classify("HAPPY"), Category::Positive);
    }

    // --- Neutral default ---

    #[test]
    fn unmatched_text_is_neutral() {
        assert_eq!(classify("what should I eat for lunch"), Category::Neutral);
        assert_eq!(classify(""), Category::Neutral);
        assert_eq!(classify("   \n\t"), Category::Neutral);
    }

    #[test]
    fn category_display() {
        assert_eq!(Category::Crisis.to_string(), "crisis");
        assert_eq!(Category::Negative.to_string(), "negative");
        assert_eq!(Category::Neutral.to_string(), "neutral");
        assert_eq!(Category::Positive.to_string(), "positive");
    }
}
