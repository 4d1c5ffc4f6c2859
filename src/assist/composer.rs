/// Reply composition for the assist endpoint.
///
/// A reply is a fixed block of sentences chosen by `(language, category)`,
/// joined with single spaces. Most blocks carry one tip drawn uniformly at
/// random from a pool of three; the random source is injected so callers
/// (and tests) control determinism.
use rand::Rng;
use serde::Serialize;

use super::classifier::{self, Category};
use super::language::{self, Language, LanguageHint};

/// Kiran mental health helpline (India), included in every crisis reply.
pub const HELPLINE_NUMBER: &str = "1800-599-0019";

/// Reply used whenever the request cannot be handled.
pub const FALLBACK_REPLY: &str =
    "I'm here for you. Let's take a slow breath together: inhale 4, hold 4, exhale 6.";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Sentence blocks for one language.
struct Templates {
    tips: [&'static str; 3],
    crisis: [&'static str; 3],
    /// Closing crisis sentence; the tip is appended directly after it.
    crisis_offer: &'static str,
    negative_open: &'static str,
    negative_close: &'static str,
    positive: [&'static str; 2],
    neutral_open: &'static str,
}

static ENGLISH: Templates = Templates {
    tips: [
        "Try a 4-4-6 breath: inhale 4, hold 4, exhale 6—repeat x3.",
        "Would you like a two-minute grounding: name 5 things you see, 4 you can touch, 3 you hear, 2 you smell, 1 you taste?",
        "A short walk or stretching can release built-up tension—just 3 minutes helps.",
    ],
    crisis: [
        "I'm really glad you told me. Your feelings matter and you're not alone.",
        "Right now, it's important to talk to someone who can help immediately.",
        "In India, you can call the Kiran Helpline at 1800-599-0019 (24x7) or contact local emergency services.",
    ],
    crisis_offer: "If you want, I can stay with you and keep checking in. Would grounding help right now?",
    negative_open: "Thank you for sharing that. It sounds heavy, and I'm here with you—no judgment.",
    negative_close: "If you'd like, we can journal a few thoughts or plan one small, kind step for yourself today.",
    positive: [
        "That's wonderful to hear. Noticing these moments builds resilience.",
        "Would you like to log this in your dashboard to strengthen your streak?",
    ],
    neutral_open: "I'm listening. Tell me a bit more about what's on your mind or what's been challenging lately.",
};

static HINDI: Templates = Templates {
    tips: [
        "4-4-6 साँस आज़माएँ: 4 गिनती तक साँस लें, 4 तक रोकें, 6 तक छोड़ें—तीन बार दोहराएँ।",
        "क्या आप दो मिनट की ग्राउंडिंग करना चाहेंगे: 5 चीज़ें जो आप देख रहे हैं, 4 जिन्हें छू सकते हैं, 3 जो सुन रहे हैं, 2 जिनकी गंध ले सकते हैं, 1 जिसका स्वाद ले सकते हैं?",
        "थोड़ी देर टहलना या स्ट्रेचिंग जमा हुए तनाव को कम कर सकता है—सिर्फ़ 3 मिनट भी मदद करते हैं।",
    ],
    crisis: [
        "मुझे बहुत खुशी है कि आपने मुझे बताया। आपकी भावनाएँ मायने रखती हैं और आप अकेले नहीं हैं।",
        "इस समय किसी ऐसे व्यक्ति से बात करना ज़रूरी है जो तुरंत मदद कर सके।",
        "भारत में आप किरण हेल्पलाइन 1800-599-0019 (24 घंटे, सातों दिन) पर कॉल कर सकते हैं या स्थानीय आपातकालीन सेवाओं से संपर्क कर सकते हैं।",
    ],
    crisis_offer: "अगर आप चाहें, तो मैं आपके साथ रहूँगी और हालचाल पूछती रहूँगी। क्या अभी ग्राउंडिंग मदद करेगी?",
    negative_open: "यह साझा करने के लिए धन्यवाद। यह भारी लगता है, और मैं आपके साथ हूँ—बिना किसी आलोचना के।",
    negative_close: "अगर आप चाहें, तो हम कुछ विचार लिख सकते हैं या आज अपने लिए एक छोटा, दयालु कदम तय कर सकते हैं।",
    positive: [
        "यह सुनकर बहुत अच्छा लगा। ऐसे पलों को पहचानना आपकी ताकत बढ़ाता है।",
        "क्या आप अपनी स्ट्रीक मज़बूत करने के लिए इसे अपने डैशबोर्ड में दर्ज करना चाहेंगे?",
    ],
    neutral_open: "मैं सुन रही हूँ। मुझे थोड़ा और बताइए कि आपके मन में क्या है या हाल ही में क्या मुश्किल रहा है।",
};

fn templates(language: Language) -> &'static Templates {
    match language {
        Language::English => &ENGLISH,
        Language::Hindi => &HINDI,
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// A composed reply together with how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub category: Category,
    pub language: Language,
}

/// Compose a reply for `text`, returning only the reply string.
pub fn compose<R: Rng>(text: &str, hint: LanguageHint, rng: &mut R) -> String {
    compose_reply(text, hint, rng).text
}

/// Classify `text`, pick the template language and build the reply.
pub fn compose_reply<R: Rng>(text: &str, hint: LanguageHint, rng: &mut R) -> Reply {
    let category = classifier::classify(text);
    let language = language::detect(text, hint);
    let t = templates(language);
    let tip = t.tips[rng.gen_range(0..t.tips.len())];

    let sentences: Vec<&str> = match category {
        Category::Crisis => {
            let mut parts = t.crisis.to_vec();
            parts.push(t.crisis_offer);
            parts.push(tip);
            parts
        }
        Category::Negative => vec![t.negative_open, tip, t.negative_close],
        Category::Positive => t.positive.to_vec(),
        Category::Neutral => vec![t.neutral_open, tip],
    };

    Reply {
        text: sentences.join(" "),
        category,
        language,
    }
}

/// Every sentence the English templates can produce.
pub fn english_sentences() -> Vec<&'static str> {
    all_sentences(&ENGLISH)
}

/// Every sentence the Hindi templates can produce.
pub fn hindi_sentences() -> Vec<&'static str> {
    all_sentences(&HINDI)
}

fn all_sentences(t: &Templates) -> Vec<&'static str> {
    let mut out = t.tips.to_vec();
    out.extend_from_slice(&t.crisis);
    out.push(t.crisis_offer);
    out.push(t.negative_open);
    out.push(t.negative_close);
    out.extend_from_slice(&t.positive);
    out.push(t.neutral_open);
    out
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn crisis_reply_includes_helpline_and_a_tip() {
        let reply = compose_reply("I feel suicidal today", LanguageHint::Auto, &mut rng());
        assert_eq!(reply.category, Category::Crisis);
        assert!(reply.text.contains(HELPLINE_NUMBER));
        assert!(ENGLISH.tips.iter().any(|tip| reply.text.ends_with(tip)));
    }

    #[test]
    fn crisis_offer_and_tip_are_space_joined() {
        let reply = compose("end my life", LanguageHint::Auto, &mut rng());
        let offer_at = reply.find(ENGLISH.crisis_offer).unwrap();
        let after = &reply[offer_at + ENGLISH.crisis_offer.len()..];
        assert!(after.starts_with(' '));
        assert!(!after.starts_with("  "));
    }

    #[test]
    fn negative_reply_has_tip_between_open_and_close() {
        let reply = compose("I'm so stressed", LanguageHint::Auto, &mut rng());
        assert!(reply.starts_with(ENGLISH.negative_open));
        assert!(reply.ends_with(ENGLISH.negative_close));
        assert!(ENGLISH.tips.iter().any(|tip| reply.contains(tip)));
    }

    #[test]
    fn positive_reply_has_no_tip() {
        let reply = compose("feeling grateful", LanguageHint::Auto, &mut rng());
        assert_eq!(reply, ENGLISH.positive.join(" "));
    }

    #[test]
    fn empty_input_gets_neutral_reply() {
        let reply = compose_reply("   ", LanguageHint::Auto, &mut rng());
        assert_eq!(reply.category, Category::Neutral);
        assert!(reply.text.starts_with(ENGLISH.neutral_open));
    }

    #[test]
    fn same_seed_gives_same_reply() {
        let a = compose("tell me something", LanguageHint::Auto, &mut StdRng::seed_from_u64(42));
        let b = compose("tell me something", LanguageHint::Auto, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn every_tip_is_reachable() {
        let mut rng = rng();
        let mut seen = [false; 3];
        for _ in 0..200 {
            let reply = compose("hello", LanguageHint::Auto, &mut rng);
            for (i, tip) in ENGLISH.tips.iter().enumerate() {
                if reply.contains(tip) {
                    seen[i] = true;
                }
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn hindi_hint_selects_hindi_templates() {
        let reply = compose_reply("feeling grateful", LanguageHint::HindiIndia, &mut rng());
        assert_eq!(reply.language, Language::Hindi);
        assert_eq!(reply.text, HINDI.positive.join(" "));
    }

    #[test]
    fn hindi_crisis_reply_keeps_helpline() {
        let reply = compose("मुझे मरना है", LanguageHint::Auto, &mut rng());
        assert!(reply.contains(HELPLINE_NUMBER));
    }

    #[test]
    fn hindi_templates_contain_no_latin_letters() {
        for sentence in hindi_sentences() {
            assert!(
                !sentence.chars().any(|c| c.is_ascii_alphabetic()),
                "latin text in hindi template: {sentence}"
            );
        }
    }
}
