//! JSON API handlers.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;
use std::path::Path;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::analytics::logger::{self, AssistLogEntry};
use crate::assist::{self, FALLBACK_REPLY, LanguageHint};
use crate::dashboard::{self, MoodLogError, MoodTracker};
use crate::storage::KeyValueStore;

use super::content_type_json;
use super::protocol::{AssistRequest, AssistResponse, MoodUpdateRequest};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON response with the given status.
fn json_response<T: Serialize>(data: &T, status: u16) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

// ---------------------------------------------------------------------------
// POST /api/assist
// ---------------------------------------------------------------------------

/// Result of handling one assist request.
#[derive(Debug)]
pub struct AssistOutcome {
    pub response: AssistResponse,
    pub entry: AssistLogEntry,
}

/// Decode the body and compose a reply.
///
/// `body` is `None` when the request body could not be read. Any failure,
/// including a panic while composing, yields [`FALLBACK_REPLY`].
pub fn handle_assist<R: Rng>(
    body: Option<&str>,
    default_lang: LanguageHint,
    rng: &mut R,
) -> AssistOutcome {
    let started = Instant::now();
    let elapsed_ms = || started.elapsed().as_millis() as u64;

    let composed = body
        .context("request body could not be read")
        .and_then(AssistRequest::from_body)
        .and_then(|req| {
            let hint = req
                .lang
                .as_deref()
                .map(LanguageHint::parse)
                .unwrap_or(default_lang);
            panic::catch_unwind(AssertUnwindSafe(|| {
                assist::compose_reply(&req.message, hint, rng)
            }))
            .map_err(|_| anyhow::anyhow!("reply composition panicked"))
        });

    match composed {
        Ok(reply) => AssistOutcome {
            entry: AssistLogEntry::answered(reply.category, reply.language, elapsed_ms()),
            response: AssistResponse::new(reply.text),
        },
        Err(e) => {
            tracing::warn!(error = %e, "assist request fell back");
            AssistOutcome {
                response: AssistResponse::new(FALLBACK_REPLY),
                entry: AssistLogEntry::fallback(elapsed_ms()),
            }
        }
    }
}

/// `POST /api/assist` — always answers 200 with `{ "reply": ... }`.
pub fn post_assist(
    body: Option<&str>,
    default_lang: LanguageHint,
    assist_log: Option<&Path>,
) -> Response<Cursor<Vec<u8>>> {
    let outcome = handle_assist(body, default_lang, &mut rand::thread_rng());

    if let Some(path) = assist_log {
        logger::log_assist(path, &outcome.entry);
    }
    tracing::info!(
        category = ?outcome.entry.category,
        language = ?outcome.entry.language,
        fallback = outcome.entry.fallback,
        "assist request handled"
    );

    json_response(&outcome.response, 200).unwrap_or_else(|_| fallback_response())
}

/// Pre-serialized fallback, used if serializing the reply itself fails.
fn fallback_response() -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "reply": FALLBACK_REPLY }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200))
}

// ---------------------------------------------------------------------------
// Mood dashboard
// ---------------------------------------------------------------------------

/// `GET /api/moods` — dashboard snapshot for today, re-read from the store.
pub fn get_moods<S: KeyValueStore>(
    tracker: &mut MoodTracker<S>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    tracker.reload()?;
    json_response(&tracker.snapshot(dashboard::today()), 200)
}

/// `PUT /api/moods/today` — choose today's mood.
///
/// Expects JSON body: `{ "mood": "good" }`
pub fn put_today_mood<S: KeyValueStore>(
    tracker: &mut MoodTracker<S>,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = body.context("request body could not be read")?;
    let req: MoodUpdateRequest =
        serde_json::from_str(body).context("invalid JSON in mood update request")?;

    let today = dashboard::today();
    match tracker.set_mood(today, req.mood) {
        Ok(()) => json_response(&tracker.snapshot(today), 200),
        Err(e) => conflict_or_error(e),
    }
}

/// `POST /api/moods/today/save` — lock today's mood.
pub fn post_save_today<S: KeyValueStore>(
    tracker: &mut MoodTracker<S>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let today = dashboard::today();
    match tracker.save(today) {
        Ok(()) => json_response(&tracker.snapshot(today), 200),
        Err(e) => conflict_or_error(e),
    }
}

/// Domain rejections answer 409; anything else propagates as a 500.
fn conflict_or_error(e: anyhow::Error) -> Result<Response<Cursor<Vec<u8>>>> {
    match e.downcast_ref::<MoodLogError>() {
        Some(rejection) => json_response(&serde_json::json!({ "error": rejection.to_string() }), 409),
        None => Err(e),
    }
}

// ---------------------------------------------------------------------------
// GET /api/ping
// ---------------------------------------------------------------------------

pub fn get_ping() -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&serde_json::json!({ "message": "pong" }), 200)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::assist::{Category, HELPLINE_NUMBER};
    use crate::storage::MemoryStore;

    fn assist(body: Option<&str>) -> AssistOutcome {
        handle_assist(body, LanguageHint::Auto, &mut StdRng::seed_from_u64(1))
    }

    fn reply(outcome: &AssistOutcome) -> &str {
        outcome.response.reply.as_deref().unwrap()
    }

    #[test]
    fn normal_message_gets_composed_reply() {
        let outcome = assist(Some(r#"{"message":"I feel suicidal today"}"#));
        assert!(reply(&outcome).contains(HELPLINE_NUMBER));
        assert_eq!(outcome.entry.category, Some(Category::Crisis));
        assert!(!outcome.entry.fallback);
    }

    #[test]
    fn empty_body_and_missing_message_get_neutral_reply() {
        for body in ["", "{}", r#"{"lang":"en-IN"}"#] {
            let outcome = assist(Some(body));
            assert!(!reply(&outcome).is_empty());
            assert_eq!(outcome.entry.category, Some(Category::Neutral));
        }
    }

    #[test]
    fn non_json_body_gets_fallback() {
        let outcome = assist(Some("not json at all"));
        assert_eq!(reply(&outcome), FALLBACK_REPLY);
        assert!(outcome.entry.fallback);
    }

    #[test]
    fn unreadable_body_gets_fallback() {
        let outcome = assist(None);
        assert_eq!(reply(&outcome), FALLBACK_REPLY);
    }

    #[test]
    fn lang_field_overrides_default_hint() {
        let outcome = handle_assist(
            Some(r#"{"message":"hello","lang":"hi-IN"}"#),
            LanguageHint::EnglishIndia,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(outcome.entry.language, Some(crate::assist::Language::Hindi));
    }

    #[test]
    fn default_hint_applies_without_lang() {
        let outcome = handle_assist(
            Some(r#"{"message":"hello"}"#),
            LanguageHint::HindiIndia,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(outcome.entry.language, Some(crate::assist::Language::Hindi));
    }

    #[test]
    fn post_assist_is_always_200() {
        for body in [Some(""), Some("{}"), Some("{{{"), Some(r#"{"message":"sad"}"#), None] {
            let resp = post_assist(body, LanguageHint::Auto, None);
            assert_eq!(resp.status_code(), StatusCode(200));
        }
    }

    #[test]
    fn post_assist_records_event_without_message_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assist-log.jsonl");

        post_assist(Some(r#"{"message":"my secret worry"}"#), LanguageHint::Auto, Some(&path));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret"));
        let entries = logger::read_entries_from(&path);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].fallback);
    }

    #[test]
    fn get_moods_sees_writes_from_other_trackers() {
        use crate::storage::FileStore;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut server = MoodTracker::open(FileStore::new(&path)).unwrap();
        let mut cli = MoodTracker::open(FileStore::new(&path)).unwrap();

        cli.set_mood(dashboard::today(), dashboard::Mood::Good).unwrap();
        get_moods(&mut server).unwrap();
        assert_eq!(server.log().len(), 1);
    }

    #[test]
    fn saving_twice_is_a_conflict() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        let resp = put_today_mood(&mut tracker, Some(r#"{"mood":"good"}"#)).unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));

        let resp = post_save_today(&mut tracker).unwrap();
        assert_eq!(resp.status_code(), StatusCode(200));

        let resp = post_save_today(&mut tracker).unwrap();
        assert_eq!(resp.status_code(), StatusCode(409));

        let resp = put_today_mood(&mut tracker, Some(r#"{"mood":"bad"}"#)).unwrap();
        assert_eq!(resp.status_code(), StatusCode(409));
    }

    #[test]
    fn save_without_mood_is_a_conflict() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        let resp = post_save_today(&mut tracker).unwrap();
        assert_eq!(resp.status_code(), StatusCode(409));
    }

    #[test]
    fn bad_mood_body_is_an_error() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        assert!(put_today_mood(&mut tracker, Some(r#"{"mood":"meh"}"#)).is_err());
        assert!(put_today_mood(&mut tracker, None).is_err());
    }
}
