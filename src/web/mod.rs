//! HTTP service for saathi.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - `POST /api/assist` — mood-aware supportive reply, always HTTP 200
//! - `/api/moods` — the mood dashboard backed by the key-value store
//!
//! Launched via `saathi serve` (default: `http://127.0.0.1:8080`).

mod api;
pub mod protocol;

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::analytics::logger;
use crate::assist::LanguageHint;
use crate::config::SaathiConfig;
use crate::dashboard::MoodTracker;
use crate::storage::{FileStore, KeyValueStore};

pub use api::{AssistOutcome, handle_assist};

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// State shared by every request. Requests are handled one at a time, so
/// plain ownership is enough.
pub struct ServerState<S: KeyValueStore> {
    pub tracker: MoodTracker<S>,
    pub default_lang: LanguageHint,
    /// Assist event log, resolved once at startup. `None` disables it.
    pub assist_log: Option<PathBuf>,
}

impl ServerState<FileStore> {
    pub fn from_config(config: &SaathiConfig) -> Result<Self> {
        let store = FileStore::from_config(&config.storage)?;
        Ok(Self {
            tracker: MoodTracker::open(store)?,
            default_lang: config.assist.default_lang,
            assist_log: logger::log_destination(&config.logging),
        })
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the server on the given address.
///
/// Blocks the current thread and handles requests sequentially. Errors are
/// handled per request without stopping the server.
pub fn serve<S: KeyValueStore>(addr: &str, mut state: ServerState<S>) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    tracing::info!(%addr, "saathi listening");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let body = read_body(&mut request, &method);

        let response = match dispatch(&mut state, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(%method, %url, error = %e, "request failed");
                error_response(&e.to_string(), 500)
            }
        };

        let status = response.status_code().0;
        if let Err(e) = request.respond(response) {
            tracing::warn!(%method, %url, error = %e, "failed to send response");
        }

        tracing::debug!(%method, %url, status, "request served");
    }

    Ok(())
}

/// Read the body for methods that carry one. `None` means the body could
/// not be read; body-less methods read as the empty string.
fn read_body(request: &mut Request, method: &Method) -> Option<String> {
    if !matches!(method, Method::Put | Method::Post | Method::Patch) {
        return Some(String::new());
    }
    let mut buf = String::new();
    match request.as_reader().read_to_string(&mut buf) {
        Ok(_) => Some(buf),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch<S: KeyValueStore>(
    state: &mut ServerState<S>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Post, "/api/assist") => Ok(api::post_assist(
            body,
            state.default_lang,
            state.assist_log.as_deref(),
        )),

        (&Method::Get, "/api/ping") => api::get_ping(),

        (&Method::Get, "/api/moods") => api::get_moods(&mut state.tracker),
        (&Method::Put, "/api/moods/today") => api::put_today_mood(&mut state.tracker, body),
        (&Method::Post, "/api/moods/today/save") => api::post_save_today(&mut state.tracker),

        _ => Ok(error_response("not found", 404)),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn error_response(message: &str, status: u16) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
