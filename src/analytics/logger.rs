use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::assist::{Category, Language};
use crate::config::{self, schema::LoggingConfig};

// ---------------------------------------------------------------------------
// Assist log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// A single entry in the assist event log (`~/.saathi/assist-log.jsonl`).
///
/// Records how a request was classified and answered. The user's message is
/// never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistLogEntry {
    pub timestamp: String,
    /// Absent when the request fell back before classification.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language: Option<Language>,
    /// Whether the fixed fallback reply was returned.
    #[serde(default)]
    pub fallback: bool,
    pub latency_ms: u64,
}

impl AssistLogEntry {
    pub fn answered(category: Category, language: Language, latency_ms: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            category: Some(category),
            language: Some(language),
            fallback: false,
            latency_ms,
        }
    }

    pub fn fallback(latency_ms: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            category: None,
            language: None,
            fallback: true,
            latency_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an entry to the assist log at `path`.
///
/// Best-effort: I/O failures are ignored.
pub fn log_assist(path: &Path, entry: &AssistLogEntry) {
    if let Err(e) = append_entry(path, entry) {
        tracing::debug!(error = %e, "failed to append assist log entry");
    }
}

pub(crate) fn append_entry(path: &Path, entry: &AssistLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from the configured assist log.
pub fn read_all_entries() -> Vec<AssistLogEntry> {
    assist_log_path()
        .map(|path| read_entries_from(&path))
        .unwrap_or_default()
}

/// Read entries from `path`, silently skipping malformed lines. Returns an
/// empty vec if the file does not exist or cannot be read.
pub fn read_entries_from(path: &Path) -> Vec<AssistLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<AssistLogEntry>(&line).ok())
        .collect()
}

/// Keep only entries from the last `days` days. `None` keeps everything.
pub fn filter_since_days(entries: Vec<AssistLogEntry>, days: Option<u32>) -> Vec<AssistLogEntry> {
    let Some(days) = days else {
        return entries;
    };

    let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff)
        .collect()
}

/// Return the path to the assist log file.
pub fn assist_log_path() -> Option<PathBuf> {
    config::expand_home(&config::load().logging.path)
}

/// Where to write assist events under `config`, or `None` when logging is
/// disabled or the home directory is unknown.
pub fn log_destination(config: &LoggingConfig) -> Option<PathBuf> {
    if !config.enabled {
        return None;
    }
    config::expand_home(&config.path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("assist-log.jsonl");

        let answered = AssistLogEntry::answered(Category::Negative, Language::Hindi, 3);
        let fallback = AssistLogEntry::fallback(1);
        append_entry(&path, &answered).unwrap();
        append_entry(&path, &fallback).unwrap();

        let entries = read_entries_from(&path);
        assert_eq!(entries, vec![answered, fallback]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assist-log.jsonl");
        fs::write(
            &path,
            "garbage\n{\"timestamp\":\"2026-10-16T10:00:00+00:00\",\"category\":\"positive\",\"language\":\"english\",\"latency_ms\":2}\n",
        )
        .unwrap();

        let entries = read_entries_from(&path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, Some(Category::Positive));
        assert!(!entries[0].fallback);
    }

    #[test]
    fn fallback_entry_omits_classification() {
        let json = serde_json::to_string(&AssistLogEntry::fallback(0)).unwrap();
        assert!(!json.contains("category"));
        assert!(json.contains("\"fallback\":true"));
    }

    #[test]
    fn filter_since_days_drops_old_entries() {
        let mut old = AssistLogEntry::fallback(0);
        old.timestamp = "2000-01-01T00:00:00+00:00".to_string();
        let fresh = AssistLogEntry::fallback(0);

        let kept = filter_since_days(vec![old.clone(), fresh.clone()], Some(7));
        assert_eq!(kept, vec![fresh.clone()]);

        let all = filter_since_days(vec![old, fresh], None);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn log_assist_appends_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assist-log.jsonl");

        log_assist(&path, &AssistLogEntry::fallback(2));
        log_assist(&path, &AssistLogEntry::fallback(3));
        assert_eq!(read_entries_from(&path).len(), 2);
    }

    #[test]
    fn disabled_logging_has_no_destination() {
        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert_eq!(log_destination(&config), None);

        let config = LoggingConfig {
            path: "/tmp/saathi/assist.jsonl".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(
            log_destination(&config),
            Some(PathBuf::from("/tmp/saathi/assist.jsonl"))
        );
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries_from(&dir.path().join("nope.jsonl")).is_empty());
    }
}
