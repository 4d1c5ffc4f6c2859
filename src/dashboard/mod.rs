//! Mood dashboard: a persisted [`MoodLog`] plus the views built from it.
//!
//! [`MoodTracker`] owns a key-value store and rewrites the whole log under
//! [`MOOD_STORAGE_KEY`] after every successful mutation. Reads happen once,
//! on open.

pub mod log;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::storage::KeyValueStore;

pub use log::{DayMood, Mood, MoodEntry, MoodLog, MoodLogError, compute_streak};

/// Storage key holding the JSON-encoded mood log.
pub const MOOD_STORAGE_KEY: &str = "saathi.moods";

/// Number of days shown in the recent-days strip.
pub const STRIP_DAYS: u32 = 14;

/// Who to call when the emergency banner is shown.
pub const EMERGENCY_CONTACTS: [(&str, &str); 2] =
    [("Kiran Helpline", "1800-599-0019"), ("Emergency", "112")];

/// Everything the dashboard renders for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub date: NaiveDate,
    pub streak: u32,
    pub today: Option<MoodEntry>,
    pub status: &'static str,
    pub show_emergency: bool,
    pub recent: Vec<DayMood>,
}

/// Status line under the mood picker.
pub fn status_line(today: Option<&MoodEntry>) -> &'static str {
    match today {
        Some(entry) if entry.saved => "Today's mood is saved.",
        Some(_) => "Not saved yet.",
        None => "Select a mood to save.",
    }
}

/// "1 day" / "N days".
pub fn streak_label(streak: u32) -> String {
    if streak == 1 {
        "1 day".to_string()
    } else {
        format!("{streak} days")
    }
}

/// A mood log bound to the store it is persisted in.
pub struct MoodTracker<S: KeyValueStore> {
    store: S,
    log: MoodLog,
}

impl<S: KeyValueStore> MoodTracker<S> {
    /// Load the log from `store`. A missing key is an empty log; stored
    /// JSON that does not parse is an error.
    pub fn open(store: S) -> Result<Self> {
        let log = load_log(&store)?;
        Ok(Self { store, log })
    }

    pub fn log(&self) -> &MoodLog {
        &self.log
    }

    /// Re-read the log, picking up writes made by other processes.
    pub fn reload(&mut self) -> Result<()> {
        self.log = load_log(&self.store)?;
        Ok(())
    }

    /// Choose the mood for `date` and persist.
    pub fn set_mood(&mut self, date: NaiveDate, mood: Mood) -> Result<()> {
        self.update(|log| log.set_mood(date, mood))
    }

    /// Save the chosen mood for `date` and persist.
    pub fn save(&mut self, date: NaiveDate) -> Result<()> {
        self.update(|log| log.save(date))
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        compute_streak(&self.log, today)
    }

    pub fn snapshot(&self, today: NaiveDate) -> DashboardSnapshot {
        let entry = self.log.get(today).copied();
        DashboardSnapshot {
            date: today,
            streak: self.streak(today),
            today: entry,
            status: status_line(entry.as_ref()),
            show_emergency: self.log.show_emergency(today),
            recent: self.log.last_days(today, STRIP_DAYS),
        }
    }

    /// Apply `change` to the stored log and write it back. The in-memory
    /// log only takes the new state once the write has succeeded.
    fn update(
        &mut self,
        change: impl FnOnce(&mut MoodLog) -> std::result::Result<(), MoodLogError>,
    ) -> Result<()> {
        let mut log = load_log(&self.store)?;
        if let Err(e) = change(&mut log) {
            self.log = log;
            return Err(e.into());
        }

        let json = serde_json::to_string(&log).context("failed to serialize mood log")?;
        self.store
            .set(MOOD_STORAGE_KEY, &json)
            .context("failed to persist mood log")?;

        self.log = log;
        Ok(())
    }
}

fn load_log<S: KeyValueStore>(store: &S) -> Result<MoodLog> {
    match store.get(MOOD_STORAGE_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("stored mood log under '{MOOD_STORAGE_KEY}' is malformed")),
        None => Ok(MoodLog::new()),
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn open_empty_store_gives_empty_log() {
        let tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        assert!(tracker.log().is_empty());
        assert_eq!(tracker.streak(day("2026-10-16")), 0);
    }

    #[test]
    fn mutations_are_persisted_immediately() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        tracker.set_mood(day("2026-10-16"), Mood::Good).unwrap();
        let raw = tracker.store.get(MOOD_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"2026-10-16":{"mood":"good","saved":false}}"#);

        tracker.save(day("2026-10-16")).unwrap();
        let raw = tracker.store.get(MOOD_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"saved\":true"));
    }

    #[test]
    fn rejected_mutation_leaves_store_untouched() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        tracker.set_mood(day("2026-10-16"), Mood::Good).unwrap();
        tracker.save(day("2026-10-16")).unwrap();
        let before = tracker.store.get(MOOD_STORAGE_KEY).unwrap();

        let err = tracker.set_mood(day("2026-10-16"), Mood::Bad).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MoodLogError>(),
            Some(&MoodLogError::AlreadySaved(day("2026-10-16")))
        );
        assert_eq!(tracker.store.get(MOOD_STORAGE_KEY).unwrap(), before);
    }

    /// Reads work, writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn failed_write_leaves_log_unchanged() {
        let mut tracker = MoodTracker::open(ReadOnlyStore(MemoryStore::new())).unwrap();
        let today = day("2026-10-16");

        assert!(tracker.set_mood(today, Mood::Good).is_err());
        assert!(tracker.log().is_empty());
        assert_eq!(tracker.snapshot(today).status, "Select a mood to save.");
    }

    #[test]
    fn failed_save_keeps_day_unlocked() {
        let mut inner = MemoryStore::new();
        inner
            .set(MOOD_STORAGE_KEY, r#"{"2026-10-16":{"mood":"bad","saved":false}}"#)
            .unwrap();
        let mut tracker = MoodTracker::open(ReadOnlyStore(inner)).unwrap();
        let today = day("2026-10-16");

        assert!(tracker.save(today).is_err());
        assert!(!tracker.log().get(today).unwrap().saved);
        assert_eq!(tracker.streak(today), 0);
    }

    #[test]
    fn mutations_merge_with_changes_made_elsewhere() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        tracker
            .store
            .set(MOOD_STORAGE_KEY, r#"{"2026-10-15":{"mood":"good","saved":true}}"#)
            .unwrap();

        tracker.set_mood(day("2026-10-16"), Mood::Okay).unwrap();
        assert_eq!(tracker.log().len(), 2);
        let raw = tracker.store.get(MOOD_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("2026-10-15"));
    }

    #[test]
    fn open_rejects_malformed_log() {
        let mut store = MemoryStore::new();
        store.set(MOOD_STORAGE_KEY, "[not a map").unwrap();
        assert!(MoodTracker::open(store).is_err());
    }

    #[test]
    fn snapshot_reflects_today() {
        let mut tracker = MoodTracker::open(MemoryStore::new()).unwrap();
        let today = day("2026-10-16");

        let snap = tracker.snapshot(today);
        assert_eq!(snap.status, "Select a mood to save.");
        assert_eq!(snap.recent.len(), STRIP_DAYS as usize);

        tracker.set_mood(today, Mood::VeryBad).unwrap();
        let snap = tracker.snapshot(today);
        assert_eq!(snap.status, "Not saved yet.");
        assert!(!snap.show_emergency);
        assert_eq!(snap.streak, 0);

        tracker.save(today).unwrap();
        let snap = tracker.snapshot(today);
        assert_eq!(snap.status, "Today's mood is saved.");
        assert!(snap.show_emergency);
        assert_eq!(snap.streak, 1);
    }

    #[test]
    fn streak_label_pluralizes() {
        assert_eq!(streak_label(0), "0 days");
        assert_eq!(streak_label(1), "1 day");
        assert_eq!(streak_label(5), "5 days");
    }
}
