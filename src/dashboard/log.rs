/// Date-keyed mood log.
///
/// Holds at most one [`MoodEntry`] per calendar day. An entry is chosen
/// first (unsaved, freely replaceable) and then saved, after which the day
/// is locked. Only saved days count toward the streak and the emergency
/// banner.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// How the user feels on a given day, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excellent,
    Good,
    Okay,
    Bad,
    VeryBad,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Excellent,
        Mood::Good,
        Mood::Okay,
        Mood::Bad,
        Mood::VeryBad,
    ];

    /// Storage/wire key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Bad => "bad",
            Self::VeryBad => "verybad",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Okay => "Okay",
            Self::Bad => "Bad",
            Self::VeryBad => "Very bad",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Excellent => "🌞",
            Self::Good => "🙂",
            Self::Okay => "😐",
            Self::Bad => "😔",
            Self::VeryBad => "🌧️",
        }
    }

    /// Moods that raise the emergency banner.
    pub fn is_low(&self) -> bool {
        matches!(self, Self::Bad | Self::VeryBad)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mood {
    type Err = MoodLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.key() == normalized)
            .ok_or_else(|| MoodLogError::UnknownMood(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Entries and errors
// ---------------------------------------------------------------------------

/// The mood recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    /// Entries written without a save flag count as saved.
    #[serde(default = "default_true")]
    pub saved: bool,
}

fn default_true() -> bool {
    true
}

/// One cell of the recent-days strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMood {
    pub date: NaiveDate,
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoodLogError {
    #[error("mood for {0} is already saved")]
    AlreadySaved(NaiveDate),

    #[error("no mood selected for {0}")]
    NothingToSave(NaiveDate),

    #[error("unknown mood '{0}' (expected excellent, good, okay, bad or verybad)")]
    UnknownMood(String),
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Mapping from calendar day to that day's entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodLog {
    entries: BTreeMap<NaiveDate, MoodEntry>,
}

impl MoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&MoodEntry> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &MoodEntry)> {
        self.entries.iter()
    }

    fn is_saved(&self, date: NaiveDate) -> bool {
        self.entries.get(&date).is_some_and(|e| e.saved)
    }

    /// Choose the mood for `date`, replacing an unsaved choice.
    pub fn set_mood(&mut self, date: NaiveDate, mood: Mood) -> Result<(), MoodLogError> {
        if self.is_saved(date) {
            return Err(MoodLogError::AlreadySaved(date));
        }
        self.entries.insert(date, MoodEntry { mood, saved: false });
        Ok(())
    }

    /// Lock the chosen mood for `date`.
    pub fn save(&mut self, date: NaiveDate) -> Result<(), MoodLogError> {
        match self.entries.get_mut(&date) {
            None => Err(MoodLogError::NothingToSave(date)),
            Some(entry) if entry.saved => Err(MoodLogError::AlreadySaved(date)),
            Some(entry) => {
                entry.saved = true;
                Ok(())
            }
        }
    }

    /// The last `days` days ending at `today`, oldest first.
    pub fn last_days(&self, today: NaiveDate, days: u32) -> Vec<DayMood> {
        (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
            .map(|date| DayMood {
                date,
                mood: self.entries.get(&date).map(|e| e.mood),
            })
            .collect()
    }

    /// Today's mood is saved and low.
    pub fn show_emergency(&self, today: NaiveDate) -> bool {
        self.entries
            .get(&today)
            .is_some_and(|e| e.saved && e.mood.is_low())
    }
}

/// Count consecutive saved days walking backward from `today`.
pub fn compute_streak(log: &MoodLog, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while log.is_saved(day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
