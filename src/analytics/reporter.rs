//! Analytics reporter — aggregates the assist log for `saathi stats`.

use std::collections::BTreeMap;

use crate::analytics::logger::{self, AssistLogEntry};
use crate::assist::Category;

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// Summary statistics for `saathi stats`.
#[derive(Debug, Default)]
pub struct Stats {
    pub total_requests: usize,
    pub fallback_count: usize,
    pub avg_latency_ms: f64,
    pub categories: CategoryDistribution,
    /// Requests per template language, sorted by language name.
    pub languages: BTreeMap<String, usize>,
}

/// Distribution across mood categories.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDistribution {
    pub crisis: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl CategoryDistribution {
    pub fn total(&self) -> usize {
        self.crisis + self.negative + self.neutral + self.positive
    }

    /// Percentage for a given count, 0.0 if there is nothing classified.
    pub fn pct(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64) * 100.0
        }
    }

    fn record(&mut self, category: Category) {
        match category {
            Category::Crisis => self.crisis += 1,
            Category::Negative => self.negative += 1,
            Category::Neutral => self.neutral += 1,
            Category::Positive => self.positive += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Compute stats from the configured log, optionally limited to the last
/// `days` days.
pub fn compute_stats(days: Option<u32>) -> Stats {
    let entries = logger::filter_since_days(logger::read_all_entries(), days);
    build_stats(&entries)
}

pub fn build_stats(entries: &[AssistLogEntry]) -> Stats {
    if entries.is_empty() {
        return Stats::default();
    }

    let mut stats = Stats {
        total_requests: entries.len(),
        ..Stats::default()
    };

    for entry in entries {
        if entry.fallback {
            stats.fallback_count += 1;
        }
        if let Some(category) = entry.category {
            stats.categories.record(category);
        }
        if let Some(language) = entry.language {
            *stats
                .languages
                .entry(language.as_str().to_string())
                .or_default() += 1;
        }
    }

    let total_latency: u64 = entries.iter().map(|e| e.latency_ms).sum();
    stats.avg_latency_ms = total_latency as f64 / entries.len() as f64;

    stats
}
