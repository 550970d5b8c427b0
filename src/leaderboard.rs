//! Best-times leaderboard
//!
//! Keeps the fastest completion times per level, persisted as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SCORES_PER_LEVEL;
use crate::error::StorageError;
use crate::persistence;
use crate::sim::CompletionEvent;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Completion time in milliseconds
    pub time_ms: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Best completion times per level, fastest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    levels: BTreeMap<u32, Vec<ScoreEntry>>,
}

impl Leaderboard {
    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for a level, fastest first
    pub fn entries(&self, level_id: u32) -> &[ScoreEntry] {
        self.levels.get(&level_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fastest time recorded for a level
    pub fn best(&self, level_id: u32) -> Option<u64> {
        self.entries(level_id).first().map(|e| e.time_ms)
    }

    /// Check if a time would make the level's table
    pub fn qualifies(&self, level_id: u32, time_ms: u64) -> bool {
        let entries = self.entries(level_id);
        if entries.len() < MAX_SCORES_PER_LEVEL {
            return true;
        }
        entries.last().map(|e| time_ms < e.time_ms).unwrap_or(true)
    }

    /// Get the rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, level_id: u32, time_ms: u64) -> Option<usize> {
        if !self.qualifies(level_id, time_ms) {
            return None;
        }
        Some(insertion_index(self.entries(level_id), time_ms) + 1)
    }

    /// Record a completion. Returns the rank achieved (1-indexed) or None if
    /// the time was too slow to keep.
    pub fn record(&mut self, event: &CompletionEvent, timestamp: u64) -> Option<usize> {
        if !self.qualifies(event.level_id, event.time_ms) {
            return None;
        }

        let entries = self.levels.entry(event.level_id).or_default();
        // Equal times keep the earlier entry ahead
        let pos = insertion_index(entries, event.time_ms);
        entries.insert(
            pos,
            ScoreEntry {
                time_ms: event.time_ms,
                timestamp,
            },
        );
        entries.truncate(MAX_SCORES_PER_LEVEL);

        log::info!(
            "Leaderboard entry for level {}: {} ms at rank {}",
            event.level_id,
            event.time_ms,
            pos + 1
        );
        Some(pos + 1)
    }

    /// Check if no level has any entry
    pub fn is_empty(&self) -> bool {
        self.levels.values().all(Vec::is_empty)
    }

    /// Load the leaderboard from disk, starting fresh if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        let board: Self = persistence::load_json_or_default(path);
        let total: usize = board.levels.values().map(Vec::len).sum();
        log::info!("Loaded {} leaderboard entries", total);
        board
    }

    /// Save the leaderboard to disk
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        persistence::save_json(path, self)?;
        log::info!("Leaderboard saved to {}", path.display());
        Ok(())
    }
}

fn insertion_index(entries: &[ScoreEntry], time_ms: u64) -> usize {
    entries
        .iter()
        .position(|e| time_ms < e.time_ms)
        .unwrap_or(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn done(level_id: u32, time_ms: u64) -> CompletionEvent {
        CompletionEvent { level_id, time_ms }
    }

    #[test]
    fn test_record_sorts_ascending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record(&done(1, 5000), 1), Some(1));
        assert_eq!(board.record(&done(1, 3000), 2), Some(1));
        assert_eq!(board.record(&done(1, 4000), 3), Some(2));

        let times: Vec<u64> = board.entries(1).iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![3000, 4000, 5000]);
        assert_eq!(board.best(1), Some(3000));
    }

    #[test]
    fn test_keeps_top_five_per_level() {
        let mut board = Leaderboard::new();
        for t in [900, 800, 700, 600, 500] {
            board.record(&done(1, t), 0);
        }
        assert!(!board.qualifies(1, 950));
        assert_eq!(board.record(&done(1, 950), 0), None);
        assert_eq!(board.record(&done(1, 100), 0), Some(1));
        assert_eq!(board.entries(1).len(), MAX_SCORES_PER_LEVEL);
        assert_eq!(board.entries(1).last().map(|e| e.time_ms), Some(800));
    }

    #[test]
    fn test_levels_are_independent() {
        let mut board = Leaderboard::new();
        board.record(&done(1, 1000), 0);
        board.record(&done(2, 9000), 0);
        assert_eq!(board.best(1), Some(1000));
        assert_eq!(board.best(2), Some(9000));
        assert_eq!(board.best(3), None);
    }

    #[test]
    fn test_equal_time_ranks_after_existing() {
        let mut board = Leaderboard::new();
        board.record(&done(1, 1000), 10);
        assert_eq!(board.potential_rank(1, 1000), Some(2));
        assert_eq!(board.record(&done(1, 1000), 20), Some(2));
        assert_eq!(board.entries(1)[0].timestamp, 10);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = Leaderboard::new();
        board.record(&done(4, 1234), 99);
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path);
        assert_eq!(loaded.entries(4), board.entries(4));
    }

    proptest! {
        #[test]
        fn prop_entries_stay_sorted_and_bounded(times in proptest::collection::vec(0u64..100_000, 0..40)) {
            let mut board = Leaderboard::new();
            for t in &times {
                board.record(&done(7, *t), 0);
            }
            let entries = board.entries(7);
            prop_assert!(entries.len() <= MAX_SCORES_PER_LEVEL);
            prop_assert!(entries.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));

            let mut sorted = times.clone();
            sorted.sort_unstable();
            sorted.truncate(MAX_SCORES_PER_LEVEL);
            let kept: Vec<u64> = entries.iter().map(|e| e.time_ms).collect();
            prop_assert_eq!(kept, sorted);
        }
    }
}
