//! Top-10 ranking
//!
//! Every finished match is offered to the ranking with the player's points.
//! Ties keep their arrival order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of entries to keep
pub const MAX_RANKING_ENTRIES: usize = 10;

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u32,
    /// Difficulty key the score was set on
    #[serde(default)]
    pub difficulty: String,
}

/// Leaderboard sorted by score, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_RANKING_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score; returns the rank achieved (1-indexed) if it qualified
    pub fn add_score(&mut self, name: &str, score: u32, difficulty: &str) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            RankingEntry {
                name: name.to_string(),
                score,
                difficulty: difficulty.to_string(),
            },
        );
        self.entries.truncate(MAX_RANKING_ENTRIES);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Best ranked score for `name`
    pub fn best_for(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Load from a JSON array; missing or malformed files give an empty board
    pub fn load(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            log::info!("No ranking at {}, starting fresh", path.display());
            return Self::new();
        };
        match serde_json::from_str::<Ranking>(&json) {
            Ok(mut ranking) => {
                // Files may have been edited by hand
                ranking.entries.sort_by(|a, b| b.score.cmp(&a.score));
                ranking.entries.truncate(MAX_RANKING_ENTRIES);
                log::info!("Loaded {} ranking entries", ranking.entries.len());
                ranking
            }
            Err(e) => {
                log::warn!("Unreadable ranking {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("Ranking saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board() -> Ranking {
        let mut r = Ranking::new();
        for i in 0..MAX_RANKING_ENTRIES as u32 {
            r.add_score(&format!("p{}", i), i % 4, "normal");
        }
        r
    }

    #[test]
    fn test_sorted_descending_and_capped() {
        let mut r = full_board();
        assert_eq!(r.len(), MAX_RANKING_ENTRIES);
        r.add_score("late", 3, "hard");
        assert_eq!(r.len(), MAX_RANKING_ENTRIES);
        assert!(r.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(r.top_score(), Some(3));
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut r = Ranking::new();
        r.add_score("first", 2, "easy");
        assert_eq!(r.add_score("second", 2, "easy"), Some(2));
        assert_eq!(r.entries[0].name, "first");
    }

    #[test]
    fn test_zero_scores_rank_on_a_short_board() {
        let mut r = Ranking::new();
        assert_eq!(r.add_score("lost", 0, "expert"), Some(1));
        assert_eq!(r.best_for("lost"), Some(0));
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let r = full_board();
        let lowest = r.entries.last().map(|e| e.score).unwrap();
        assert!(!r.qualifies(lowest));
        assert_eq!(r.potential_rank(lowest), None);
        assert!(r.qualifies(lowest + 1));
    }

    #[test]
    fn test_best_for_and_clear() {
        let mut r = Ranking::new();
        r.add_score("ana", 1, "normal");
        r.add_score("ana", 3, "hard");
        assert_eq!(r.best_for("ana"), Some(3));
        assert_eq!(r.best_for("nobody"), None);
        r.clear();
        assert!(r.is_empty());
        assert_eq!(r.top_score(), None);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("bythepong-ranking-{}.json", uuid::Uuid::new_v4()));
        let mut r = Ranking::new();
        r.add_score("ana", 3, "expert");
        r.add_score("bia", 1, "easy");
        r.save(&path).unwrap();

        let loaded = Ranking::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, r);
    }

    #[test]
    fn test_load_accepts_entries_without_difficulty() {
        let path = std::env::temp_dir().join(format!("bythepong-ranking-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"[{"name": "old", "score": 1}, {"name": "older", "score": 2}]"#).unwrap();
        let loaded = Ranking::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.entries[0].name, "older");
        assert_eq!(loaded.entries[1].difficulty, "");
    }
}
