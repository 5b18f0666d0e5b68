//! End-of-match persistence
//!
//! The simulation never touches storage. When a match finishes, its session
//! hands one [`MatchResult`] to a [`ResultSink`].

pub mod players;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highscores::Ranking;
pub use players::{PlayerRegistry, PlayerStats};

pub const RANKING_FILE: &str = "ranking.json";
pub const PLAYERS_FILE: &str = "players.json";

/// Outcome of one finished match, from the player's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_name: String,
    /// Player's points
    pub final_score: u32,
    pub opponent_score: u32,
    pub won: bool,
    pub draw: bool,
    /// Difficulty key
    pub difficulty: String,
}

/// Receives finished matches
pub trait ResultSink {
    fn record(&mut self, result: &MatchResult) -> Result<()>;
}

/// Keeps results in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub results: Vec<MatchResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, result: &MatchResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

/// Directory-backed store: ranking plus player stats as JSON files
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    pub ranking: Ranking,
    pub players: PlayerRegistry,
}

impl JsonStore {
    /// Open (creating if needed) a store in `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let ranking = Ranking::load(&dir.join(RANKING_FILE));
        let players = PlayerRegistry::load(&dir.join(PLAYERS_FILE));
        Ok(Self { dir, ranking, players })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self) -> Result<()> {
        self.ranking.save(&self.dir.join(RANKING_FILE))?;
        self.players.save(&self.dir.join(PLAYERS_FILE))?;
        Ok(())
    }
}

impl ResultSink for JsonStore {
    fn record(&mut self, result: &MatchResult) -> Result<()> {
        if let Some(rank) = self
            .ranking
            .add_score(&result.player_name, result.final_score, &result.difficulty)
        {
            log::info!("{} ranked #{} with {}", result.player_name, rank, result.final_score);
        }
        self.players
            .record_result(&result.player_name, result.final_score, result.won);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, score: u32, won: bool) -> MatchResult {
        MatchResult {
            player_name: name.to_string(),
            final_score: score,
            opponent_score: if won { 0 } else { 3 },
            won,
            draw: false,
            difficulty: "hard".to_string(),
        }
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.record(&result("ana", 3, true)).unwrap();
        assert_eq!(sink.results.len(), 1);
        assert!(sink.results[0].won);
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let dir = std::env::temp_dir().join(format!("bythepong-store-{}", uuid::Uuid::new_v4()));
        {
            let mut store = JsonStore::open(&dir).unwrap();
            store.record(&result("Ana", 3, true)).unwrap();
            store.record(&result("ana", 1, false)).unwrap();
        }

        let store = JsonStore::open(&dir).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(store.ranking.len(), 2);
        assert_eq!(store.ranking.top_score(), Some(3));
        assert_eq!(store.ranking.entries[0].difficulty, "hard");
        let stats = store.players.get("ANA").unwrap();
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.best_score, 3);
    }
}
