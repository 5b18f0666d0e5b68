//! Registered players and their lifetime stats

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Seconds since the Unix epoch, 0 if the system clock is before it
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Lifetime stats for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Display name as first registered
    pub name: String,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_wins: u32,
    #[serde(default)]
    pub best_score: u32,
    /// Unix seconds
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub last_played: u64,
}

impl PlayerStats {
    pub fn new(name: &str) -> Self {
        let now = unix_now();
        Self {
            name: name.to_string(),
            total_games: 0,
            total_wins: 0,
            best_score: 0,
            created_at: now,
            last_played: now,
        }
    }

    /// Wins as a percentage of games played
    pub fn win_rate(&self) -> f32 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_wins as f32 / self.total_games as f32 * 100.0
    }

    pub fn add_game_result(&mut self, score: u32, won: bool) {
        self.total_games += 1;
        if won {
            self.total_wins += 1;
        }
        self.best_score = self.best_score.max(score);
        self.last_played = unix_now();
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayersFile {
    #[serde(default)]
    players: Vec<PlayerStats>,
}

/// Players keyed by lower-cased, trimmed name
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<String, PlayerStats>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new player; false if the name is blank or already taken
    pub fn register(&mut self, name: &str) -> bool {
        let display = name.trim();
        if display.is_empty() {
            return false;
        }
        let k = key(display);
        if self.players.contains_key(&k) {
            return false;
        }
        log::info!("Registered player {:?}", display);
        self.players.insert(k, PlayerStats::new(display));
        true
    }

    pub fn get(&self, name: &str) -> Option<&PlayerStats> {
        self.players.get(&key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(&key(name))
    }

    /// Record a finished game, registering unknown players on the fly
    pub fn record_result(&mut self, name: &str, score: u32, won: bool) {
        if name.trim().is_empty() {
            log::warn!("Ignoring result for a blank player name");
            return;
        }
        self.register(name);
        if let Some(stats) = self.players.get_mut(&key(name)) {
            stats.add_game_result(score, won);
        }
    }

    /// All players, ordered by key
    pub fn players(&self) -> impl Iterator<Item = &PlayerStats> {
        self.players.values()
    }

    /// Up to `limit` players with the highest best score; ties keep key order
    pub fn top_by_best_score(&self, limit: usize) -> Vec<&PlayerStats> {
        let mut top: Vec<&PlayerStats> = self.players.values().collect();
        top.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        top.truncate(limit);
        top
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Load from a `{"players": [...]}` file; missing or unreadable files give an empty registry
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No player file at {}, starting fresh", path.display());
                return Self::new();
            }
        };
        match serde_json::from_str::<PlayersFile>(&json) {
            Ok(file) => {
                let players: BTreeMap<_, _> = file
                    .players
                    .into_iter()
                    .filter(|p| !p.name.trim().is_empty())
                    .map(|p| (key(&p.name), p))
                    .collect();
                log::info!("Loaded {} player(s)", players.len());
                Self { players }
            }
            Err(e) => {
                log::warn!("Unreadable player file {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = PlayersFile {
            players: self.players.values().cloned().collect(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        log::debug!("Players saved ({} entries)", self.players.len());
        Ok(())
    }
}
