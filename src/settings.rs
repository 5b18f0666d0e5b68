//! Difficulty profiles and match rules
//!
//! Every gameplay difference between tiers lives in [`DifficultyProfile`];
//! the simulation has a single code path parameterized by it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Parse a difficulty key; accepts the Portuguese keys of the web client
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "fácil" | "facil" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" | "difícil" | "dificil" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Parse a difficulty key, falling back to [`Difficulty::Normal`]
    pub fn from_key_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using {}", s, Difficulty::default().as_str());
            Difficulty::default()
        })
    }

    /// Built-in profile for this preset
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                ball_speed: 3.0,
                ai_paddle: PaddleSpec::new(PADDLE_WIDTH, PADDLE_HEIGHT, 4.0),
                ai_policy: AiPolicy::Probabilistic { ai_difficulty: 0.3 },
                description: "Perfect for beginners".to_string(),
                ..DifficultyProfile::default()
            },
            Difficulty::Normal => DifficultyProfile::default(),
            Difficulty::Hard => DifficultyProfile {
                ball_speed: 7.0,
                acceleration: 1.0005,
                player_paddle: PaddleSpec::new(12.0, 60.0, PLAYER_PADDLE_SPEED),
                ai_paddle: PaddleSpec::new(12.0, 60.0, 8.0),
                ai_policy: AiPolicy::ReactionDelayed {
                    ai_reaction_ms: 120.0,
                    ai_accuracy: 0.8,
                },
                obstacle_count: 1,
                obstacle_speed: 2.0,
                description: "For experienced players".to_string(),
                ..DifficultyProfile::default()
            },
            Difficulty::Expert => DifficultyProfile {
                ball_speed: 9.0,
                acceleration: 1.001,
                // Small player paddle (one ball tall) against a large AI paddle
                player_paddle: PaddleSpec::new(10.0, BALL_RADIUS * 2.0, PLAYER_PADDLE_SPEED),
                ai_paddle: PaddleSpec::new(16.0, 120.0, 10.0),
                ai_policy: AiPolicy::Predictive { ai_accuracy: 0.95 },
                obstacle_count: 2,
                obstacle_speed: 3.0,
                description: "Only for the best!".to_string(),
                ..DifficultyProfile::default()
            },
        }
    }
}

/// Paddle size and per-tick speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleSpec {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl PaddleSpec {
    pub const fn new(width: f32, height: f32, speed: f32) -> Self {
        Self {
            width,
            height,
            speed,
        }
    }

    /// Reject paddles with no area or a negative step
    pub fn validate(&self, owner: &str) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 || self.speed < 0.0 {
            return Err(GameError::InvalidPaddle(format!(
                "{} paddle {}x{} at speed {}",
                owner, self.width, self.height, self.speed
            )));
        }
        Ok(())
    }
}

/// Opponent decision policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum AiPolicy {
    /// Step toward the ball with probability `ai_difficulty`, re-rolled every tick
    Probabilistic { ai_difficulty: f32 },
    /// Re-evaluate at most once per `ai_reaction_ms`, holding the last decision
    ReactionDelayed { ai_reaction_ms: f32, ai_accuracy: f32 },
    /// Aim at the wall-folded intercept when the ball approaches
    Predictive { ai_accuracy: f32 },
}

/// Tunable constants for one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Ball speed after every reset (px/tick)
    pub ball_speed: f32,
    pub max_speed: f32,
    /// Multiplier applied on every paddle bounce
    pub speed_increase_factor: f32,
    /// Continuous per-tick speed-up (1.0 = off)
    pub acceleration: f32,
    pub ball_radius: f32,
    pub initial_angle_range: f32,
    pub min_horizontal_speed: f32,
    pub player_paddle: PaddleSpec,
    /// AI paddle; `speed` is the AI step per qualifying tick
    pub ai_paddle: PaddleSpec,
    pub ai_policy: AiPolicy,
    pub ai_dead_zone: f32,
    pub obstacle_count: u32,
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub description: String,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            ball_speed: 5.0,
            max_speed: BALL_MAX_SPEED,
            speed_increase_factor: BALL_SPEED_INCREASE,
            acceleration: 1.0,
            ball_radius: BALL_RADIUS,
            initial_angle_range: BALL_INITIAL_ANGLE_RANGE,
            min_horizontal_speed: BALL_MIN_HORIZONTAL_SPEED,
            player_paddle: PaddleSpec::new(PADDLE_WIDTH, PADDLE_HEIGHT, PLAYER_PADDLE_SPEED),
            ai_paddle: PaddleSpec::new(PADDLE_WIDTH, PADDLE_HEIGHT, 6.0),
            ai_policy: AiPolicy::Probabilistic { ai_difficulty: 0.6 },
            ai_dead_zone: AI_DEAD_ZONE,
            obstacle_count: 0,
            obstacle_speed: 0.0,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            description: "Balanced and fun".to_string(),
        }
    }
}

impl DifficultyProfile {
    pub fn ai_speed(&self) -> f32 {
        self.ai_paddle.speed
    }
}

/// Arena size and terminal conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub arena_width: u32,
    pub arena_height: u32,
    /// First side to reach this many points wins
    pub point_limit: u32,
    pub duration_secs: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            point_limit: POINT_LIMIT,
            duration_secs: MATCH_DURATION_SECS,
        }
    }
}

/// Game configuration, persisted as JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: MatchRules,
    pub default_difficulty: Difficulty,
    /// Replacements for the built-in profiles, keyed by [`Difficulty::as_str`]
    pub overrides: BTreeMap<String, DifficultyProfile>,
}

impl Settings {
    /// Resolve a difficulty key to its preset and effective profile
    pub fn profile_for(&self, key: &str) -> (Difficulty, DifficultyProfile) {
        let difficulty = Difficulty::from_str(key).unwrap_or_else(|| {
            log::warn!(
                "Unknown difficulty {:?}, using {}",
                key,
                self.default_difficulty.as_str()
            );
            self.default_difficulty
        });
        (difficulty, self.profile(difficulty))
    }

    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        self.overrides
            .get(difficulty.as_str())
            .cloned()
            .unwrap_or_else(|| difficulty.profile())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
