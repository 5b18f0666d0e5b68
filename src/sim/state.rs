//! Match state and core simulation types
//!
//! Everything a match needs to advance deterministically lives in
//! [`GameState`], including its own seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiController;
use super::ball::Ball;
use super::obstacle::Obstacle;
use super::paddle::Paddle;
use crate::consts::PADDLE_MARGIN;
use crate::error::{GameError, Result};
use crate::settings::{DifficultyProfile, MatchRules};

/// Which half of the arena an actor defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player side
    Left,
    /// AI side
    Right,
}

impl Side {
    /// Sign of a horizontal velocity pointing away from this side's paddle
    #[inline]
    pub fn away(&self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Left x of a paddle of `paddle_width` on this side
    pub fn paddle_x(&self, paddle_width: f32, arena_width: f32) -> f32 {
        match self {
            Side::Left => PADDLE_MARGIN,
            Side::Right => arena_width - PADDLE_MARGIN - paddle_width,
        }
    }
}

/// Match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Left,
    Right,
    Draw,
}

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Constructed, not started
    #[default]
    Idle,
    Running,
    /// Frozen mid-match; the match clock does not advance
    Paused,
    /// Winner decided; state frozen until restarted
    Finished,
}

/// Things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit(Side),
    /// Ball pulled out from behind a paddle
    Unstuck(Side),
    WallHit,
    ObstacleHit,
    Point(Side),
    /// Ball left the arena by a wide margin and was re-served without a point
    ForcedReset,
    Finished(Winner),
}

/// Playing field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: u32,
    pub height: u32,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidArena { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.height as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.w() / 2.0, self.h() / 2.0)
    }
}

/// Per-side point counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Higher score wins; equal scores are a draw
    pub fn leader(&self) -> Winner {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Winner::Left,
            std::cmp::Ordering::Less => Winner::Right,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match RNG: serve angles, obstacle jitter, AI rolls
    pub rng: Pcg32,
    pub arena: Arena,
    pub rules: MatchRules,
    pub profile: DifficultyProfile,
    pub ball: Ball,
    /// Player paddle
    pub left_paddle: Paddle,
    /// AI paddle
    pub right_paddle: Paddle,
    pub obstacles: Vec<Obstacle>,
    /// Opponent controller (right side)
    pub ai: AiController,
    /// Drives the left paddle in idle/demo mode
    pub autopilot: AiController,
    pub score: Score,
    pub elapsed_secs: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: MatchPhase,
    pub winner: Option<Winner>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle match with an RNG seeded from `seed`
    pub fn new(profile: DifficultyProfile, rules: MatchRules, seed: u64) -> Result<Self> {
        Self::with_rng(profile, rules, Pcg32::seed_from_u64(seed))
    }

    /// Create an idle match drawing all randomness from `rng`
    pub fn with_rng(profile: DifficultyProfile, rules: MatchRules, mut rng: Pcg32) -> Result<Self> {
        let arena = Arena::new(rules.arena_width, rules.arena_height)?;
        let ball = Ball::new(arena.center(), &profile)?;
        profile.player_paddle.validate("player")?;
        profile.ai_paddle.validate("ai")?;
        let left_paddle = Paddle::for_side(Side::Left, &profile.player_paddle, arena.w(), arena.h());
        let right_paddle = Paddle::for_side(Side::Right, &profile.ai_paddle, arena.w(), arena.h());
        let obstacles = Obstacle::spawn_all(&profile, &arena, &mut rng);

        Ok(Self {
            rng,
            arena,
            rules,
            ai: AiController::new(Side::Right, &profile),
            autopilot: AiController::new(Side::Left, &profile),
            profile,
            ball,
            left_paddle,
            right_paddle,
            obstacles,
            score: Score::default(),
            elapsed_secs: 0.0,
            time_ticks: 0,
            phase: MatchPhase::Idle,
            winner: None,
            events: Vec::new(),
        })
    }

    /// Start (or restart in place): scores, ball, paddles, obstacles and timer reset
    pub fn start(&mut self) {
        let (w, h) = (self.arena.w(), self.arena.h());
        self.score = Score::default();
        self.elapsed_secs = 0.0;
        self.time_ticks = 0;
        self.winner = None;
        self.events.clear();

        self.left_paddle = Paddle::for_side(Side::Left, &self.profile.player_paddle, w, h);
        self.right_paddle = Paddle::for_side(Side::Right, &self.profile.ai_paddle, w, h);
        self.obstacles = Obstacle::spawn_all(&self.profile, &self.arena, &mut self.rng);
        self.ai.reset();
        self.autopilot.reset();
        self.ball.reset(self.arena.center(), &mut self.rng);

        self.phase = MatchPhase::Running;
        log::info!(
            "Match started: {}x{}, {} obstacle(s)",
            self.arena.width,
            self.arena.height,
            self.obstacles.len()
        );
    }

    /// Abandon the match without a result
    pub fn stop(&mut self) {
        if matches!(self.phase, MatchPhase::Running | MatchPhase::Paused) {
            log::info!("Match stopped at {}-{}", self.score.left, self.score.right);
        }
        self.phase = MatchPhase::Idle;
    }

    /// Freeze a running match; false if it was not running
    pub fn pause(&mut self) -> bool {
        if self.phase != MatchPhase::Running {
            return false;
        }
        self.phase = MatchPhase::Paused;
        log::info!("Match paused at {:.1}s", self.elapsed_secs);
        true
    }

    /// Continue a paused match; false if it was not paused
    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = MatchPhase::Running;
        log::info!("Match resumed at {:.1}s", self.elapsed_secs);
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    /// Whole seconds left on the match clock
    pub fn remaining_time(&self) -> u32 {
        (self.rules.duration_secs - self.elapsed_secs).max(0.0).floor() as u32
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            ball: BallView {
                x: self.ball.pos.x,
                y: self.ball.pos.y,
                radius: self.ball.radius,
            },
            left_paddle: PaddleView::from(&self.left_paddle),
            right_paddle: PaddleView::from(&self.right_paddle),
            obstacles: self.obstacles.iter().map(ObstacleView::from).collect(),
            left_score: self.score.left,
            right_score: self.score.right,
            remaining_time: self.remaining_time(),
            running: self.is_running(),
            phase: self.phase,
            winner: self.winner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&Paddle> for PaddleView {
    fn from(p: &Paddle) -> Self {
        Self {
            x: p.pos.x,
            y: p.pos.y,
            width: p.width,
            height: p.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&Obstacle> for ObstacleView {
    fn from(o: &Obstacle) -> Self {
        Self {
            x: o.pos.x,
            y: o.pos.y,
            width: o.size.x,
            height: o.size.y,
        }
    }
}

/// Read-only view of a match handed to outer collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub ball: BallView,
    pub left_paddle: PaddleView,
    pub right_paddle: PaddleView,
    pub obstacles: Vec<ObstacleView>,
    pub left_score: u32,
    pub right_score: u32,
    /// Whole seconds
    pub remaining_time: u32,
    pub running: bool,
    pub phase: MatchPhase,
    pub winner: Option<Winner>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    fn state(difficulty: Difficulty) -> GameState {
        GameState::new(difficulty.profile(), MatchRules::default(), 12345).unwrap()
    }

    #[test]
    fn test_new_match_is_idle() {
        let s = state(Difficulty::Normal);
        assert_eq!(s.phase, MatchPhase::Idle);
        assert_eq!(s.remaining_time(), 120);
        assert_eq!(s.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(s.left_paddle.pos, Vec2::new(50.0, 250.0));
        assert_eq!(s.right_paddle.pos, Vec2::new(735.0, 250.0));
    }

    #[test]
    fn test_zero_arena_is_rejected() {
        let rules = MatchRules {
            arena_width: 0,
            ..MatchRules::default()
        };
        let err = GameState::new(Difficulty::Normal.profile(), rules, 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidArena { width: 0, .. }));
    }

    #[test]
    fn test_zero_height_paddle_is_rejected() {
        let mut profile = Difficulty::Normal.profile();
        profile.ai_paddle.height = 0.0;
        let err = GameState::new(profile, MatchRules::default(), 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidPaddle(_)));

        let mut profile = Difficulty::Normal.profile();
        profile.player_paddle.width = -3.0;
        assert!(GameState::new(profile, MatchRules::default(), 1).is_err());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut s = state(Difficulty::Normal);
        assert!(!s.pause());
        s.start();
        assert!(s.pause());
        assert_eq!(s.phase, MatchPhase::Paused);
        assert!(!s.snapshot().running);
        assert!(!s.pause());

        assert!(s.resume());
        assert!(s.is_running());
        assert!(!s.resume());

        s.pause();
        s.stop();
        assert_eq!(s.phase, MatchPhase::Idle);
        assert!(!s.resume());
    }

    #[test]
    fn test_start_resets_everything() {
        let mut s = state(Difficulty::Expert);
        s.start();
        s.score.left = 2;
        s.elapsed_secs = 50.0;
        s.left_paddle.pos.y = 0.0;
        s.phase = MatchPhase::Finished;
        s.winner = Some(Winner::Left);

        s.start();
        assert_eq!(s.phase, MatchPhase::Running);
        assert_eq!(s.score, Score::default());
        assert_eq!(s.elapsed_secs, 0.0);
        assert_eq!(s.winner, None);
        assert_eq!(s.left_paddle.pos.y, (600.0 - s.left_paddle.height) / 2.0);
        assert_eq!(s.obstacles.len(), 2);
        assert_eq!(s.ball.pos, s.arena.center());
        assert!(s.ball.vel.x.abs() >= s.ball.min_horizontal_speed);
    }

    #[test]
    fn test_obstacles_are_difficulty_gated() {
        assert!(state(Difficulty::Easy).obstacles.is_empty());
        assert!(state(Difficulty::Normal).obstacles.is_empty());
        assert_eq!(state(Difficulty::Hard).obstacles.len(), 1);
    }

    #[test]
    fn test_score_leader() {
        let mut score = Score::default();
        assert_eq!(score.leader(), Winner::Draw);
        score.award(Side::Right);
        assert_eq!(score.leader(), Winner::Right);
        score.award(Side::Left);
        score.award(Side::Left);
        assert_eq!(score.leader(), Winner::Left);
        assert_eq!(score.get(Side::Left), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = state(Difficulty::Hard);
        s.start();
        let snap = s.snapshot();
        assert!(snap.running);
        assert_eq!(snap.ball.radius, 10.0);
        assert_eq!(snap.obstacles.len(), 1);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"remaining_time\":120"));
        let back: MatchSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
