//! ByThePong - a two-paddle ball game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, AI, match loop)
//! - `settings`: Difficulty profiles and match rules
//! - `session`: Match handles and the match registry
//! - `highscores`: Top-10 ranking
//! - `persistence`: Player stats and the end-of-match result sink
//! - `platform`: Monotonic clock abstraction

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use highscores::Ranking;
pub use session::{MatchHandle, MatchRegistry};
pub use settings::{Difficulty, DifficultyProfile, MatchRules, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one ball step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: u32 = 800;
    pub const ARENA_HEIGHT: u32 = 600;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_MAX_SPEED: f32 = 12.0;
    pub const BALL_SPEED_INCREASE: f32 = 1.05;
    /// Floor on |dx| after every bounce and reset
    pub const BALL_MIN_HORIZONTAL_SPEED: f32 = 2.0;
    pub const BALL_INITIAL_ANGLE_RANGE: f32 = std::f32::consts::FRAC_PI_4;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Distance from the side wall to the paddle's outer edge
    pub const PADDLE_MARGIN: f32 = 50.0;
    pub const PLAYER_PADDLE_SPEED: f32 = 7.0;

    /// Collision tolerances
    pub const PADDLE_EPSILON: f32 = 5.0;
    /// |pos - prev_pos| at or below this means the ball was just reset
    pub const RESET_EPSILON: f32 = 1.0;
    pub const WALL_NUDGE: f32 = 1.0;
    pub const OBSTACLE_MARGIN: f32 = 1.0;
    /// Beyond this horizontal margin the ball is force-reset without a point
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 50.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 20.0;
    pub const OBSTACLE_HEIGHT: f32 = 80.0;
    pub const OBSTACLE_JITTER_CHANCE: f64 = 0.1;
    pub const OBSTACLE_JITTER_RANGE: f32 = 2.0;

    /// AI dead zone around the paddle centre
    pub const AI_DEAD_ZONE: f32 = 5.0;

    /// Match rules
    pub const POINT_LIMIT: u32 = 3;
    pub const MATCH_DURATION_SECS: f32 = 120.0;
}

/// Fold `value` into `[min, max]` as if it bounced between the two bounds.
///
/// This is a triangle wave with period `2 * (max - min)`; values already in
/// range come back unchanged.
#[inline]
pub fn fold_between(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return min;
    }
    let m = (value - min).rem_euclid(2.0 * span);
    if m > span { min + 2.0 * span - m } else { min + m }
}
