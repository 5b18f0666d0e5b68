//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One ball step per tick
//! - Seeded RNG only, owned by the match
//! - No clock, storage or platform dependencies

pub mod ai;
pub mod ball;
pub mod collision;
pub mod obstacle;
pub mod paddle;
pub mod state;
pub mod tick;

pub use ai::{AiController, predict_intercept};
pub use ball::Ball;
pub use collision::{BallExit, PaddleContact, check_bounds, resolve_obstacle, resolve_paddle, resolve_walls};
pub use obstacle::Obstacle;
pub use paddle::{Paddle, PaddleMove};
pub use state::{Arena, GameEvent, GameState, MatchPhase, MatchSnapshot, Score, Side, Winner};
pub use tick::{TickInput, TickOutcome, tick};
