//! Opponent paddle controller
//!
//! One controller, three policies picked by the difficulty profile:
//! - Probabilistic: chase the ball's current y, rolling accuracy each tick
//! - Reaction-delayed: same chase, but at most one step per reaction window
//! - Predictive: aim at where the ball will cross the paddle plane

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::paddle::{Paddle, PaddleMove};
use super::state::{Arena, Side};
use crate::fold_between;
use crate::settings::{AiPolicy, DifficultyProfile};

/// Predict the y at which a ball reaches the vertical line `plane_x`,
/// folding wall bounces into `[min_y, max_y]`.
///
/// Returns `None` if the ball is not moving toward the plane.
pub fn predict_intercept(
    pos: glam::Vec2,
    vel: glam::Vec2,
    plane_x: f32,
    min_y: f32,
    max_y: f32,
) -> Option<f32> {
    if vel.x == 0.0 {
        return None;
    }
    let t = (plane_x - pos.x) / vel.x;
    if t < 0.0 {
        return None;
    }
    Some(fold_between(pos.y + vel.y * t, min_y, max_y))
}

/// Paddle controller for one side of the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    pub side: Side,
    pub policy: AiPolicy,
    pub dead_zone: f32,
    /// Last reaction-delayed evaluation
    pub decision: PaddleMove,
    /// Time until the next reaction-delayed evaluation
    pub cooldown_ms: f32,
}

impl AiController {
    pub fn new(side: Side, profile: &DifficultyProfile) -> Self {
        Self {
            side,
            policy: profile.ai_policy,
            dead_zone: profile.ai_dead_zone,
            decision: PaddleMove::None,
            cooldown_ms: 0.0,
        }
    }

    /// Forget any held decision; the next tick evaluates immediately
    pub fn reset(&mut self) {
        self.decision = PaddleMove::None;
        self.cooldown_ms = 0.0;
    }

    /// Choose this tick's movement for `paddle`
    pub fn decide<R: Rng>(
        &mut self,
        ball: &Ball,
        paddle: &Paddle,
        arena: &Arena,
        dt: f32,
        rng: &mut R,
    ) -> PaddleMove {
        match self.policy {
            AiPolicy::Probabilistic { ai_difficulty } => {
                self.step_toward(ball.pos.y, paddle, ai_difficulty, rng)
            }
            AiPolicy::ReactionDelayed {
                ai_reaction_ms,
                ai_accuracy,
            } => {
                self.cooldown_ms -= dt * 1000.0;
                if self.cooldown_ms > 0.0 {
                    return PaddleMove::None;
                }
                self.decision = self.step_toward(ball.pos.y, paddle, ai_accuracy, rng);
                self.cooldown_ms = ai_reaction_ms;
                self.decision
            }
            AiPolicy::Predictive { ai_accuracy } => {
                // Ball moving away: keep tracking its current height
                let target = self.intercept(ball, paddle, arena).unwrap_or(ball.pos.y);
                self.step_toward(target, paddle, ai_accuracy, rng)
            }
        }
    }

    /// Where the ball's centre will meet this paddle's contact plane
    pub fn intercept(&self, ball: &Ball, paddle: &Paddle, arena: &Arena) -> Option<f32> {
        let plane_x = paddle.face(self.side) + self.side.away() * ball.radius;
        let approaching = ball.vel.x * self.side.away() < 0.0;
        if !approaching {
            return None;
        }
        predict_intercept(
            ball.pos,
            ball.vel,
            plane_x,
            ball.radius,
            arena.h() - ball.radius,
        )
    }

    fn step_toward<R: Rng>(&self, target_y: f32, paddle: &Paddle, chance: f32, rng: &mut R) -> PaddleMove {
        let diff = target_y - paddle.center_y();
        if diff.abs() <= self.dead_zone {
            return PaddleMove::None;
        }
        if !rng.random_bool(chance.clamp(0.0, 1.0) as f64) {
            return PaddleMove::None;
        }
        if diff < 0.0 {
            PaddleMove::Up
        } else {
            PaddleMove::Down
        }
    }
}
