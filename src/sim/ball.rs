//! Ball kinematics
//!
//! Only this module and the collision resolver mutate ball state. The
//! previous-position memory written by [`Ball::step`] is the anchor the
//! resolver uses to tell a freshly reset ball from an incoming shot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::error::{GameError, Result};
use crate::settings::DifficultyProfile;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Position before the last [`Ball::step`]
    pub prev_pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    /// Scalar speed, kept equal to `vel.length()`
    pub speed: f32,
    pub initial_speed: f32,
    pub max_speed: f32,
    pub speed_increase_factor: f32,
    /// Launch angles are drawn from `[-range, +range]`
    pub initial_angle_range: f32,
    pub min_horizontal_speed: f32,
}

impl Ball {
    /// Create a resting ball at `center` tuned by `profile`
    pub fn new(center: Vec2, profile: &DifficultyProfile) -> Result<Self> {
        if profile.ball_radius <= 0.0 {
            return Err(GameError::InvalidBall(format!(
                "radius must be positive, got {}",
                profile.ball_radius
            )));
        }
        if profile.speed_increase_factor <= 1.0 {
            return Err(GameError::InvalidBall(format!(
                "speed increase factor must exceed 1.0, got {}",
                profile.speed_increase_factor
            )));
        }
        if !(profile.initial_angle_range > 0.0
            && profile.initial_angle_range <= std::f32::consts::FRAC_PI_2)
        {
            return Err(GameError::InvalidBall(format!(
                "initial angle range must be in (0, pi/2], got {}",
                profile.initial_angle_range
            )));
        }
        if profile.ball_speed > profile.max_speed || profile.min_horizontal_speed >= profile.max_speed {
            return Err(GameError::InvalidBall(format!(
                "speeds must stay below max speed {}",
                profile.max_speed
            )));
        }

        Ok(Self {
            pos: center,
            prev_pos: center,
            radius: profile.ball_radius,
            vel: Vec2::ZERO,
            speed: 0.0,
            initial_speed: profile.ball_speed,
            max_speed: profile.max_speed,
            speed_increase_factor: profile.speed_increase_factor,
            initial_angle_range: profile.initial_angle_range,
            min_horizontal_speed: profile.min_horizontal_speed,
        })
    }

    /// Re-serve from `center` at the initial speed with a random angle and side
    pub fn reset<R: Rng>(&mut self, center: Vec2, rng: &mut R) {
        self.pos = center;
        self.prev_pos = center;
        self.speed = self.initial_speed;

        let angle = rng.random_range(-self.initial_angle_range..=self.initial_angle_range);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        let dx = (self.speed * angle.cos()).abs().max(self.min_horizontal_speed);
        self.vel = Vec2::new(direction * dx, self.speed * angle.sin());
        self.cap_speed();
    }

    /// Advance one tick, remembering where the ball was
    pub fn step(&mut self) {
        self.prev_pos = self.pos;
        self.pos += self.vel;
    }

    /// Distance covered by the last step; near zero right after a reset
    pub fn last_displacement(&self) -> f32 {
        self.pos.distance(self.prev_pos)
    }

    /// Bounce off the paddle on `side` with an angle set by the contact point
    ///
    /// The hit height relative to the paddle maps linearly onto ±45°. The
    /// outgoing horizontal velocity always points away from the paddle.
    pub fn bounce_paddle(&mut self, paddle_y: f32, paddle_height: f32, side: Side) {
        let relative = ((self.pos.y - paddle_y) / paddle_height).clamp(0.0, 1.0);
        let angle = (relative - 0.5) * std::f32::consts::FRAC_PI_2;

        self.speed = (self.speed * self.speed_increase_factor).min(self.max_speed);

        let dx = (self.speed * angle.cos()).max(self.min_horizontal_speed);
        self.vel = Vec2::new(side.away() * dx, self.speed * angle.sin());
        self.cap_speed();
    }

    /// Continuous speed-up; factors at or below 1.0 are ignored
    pub fn accelerate(&mut self, factor: f32) {
        if factor <= 1.0 {
            return;
        }
        self.vel *= factor;
        self.cap_speed();
    }

    pub fn force_direction_left(&mut self) {
        if self.vel.x > 0.0 {
            self.vel.x = -self.vel.x;
        }
    }

    pub fn force_direction_right(&mut self) {
        if self.vel.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
    }

    /// Point the ball away from the paddle on `side`
    pub fn force_direction_away_from(&mut self, side: Side) {
        match side {
            Side::Left => self.force_direction_right(),
            Side::Right => self.force_direction_left(),
        }
    }

    /// Recompute `speed` from `vel`, normalizing down to `max_speed` if needed
    fn cap_speed(&mut self) {
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel = self.vel / speed * self.max_speed;
            self.speed = self.max_speed;
        } else {
            self.speed = speed;
        }
    }
}
