//! Vertically oscillating obstacles
//!
//! Obstacles bounce between the top and bottom walls. Each wall contact may
//! nudge their speed by one unit, kept within a band around the base speed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Arena;
use crate::consts::{OBSTACLE_JITTER_CHANCE, OBSTACLE_JITTER_RANGE};
use crate::settings::DifficultyProfile;

/// Horizontal spacing between obstacle columns around the centre line
const OBSTACLE_SPACING: f32 = 150.0;
/// Extra offset for each further pair of columns
const OBSTACLE_PAIR_STEP: f32 = 100.0;

/// A rectangular obstacle; `pos` is its top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Always `(0, ±speed)`
    pub vel: Vec2,
    /// Speed the jitter band is centred on
    pub base_speed: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: Vec2, speed: f32, downward: bool) -> Self {
        let dy = if downward { speed } else { -speed };
        Self {
            pos,
            size,
            vel: Vec2::new(0.0, dy),
            base_speed: speed,
        }
    }

    /// Lay out `profile.obstacle_count` obstacles in columns alternating
    /// left and right of the centre line, each with a random height and
    /// heading.
    pub fn spawn_all<R: Rng>(profile: &DifficultyProfile, arena: &Arena, rng: &mut R) -> Vec<Obstacle> {
        let size = Vec2::new(profile.obstacle_width, profile.obstacle_height);
        let max_y = (arena.h() - size.y).max(0.0);

        (0..profile.obstacle_count)
            .map(|i| {
                let pair = (i / 2) as f32;
                let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
                let offset = sign * (OBSTACLE_SPACING + pair * OBSTACLE_PAIR_STEP);
                let x = (arena.w() / 2.0 + offset - size.x / 2.0).clamp(0.0, (arena.w() - size.x).max(0.0));
                let y = if max_y > 0.0 { rng.random_range(0.0..=max_y) } else { 0.0 };
                let downward = rng.random_bool(0.5);
                Obstacle::new(Vec2::new(x, y), size, profile.obstacle_speed, downward)
            })
            .collect()
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn speed(&self) -> f32 {
        self.vel.y.abs()
    }

    /// Advance one tick; returns true if a wall was hit
    pub fn step<R: Rng>(&mut self, arena_height: f32, rng: &mut R) -> bool {
        self.pos.y += self.vel.y;

        if self.top() <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        } else if self.bottom() >= arena_height {
            self.pos.y = (arena_height - self.size.y).max(0.0);
            self.vel.y = -self.vel.y.abs();
        } else {
            return false;
        }

        self.jitter(rng);
        true
    }

    /// With a small chance, change speed by one unit within
    /// `[max(1, base - range), base + range]`
    fn jitter<R: Rng>(&mut self, rng: &mut R) {
        if !rng.random_bool(OBSTACLE_JITTER_CHANCE) {
            return;
        }
        let delta = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let min = (self.base_speed - OBSTACLE_JITTER_RANGE).max(1.0);
        let max = (self.base_speed + OBSTACLE_JITTER_RANGE).max(min);
        let speed = (self.speed() + delta).clamp(min, max);
        self.vel.y = self.vel.y.signum() * speed;
    }
}
