//! Paddle: a vertical actor clamped to the arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::settings::PaddleSpec;

/// Per-tick movement intent for a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleMove {
    #[default]
    None,
    Up,
    Down,
}

impl PaddleMove {
    /// Parse a client input token; anything unrecognized means no movement
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "up" => PaddleMove::Up,
            "down" => PaddleMove::Down,
            _ => PaddleMove::None,
        }
    }
}

/// A paddle; `pos` is its top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Step size in pixels per tick
    pub speed: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32, spec: &PaddleSpec) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: spec.width,
            height: spec.height,
            speed: spec.speed,
        }
    }

    /// Paddle placed on `side`, vertically centred in the arena
    pub fn for_side(side: Side, spec: &PaddleSpec, arena_width: f32, arena_height: f32) -> Self {
        let mut paddle = Self::new(0.0, 0.0, spec);
        paddle.pos.x = side.paddle_x(spec.width, arena_width);
        paddle.set_y((arena_height - spec.height) / 2.0, arena_height);
        paddle
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    /// The edge facing the field for a paddle on `side`
    pub fn face(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.right(),
            Side::Right => self.left(),
        }
    }

    fn max_y(&self, arena_height: f32) -> f32 {
        (arena_height - self.height).max(0.0)
    }

    /// Set the vertical position, clamped to `[0, arena_height - height]`
    pub fn set_y(&mut self, y: f32, arena_height: f32) {
        self.pos.y = y.clamp(0.0, self.max_y(arena_height));
    }

    pub fn move_up(&mut self, arena_height: f32) {
        self.set_y(self.pos.y - self.speed, arena_height);
    }

    pub fn move_down(&mut self, arena_height: f32) {
        self.set_y(self.pos.y + self.speed, arena_height);
    }

    /// Apply one tick of movement intent
    pub fn apply(&mut self, intent: PaddleMove, arena_height: f32) {
        match intent {
            PaddleMove::Up => self.move_up(arena_height),
            PaddleMove::Down => self.move_down(arena_height),
            PaddleMove::None => {}
        }
    }
}
