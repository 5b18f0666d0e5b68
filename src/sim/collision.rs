//! Collision detection and response
//!
//! Everything here is axis-aligned: the ball is treated as its bounding
//! square against walls, paddles and obstacles. Each resolver moves the ball
//! clear of whatever it hit so the same contact is never processed twice.

use super::ball::Ball;
use super::obstacle::Obstacle;
use super::paddle::Paddle;
use super::state::Side;
use crate::consts::{OBSTACLE_MARGIN, OUT_OF_BOUNDS_MARGIN, PADDLE_EPSILON, RESET_EPSILON, WALL_NUDGE};

/// Outcome of checking the ball against one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    Miss,
    /// Regular rebound off the paddle face
    Bounce,
    /// Ball found behind the face (or just served into it) and pushed out
    Unstuck,
}

/// Where the ball is relative to the goal lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallExit {
    InPlay,
    /// Ball crossed a goal line; the side given earns the point
    Scored(Side),
    /// Ball is far outside the arena; re-serve without a point
    Lost,
}

/// Overlap depth of the ball's bounding box into a rectangle, per direction
#[derive(Debug, Clone, Copy)]
struct Penetration {
    from_left: f32,
    from_right: f32,
    from_top: f32,
    from_bottom: f32,
}

/// Reflect the ball off the top and bottom walls
pub fn resolve_walls(ball: &mut Ball, arena_height: f32) -> bool {
    if ball.pos.y - ball.radius <= 0.0 {
        ball.pos.y = ball.radius + WALL_NUDGE;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + ball.radius >= arena_height {
        ball.pos.y = arena_height - ball.radius - WALL_NUDGE;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}

/// Resolve the ball against the paddle defending `side`
///
/// A ball within [`PADDLE_EPSILON`] of the face that overlaps the paddle
/// vertically is a candidate. If it was just served or its centre is already
/// behind the face, it is snapped in front of the paddle and sent away. If it
/// has reached the face, it rebounds with an angle set by the contact height.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle, side: Side) -> PaddleContact {
    let r = ball.radius;
    let x = ball.pos.x;

    let overlaps_y = ball.pos.y + r >= paddle.top() && ball.pos.y - r <= paddle.bottom();
    if !overlaps_y {
        return PaddleContact::Miss;
    }

    let face = paddle.face(side);
    // gap > 0: the ball's leading edge is still in front of the face
    let (gap, behind, past_back) = match side {
        Side::Left => ((x - r) - face, x < face, x + r < paddle.left()),
        Side::Right => (face - (x + r), x > face, x - r > paddle.right()),
    };
    if past_back || gap > PADDLE_EPSILON {
        return PaddleContact::Miss;
    }

    let snap_x = face + side.away() * (r + PADDLE_EPSILON);

    if ball.last_displacement() <= RESET_EPSILON || behind {
        ball.pos.x = snap_x;
        ball.bounce_paddle(paddle.pos.y, paddle.height, side);
        ball.force_direction_away_from(side);
        log::debug!("Ball unstuck from {:?} paddle at y={:.1}", side, ball.pos.y);
        return PaddleContact::Unstuck;
    }

    if gap <= 0.0 {
        ball.bounce_paddle(paddle.pos.y, paddle.height, side);
        ball.pos.x = snap_x;
        return PaddleContact::Bounce;
    }

    PaddleContact::Miss
}

fn penetration(ball: &Ball, obstacle: &Obstacle) -> Option<Penetration> {
    let r = ball.radius;
    let p = Penetration {
        from_left: (ball.pos.x + r) - obstacle.left(),
        from_right: obstacle.right() - (ball.pos.x - r),
        from_top: (ball.pos.y + r) - obstacle.top(),
        from_bottom: obstacle.bottom() - (ball.pos.y - r),
    };
    let overlapping = p.from_left > 0.0 && p.from_right > 0.0 && p.from_top > 0.0 && p.from_bottom > 0.0;
    overlapping.then_some(p)
}

/// Push the ball out of an obstacle along the axis of least penetration
pub fn resolve_obstacle(ball: &mut Ball, obstacle: &Obstacle) -> bool {
    let Some(p) = penetration(ball, obstacle) else {
        return false;
    };
    let r = ball.radius;

    let min_x = p.from_left.min(p.from_right);
    let min_y = p.from_top.min(p.from_bottom);

    if min_x < min_y {
        if p.from_left < p.from_right {
            ball.pos.x = obstacle.left() - r - OBSTACLE_MARGIN;
            ball.vel.x = -ball.vel.x.abs();
        } else {
            ball.pos.x = obstacle.right() + r + OBSTACLE_MARGIN;
            ball.vel.x = ball.vel.x.abs();
        }
    } else if p.from_top < p.from_bottom {
        ball.pos.y = obstacle.top() - r - OBSTACLE_MARGIN;
        ball.vel.y = -ball.vel.y.abs();
    } else {
        ball.pos.y = obstacle.bottom() + r + OBSTACLE_MARGIN;
        ball.vel.y = ball.vel.y.abs();
    }
    true
}

/// Classify the ball's horizontal position against the goal lines
pub fn check_bounds(ball: &Ball, arena_width: f32) -> BallExit {
    let x = ball.pos.x;
    if x < -OUT_OF_BOUNDS_MARGIN || x > arena_width + OUT_OF_BOUNDS_MARGIN {
        BallExit::Lost
    } else if x < 0.0 {
        BallExit::Scored(Side::Right)
    } else if x > arena_width {
        BallExit::Scored(Side::Left)
    } else {
        BallExit::InPlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, PaddleSpec};
    use glam::Vec2;

    fn ball_at(x: f32, y: f32, vel: Vec2) -> Ball {
        let mut b = Ball::new(Vec2::new(400.0, 300.0), &Difficulty::Normal.profile()).unwrap();
        b.prev_pos = Vec2::new(x, y) - vel;
        b.pos = Vec2::new(x, y);
        b.vel = vel;
        b.speed = vel.length();
        b
    }

    fn left_paddle() -> Paddle {
        Paddle::new(50.0, 250.0, &PaddleSpec::new(15.0, 100.0, 7.0))
    }

    fn right_paddle() -> Paddle {
        Paddle::new(735.0, 250.0, &PaddleSpec::new(15.0, 100.0, 6.0))
    }

    #[test]
    fn test_rebound_at_left_face() {
        let mut b = ball_at(65.0, 300.0, Vec2::new(-5.0, 0.0));
        let contact = resolve_paddle(&mut b, &left_paddle(), Side::Left);
        assert_eq!(contact, PaddleContact::Bounce);
        assert!(b.vel.x > 0.0);
        assert!(b.pos.x >= 65.0 + b.radius);
    }

    #[test]
    fn test_rebound_at_right_face() {
        let mut b = ball_at(727.0, 280.0, Vec2::new(6.0, 1.0));
        let contact = resolve_paddle(&mut b, &right_paddle(), Side::Right);
        assert_eq!(contact, PaddleContact::Bounce);
        assert!(b.vel.x < 0.0);
        assert!(b.pos.x + b.radius <= 735.0);
        // Hit above centre deflects upward
        assert!(b.vel.y < 0.0);
    }

    #[test]
    fn test_approaching_ball_within_epsilon_is_left_alone() {
        let mut b = ball_at(78.0, 300.0, Vec2::new(-5.0, 0.0));
        assert_eq!(resolve_paddle(&mut b, &left_paddle(), Side::Left), PaddleContact::Miss);
        assert_eq!(b.vel, Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_ball_behind_face_is_unstuck() {
        // Centre inside the paddle body, still heading toward the goal
        let mut b = ball_at(60.0, 300.0, Vec2::new(-4.0, 1.0));
        let contact = resolve_paddle(&mut b, &left_paddle(), Side::Left);
        assert_eq!(contact, PaddleContact::Unstuck);
        assert!(b.vel.x > 0.0);
        assert_eq!(b.pos.x, 65.0 + b.radius + PADDLE_EPSILON);
    }

    #[test]
    fn test_freshly_served_ball_against_face_is_sent_away() {
        let mut b = ball_at(740.0, 300.0, Vec2::new(5.0, 0.0));
        b.prev_pos = b.pos;
        let contact = resolve_paddle(&mut b, &right_paddle(), Side::Right);
        assert_eq!(contact, PaddleContact::Unstuck);
        assert!(b.vel.x < 0.0);
        assert_eq!(b.pos.x, 735.0 - b.radius - PADDLE_EPSILON);
    }

    #[test]
    fn test_vertical_miss() {
        let mut b = ball_at(62.0, 100.0, Vec2::new(-5.0, 0.0));
        assert_eq!(resolve_paddle(&mut b, &left_paddle(), Side::Left), PaddleContact::Miss);
    }

    #[test]
    fn test_ball_past_the_back_is_not_rescued() {
        let mut b = ball_at(30.0, 300.0, Vec2::new(-5.0, 0.0));
        assert_eq!(resolve_paddle(&mut b, &left_paddle(), Side::Left), PaddleContact::Miss);
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_walls_reflect_and_nudge() {
        let mut b = ball_at(400.0, 8.0, Vec2::new(3.0, -4.0));
        assert!(resolve_walls(&mut b, 600.0));
        assert_eq!(b.pos.y, 11.0);
        assert_eq!(b.vel.y, 4.0);

        let mut b = ball_at(400.0, 595.0, Vec2::new(3.0, 4.0));
        assert!(resolve_walls(&mut b, 600.0));
        assert_eq!(b.pos.y, 589.0);
        assert_eq!(b.vel.y, -4.0);

        let mut b = ball_at(400.0, 300.0, Vec2::new(3.0, 4.0));
        assert!(!resolve_walls(&mut b, 600.0));
    }

    #[test]
    fn test_obstacle_side_hit_flips_horizontal() {
        let o = Obstacle::new(Vec2::new(390.0, 260.0), Vec2::new(20.0, 80.0), 2.0, true);
        let mut b = ball_at(382.0, 300.0, Vec2::new(5.0, 1.0));
        assert!(resolve_obstacle(&mut b, &o));
        assert_eq!(b.pos.x, 390.0 - 10.0 - OBSTACLE_MARGIN);
        assert_eq!(b.vel, Vec2::new(-5.0, 1.0));
    }

    #[test]
    fn test_obstacle_top_hit_flips_vertical() {
        let o = Obstacle::new(Vec2::new(390.0, 260.0), Vec2::new(20.0, 80.0), 2.0, true);
        let mut b = ball_at(400.0, 253.0, Vec2::new(1.0, 5.0));
        assert!(resolve_obstacle(&mut b, &o));
        assert_eq!(b.pos.y, 260.0 - 10.0 - OBSTACLE_MARGIN);
        assert_eq!(b.vel, Vec2::new(1.0, -5.0));
    }

    #[test]
    fn test_obstacle_clear_ball_untouched() {
        let o = Obstacle::new(Vec2::new(390.0, 260.0), Vec2::new(20.0, 80.0), 2.0, true);
        let mut b = ball_at(200.0, 300.0, Vec2::new(5.0, 0.0));
        assert!(!resolve_obstacle(&mut b, &o));
        assert_eq!(b.pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_bounds() {
        let at = |x: f32| ball_at(x, 300.0, Vec2::new(1.0, 0.0));
        assert_eq!(check_bounds(&at(400.0), 800.0), BallExit::InPlay);
        assert_eq!(check_bounds(&at(-1.0), 800.0), BallExit::Scored(Side::Right));
        assert_eq!(check_bounds(&at(801.0), 800.0), BallExit::Scored(Side::Left));
        assert_eq!(check_bounds(&at(-60.0), 800.0), BallExit::Lost);
        assert_eq!(check_bounds(&at(851.0), 800.0), BallExit::Lost);
    }
}
