//! Fixed-order match tick
//!
//! One call advances a running match by exactly one ball step. The order is
//! fixed: player paddle, AI paddle, acceleration, ball, obstacles, collisions,
//! match clock, terminal check.

use super::collision::{self, BallExit, PaddleContact};
use super::paddle::PaddleMove;
use super::state::{GameEvent, GameState, MatchPhase, Side, Winner};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Player paddle intent
    pub direction: PaddleMove,
    /// Idle/demo mode - AI drives the player paddle too
    pub idle_mode: bool,
}

impl TickInput {
    pub fn from_token(token: &str) -> Self {
        Self {
            direction: PaddleMove::from_token(token),
            idle_mode: false,
        }
    }
}

/// What a call to [`tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Match is not running; nothing changed
    Rejected,
    Advanced,
    /// This tick ended the match
    Finished(Winner),
}

/// Advance the match by one step, `dt` seconds of match time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    if state.phase != MatchPhase::Running {
        return TickOutcome::Rejected;
    }
    state.events.clear();
    state.time_ticks += 1;

    let arena_h = state.arena.h();

    let player_move = if input.idle_mode {
        state
            .autopilot
            .decide(&state.ball, &state.left_paddle, &state.arena, dt, &mut state.rng)
    } else {
        input.direction
    };
    state.left_paddle.apply(player_move, arena_h);

    let ai_move = state
        .ai
        .decide(&state.ball, &state.right_paddle, &state.arena, dt, &mut state.rng);
    state.right_paddle.apply(ai_move, arena_h);

    state.ball.accelerate(state.profile.acceleration);
    state.ball.step();

    for obstacle in &mut state.obstacles {
        obstacle.step(arena_h, &mut state.rng);
    }

    resolve_collisions(state);

    state.elapsed_secs += dt;

    match match_result(state) {
        Some(winner) => {
            state.phase = MatchPhase::Finished;
            state.winner = Some(winner);
            state.events.push(GameEvent::Finished(winner));
            log::info!(
                "Match finished {}-{} after {:.1}s: {:?}",
                state.score.left,
                state.score.right,
                state.elapsed_secs,
                winner
            );
            TickOutcome::Finished(winner)
        }
        None => TickOutcome::Advanced,
    }
}

/// Obstacles, then walls, then paddles, then goal lines
fn resolve_collisions(state: &mut GameState) {
    for obstacle in &state.obstacles {
        if collision::resolve_obstacle(&mut state.ball, obstacle) {
            state.events.push(GameEvent::ObstacleHit);
        }
    }

    if collision::resolve_walls(&mut state.ball, state.arena.h()) {
        state.events.push(GameEvent::WallHit);
    }

    for (side, paddle) in [(Side::Left, &state.left_paddle), (Side::Right, &state.right_paddle)] {
        match collision::resolve_paddle(&mut state.ball, paddle, side) {
            PaddleContact::Bounce => state.events.push(GameEvent::PaddleHit(side)),
            PaddleContact::Unstuck => state.events.push(GameEvent::Unstuck(side)),
            PaddleContact::Miss => {}
        }
    }

    match collision::check_bounds(&state.ball, state.arena.w()) {
        BallExit::InPlay => {}
        BallExit::Scored(side) => {
            state.score.award(side);
            state.events.push(GameEvent::Point(side));
            log::debug!("Point to {:?}: {}-{}", side, state.score.left, state.score.right);
            state.ball.reset(state.arena.center(), &mut state.rng);
        }
        BallExit::Lost => {
            log::warn!(
                "Ball out of bounds at ({:.1}, {:.1}), re-serving",
                state.ball.pos.x,
                state.ball.pos.y
            );
            state.events.push(GameEvent::ForcedReset);
            state.ball.reset(state.arena.center(), &mut state.rng);
        }
    }
}

/// Point limit wins outright; otherwise the clock running out decides
fn match_result(state: &GameState) -> Option<Winner> {
    let limit = state.rules.point_limit;
    if state.score.left >= limit || state.score.right >= limit {
        return Some(state.score.leader());
    }
    if state.elapsed_secs >= state.rules.duration_secs {
        return Some(state.score.leader());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::{Difficulty, MatchRules};
    use glam::Vec2;
    use proptest::prelude::*;

    fn running(difficulty: Difficulty, seed: u64) -> GameState {
        let mut state = GameState::new(difficulty.profile(), MatchRules::default(), seed).unwrap();
        state.start();
        state
    }

    #[test]
    fn test_idle_match_rejects_ticks() {
        let mut state = GameState::new(Difficulty::Normal.profile(), MatchRules::default(), 1).unwrap();
        let before = state.ball.pos;
        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Rejected);
        assert_eq!(state.ball.pos, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_player_input_moves_left_paddle() {
        let mut state = running(Difficulty::Normal, 1);
        let y = state.left_paddle.pos.y;
        tick(&mut state, &TickInput::from_token("up"), SIM_DT);
        assert_eq!(state.left_paddle.pos.y, y - 7.0);
        tick(&mut state, &TickInput::from_token("nonsense"), SIM_DT);
        assert_eq!(state.left_paddle.pos.y, y - 7.0);
    }

    #[test]
    fn test_ball_reaching_player_face_rebounds() {
        let mut state = running(Difficulty::Normal, 2);
        assert_eq!(state.left_paddle.pos, Vec2::new(50.0, 250.0));
        state.ball.pos = Vec2::new(70.0, 300.0);
        state.ball.vel = Vec2::new(-5.0, 0.0);
        state.ball.speed = 5.0;

        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Advanced);
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.pos.x >= 65.0 + state.ball.radius);
        assert!(state.events.contains(&GameEvent::PaddleHit(Side::Left)));
        assert_eq!(state.score.right, 0);
    }

    #[test]
    fn test_paused_match_rejects_ticks_and_keeps_clock() {
        let mut state = running(Difficulty::Normal, 9);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let elapsed = state.elapsed_secs;
        let ball = state.ball.pos;

        assert!(state.pause());
        for _ in 0..10 {
            assert_eq!(tick(&mut state, &TickInput::from_token("up"), SIM_DT), TickOutcome::Rejected);
        }
        assert_eq!(state.elapsed_secs, elapsed);
        assert_eq!(state.ball.pos, ball);

        assert!(state.resume());
        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Advanced);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_point_limit_ends_match() {
        let mut state = running(Difficulty::Normal, 3);
        state.score.left = 2;
        state.ball.pos = Vec2::new(795.0, 30.0);
        state.ball.vel = Vec2::new(10.0, 0.0);

        let outcome = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(outcome, TickOutcome::Finished(Winner::Left));
        assert_eq!(state.score.left, 3);
        assert_eq!(state.phase, MatchPhase::Finished);
        assert!(state.events.contains(&GameEvent::Point(Side::Left)));

        // Frozen afterwards
        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Rejected);
    }

    #[test]
    fn test_timeout_with_level_score_is_draw() {
        let mut state = running(Difficulty::Normal, 4);
        state.score.left = 1;
        state.score.right = 1;
        state.elapsed_secs = state.rules.duration_secs - SIM_DT / 2.0;

        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Finished(Winner::Draw));
        assert_eq!(state.winner, Some(Winner::Draw));
        assert_eq!(state.remaining_time(), 0);
        assert!(!state.snapshot().running);
    }

    #[test]
    fn test_timeout_awards_leader() {
        let mut state = running(Difficulty::Normal, 4);
        state.score.right = 2;
        state.elapsed_secs = state.rules.duration_secs;
        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT), TickOutcome::Finished(Winner::Right));
    }

    #[test]
    fn test_far_out_ball_is_reserved_without_point() {
        let mut state = running(Difficulty::Normal, 5);
        state.ball.pos = Vec2::new(-55.0, 300.0);
        state.ball.vel = Vec2::new(-2.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.score.left + state.score.right, 0);
        assert!(state.events.contains(&GameEvent::ForcedReset));
    }

    #[test]
    fn test_missed_ball_scores_for_opponent() {
        let mut state = running(Difficulty::Normal, 6);
        // Well above the player paddle, heading out
        state.ball.pos = Vec2::new(3.0, 40.0);
        state.ball.vel = Vec2::new(-5.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score.right, 1);
        assert_eq!(state.ball.pos, state.arena.center());
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = running(Difficulty::Expert, 77);
        let mut b = running(Difficulty::Expert, 77);
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };
        for _ in 0..3000 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.time_ticks, b.time_ticks);
    }

    #[test]
    fn test_demo_match_terminates() {
        let mut state = running(Difficulty::Hard, 8);
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };
        let max_ticks = (state.rules.duration_secs / SIM_DT) as u64 + 10;
        let mut outcome = TickOutcome::Advanced;
        while state.time_ticks < max_ticks {
            outcome = tick(&mut state, &input, SIM_DT);
            if outcome != TickOutcome::Advanced {
                break;
            }
        }
        assert!(matches!(outcome, TickOutcome::Finished(_)));
        assert!(state.winner.is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_entities_stay_in_arena(seed in any::<u64>(), tier in 0usize..4, ticks in 200usize..1500) {
            let mut state = running(Difficulty::ALL[tier], seed);
            let input = TickInput { idle_mode: true, ..TickInput::default() };
            for _ in 0..ticks {
                if tick(&mut state, &input, SIM_DT) != TickOutcome::Advanced {
                    break;
                }
                let b = &state.ball;
                prop_assert!(b.vel.length() <= b.max_speed + 1e-3);
                prop_assert!(b.pos.y >= 0.0 && b.pos.y <= 600.0);
                prop_assert!(b.pos.x >= -60.0 && b.pos.x <= 860.0);
                for p in [&state.left_paddle, &state.right_paddle] {
                    prop_assert!(p.top() >= 0.0 && p.bottom() <= 600.0);
                }
                for o in &state.obstacles {
                    prop_assert!(o.top() >= 0.0 && o.bottom() <= 600.0);
                }
            }
        }
    }
}
