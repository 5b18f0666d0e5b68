//! Match sessions
//!
//! A [`MatchHandle`] wraps one [`GameState`] with a player name and a clock;
//! the [`MatchRegistry`] owns many of them and reports each finished match
//! to its [`ResultSink`] once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use uuid::Uuid;

use crate::error::{GameError, Result};
use crate::persistence::{MatchResult, ResultSink};
use crate::platform::Clock;
use crate::settings::{Difficulty, DifficultyProfile, MatchRules, Settings};
use crate::sim::{GameState, MatchPhase, MatchSnapshot, TickInput, Winner, tick};

/// One match and everything needed to drive it from outside
pub struct MatchHandle {
    pub id: String,
    pub player_name: String,
    pub difficulty: Difficulty,
    state: GameState,
    clock: Arc<dyn Clock>,
    last_tick: Duration,
    reported: bool,
}

impl MatchHandle {
    /// Create an idle match
    pub fn create(
        player_name: &str,
        difficulty: Difficulty,
        profile: DifficultyProfile,
        rules: MatchRules,
        seed: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let state = GameState::new(profile, rules, seed)?;
        let last_tick = clock.now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            player_name: player_name.trim().to_string(),
            difficulty,
            state,
            clock,
            last_tick,
            reported: false,
        })
    }

    /// Start or restart the match
    pub fn start(&mut self) -> MatchSnapshot {
        self.state.start();
        self.last_tick = self.clock.now();
        self.reported = false;
        self.state.snapshot()
    }

    /// Abandon the match; it is not reported
    pub fn stop(&mut self) {
        self.state.stop();
    }

    pub fn pause(&mut self) -> MatchSnapshot {
        self.state.pause();
        self.state.snapshot()
    }

    /// Resume a paused match; clock time spent paused is not counted
    pub fn resume(&mut self) -> MatchSnapshot {
        if self.state.resume() {
            self.last_tick = self.clock.now();
        }
        self.state.snapshot()
    }

    /// Advance one step using the time elapsed on the clock since the last tick
    pub fn tick(&mut self, input: &TickInput) -> Result<MatchSnapshot> {
        if self.state.phase != MatchPhase::Running {
            return Err(GameError::NotRunning);
        }
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_tick).as_secs_f32();
        self.last_tick = now;

        tick(&mut self.state, input, dt);
        Ok(self.state.snapshot())
    }

    /// Tick with a raw client token (`"up"`, `"down"`, anything else = no move)
    pub fn tick_token(&mut self, token: &str) -> Result<MatchSnapshot> {
        self.tick(&TickInput::from_token(token))
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == MatchPhase::Finished
    }

    /// Result of a finished match, handed out once per run
    pub fn take_result(&mut self) -> Option<MatchResult> {
        if self.reported || !self.is_finished() {
            return None;
        }
        let winner = self.state.winner?;
        self.reported = true;
        Some(MatchResult {
            player_name: self.player_name.clone(),
            final_score: self.state.score.left,
            opponent_score: self.state.score.right,
            won: winner == Winner::Left,
            draw: winner == Winner::Draw,
            difficulty: self.difficulty.as_str().to_string(),
        })
    }
}

/// All live matches, keyed by id
pub struct MatchRegistry {
    settings: Settings,
    matches: HashMap<String, MatchHandle>,
    sink: Box<dyn ResultSink + Send>,
    clock: Arc<dyn Clock>,
    /// Seeds each new match
    rng: Pcg32,
}

impl MatchRegistry {
    pub fn new(settings: Settings, sink: Box<dyn ResultSink + Send>, clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            settings,
            matches: HashMap::new(),
            sink,
            clock,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create an idle match; unknown difficulty keys fall back to the default
    pub fn create_match(&mut self, player_name: &str, difficulty_key: &str) -> Result<String> {
        let (difficulty, profile) = self.settings.profile_for(difficulty_key);
        let seed = self.rng.random::<u64>();
        let handle = MatchHandle::create(
            player_name,
            difficulty,
            profile,
            self.settings.rules,
            seed,
            Arc::clone(&self.clock),
        )?;
        let id = handle.id.clone();
        log::info!("Created match {} for {:?} on {}", id, handle.player_name, difficulty.as_str());
        self.matches.insert(id.clone(), handle);
        Ok(id)
    }

    fn handle_mut(&mut self, id: &str) -> Result<&mut MatchHandle> {
        self.matches
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownMatch(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&MatchHandle> {
        self.matches.get(id)
    }

    pub fn start(&mut self, id: &str) -> Result<MatchSnapshot> {
        Ok(self.handle_mut(id)?.start())
    }

    pub fn stop(&mut self, id: &str) -> Result<()> {
        self.handle_mut(id)?.stop();
        Ok(())
    }

    pub fn pause(&mut self, id: &str) -> Result<MatchSnapshot> {
        Ok(self.handle_mut(id)?.pause())
    }

    pub fn resume(&mut self, id: &str) -> Result<MatchSnapshot> {
        Ok(self.handle_mut(id)?.resume())
    }

    /// Tick a match; reports the result if this tick finished it
    pub fn tick(&mut self, id: &str, input: &TickInput) -> Result<MatchSnapshot> {
        let handle = self
            .matches
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownMatch(id.to_string()))?;
        let snapshot = handle.tick(input)?;

        if let Some(result) = handle.take_result() {
            // Storage trouble must not fail the tick that produced the result
            if let Err(e) = self.sink.record(&result) {
                log::warn!("Failed to record result of match {}: {}", id, e);
            }
        }
        Ok(snapshot)
    }

    pub fn tick_token(&mut self, id: &str, token: &str) -> Result<MatchSnapshot> {
        self.tick(id, &TickInput::from_token(token))
    }

    pub fn snapshot(&self, id: &str) -> Result<MatchSnapshot> {
        self.matches
            .get(id)
            .map(MatchHandle::snapshot)
            .ok_or_else(|| GameError::UnknownMatch(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> Option<MatchHandle> {
        let removed = self.matches.remove(id);
        if removed.is_some() {
            log::info!("Removed match {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
