//! Engine wrapper exposing the reset/step interface
//!
//! `ShooterEnv` owns the current `GameState` and swaps in the next one after
//! every pure `sim::step`. Drivers (trainers, playback tools) only ever talk
//! to this type or to the `Environment` trait.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::action::{ACTION_COUNT, Action};
use crate::error::EnvError;
use crate::sim::{GameState, Observation, ObservationSpace, TickEvent, step};
use crate::snapshot::RenderSnapshot;

/// Metadata returned by `reset` (currently empty)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetInfo {}

/// Metadata returned by `step`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub score: i64,
    pub escaped_enemies: u32,
    pub friendly_kills: u32,
    pub elapsed_ticks: u64,
    /// Events of this tick, in firing order
    pub events: Vec<TickEvent>,
}

/// Everything a single `step` returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepResult {
    /// Whether the episode is over and needs a reset
    pub fn finished(&self) -> bool {
        self.done || self.truncated
    }
}

/// Gym-style environment interface
pub trait Environment {
    /// Start a new episode and return its first observation
    fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo);

    /// Advance one tick
    fn step(&mut self, action: Action) -> Result<StepResult, EnvError>;

    fn observation_space(&self) -> ObservationSpace;

    fn action_count(&self) -> usize;
}

/// The shooter environment
#[derive(Debug, Clone)]
pub struct ShooterEnv {
    /// Source of per-episode seeds when `reset` is called without one
    seeder: Pcg32,
    state: Option<GameState>,
    episodes: u64,
}

impl ShooterEnv {
    /// Create an engine whose unseeded resets replay from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seeder: Pcg32::seed_from_u64(seed),
            state: None,
            episodes: 0,
        }
    }

    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo) {
        let seed = seed.unwrap_or_else(|| self.seeder.random());
        let state = GameState::new(seed);
        let obs = Observation::encode(&state);

        self.episodes += 1;
        log::debug!("Episode {} reset with seed {}", self.episodes, seed);

        self.state = Some(state);
        (obs, ResetInfo::default())
    }

    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        let state = self.state.as_ref().ok_or(EnvError::NotInitialized)?;
        let was_over = state.is_over();
        let outcome = step(state, action);

        if outcome.state.is_over() && !was_over {
            log::info!(
                "Episode {} ended after {} ticks: score={}, escaped={}, friendly_kills={}{}",
                self.episodes,
                outcome.state.elapsed_ticks,
                outcome.state.score,
                outcome.state.escaped_enemies,
                outcome.state.friendly_kills,
                if outcome.truncated { " (truncated)" } else { "" }
            );
        }

        let info = StepInfo {
            score: outcome.state.score,
            escaped_enemies: outcome.state.escaped_enemies,
            friendly_kills: outcome.state.friendly_kills,
            elapsed_ticks: outcome.state.elapsed_ticks,
            events: outcome.events,
        };
        let result = StepResult {
            observation: outcome.observation,
            reward: outcome.reward,
            done: outcome.done,
            truncated: outcome.truncated,
            info,
        };

        self.state = Some(outcome.state);
        Ok(result)
    }

    /// Step with an integer-encoded action from a policy
    pub fn step_raw(&mut self, action: i64) -> Result<StepResult, EnvError> {
        let action = Action::try_from(action)?;
        self.step(action)
    }

    /// Drawable view of the current state
    pub fn render_snapshot(&self) -> Result<RenderSnapshot, EnvError> {
        self.state
            .as_ref()
            .map(RenderSnapshot::capture)
            .ok_or(EnvError::NotInitialized)
    }

    /// Current state, if the engine has been reset
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Number of resets so far
    pub fn episodes(&self) -> u64 {
        self.episodes
    }
}

impl Environment for ShooterEnv {
    fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo) {
        ShooterEnv::reset(self, seed)
    }

    fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        ShooterEnv::step(self, action)
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::default()
    }

    fn action_count(&self) -> usize {
        ACTION_COUNT
    }
}
