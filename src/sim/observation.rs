//! Observation encoding
//!
//! The policy sees a fixed 5-vector:
//! `[gun_angle, friend.x, friend.y, enemy.x, enemy.y]`.
//!
//! Only the oldest live friend and the oldest live enemy are observed; the
//! environment is partially observable whenever more than one of either
//! kind is on screen. A missing friend or enemy is encoded as `-1` in both
//! of its coordinate slots.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::consts::{GUN_MAX_ANGLE, HEIGHT, WIDTH};

/// Length of the observation vector
pub const OBS_LEN: usize = 5;

/// Sentinel for an absent object
pub const ABSENT: f32 = -1.0;

/// Encoded observation handed to policies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub [f32; OBS_LEN]);

impl Observation {
    /// Encode the policy-visible part of a state
    pub fn encode(state: &GameState) -> Self {
        let (fx, fy) = state
            .friends
            .first()
            .map_or((ABSENT, ABSENT), |f| (f.pos.x, f.pos.y));
        let (ex, ey) = state
            .enemies
            .first()
            .map_or((ABSENT, ABSENT), |e| (e.pos.x, e.pos.y));
        Self([state.player.gun_angle, fx, fy, ex, ey])
    }

    pub fn gun_angle(&self) -> f32 {
        self.0[0]
    }

    /// Observed friend position, if any
    pub fn friend(&self) -> Option<(f32, f32)> {
        (self.0[1] != ABSENT || self.0[2] != ABSENT).then_some((self.0[1], self.0[2]))
    }

    /// Observed enemy position, if any
    pub fn enemy(&self) -> Option<(f32, f32)> {
        (self.0[3] != ABSENT || self.0[4] != ABSENT).then_some((self.0[3], self.0[4]))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}

/// Bounds of every observation component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub low: [f32; OBS_LEN],
    pub high: [f32; OBS_LEN],
}

impl Default for ObservationSpace {
    fn default() -> Self {
        Self {
            low: [-GUN_MAX_ANGLE, ABSENT, ABSENT, ABSENT, ABSENT],
            high: [GUN_MAX_ANGLE, WIDTH, HEIGHT, WIDTH, HEIGHT],
        }
    }
}

impl ObservationSpace {
    pub fn shape(&self) -> usize {
        OBS_LEN
    }

    /// Whether every component lies within its bounds (inclusive)
    pub fn contains(&self, obs: &Observation) -> bool {
        obs.0
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .all(|(v, (lo, hi))| (*lo..=*hi).contains(v))
    }
}
