//! Baseline controllers
//!
//! These are not learned policies. They give the command-line driver
//! something to play with and serve as reference points when comparing a
//! trained agent's returns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::action::{ACTION_COUNT, Action};
use crate::consts::{BULLET_SPEED, FALL_SPEED, FRIEND_RADIUS, GUN_ROTATE_STEP, PLAYER_X, PLAYER_Y};
use crate::sim::Observation;

/// Anything that maps an observation to an action
pub trait Policy {
    fn act(&mut self, obs: &Observation) -> Action;

    fn name(&self) -> &'static str;
}

/// Available baseline controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    #[default]
    Aim,
    Idle,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Aim => "aim",
            PolicyKind::Idle => "idle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" | "rand" => Some(PolicyKind::Random),
            "aim" | "aimbot" => Some(PolicyKind::Aim),
            "idle" | "noop" => Some(PolicyKind::Idle),
            _ => None,
        }
    }

    /// Construct the controller
    pub fn build(&self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Aim => Box::new(AimPolicy::default()),
            PolicyKind::Idle => Box::new(IdlePolicy),
        }
    }
}

/// Uniformly random actions from a seeded stream
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::ALL[self.rng.random_range(0..ACTION_COUNT)]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Never acts
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::Noop
    }

    fn name(&self) -> &'static str {
        "idle"
    }
}

/// Tracks the observed enemy and fires when lined up
///
/// Holds fire while the observed friend sits in the line of fire between
/// the gun and the enemy.
#[derive(Debug, Clone)]
pub struct AimPolicy {
    /// Minimum ticks between shots
    pub fire_interval: u32,
    /// Extra clearance around the friend when checking the line of fire
    pub friend_margin: f32,
    cooldown: u32,
}

impl Default for AimPolicy {
    fn default() -> Self {
        Self {
            fire_interval: 8,
            friend_margin: 5.0,
            cooldown: 0,
        }
    }
}

impl AimPolicy {
    /// Gun angle (degrees) that points from the player at `(x, y)`
    pub fn angle_to(x: f32, y: f32) -> f32 {
        let dx = x - PLAYER_X;
        let dy = y - PLAYER_Y;
        (-dx).atan2(-dy).to_degrees()
    }

    /// Angle to where the target will be when a bullet arrives
    pub fn lead_angle(x: f32, y: f32) -> f32 {
        let dist = ((x - PLAYER_X).powi(2) + (y - PLAYER_Y).powi(2)).sqrt();
        let ticks = dist / BULLET_SPEED;
        Self::angle_to(x, y + FALL_SPEED * ticks)
    }

    /// Whether the friend lies near the segment from the player to the enemy
    fn friend_blocks(&self, friend: (f32, f32), enemy: (f32, f32)) -> bool {
        let (ax, ay) = (PLAYER_X, PLAYER_Y);
        let (bx, by) = enemy;
        let (px, py) = friend;
        let (vx, vy) = (bx - ax, by - ay);
        let len_sq = vx * vx + vy * vy;
        if len_sq < 1e-4 {
            return false;
        }
        let t = ((px - ax) * vx + (py - ay) * vy) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        let (cx, cy) = (ax + vx * t, ay + vy * t);
        let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
        dist < FRIEND_RADIUS + self.friend_margin
    }
}

impl Policy for AimPolicy {
    fn act(&mut self, obs: &Observation) -> Action {
        self.cooldown = self.cooldown.saturating_sub(1);

        let Some(enemy) = obs.enemy() else {
            return Action::Noop;
        };

        let target = Self::lead_angle(enemy.0, enemy.1);
        let delta = target - obs.gun_angle();
        if delta.abs() > GUN_ROTATE_STEP / 2.0 {
            return if delta > 0.0 {
                Action::RotateLeft
            } else {
                Action::RotateRight
            };
        }

        if self.cooldown > 0 {
            return Action::Noop;
        }
        if let Some(friend) = obs.friend() {
            if self.friend_blocks(friend, enemy) {
                return Action::Noop;
            }
        }

        self.cooldown = self.fire_interval;
        Action::Fire
    }

    fn name(&self) -> &'static str {
        "aim"
    }
}
