//! Tick events and reward resolution
//!
//! A tick produces an ordered list of events. The reward is a single
//! register: each reward-setting event overwrites it, so the last event of
//! the tick decides the value. Events are never summed.

use serde::{Deserialize, Serialize};

/// Something that happened during a tick, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TickEvent {
    /// Player fired a bullet
    Fired { bullet_id: u32 },
    /// A new object appeared at the top
    Spawned { id: u32, enemy: bool },
    /// An enemy crossed the bottom edge unshot
    EnemyEscaped { enemy_id: u32 },
    /// A friend crossed the bottom edge safely
    FriendPassed { friend_id: u32 },
    /// A bullet destroyed an enemy
    EnemyDestroyed { bullet_id: u32, enemy_id: u32 },
    /// A bullet destroyed a friend
    FriendKilled { bullet_id: u32, friend_id: u32 },
    /// The episode terminated or was truncated this tick
    EpisodeEnded { done: bool, truncated: bool },
}

impl TickEvent {
    /// Value this event writes into the reward register, if any
    pub fn reward(&self) -> Option<f32> {
        match self {
            TickEvent::Fired { .. } => Some(-2.0),
            TickEvent::Spawned { .. } => None,
            TickEvent::EnemyEscaped { .. } => Some(-40.0),
            TickEvent::FriendPassed { .. } => Some(20.0),
            TickEvent::EnemyDestroyed { .. } => Some(160.0),
            TickEvent::FriendKilled { .. } => Some(-100.0),
            TickEvent::EpisodeEnded { .. } => Some(-150.0),
        }
    }
}

/// Resolve a tick's reward: the last reward-setting event wins
///
/// With no reward-setting event the register keeps `previous`.
pub fn resolve_reward(previous: f32, events: &[TickEvent]) -> f32 {
    events
        .iter()
        .rev()
        .find_map(TickEvent::reward)
        .unwrap_or(previous)
}
