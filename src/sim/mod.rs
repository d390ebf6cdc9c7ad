//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, no wall-clock time
//! - Seeded RNG only, stored inside the state
//! - Stable iteration order (oldest entity first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod observation;
pub mod reward;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Hit, out_of_bounds, point_in_circle, resolve_bullet_hits};
pub use observation::{ABSENT, OBS_LEN, Observation, ObservationSpace};
pub use reward::{TickEvent, resolve_reward};
pub use state::{Bullet, Enemy, Friend, GameState, Player, SpawnKind};
pub use tick::{TickOutcome, step};
