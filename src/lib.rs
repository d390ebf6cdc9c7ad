//! Shooter Gym - a falling-target shooter exposed as an RL environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collisions, rewards)
//! - `env`: Engine wrapper with the reset/step/render-snapshot interface
//! - `policy`: Baseline controllers used by the command-line driver
//! - `episodes`: Episode bookkeeping and the best-episodes board
//! - `settings`: Driver configuration

pub mod action;
pub mod env;
pub mod episodes;
pub mod error;
pub mod policy;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use action::{ACTION_COUNT, Action};
pub use env::{Environment, ResetInfo, ShooterEnv, StepInfo, StepResult};
pub use episodes::{BestEpisodes, EpisodeRecord, EpisodeStats, EpisodeTracker};
pub use error::{EnvError, StoreError};
pub use policy::{Policy, PolicyKind};
pub use settings::Settings;
pub use sim::{GameState, Observation, ObservationSpace, TickEvent};
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const WIDTH: f32 = 600.0;
    pub const HEIGHT: f32 = 800.0;

    /// Player sits centered, just above the bottom edge
    pub const PLAYER_X: f32 = WIDTH / 2.0;
    pub const PLAYER_Y: f32 = HEIGHT - 50.0;
    pub const PLAYER_RADIUS: f32 = 20.0;

    /// Gun limits (degrees, 0 = straight up, positive = left)
    pub const GUN_MAX_ANGLE: f32 = 90.0;
    pub const GUN_ROTATE_STEP: f32 = 5.0;
    /// Gun barrel length (render only)
    pub const GUN_LENGTH: f32 = 30.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 20.0;
    /// Bullet draw radius (render only, bullets collide as points)
    pub const BULLET_RADIUS: f32 = 3.0;

    /// Falling objects
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const FRIEND_RADIUS: f32 = 15.0;
    /// Fall speed shared by enemies and friends
    pub const FALL_SPEED: f32 = 2.0;

    /// Spawning
    pub const SPAWN_INTERVAL_TICKS: u32 = 120;
    pub const ENEMY_SPAWN_CHANCE: f32 = 0.7;
    pub const SPAWN_MARGIN: i32 = 30;
    pub const SPAWN_Y: f32 = 30.0;

    /// Episode limits
    pub const MAX_ESCAPED_ENEMIES: u32 = 10;
    pub const MAX_FRIENDLY_KILLS: u32 = 2;
    pub const MAX_TICKS: u64 = 5000;

    /// Score deltas
    pub const SCORE_ENEMY_DESTROYED: i64 = 10;
    pub const SCORE_ENEMY_ESCAPED: i64 = -5;

    /// Playback pacing for external renderers
    pub const RENDER_FPS: u32 = 30;
}

/// Clamp a gun angle (degrees) to the legal range
#[inline]
pub fn clamp_gun_angle(angle: f32) -> f32 {
    angle.clamp(-consts::GUN_MAX_ANGLE, consts::GUN_MAX_ANGLE)
}

/// Unit vector the gun points along, in screen coordinates (y grows downward)
///
/// An angle of 0 points straight up; positive angles lean left.
#[inline]
pub fn gun_direction(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(-rad.sin(), -rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gun_direction_straight_up() {
        let dir = gun_direction(0.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gun_direction_extremes() {
        let left = gun_direction(90.0);
        assert!((left.x + 1.0).abs() < 1e-6);
        assert!(left.y.abs() < 1e-6);

        let right = gun_direction(-90.0);
        assert!((right.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_gun_angle() {
        assert_eq!(clamp_gun_angle(95.0), 90.0);
        assert_eq!(clamp_gun_angle(-120.0), -90.0);
        assert_eq!(clamp_gun_angle(45.0), 45.0);
    }
}
