//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here, including the RNG stream,
//! so a `GameState` plus an action sequence fully determines the episode.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::gun_direction;

/// The player's turret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Gun angle in degrees, always within [-90, 90]
    pub gun_angle: f32,
}

impl Player {
    pub fn new(gun_angle: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYER_Y),
            radius: PLAYER_RADIUS,
            gun_angle,
        }
    }

    /// End of the gun barrel (render only)
    pub fn gun_tip(&self) -> Vec2 {
        self.pos + gun_direction(self.gun_angle) * GUN_LENGTH
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A falling target that should be shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// A falling target that should be left alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// Which kind of object a spawn event produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Enemy,
    Friend,
}

/// Complete episode state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Episode seed for reproducibility
    pub seed: u64,
    /// Single random stream for every draw in the episode
    pub rng: Pcg32,
    pub player: Player,
    /// Live bullets, oldest first
    pub bullets: Vec<Bullet>,
    /// Live enemies, oldest first
    pub enemies: Vec<Enemy>,
    /// Live friends, oldest first
    pub friends: Vec<Friend>,
    pub score: i64,
    /// Enemies that crossed the bottom edge unshot
    pub escaped_enemies: u32,
    /// Friends destroyed by bullets
    pub friendly_kills: u32,
    /// Ticks elapsed since reset
    pub elapsed_ticks: u64,
    /// Spawn cadence counter
    pub spawn_timer: u32,
    pub done: bool,
    pub truncated: bool,
    /// Reward register (last reward-setting event wins, carried across quiet ticks)
    pub reward: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh episode from the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let magnitude = rng.random_range(0..=GUN_MAX_ANGLE as i32) as f32;
        let gun_angle = if rng.random::<f32>() > 0.5 {
            -magnitude
        } else {
            magnitude
        };

        let mut state = Self {
            seed,
            rng,
            player: Player::new(gun_angle),
            bullets: Vec::new(),
            enemies: Vec::new(),
            friends: Vec::new(),
            score: 0,
            escaped_enemies: 0,
            friendly_kills: 0,
            elapsed_ticks: 0,
            spawn_timer: 0,
            done: false,
            truncated: false,
            reward: 0.0,
            next_id: 1,
        };

        // One of each to start
        let x = state.random_spawn_x();
        state.spawn_enemy(x);
        let x = state.random_spawn_x();
        state.spawn_friend(x);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Draw a spawn column (whole units, inclusive of both margins)
    pub fn random_spawn_x(&mut self) -> f32 {
        self.rng
            .random_range(SPAWN_MARGIN..=WIDTH as i32 - SPAWN_MARGIN) as f32
    }

    /// Spawn an enemy at the top of the playfield
    pub fn spawn_enemy(&mut self, x: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, SPAWN_Y),
            radius: ENEMY_RADIUS,
        });
        id
    }

    /// Spawn a friend at the top of the playfield
    pub fn spawn_friend(&mut self, x: f32) -> u32 {
        let id = self.next_entity_id();
        self.friends.push(Friend {
            id,
            pos: Vec2::new(x, SPAWN_Y),
            radius: FRIEND_RADIUS,
        });
        id
    }

    /// Roll a spawn event: enemy or friend at a random column
    pub fn spawn_random(&mut self) -> (SpawnKind, u32) {
        let x = self.random_spawn_x();
        if self.rng.random::<f32>() < ENEMY_SPAWN_CHANCE {
            (SpawnKind::Enemy, self.spawn_enemy(x))
        } else {
            (SpawnKind::Friend, self.spawn_friend(x))
        }
    }

    /// Fire a bullet from the player along the current gun angle
    pub fn spawn_bullet(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: self.player.pos,
            vel: gun_direction(self.player.gun_angle) * BULLET_SPEED,
        });
        id
    }

    /// Whether the episode has ended for either reason
    pub fn is_over(&self) -> bool {
        self.done || self.truncated
    }
}
