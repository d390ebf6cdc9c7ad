//! Renderable snapshot of the playfield
//!
//! The core never draws. Playback drivers ask for a snapshot after each step
//! and hand it to whatever renderer they use; snapshots serialize to JSON so
//! they can also be streamed to an external process.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BULLET_RADIUS, HEIGHT, WIDTH};
use crate::sim::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    /// Degrees, 0 = straight up, positive = left
    pub gun_angle: f32,
    pub gun_tip: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    pub tick: u64,
    pub score: i64,
    pub player: PlayerView,
    pub bullets: Vec<Vec2>,
    pub bullet_radius: f32,
    pub enemies: Vec<CircleView>,
    pub friends: Vec<CircleView>,
    pub done: bool,
    pub truncated: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            tick: state.elapsed_ticks,
            score: state.score,
            player: PlayerView {
                pos: state.player.pos,
                radius: state.player.radius,
                gun_angle: state.player.gun_angle,
                gun_tip: state.player.gun_tip(),
            },
            bullets: state.bullets.iter().map(|b| b.pos).collect(),
            bullet_radius: BULLET_RADIUS,
            enemies: state
                .enemies
                .iter()
                .map(|e| CircleView {
                    pos: e.pos,
                    radius: e.radius,
                })
                .collect(),
            friends: state
                .friends
                .iter()
                .map(|f| CircleView {
                    pos: f.pos,
                    radius: f.radius,
                })
                .collect(),
            done: state.done,
            truncated: state.truncated,
        }
    }

    /// Single-line JSON, one frame per line
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
