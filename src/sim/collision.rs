//! Collision detection for bullets and falling targets
//!
//! Bullets are points; targets are circles. Resolution reads the tick's
//! entity lists as a snapshot and builds the surviving lists from it, so no
//! collection is mutated while it is being walked.

use glam::Vec2;

use super::state::{Bullet, Enemy, Friend};
use crate::consts::{HEIGHT, WIDTH};

/// A bullet that struck a target this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Enemy { bullet_id: u32, enemy_id: u32 },
    Friend { bullet_id: u32, friend_id: u32 },
}

/// Survivors and hits after resolving one tick of bullet collisions
#[derive(Debug, Clone, Default)]
pub struct CollisionResult {
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub friends: Vec<Friend>,
    /// Hits in resolution order
    pub hits: Vec<Hit>,
}

impl CollisionResult {
    pub fn enemies_destroyed(&self) -> usize {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::Enemy { .. }))
            .count()
    }

    pub fn friends_killed(&self) -> usize {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::Friend { .. }))
            .count()
    }
}

/// Strict point-in-circle test (touching the rim is a miss)
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Whether a position has left the playfield [0, WIDTH] x [0, HEIGHT]
#[inline]
pub fn out_of_bounds(pos: Vec2) -> bool {
    pos.x < 0.0 || pos.x > WIDTH || pos.y < 0.0 || pos.y > HEIGHT
}

/// Whether a falling object has crossed the bottom edge
#[inline]
pub fn below_playfield(pos: Vec2) -> bool {
    pos.y > HEIGHT
}

/// Resolve bullet hits against enemies, then friends
///
/// Bullets are walked in order. Each live bullet is tested against live
/// enemies first and live friends second; the first overlap consumes the
/// bullet and the target. A target already removed this tick cannot be hit
/// again, and a consumed bullet cannot score a second hit.
pub fn resolve_bullet_hits(
    bullets: &[Bullet],
    enemies: &[Enemy],
    friends: &[Friend],
) -> CollisionResult {
    let mut bullet_alive = vec![true; bullets.len()];
    let mut enemy_alive = vec![true; enemies.len()];
    let mut friend_alive = vec![true; friends.len()];
    let mut hits = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let enemy_hit = enemies
            .iter()
            .enumerate()
            .find(|(ei, e)| enemy_alive[*ei] && point_in_circle(bullet.pos, e.pos, e.radius));
        if let Some((ei, enemy)) = enemy_hit {
            bullet_alive[bi] = false;
            enemy_alive[ei] = false;
            hits.push(Hit::Enemy {
                bullet_id: bullet.id,
                enemy_id: enemy.id,
            });
            continue;
        }

        let friend_hit = friends
            .iter()
            .enumerate()
            .find(|(fi, f)| friend_alive[*fi] && point_in_circle(bullet.pos, f.pos, f.radius));
        if let Some((fi, friend)) = friend_hit {
            bullet_alive[bi] = false;
            friend_alive[fi] = false;
            hits.push(Hit::Friend {
                bullet_id: bullet.id,
                friend_id: friend.id,
            });
        }
    }

    CollisionResult {
        bullets: retain_alive(bullets, &bullet_alive),
        enemies: retain_alive(enemies, &enemy_alive),
        friends: retain_alive(friends, &friend_alive),
        hits,
    }
}

fn retain_alive<T: Clone>(items: &[T], alive: &[bool]) -> Vec<T> {
    items
        .iter()
        .zip(alive)
        .filter(|(_, alive)| **alive)
        .map(|(item, _)| item.clone())
        .collect()
}
