//! Discrete simulation tick
//!
//! `step` is a pure transition: it reads a state and an action and returns
//! the next state together with the tick's reward, terminal flags and event
//! log. Phases run in a fixed order:
//!
//! 1. action effect
//! 2. spawn cadence
//! 3. bullet motion and bounds culling
//! 4. enemy/friend motion and bottom-edge exits
//! 5. bullet collisions
//! 6. termination and truncation
//!
//! The reward is resolved last from the ordered event log.

use serde::{Deserialize, Serialize};

use super::collision::{Hit, below_playfield, out_of_bounds, resolve_bullet_hits};
use super::observation::Observation;
use super::reward::{TickEvent, resolve_reward};
use super::state::{GameState, SpawnKind};
use crate::action::Action;
use crate::clamp_gun_angle;
use crate::consts::*;

/// Result of advancing a state by one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// State after the tick
    pub state: GameState,
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub truncated: bool,
    /// Events in the order they fired
    pub events: Vec<TickEvent>,
}

/// Advance the game state by one tick
pub fn step(state: &GameState, action: Action) -> TickOutcome {
    let mut next = state.clone();
    let mut events = Vec::new();

    apply_action(&mut next, action, &mut events);
    advance_spawn_timer(&mut next, &mut events);
    move_bullets(&mut next);
    move_fallers(&mut next, &mut events);
    resolve_collisions(&mut next, &mut events);
    check_termination(&mut next, &mut events);

    next.reward = resolve_reward(state.reward, &events);

    TickOutcome {
        observation: Observation::encode(&next),
        reward: next.reward,
        done: next.done,
        truncated: next.truncated,
        events,
        state: next,
    }
}

fn apply_action(state: &mut GameState, action: Action, events: &mut Vec<TickEvent>) {
    match action {
        Action::RotateLeft => {
            state.player.gun_angle = clamp_gun_angle(state.player.gun_angle + GUN_ROTATE_STEP);
        }
        Action::RotateRight => {
            state.player.gun_angle = clamp_gun_angle(state.player.gun_angle - GUN_ROTATE_STEP);
        }
        Action::Fire => {
            let bullet_id = state.spawn_bullet();
            events.push(TickEvent::Fired { bullet_id });
        }
        Action::Noop => {}
    }
}

fn advance_spawn_timer(state: &mut GameState, events: &mut Vec<TickEvent>) {
    state.spawn_timer += 1;
    if state.spawn_timer % SPAWN_INTERVAL_TICKS != 0 {
        return;
    }

    let (kind, id) = state.spawn_random();
    log::debug!("Tick {}: spawned {:?} #{}", state.elapsed_ticks + 1, kind, id);
    events.push(TickEvent::Spawned {
        id,
        enemy: kind == SpawnKind::Enemy,
    });
}

fn move_bullets(state: &mut GameState) {
    state.bullets = state
        .bullets
        .iter()
        .map(|b| {
            let mut b = b.clone();
            b.pos += b.vel;
            b
        })
        .filter(|b| !out_of_bounds(b.pos))
        .collect();
}

fn move_fallers(state: &mut GameState, events: &mut Vec<TickEvent>) {
    let mut enemies = Vec::with_capacity(state.enemies.len());
    for enemy in &state.enemies {
        let mut enemy = enemy.clone();
        enemy.pos.y += FALL_SPEED;
        if below_playfield(enemy.pos) {
            state.escaped_enemies += 1;
            state.score += SCORE_ENEMY_ESCAPED;
            events.push(TickEvent::EnemyEscaped { enemy_id: enemy.id });
        } else {
            enemies.push(enemy);
        }
    }
    state.enemies = enemies;

    let mut friends = Vec::with_capacity(state.friends.len());
    for friend in &state.friends {
        let mut friend = friend.clone();
        friend.pos.y += FALL_SPEED;
        if below_playfield(friend.pos) {
            events.push(TickEvent::FriendPassed {
                friend_id: friend.id,
            });
        } else {
            friends.push(friend);
        }
    }
    state.friends = friends;
}

fn resolve_collisions(state: &mut GameState, events: &mut Vec<TickEvent>) {
    let result = resolve_bullet_hits(&state.bullets, &state.enemies, &state.friends);

    for hit in &result.hits {
        match *hit {
            Hit::Enemy {
                bullet_id,
                enemy_id,
            } => {
                state.score += SCORE_ENEMY_DESTROYED;
                events.push(TickEvent::EnemyDestroyed {
                    bullet_id,
                    enemy_id,
                });
            }
            Hit::Friend {
                bullet_id,
                friend_id,
            } => {
                state.friendly_kills += 1;
                events.push(TickEvent::FriendKilled {
                    bullet_id,
                    friend_id,
                });
            }
        }
    }

    state.bullets = result.bullets;
    state.enemies = result.enemies;
    state.friends = result.friends;
}

fn check_termination(state: &mut GameState, events: &mut Vec<TickEvent>) {
    if state.escaped_enemies >= MAX_ESCAPED_ENEMIES || state.friendly_kills >= MAX_FRIENDLY_KILLS
    {
        state.done = true;
    }

    state.elapsed_ticks += 1;
    if state.elapsed_ticks > MAX_TICKS {
        state.truncated = true;
    }

    if state.done || state.truncated {
        events.push(TickEvent::EpisodeEnded {
            done: state.done,
            truncated: state.truncated,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bullet;
    use glam::Vec2;

    /// A state with no falling objects and the gun pointing straight up
    fn empty_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.enemies.clear();
        state.friends.clear();
        state.player.gun_angle = 0.0;
        state
    }

    fn place_bullet(state: &mut GameState, x: f32, y: f32, vel: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(x, y),
            vel,
        });
        id
    }

    #[test]
    fn test_rotation_clamps() {
        let mut state = empty_state(1);
        for _ in 0..40 {
            state = step(&state, Action::RotateLeft).state;
        }
        assert_eq!(state.player.gun_angle, 90.0);

        for _ in 0..80 {
            state = step(&state, Action::RotateRight).state;
        }
        assert_eq!(state.player.gun_angle, -90.0);

        state = step(&state, Action::RotateLeft).state;
        assert_eq!(state.player.gun_angle, -85.0);
    }

    #[test]
    fn test_fire_spawns_bullet_and_costs() {
        let state = empty_state(1);
        let out = step(&state, Action::Fire);
        assert_eq!(out.state.bullets.len(), 1);
        assert_eq!(out.reward, -2.0);
        assert!(matches!(out.events[0], TickEvent::Fired { .. }));

        // Fired from the player, then moved once this tick
        let bullet = &out.state.bullets[0];
        assert!((bullet.pos.x - PLAYER_X).abs() < 1e-3);
        assert!((bullet.pos.y - (PLAYER_Y - BULLET_SPEED)).abs() < 1e-3);
    }

    #[test]
    fn test_noop_changes_only_physics() {
        let state = GameState::new(9);
        let out = step(&state, Action::Noop);
        assert_eq!(out.state.player, state.player);
        assert!(out.state.bullets.is_empty());
        assert_eq!(out.state.enemies[0].pos.y, state.enemies[0].pos.y + FALL_SPEED);
        assert_eq!(out.state.friends[0].pos.y, state.friends[0].pos.y + FALL_SPEED);
        assert_eq!(out.reward, 0.0);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = empty_state(77);
        for t in 1..=600u32 {
            let out = step(&state, Action::Noop);
            let spawned = out
                .events
                .iter()
                .filter(|e| matches!(e, TickEvent::Spawned { .. }))
                .count();
            if t % SPAWN_INTERVAL_TICKS == 0 {
                assert_eq!(spawned, 1, "tick {t} should spawn");
            } else {
                assert_eq!(spawned, 0, "tick {t} should not spawn");
            }
            state = out.state;
        }
    }

    #[test]
    fn test_spawned_object_falls_same_tick() {
        let mut state = empty_state(3);
        state.spawn_timer = SPAWN_INTERVAL_TICKS - 1;
        let out = step(&state, Action::Noop);
        let total = out.state.enemies.len() + out.state.friends.len();
        assert_eq!(total, 1);
        let y = out
            .state
            .enemies
            .first()
            .map(|e| e.pos.y)
            .or(out.state.friends.first().map(|f| f.pos.y));
        assert_eq!(y, Some(SPAWN_Y + FALL_SPEED));
    }

    #[test]
    fn test_bullet_leaving_top_is_removed() {
        let mut state = empty_state(1);
        place_bullet(&mut state, 300.0, 10.0, Vec2::new(0.0, -20.0));
        let kept = place_bullet(&mut state, 300.0, 20.0, Vec2::new(0.0, -20.0));

        let out = step(&state, Action::Noop);
        assert_eq!(out.state.bullets.len(), 1);
        assert_eq!(out.state.bullets[0].id, kept);
        assert_eq!(out.state.bullets[0].pos.y, 0.0);

        let out = step(&out.state, Action::Noop);
        assert!(out.state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_leaving_side_is_removed() {
        let mut state = empty_state(1);
        place_bullet(&mut state, 590.0, 400.0, Vec2::new(20.0, 0.0));
        place_bullet(&mut state, 5.0, 400.0, Vec2::new(-20.0, 0.0));
        let out = step(&state, Action::Noop);
        assert!(out.state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_escape() {
        let mut state = empty_state(1);
        state.spawn_enemy(100.0);
        state.enemies[0].pos.y = HEIGHT - 1.0;

        let out = step(&state, Action::Noop);
        assert!(out.state.enemies.is_empty());
        assert_eq!(out.state.escaped_enemies, 1);
        assert_eq!(out.state.score, -5);
        assert_eq!(out.reward, -40.0);
        assert!(!out.done);
    }

    #[test]
    fn test_enemy_at_bottom_edge_stays() {
        let mut state = empty_state(1);
        state.spawn_enemy(100.0);
        state.enemies[0].pos.y = HEIGHT - FALL_SPEED;
        let out = step(&state, Action::Noop);
        assert_eq!(out.state.enemies.len(), 1);
        assert_eq!(out.state.escaped_enemies, 0);
    }

    #[test]
    fn test_friend_passes() {
        let mut state = empty_state(1);
        state.spawn_friend(100.0);
        state.friends[0].pos.y = HEIGHT - 1.0;

        let out = step(&state, Action::Noop);
        assert!(out.state.friends.is_empty());
        assert_eq!(out.state.score, 0);
        assert_eq!(out.reward, 20.0);
    }

    #[test]
    fn test_enemy_destroyed() {
        let mut state = empty_state(1);
        state.spawn_enemy(300.0);
        state.enemies[0].pos.y = 700.0;
        place_bullet(&mut state, 300.0, 722.0, Vec2::new(0.0, -20.0));

        let out = step(&state, Action::Noop);
        assert!(out.state.enemies.is_empty());
        assert!(out.state.bullets.is_empty());
        assert_eq!(out.state.score, 10);
        assert_eq!(out.reward, 160.0);
    }

    #[test]
    fn test_fire_then_hit_same_tick_rewards_hit() {
        let mut state = empty_state(1);
        // Fired bullet lands at (300, 730) after moving
        state.spawn_enemy(PLAYER_X);
        state.enemies[0].pos.y = PLAYER_Y - BULLET_SPEED - FALL_SPEED;

        let out = step(&state, Action::Fire);
        assert_eq!(out.reward, 160.0);
        assert_eq!(out.state.score, 10);
    }

    #[test]
    fn test_bullet_hits_enemy_before_friend() {
        let mut state = empty_state(1);
        state.spawn_enemy(300.0);
        state.enemies[0].pos.y = 500.0;
        state.spawn_friend(305.0);
        state.friends[0].pos.y = 500.0;
        place_bullet(&mut state, 302.0, 522.0, Vec2::new(0.0, -20.0));

        let out = step(&state, Action::Noop);
        assert!(out.state.bullets.is_empty());
        assert!(out.state.enemies.is_empty());
        assert_eq!(out.state.friends.len(), 1);
        assert_eq!(out.state.friendly_kills, 0);
        assert_eq!(out.reward, 160.0);
    }

    #[test]
    fn test_fire_escape_and_termination_overwrite() {
        let mut state = empty_state(1);
        state.escaped_enemies = MAX_ESCAPED_ENEMIES - 1;
        state.spawn_enemy(50.0);
        state.enemies[0].pos.y = HEIGHT - 1.0;

        let out = step(&state, Action::Fire);
        assert_eq!(out.reward, -150.0);
        assert!(out.done);
        assert_eq!(out.state.escaped_enemies, 10);
        assert!(matches!(out.events[0], TickEvent::Fired { .. }));
        assert!(matches!(out.events[1], TickEvent::EnemyEscaped { .. }));
        assert!(matches!(
            out.events[2],
            TickEvent::EpisodeEnded {
                done: true,
                truncated: false
            }
        ));
    }

    #[test]
    fn test_escape_threshold() {
        let mut state = empty_state(1);
        state.escaped_enemies = MAX_ESCAPED_ENEMIES - 2;
        state.spawn_enemy(50.0);
        state.enemies[0].pos.y = HEIGHT - 1.0;

        let out = step(&state, Action::Noop);
        assert_eq!(out.state.escaped_enemies, 9);
        assert!(!out.done);
        assert_eq!(out.reward, -40.0);
    }

    #[test]
    fn test_friendly_kill_threshold() {
        let mut state = empty_state(1);
        state.spawn_friend(300.0);
        state.friends[0].pos.y = 700.0;
        place_bullet(&mut state, 300.0, 722.0, Vec2::new(0.0, -20.0));

        let out = step(&state, Action::Noop);
        assert_eq!(out.state.friendly_kills, 1);
        assert!(!out.done);
        assert_eq!(out.reward, -100.0);

        let mut state = out.state;
        state.spawn_friend(200.0);
        state.friends[0].pos.y = 600.0;
        place_bullet(&mut state, 200.0, 622.0, Vec2::new(0.0, -20.0));

        let out = step(&state, Action::Noop);
        assert_eq!(out.state.friendly_kills, 2);
        assert!(out.done);
        assert_eq!(out.reward, -150.0);
    }

    #[test]
    fn test_truncation_boundary() {
        let mut state = empty_state(1);
        state.elapsed_ticks = MAX_TICKS - 1;

        let out = step(&state, Action::Noop);
        assert_eq!(out.state.elapsed_ticks, 5000);
        assert!(!out.truncated);

        let out = step(&out.state, Action::Noop);
        assert_eq!(out.state.elapsed_ticks, 5001);
        assert!(out.truncated);
        assert!(!out.done);
        assert_eq!(out.reward, -150.0);
    }

    #[test]
    fn test_quiet_tick_carries_reward() {
        let state = empty_state(1);
        let out = step(&state, Action::Fire);
        assert_eq!(out.reward, -2.0);
        let out = step(&out.state, Action::Noop);
        assert_eq!(out.reward, -2.0);
    }

    #[test]
    fn test_finished_episode_stays_terminal() {
        let mut state = empty_state(1);
        state.done = true;
        state.friendly_kills = MAX_FRIENDLY_KILLS;
        let out = step(&state, Action::Noop);
        assert!(out.done);
        assert_eq!(out.reward, -150.0);
    }

    #[test]
    fn test_step_does_not_mutate_input() {
        let state = GameState::new(21);
        let before = state.clone();
        let _ = step(&state, Action::Fire);
        assert_eq!(state, before);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let actions = [Action::Fire, Action::RotateLeft, Action::Noop, Action::RotateRight];

        for i in 0..1000 {
            let action = actions[i % actions.len()];
            let out_a = step(&a, action);
            let out_b = step(&b, action);
            assert_eq!(out_a, out_b);
            a = out_a.state;
            b = out_b.state;
        }
    }
}
