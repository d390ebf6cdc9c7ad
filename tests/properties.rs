//! Property tests over arbitrary action sequences

use std::collections::HashSet;

use proptest::prelude::*;

use shooter_gym::consts::{GUN_MAX_ANGLE, MAX_ESCAPED_ENEMIES, MAX_FRIENDLY_KILLS};
use shooter_gym::sim::{GameState, ObservationSpace, TickEvent, resolve_reward, step};
use shooter_gym::{Action, ShooterEnv};

fn action_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

fn rotate_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![Action::RotateLeft, Action::RotateRight])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gun_angle_stays_clamped(seed in any::<u64>(), actions in prop::collection::vec(rotate_strategy(), 0..120)) {
        let mut state = GameState::new(seed);
        for action in actions {
            state = step(&state, action).state;
            prop_assert!(state.player.gun_angle.abs() <= GUN_MAX_ANGLE);
        }
    }

    #[test]
    fn observations_stay_in_space(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 0..400)) {
        let space = ObservationSpace::default();
        let mut env = ShooterEnv::new(seed);
        let (obs, _) = env.reset(Some(seed));
        prop_assert!(space.contains(&obs));
        for action in actions {
            let result = env.step(action).unwrap();
            prop_assert_eq!(result.observation.as_slice().len(), 5);
            prop_assert!(space.contains(&result.observation), "{:?}", result.observation);
        }
    }

    #[test]
    fn reward_is_last_event_or_carried(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 1..400)) {
        let mut state = GameState::new(seed);
        for action in actions {
            let out = step(&state, action);
            prop_assert_eq!(out.reward, resolve_reward(state.reward, &out.events));
            state = out.state;
        }
    }

    #[test]
    fn score_tracks_kills_and_escapes(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 1..600)) {
        let mut state = GameState::new(seed);
        let mut expected = 0i64;
        for action in actions {
            let out = step(&state, action);
            for event in &out.events {
                match event {
                    TickEvent::EnemyDestroyed { .. } => expected += 10,
                    TickEvent::EnemyEscaped { .. } => expected -= 5,
                    _ => {}
                }
            }
            prop_assert_eq!(out.state.score, expected);
            state = out.state;
        }
    }

    #[test]
    fn entity_ids_are_unique(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 1..400)) {
        let mut state = GameState::new(seed);
        for action in actions {
            state = step(&state, action).state;
            let mut seen = HashSet::new();
            let ids = state
                .bullets
                .iter()
                .map(|b| b.id)
                .chain(state.enemies.iter().map(|e| e.id))
                .chain(state.friends.iter().map(|f| f.id));
            for id in ids {
                prop_assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
    }

    #[test]
    fn done_matches_thresholds(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 1..600)) {
        let mut state = GameState::new(seed);
        for action in actions {
            let out = step(&state, action);
            let expected = out.state.escaped_enemies >= MAX_ESCAPED_ENEMIES
                || out.state.friendly_kills >= MAX_FRIENDLY_KILLS;
            prop_assert_eq!(out.done, expected);
            state = out.state;
        }
    }

    #[test]
    fn same_seed_same_trajectory(seed in any::<u64>(), actions in prop::collection::vec(action_strategy(), 1..200)) {
        let mut a = ShooterEnv::new(seed);
        let mut b = ShooterEnv::new(seed);
        prop_assert_eq!(a.reset(None), b.reset(None));
        for action in actions {
            prop_assert_eq!(a.step(action).unwrap(), b.step(action).unwrap());
        }
    }
}
