//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run by one step. Countdowns are measured in
//! ticks; the host runs this at a fixed 60 Hz.

use glam::Vec2;

use super::collision;
use super::modifiers::{Effect, tick_modifiers};
use super::physics;
use super::rng::RandomSource;
use super::spawner;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Held controls sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (space / up); climb while flying
    pub jump: bool,
    /// Slide (down); dive while flying
    pub down: bool,
    /// Lateral movement while flying
    pub left: bool,
    pub right: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl RandomSource) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.clock.ticks);
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        state.last_input = *input;
        return;
    }

    tick_modifiers(state);

    // Decay screen shake
    state.shake *= 0.9;
    if state.shake < 0.01 {
        state.shake = 0.0;
    }

    let slowed = state.modifiers.is_active(Effect::SlowMotion);
    let overclocked = state.modifiers.is_active(Effect::Overclock);
    let speed = state
        .clock
        .advance(&state.tuning, &state.caps, slowed, overclocked);
    state.schedule.scroll(speed);

    physics::integrate(state, input);

    spawner::spawn(state, rng);

    // Move the world
    let ground = state.ground_y();
    let tuning = &state.tuning;
    state.entities.update_duty_cycles(
        state.clock.ticks,
        tuning.laser_period,
        tuning.laser_on_ticks,
    );
    state.entities.scroll(speed, tuning.crawler_speed_bonus);
    let pull = (state.modifiers.is_active(Effect::Magnet) || state.caps.passive_magnet)
        .then(|| Vec2::new(PLAYER_SCREEN_X, ground - 40.0 + state.player.y));
    state
        .entities
        .drift_bits(speed, pull, state.view.width, tuning.magnet_ease);
    state.entities.animate();
    state.entities.sweep();

    collision::resolve(state);

    state.refresh_stats();
    state.last_input = *input;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRng, run_rng};
    use crate::sim::state::{GameEvent, MotionState, PowerupKind};
    use crate::sim::variant::ObstacleVariant;

    fn idle(state: &mut GameState, ticks: u32) {
        let mut rng = ScriptedRng::constant(0.5);
        for _ in 0..ticks {
            tick(state, &TickInput::default(), &mut rng);
        }
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut state = GameState::new(1);
        idle(&mut state, 10);
        assert_eq!(state.clock.ticks, 10);
        assert!(state.clock.distance > 60.0);
        assert!(state.stats.score > 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let mut rng = ScriptedRng::constant(0.5);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, &mut rng);
        assert_eq!(state.phase, GamePhase::Paused);
        let distance = state.clock.distance;

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.clock.distance, distance);

        // Unpause
        tick(&mut state, &pause, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.clock.distance > distance);
    }

    #[test]
    fn test_slide_released_while_paused_ends_after_resume() {
        let mut state = GameState::new(1);
        let mut rng = ScriptedRng::constant(0.5);
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &down, &mut rng);
        assert_eq!(state.player.motion, MotionState::Sliding);

        // Pause while down is held, release during the pause
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..down
            },
            &mut rng,
        );
        tick(&mut state, &TickInput::default(), &mut rng);
        let resume = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &resume, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.motion, MotionState::Running);
    }

    #[test]
    fn test_flying_with_zero_bit_interval_does_not_panic() {
        let config = crate::sim::state::RunConfig {
            tuning: crate::tuning::Tuning {
                flight_bit_interval: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::with_config(1, config);
        state.schedule.frontier = 1.0e6; // no filler patterns
        crate::sim::modifiers::apply_powerup(&mut state, PowerupKind::Flight);
        idle(&mut state, 3);
        assert_eq!(state.entities.bits.len(), 3);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut state = GameState::new(1);
        state.end_run();
        idle(&mut state, 5);
        assert_eq!(state.clock.ticks, 0);
    }

    #[test]
    fn test_unprotected_runner_eventually_crashes() {
        let mut state = GameState::new(1);
        let mut rng = run_rng(1);
        for _ in 0..20_000 {
            tick(&mut state, &TickInput::default(), &mut rng);
            if state.is_over() {
                break;
            }
        }
        assert!(state.is_over());
        let crashes = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Crash)
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_obstacle_past_despawn_removed_next_tick() {
        let mut state = GameState::new(1);
        let ground = state.ground_y();
        state
            .entities
            .push_obstacle(ObstacleVariant::Spikes.spec(), -170.0, ground);
        idle(&mut state, 1);
        assert!(state.entities.obstacles.is_empty());
    }

    #[test]
    fn test_magnet_pulls_bits() {
        let mut state = GameState::new(1);
        state.modifiers.activate(Effect::Magnet, 100);
        state.entities.push_bit(800.0, 300.0);
        idle(&mut state, 1);
        let bit = &state.entities.bits[0].rect;
        let target = Vec2::new(PLAYER_SCREEN_X, state.ground_y() - 40.0);
        assert!((target.x - bit.x - 0.9 * (target.x - 800.0)).abs() < 1e-3);
        assert!((target.y - bit.y - 0.9 * (target.y - 300.0)).abs() < 1e-3);
    }

    #[test]
    fn test_flight_expiry_falls_back_to_ground() {
        let mut state = GameState::new(1);
        crate::sim::modifiers::apply_powerup(&mut state, PowerupKind::Flight);
        state.modifiers.activate(Effect::Flight, 120);
        idle(&mut state, 120);
        assert_eq!(state.player.motion, MotionState::Jumping);
        assert!(state.player.y < 0.0);

        idle(&mut state, 120);
        assert!(state.player.motion == MotionState::Running || state.is_over());
    }

    #[test]
    fn test_shake_decays() {
        let mut state = GameState::new(1);
        state.shake = 10.0;
        idle(&mut state, 1);
        assert!((state.shake - 9.0).abs() < 1e-5);
        idle(&mut state, 200);
        assert_eq!(state.shake, 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let mut rng1 = run_rng(99999);
        let mut rng2 = run_rng(99999);

        let inputs = [
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                down: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, &mut rng1);
            tick(&mut state2, input, &mut rng2);
        }

        assert_eq!(state1.clock.ticks, state2.clock.ticks);
        assert_eq!(state1.stats, state2.stats);
        assert_eq!(
            state1.entities.obstacles.len(),
            state2.entities.obstacles.len()
        );
    }
}
