//! Physics & input integrator
//!
//! Advances the player one tick from the held controls. Jump and slide act on
//! the press edge (compared with the previous tick's input); slide lasts only
//! while the down control is held.

use super::entities::Tint;
use super::state::{GameEvent, GameState, MotionState, Player};
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Advance the player by one tick
pub fn integrate(state: &mut GameState, input: &TickInput) {
    let last = state.last_input;
    let jump_pressed = input.jump && !last.jump;
    let down_pressed = input.down && !last.down;

    if state.player.is_flying() {
        fly(&mut state.player, input, &state.tuning);
        return;
    }

    // Slide lasts only while down is held
    if !input.down && state.player.motion == MotionState::Sliding {
        state.player.motion = MotionState::Running;
        state.player.height = PLAYER_HEIGHT_RUN;
    }

    if jump_pressed {
        jump(state);
    }

    if down_pressed && state.player.motion == MotionState::Running {
        state.player.motion = MotionState::Sliding;
        state.player.height = PLAYER_HEIGHT_SLIDE;
        state.events.push(GameEvent::Slide);
        dust(state, -10.0, 3);
    }

    apply_gravity(state);

    // Drift back to the anchor column after flight
    let player = &mut state.player;
    player.x += (0.0 - player.x) * state.tuning.lateral_return;
}

fn jump(state: &mut GameState) {
    let force = state.tuning.jump_force;
    let can_double = state.caps.double_jump && state.player.jump_count < 2;

    match state.player.motion {
        MotionState::Running => {
            state.player.vy = -force;
            state.player.motion = MotionState::Jumping;
            state.player.jump_count = 1;
            state.events.push(GameEvent::Jump);
            dust(state, 0.0, 5);
        }
        MotionState::Jumping if can_double => {
            state.player.vy = -force * state.tuning.double_jump_factor;
            state.player.jump_count = 2;
            state.events.push(GameEvent::DoubleJump);
            let y = state.player.y;
            dust(state, y, 8);
        }
        // Sliding, third jump or no double-jump capability
        _ => {}
    }
}

fn apply_gravity(state: &mut GameState) {
    let player = &mut state.player;
    if player.motion != MotionState::Jumping {
        player.y = 0.0;
        return;
    }

    player.vy += state.tuning.gravity;
    player.y += player.vy;

    if player.y > 0.0 {
        player.y = 0.0;
        player.vy = 0.0;
        player.motion = MotionState::Running;
        player.jump_count = 0;
        state.events.push(GameEvent::Land);
        dust(state, 0.0, 8);
    }
}

/// Flight: vertical offset eases toward a target altitude, lateral offset
/// follows left/right
fn fly(player: &mut Player, input: &TickInput, tuning: &Tuning) {
    let mut dx = 0.0;
    if input.left {
        dx -= tuning.lateral_speed;
    }
    if input.right {
        dx += tuning.lateral_speed;
    }
    player.x = (player.x + dx).clamp(FLIGHT_MIN_X, FLIGHT_MAX_X);

    let target = if input.down {
        -tuning.dive_altitude
    } else if input.jump {
        -tuning.climb_altitude
    } else {
        -tuning.cruise_altitude
    };
    player.y += (target - player.y) * tuning.flight_ease;
    player.vy = 0.0;
    player.jump_count = 0;
}

/// Skin-colored puff at the player's feet
fn dust(state: &mut GameState, y_offset: f32, count: usize) {
    let x = PLAYER_SCREEN_X + state.player.x + PLAYER_WIDTH / 2.0;
    let y = state.ground_y() + y_offset;
    let tick = state.clock.ticks;
    state.entities.burst(x, y, Tint::Skin, count, tick);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Capabilities, RunConfig};

    fn press_jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    fn step(state: &mut GameState, input: TickInput) {
        integrate(state, &input);
        state.last_input = input;
    }

    fn double_jumper() -> GameState {
        GameState::with_config(
            1,
            RunConfig {
                capabilities: Capabilities {
                    double_jump: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_jump_and_land() {
        let mut state = GameState::new(1);
        step(&mut state, press_jump());
        assert_eq!(state.player.motion, MotionState::Jumping);
        assert!(state.player.y < 0.0);

        for _ in 0..100 {
            step(&mut state, TickInput::default());
        }
        assert_eq!(state.player.motion, MotionState::Running);
        assert_eq!(state.player.y, 0.0);
        assert_eq!(state.player.jump_count, 0);
        assert!(state.events.contains(&GameEvent::Land));
    }

    #[test]
    fn test_held_jump_fires_once() {
        let mut state = GameState::new(1);
        step(&mut state, press_jump());
        for _ in 0..100 {
            step(&mut state, press_jump());
        }
        let jumps = state.events.iter().filter(|e| **e == GameEvent::Jump).count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_double_jump_needs_capability() {
        let mut state = GameState::new(1);
        step(&mut state, press_jump());
        step(&mut state, TickInput::default());
        let vy = state.player.vy;
        step(&mut state, press_jump());
        assert_eq!(state.player.jump_count, 1);
        assert!(state.player.vy > vy);
    }

    #[test]
    fn test_double_jump_once_per_airborne_period() {
        let mut state = double_jumper();
        step(&mut state, press_jump());
        step(&mut state, TickInput::default());
        step(&mut state, press_jump());
        assert_eq!(state.player.jump_count, 2);
        assert!((state.player.vy - (-12.0 * 0.8 + 0.6)).abs() < 1e-5);

        // Third press is rejected
        step(&mut state, TickInput::default());
        let vy = state.player.vy;
        step(&mut state, press_jump());
        assert!((state.player.vy - (vy + 0.6)).abs() < 1e-5);
        let doubles = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::DoubleJump)
            .count();
        assert_eq!(doubles, 1);
    }

    #[test]
    fn test_slide_until_release() {
        let mut state = GameState::new(1);
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        step(&mut state, down);
        assert_eq!(state.player.motion, MotionState::Sliding);
        assert_eq!(state.player.height, PLAYER_HEIGHT_SLIDE);

        // Can't jump out of a slide
        step(
            &mut state,
            TickInput {
                down: true,
                jump: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.motion, MotionState::Sliding);

        step(&mut state, TickInput::default());
        assert_eq!(state.player.motion, MotionState::Running);
        assert_eq!(state.player.height, PLAYER_HEIGHT_RUN);
    }

    #[test]
    fn test_no_slide_in_air() {
        let mut state = GameState::new(1);
        step(&mut state, press_jump());
        step(
            &mut state,
            TickInput {
                down: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.motion, MotionState::Jumping);
        assert_eq!(state.player.height, PLAYER_HEIGHT_RUN);
    }

    #[test]
    fn test_flight_eases_to_cruise() {
        let mut state = GameState::new(1);
        state.player.motion = MotionState::Flying;
        for _ in 0..400 {
            step(&mut state, TickInput::default());
        }
        assert!((state.player.y + 300.0).abs() < 0.1);
        assert_eq!(state.player.vy, 0.0);

        let climb = press_jump();
        for _ in 0..400 {
            step(&mut state, climb);
        }
        assert!((state.player.y + 380.0).abs() < 0.1);

        // Down wins over jump
        let dive = TickInput {
            down: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..400 {
            step(&mut state, dive);
        }
        assert!((state.player.y + 150.0).abs() < 0.1);
        assert_eq!(state.player.motion, MotionState::Flying);
    }

    #[test]
    fn test_flight_lateral_clamp() {
        let mut state = GameState::new(1);
        state.player.motion = MotionState::Flying;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            step(&mut state, right);
        }
        assert_eq!(state.player.x, FLIGHT_MAX_X);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            step(&mut state, left);
        }
        assert_eq!(state.player.x, FLIGHT_MIN_X);
    }

    #[test]
    fn test_lateral_returns_after_flight() {
        let mut state = GameState::new(1);
        state.player.x = 150.0;
        step(&mut state, TickInput::default());
        assert!((state.player.x - 135.0).abs() < 1e-4);
        for _ in 0..300 {
            step(&mut state, TickInput::default());
        }
        assert!(state.player.x.abs() < 0.01);
    }
}
