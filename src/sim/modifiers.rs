//! Modifier stack: concurrently active power-up effects
//!
//! Timed effects share one timer record each and are decremented generically.
//! Per-kind side effects on activation/expiry go through `on_activate` and
//! `on_expire`. Shield is a plain flag on the player and screen-clear is
//! instantaneous, so neither has a timer.

use serde::{Deserialize, Serialize};

use super::entities::Tint;
use super::state::{GameEvent, GameState, MotionState, Player, PowerupKind};
use crate::consts::*;

/// Timed modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Overclock,
    Flight,
    SlowMotion,
    Magnet,
}

impl Effect {
    pub const ALL: [Effect; 4] = [
        Effect::Overclock,
        Effect::Flight,
        Effect::SlowMotion,
        Effect::Magnet,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            Effect::Overclock => 0,
            Effect::Flight => 1,
            Effect::SlowMotion => 2,
            Effect::Magnet => 3,
        }
    }

    /// Pickup that grants this effect
    pub fn powerup(self) -> PowerupKind {
        match self {
            Effect::Overclock => PowerupKind::Overclock,
            Effect::Flight => PowerupKind::Flight,
            Effect::SlowMotion => PowerupKind::SlowMotion,
            Effect::Magnet => PowerupKind::Magnet,
        }
    }
}

/// Countdown for one effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub remaining: u32,
    pub duration: u32,
}

impl Timer {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Remaining fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            self.remaining as f32 / self.duration as f32
        }
    }
}

/// One timer per timed effect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierStack {
    timers: [Timer; 4],
}

impl ModifierStack {
    pub fn timer(&self, effect: Effect) -> Timer {
        self.timers[effect.index()]
    }

    pub fn is_active(&self, effect: Effect) -> bool {
        self.timers[effect.index()].is_active()
    }

    /// Start (or restart) an effect with a fresh countdown
    pub fn activate(&mut self, effect: Effect, duration: u32) {
        self.timers[effect.index()] = Timer {
            remaining: duration,
            duration,
        };
    }

    /// Decrement every running timer. Returns the effects that ran out.
    pub fn tick_down(&mut self) -> Vec<Effect> {
        let mut expired = Vec::new();
        for effect in Effect::ALL {
            let timer = &mut self.timers[effect.index()];
            if timer.remaining > 0 {
                timer.remaining -= 1;
                if timer.remaining == 0 {
                    expired.push(effect);
                }
            }
        }
        expired
    }
}

/// Activation side effects
fn on_activate(effect: Effect, player: &mut Player) {
    match effect {
        Effect::Flight => {
            player.motion = MotionState::Flying;
            player.height = PLAYER_HEIGHT_RUN;
            player.vy = 0.0;
            player.jump_count = 0;
        }
        Effect::Overclock | Effect::SlowMotion | Effect::Magnet => {}
    }
}

/// Expiry side effects
fn on_expire(effect: Effect, player: &mut Player) {
    match effect {
        Effect::Flight => {
            // Drop out of the sky under normal gravity
            if player.motion == MotionState::Flying {
                player.motion = MotionState::Jumping;
                player.vy = 0.0;
                player.jump_count = 1;
            }
        }
        Effect::Overclock | Effect::SlowMotion | Effect::Magnet => {}
    }
    log::debug!("{:?} expired", effect);
}

/// Per-tick countdowns: modifier timers, invincibility and popup spam
pub fn tick_modifiers(state: &mut GameState) {
    for effect in state.modifiers.tick_down() {
        on_expire(effect, &mut state.player);
    }

    let player = &mut state.player;
    player.invincible_ticks = player.invincible_ticks.saturating_sub(1);
    player.distraction_ticks = player.distraction_ticks.saturating_sub(1);

    if state.modifiers.is_active(Effect::Overclock) {
        player.invincible_ticks = player
            .invincible_ticks
            .max(state.tuning.overclock_invincibility);
    }
}

/// Apply a collected power-up. Returns false when it had no effect.
pub fn apply_powerup(state: &mut GameState, kind: PowerupKind) -> bool {
    let level = state.levels.level(kind);

    match kind.effect() {
        Some(effect) => {
            let Some(duration) = state.tuning.duration_for(effect, level) else {
                log::warn!("No duration configured for {:?}, pickup ignored", effect);
                return false;
            };
            state.modifiers.activate(effect, duration);
            on_activate(effect, &mut state.player);
        }
        None => match kind {
            PowerupKind::Shield => state.player.has_shield = true,
            PowerupKind::ScreenClear => {
                screen_clear(state, level);
            }
            _ => {}
        },
    }

    state.events.push(GameEvent::PowerupAcquired(kind));
    if kind == PowerupKind::Flight {
        state
            .entities
            .float_text(100.0, 100.0, "ROOT ACCESS GRANTED", Tint::Magenta);
    }
    log::debug!("Power-up {:?} (level {})", kind, level);
    true
}

/// Neutralize every live obstacle. Returns how many were cleared.
pub fn screen_clear(state: &mut GameState, level: u8) -> usize {
    let tick = state.clock.ticks;
    let mut cleared = 0usize;
    let mut bursts = Vec::new();

    for obstacle in state.entities.obstacles.iter_mut().filter(|o| !o.neutralized) {
        obstacle.neutralized = true;
        bursts.push((obstacle.rect.x, obstacle.rect.y));
        cleared += 1;
    }

    for (x, y) in bursts {
        state.entities.burst(x, y, Tint::Red, 10, tick);
    }

    let bonus = f64::from(level) * state.tuning.screen_clear_bonus * cleared as f64;
    state.clock.add_score(bonus);
    state.shake = state.shake.max(10.0);
    state.entities.float_text(
        300.0,
        300.0,
        &format!("BUGS DELETED (+{})", bonus as u64),
        Tint::Lime,
    );
    state.events.push(GameEvent::ScreenCleared {
        count: cleared as u32,
    });
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{RunConfig, UpgradeLevels};
    use crate::sim::variant::ObstacleVariant;

    #[test]
    fn test_timer_expires_after_duration() {
        let mut stack = ModifierStack::default();
        stack.activate(Effect::SlowMotion, 3);
        assert!(stack.is_active(Effect::SlowMotion));
        assert!(stack.tick_down().is_empty());
        assert!(stack.tick_down().is_empty());
        assert_eq!(stack.tick_down(), vec![Effect::SlowMotion]);
        assert!(!stack.is_active(Effect::SlowMotion));
        assert!(stack.tick_down().is_empty());
    }

    #[test]
    fn test_effects_run_concurrently() {
        let mut stack = ModifierStack::default();
        stack.activate(Effect::Overclock, 2);
        stack.activate(Effect::Magnet, 5);
        stack.tick_down();
        assert!(stack.is_active(Effect::Overclock));
        assert!(stack.is_active(Effect::Magnet));
        assert_eq!(stack.tick_down(), vec![Effect::Overclock]);
        assert!(stack.is_active(Effect::Magnet));
        assert!((stack.timer(Effect::Magnet).progress() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_level_extends_duration() {
        let mut levels = UpgradeLevels::default();
        levels.set(PowerupKind::Overclock, 3);
        let mut state = GameState::with_config(
            1,
            RunConfig {
                levels,
                ..Default::default()
            },
        );
        assert!(apply_powerup(&mut state, PowerupKind::Overclock));
        assert_eq!(state.modifiers.timer(Effect::Overclock).duration, 600 + 240);
    }

    #[test]
    fn test_missing_duration_is_noop() {
        let mut state = GameState::new(1);
        state.tuning.durations.remove(&Effect::Magnet);
        assert!(!apply_powerup(&mut state, PowerupKind::Magnet));
        assert!(!state.modifiers.is_active(Effect::Magnet));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_flight_activation_and_expiry() {
        let mut state = GameState::new(1);
        state.player.motion = MotionState::Sliding;
        state.player.height = PLAYER_HEIGHT_SLIDE;
        apply_powerup(&mut state, PowerupKind::Flight);
        assert_eq!(state.player.motion, MotionState::Flying);
        assert_eq!(state.player.height, PLAYER_HEIGHT_RUN);

        state.modifiers.activate(Effect::Flight, 1);
        state.player.y = -300.0;
        tick_modifiers(&mut state);
        assert_eq!(state.player.motion, MotionState::Jumping);
        assert_eq!(state.player.y, -300.0);
    }

    #[test]
    fn test_overclock_holds_invincibility() {
        let mut state = GameState::new(1);
        apply_powerup(&mut state, PowerupKind::Overclock);
        tick_modifiers(&mut state);
        assert_eq!(state.player.invincible_ticks, 5);
        tick_modifiers(&mut state);
        assert_eq!(state.player.invincible_ticks, 5);
    }

    #[test]
    fn test_shield_has_no_timer() {
        let mut state = GameState::new(1);
        apply_powerup(&mut state, PowerupKind::Shield);
        for _ in 0..10_000 {
            tick_modifiers(&mut state);
        }
        assert!(state.player.has_shield);
    }

    #[test]
    fn test_screen_clear_scores_once() {
        let mut levels = UpgradeLevels::default();
        levels.set(PowerupKind::ScreenClear, 3);
        let mut state = GameState::with_config(
            1,
            RunConfig {
                levels,
                ..Default::default()
            },
        );
        let ground = state.ground_y();
        for i in 0..4 {
            state
                .entities
                .push_obstacle(ObstacleVariant::Spikes.spec(), 400.0 + i as f32 * 100.0, ground);
        }
        // Already neutralized obstacles are not live
        state.entities.obstacles[0].neutralized = true;

        let before = state.clock.score;
        apply_powerup(&mut state, PowerupKind::ScreenClear);
        assert!(state.entities.obstacles.iter().all(|o| o.neutralized));
        assert!((state.clock.score - before - 3.0 * 200.0 * 3.0).abs() < 1e-9);
        assert!(state
            .events
            .contains(&GameEvent::ScreenCleared { count: 3 }));
    }
}
