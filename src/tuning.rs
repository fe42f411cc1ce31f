//! Data-driven game balance
//!
//! Every knob has a default matching the shipped balance. A tuning file only
//! needs the fields it wants to override.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::Effect;

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Downward acceleration per tick while airborne
    pub gravity: f32,
    /// Upward impulse of a jump (positive, applied upward)
    pub jump_force: f32,
    /// Second jump impulse as a fraction of the first
    pub double_jump_factor: f32,

    // === Speed curve ===
    pub base_speed: f32,
    pub max_speed: f32,
    /// Base speed gained per tick until the cap
    pub speed_increment: f32,
    pub slow_motion_factor: f32,
    pub overclock_factor: f32,

    // === Scoring ===
    /// Score per unit of distance
    pub score_per_speed: f64,
    pub overclock_score_factor: f64,
    /// Flat bonus fraction from the score hack ability
    pub score_hack_bonus: f64,
    pub bit_score: f64,
    /// Per-level, per-obstacle bonus when the screen is cleared
    pub screen_clear_bonus: f64,

    // === Spawning ===
    /// Distance covered by one difficulty tier
    pub tier_span: f64,
    pub max_tier: u32,
    pub first_obstacle_at: f64,
    pub obstacle_gap_base: f64,
    pub obstacle_gap_per_speed: f64,
    pub obstacle_gap_jitter: f64,
    /// Free stretch (px) before the right edge that triggers a filler pattern
    pub gap_fill_threshold: f32,
    pub gap_fill_advance: f32,
    pub first_powerup_at: f64,
    pub powerup_gap_base: f64,
    pub powerup_gap_jitter: f64,
    /// Ticks between bonus bits while flying
    pub flight_bit_interval: u64,

    // === Modifiers ===
    /// Base duration in ticks of each timed modifier
    pub durations: BTreeMap<Effect, u32>,
    /// Extra ticks per upgrade level above 1
    pub duration_per_level: u32,
    /// Invincibility held while overclocked
    pub overclock_invincibility: u32,
    pub shield_invincibility_base: u32,
    pub shield_invincibility_per_level: u32,
    pub restore_invincibility: u32,
    pub distraction_ticks: u32,
    /// Fraction of the remaining distance a magnetized bit covers per tick
    pub magnet_ease: f32,

    // === Flight ===
    pub flight_ease: f32,
    pub lateral_return: f32,
    pub lateral_speed: f32,
    pub cruise_altitude: f32,
    pub climb_altitude: f32,
    pub dive_altitude: f32,

    // === Hazards ===
    /// Laser duty cycle: lit for `laser_on_ticks` out of every `laser_period`
    pub laser_period: u64,
    pub laser_on_ticks: u64,
    /// Extra leftward speed of crawlers
    pub crawler_speed_bonus: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let durations = BTreeMap::from([
            (Effect::Overclock, 600),
            (Effect::Flight, 1200),
            (Effect::SlowMotion, 300),
            (Effect::Magnet, 900),
        ]);

        Self {
            gravity: 0.6,
            jump_force: 12.0,
            double_jump_factor: 0.8,

            base_speed: 6.0,
            max_speed: 24.0,
            speed_increment: 0.003,
            slow_motion_factor: 0.6,
            overclock_factor: 1.5,

            score_per_speed: 0.1,
            overclock_score_factor: 2.0,
            score_hack_bonus: 0.2,
            bit_score: 50.0,
            screen_clear_bonus: 200.0,

            tier_span: 2000.0,
            max_tier: 5,
            first_obstacle_at: 800.0,
            obstacle_gap_base: 400.0,
            obstacle_gap_per_speed: 10.0,
            obstacle_gap_jitter: 400.0,
            gap_fill_threshold: 400.0,
            gap_fill_advance: 400.0,
            first_powerup_at: 2000.0,
            powerup_gap_base: 2000.0,
            powerup_gap_jitter: 3000.0,
            flight_bit_interval: 20,

            durations,
            duration_per_level: 120,
            overclock_invincibility: 5,
            shield_invincibility_base: 60,
            shield_invincibility_per_level: 20,
            restore_invincibility: 120,
            distraction_ticks: 120,
            magnet_ease: 0.1,

            flight_ease: 0.05,
            lateral_return: 0.1,
            lateral_speed: 3.0,
            cruise_altitude: 300.0,
            climb_altitude: 380.0,
            dive_altitude: 150.0,

            laser_period: 120,
            laser_on_ticks: 40,
            crawler_speed_bonus: 3.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning override, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        self.base_speed = self.base_speed.max(0.0);
        self.max_speed = self.max_speed.max(self.base_speed);
        self.speed_increment = self.speed_increment.max(0.0);
        self.slow_motion_factor = self.slow_motion_factor.max(0.0);
        self.overclock_factor = self.overclock_factor.max(0.0);
        self.laser_period = self.laser_period.max(1);
        self.flight_bit_interval = self.flight_bit_interval.max(1);
        self.tier_span = self.tier_span.max(1.0);
        self
    }

    /// Duration of a timed modifier at an upgrade level, if configured
    pub fn duration_for(&self, effect: Effect, level: u8) -> Option<u32> {
        let base = *self.durations.get(&effect)?;
        let bonus = u32::from(level.saturating_sub(1)) * self.duration_per_level;
        Some(base + bonus)
    }

    /// Invincibility granted when a shield breaks
    pub fn shield_invincibility(&self, level: u8) -> u32 {
        self.shield_invincibility_base + u32::from(level) * self.shield_invincibility_per_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_scales_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.duration_for(Effect::Overclock, 1), Some(600));
        assert_eq!(tuning.duration_for(Effect::Flight, 3), Some(1200 + 240));
        assert_eq!(tuning.duration_for(Effect::Magnet, 5), Some(900 + 480));
    }

    #[test]
    fn test_missing_duration_is_none() {
        let mut tuning = Tuning::default();
        tuning.durations.remove(&Effect::SlowMotion);
        assert_eq!(tuning.duration_for(Effect::SlowMotion, 2), None);
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 30.0, "gravity": 0.5 }"#);
        assert_eq!(tuning.max_speed, 30.0);
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.base_speed, 6.0);
    }

    #[test]
    fn test_malformed_falls_back() {
        let tuning = Tuning::from_json("{ not json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_rejects_negative_speed() {
        let tuning = Tuning::from_json(r#"{ "base_speed": -4.0, "speed_increment": -1.0 }"#);
        assert_eq!(tuning.base_speed, 0.0);
        assert_eq!(tuning.speed_increment, 0.0);
        assert!(tuning.max_speed >= tuning.base_speed);
    }

    #[test]
    fn test_shield_window() {
        let tuning = Tuning::default();
        assert_eq!(tuning.shield_invincibility(1), 80);
        assert_eq!(tuning.shield_invincibility(5), 160);
    }
}
