//! Simulation clock: tick counter, speed curve, distance and score

use serde::{Deserialize, Serialize};

use super::state::Capabilities;
use crate::tuning::Tuning;

/// World time, speed and score accumulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Ticks simulated this run
    pub ticks: u64,
    /// Ticks spent accelerating (stops counting at the cap)
    pub ramp_ticks: u64,
    /// Speed before modifiers
    pub base_speed: f32,
    /// Speed after modifiers (world scroll per tick)
    pub speed: f32,
    pub distance: f64,
    pub score: f64,
    /// Persistent multiplier applied to distance score
    pub score_multiplier: f64,
}

impl Clock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ticks: 0,
            ramp_ticks: 0,
            base_speed: tuning.base_speed,
            speed: tuning.base_speed,
            distance: 0.0,
            score: 0.0,
            score_multiplier: 1.0,
        }
    }

    /// Base speed gain per tick for this run
    pub fn increment(tuning: &Tuning, caps: &Capabilities) -> f32 {
        if caps.time_dilation {
            tuning.speed_increment * 0.5
        } else {
            tuning.speed_increment
        }
    }

    /// Speed after slow-motion and overclock (they stack multiplicatively)
    pub fn effective_speed(base: f32, slowed: bool, overclocked: bool, tuning: &Tuning) -> f32 {
        let mut speed = base;
        if slowed {
            speed *= tuning.slow_motion_factor;
        }
        if overclocked {
            speed *= tuning.overclock_factor;
        }
        speed.max(0.0)
    }

    /// Advance one tick. Returns the effective speed for this tick.
    pub fn advance(
        &mut self,
        tuning: &Tuning,
        caps: &Capabilities,
        slowed: bool,
        overclocked: bool,
    ) -> f32 {
        self.ticks += 1;

        if self.base_speed < tuning.max_speed {
            // Derived from the tick count so the curve lands on the cap exactly
            self.ramp_ticks += 1;
            let gained = Self::increment(tuning, caps) * self.ramp_ticks as f32;
            self.base_speed = (tuning.base_speed + gained).min(tuning.max_speed);
        }

        self.speed = Self::effective_speed(self.base_speed, slowed, overclocked, tuning);
        self.distance += f64::from(self.speed);

        let mut factor = if caps.score_hack {
            1.0 + tuning.score_hack_bonus
        } else {
            1.0
        };
        if overclocked {
            factor *= tuning.overclock_score_factor;
        }
        self.score += f64::from(self.speed) * tuning.score_per_speed * self.score_multiplier * factor;

        self.speed
    }

    pub fn add_score(&mut self, points: f64) {
        self.score += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(ticks: u32, caps: Capabilities, slowed: bool, overclocked: bool) -> Clock {
        let tuning = Tuning::default();
        let mut clock = Clock::new(&tuning);
        for _ in 0..ticks {
            clock.advance(&tuning, &caps, slowed, overclocked);
        }
        clock
    }

    #[test]
    fn test_speed_reaches_cap_exactly() {
        let clock = run(6000, Capabilities::default(), false, false);
        assert_eq!(clock.base_speed, 24.0);
        assert_eq!(clock.speed, 24.0);

        let clock = run(6500, Capabilities::default(), false, false);
        assert_eq!(clock.speed, 24.0);
    }

    #[test]
    fn test_speed_below_cap_before_ramp_ends() {
        let clock = run(5999, Capabilities::default(), false, false);
        assert!(clock.base_speed < 24.0);
        assert!(clock.base_speed > 23.99);
    }

    #[test]
    fn test_time_dilation_halves_ramp() {
        let caps = Capabilities {
            time_dilation: true,
            ..Default::default()
        };
        let clock = run(6000, caps, false, false);
        assert!((clock.base_speed - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_modifiers_compose() {
        let tuning = Tuning::default();
        let both = Clock::effective_speed(10.0, true, true, &tuning);
        assert!((both - 10.0 * 0.6 * 1.5).abs() < 1e-5);
        assert!((Clock::effective_speed(10.0, true, false, &tuning) - 6.0).abs() < 1e-5);
        assert!((Clock::effective_speed(10.0, false, true, &tuning) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_score_factors() {
        let tuning = Tuning::default();
        let plain = run(1, Capabilities::default(), false, false);
        let expected = f64::from(plain.speed) * 0.1;
        assert!((plain.score - expected).abs() < 1e-9);

        let hack = Capabilities {
            score_hack: true,
            ..Default::default()
        };
        let boosted = run(1, hack, false, true);
        let speed = f64::from(boosted.speed);
        assert!((boosted.score - speed * tuning.score_per_speed * 1.2 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_accumulates_speed() {
        let clock = run(10, Capabilities::default(), false, false);
        assert!(clock.distance > 60.0);
        assert!(clock.distance < 61.0);
    }

    proptest! {
        #[test]
        fn prop_speed_bounded(ticks in 0u32..9000, slowed: bool, overclocked: bool, dilation: bool) {
            let tuning = Tuning::default();
            let caps = Capabilities { time_dilation: dilation, ..Default::default() };
            let clock = run(ticks, caps, slowed, overclocked);
            prop_assert!(clock.speed >= 0.0);
            prop_assert!(clock.speed <= tuning.max_speed * tuning.overclock_factor);
            prop_assert!(clock.base_speed <= tuning.max_speed);
        }
    }
}
