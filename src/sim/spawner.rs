//! Procedural spawner
//!
//! Decides each tick whether to place an obstacle (with its guide pattern of
//! bits), fill an empty stretch with a free-run pattern, or drop a pickup.
//! Spacing is tracked through distance thresholds and an occupied frontier
//! that scrolls with the world.

use serde::{Deserialize, Serialize};

use super::entities::Registry;
use super::rng::RandomSource;
use super::state::{GameState, PowerupKind};
use super::variant::{self, PatternShape};
use crate::consts::*;
use crate::tuning::Tuning;

/// Spawn thresholds and the occupied frontier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Distance at which the next obstacle appears
    pub next_obstacle: f64,
    /// Distance at which the next pickup appears
    pub next_powerup: f64,
    /// Screen x of the right edge of the last placed entity
    pub frontier: f32,
}

impl SpawnSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            next_obstacle: tuning.first_obstacle_at,
            next_powerup: tuning.first_powerup_at,
            frontier: 800.0,
        }
    }

    /// The frontier moves left with the world
    pub fn scroll(&mut self, speed: f32) {
        self.frontier -= speed;
    }
}

/// Difficulty tier for a distance
pub fn tier(distance: f64, tuning: &Tuning) -> u32 {
    let tier = (distance / tuning.tier_span).floor().max(0.0) as u32;
    tier.min(tuning.max_tier)
}

/// Run every spawn rule for this tick
pub fn spawn(state: &mut GameState, rng: &mut impl RandomSource) {
    if state.clock.distance >= state.schedule.next_obstacle {
        spawn_obstacle(state, rng);
    }

    if state.view.width - state.schedule.frontier > state.tuning.gap_fill_threshold {
        fill_gap(state, rng);
    }

    if state.clock.distance >= state.schedule.next_powerup {
        spawn_powerup(state, rng);
    }

    if state.player.is_flying() && state.clock.ticks % state.tuning.flight_bit_interval == 0 {
        spawn_flight_bit(state, rng);
    }
}

fn spawn_obstacle(state: &mut GameState, rng: &mut impl RandomSource) {
    let tier = tier(state.clock.distance, &state.tuning);
    let candidates: Vec<_> = variant::candidates(tier).collect();
    let Some(spec) = candidates.get(rng.pick(candidates.len())).copied() else {
        return;
    };

    let width = state.view.width;
    let ground = state.ground_y();
    state.entities.push_obstacle(spec, width, ground);
    state.schedule.frontier = state.schedule.frontier.max(width + spec.width);

    if let Some(guide) = spec.guide {
        spawn_pattern(
            &mut state.entities,
            &mut state.schedule.frontier,
            guide.shape,
            width + guide.x_offset,
            ground - guide.lift,
            guide.count,
        );
    }

    let tuning = &state.tuning;
    let gap = tuning.obstacle_gap_base + f64::from(state.clock.speed) * tuning.obstacle_gap_per_speed;
    state.schedule.next_obstacle =
        state.clock.distance + gap + rng.up_to(tuning.obstacle_gap_jitter);

    log::debug!(
        "Spawned {:?} at distance {:.0} (tier {})",
        spec.variant,
        state.clock.distance,
        tier
    );
}

/// Free-run pattern for an empty stretch
fn fill_gap(state: &mut GameState, rng: &mut impl RandomSource) {
    let start = state.view.width;
    let ground = state.ground_y();
    let roll = rng.next_unit();

    let (shape, lift, count) = if roll < 0.3 {
        (PatternShape::Wave, 100.0, 8)
    } else if roll < 0.6 {
        (PatternShape::Diagonal, 50.0, 6)
    } else {
        (PatternShape::Line, 80.0, 5)
    };

    spawn_pattern(
        &mut state.entities,
        &mut state.schedule.frontier,
        shape,
        start,
        ground - lift,
        count,
    );
    // No second filler until the world has scrolled on
    state.schedule.frontier = start + state.tuning.gap_fill_advance;
}

fn spawn_powerup(state: &mut GameState, rng: &mut impl RandomSource) {
    let kind = PowerupKind::ALL[rng.pick(PowerupKind::ALL.len())];
    let y = state.ground_y() - 100.0 - rng.next_unit() * 50.0;
    let x = state.view.width.max(state.schedule.frontier + 50.0);
    state.entities.push_pickup(kind, x, y);

    let tuning = &state.tuning;
    state.schedule.next_powerup =
        state.clock.distance + tuning.powerup_gap_base + rng.up_to(tuning.powerup_gap_jitter);

    log::debug!("Spawned {:?} pickup at distance {:.0}", kind, state.clock.distance);
}

/// Bonus bits at cruise altitude while flying
fn spawn_flight_bit(state: &mut GameState, rng: &mut impl RandomSource) {
    let y = state.ground_y() - state.tuning.cruise_altitude + (rng.next_unit() - 0.5) * 100.0;
    let x = state.view.width;
    state.entities.push_bit(x, y);
}

/// Place `count` bits in a formation starting at `start_x`, then push the
/// frontier past the last one
pub fn spawn_pattern(
    entities: &mut Registry,
    frontier: &mut f32,
    shape: PatternShape,
    start_x: f32,
    base_y: f32,
    count: usize,
) {
    let mid = count as f32 / 2.0;
    for i in 0..count {
        let fi = i as f32;
        let x = start_x + fi * BIT_SPACING;
        let y = match shape {
            PatternShape::Arc => {
                // Peak in the middle of the run
                let offset = ((mid - (fi - mid).abs()) * 40.0).max(0.0);
                base_y - offset
            }
            PatternShape::Wave => base_y + (fi * 0.8).sin() * 60.0,
            PatternShape::Diagonal => base_y - fi * 30.0,
            PatternShape::Line => base_y,
        };
        entities.push_bit(x, y);
    }
    *frontier = frontier.max(start_x + count as f32 * BIT_SPACING);
}
