//! Read-only projection of a run for rendering and audio hosts

use serde::Serialize;

use super::entities::{Bit, FloatingText, Obstacle, Particle, Pickup};
use super::rect::Rect;
use super::state::{GamePhase, GameState, MotionState, RunStats};

/// Per-tick view of everything a renderer draws
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub phase: GamePhase,
    pub view_width: f32,
    pub view_height: f32,
    pub ground_y: f32,
    pub shake: f32,
    /// Player sprite box in screen space
    pub player: Rect,
    pub motion: MotionState,
    pub has_shield: bool,
    pub invincible: bool,
    /// Popup spam still on screen
    pub distracted: bool,
    pub obstacles: &'a [Obstacle],
    pub bits: &'a [Bit],
    pub pickups: &'a [Pickup],
    pub particles: &'a [Particle],
    pub texts: &'a [FloatingText],
    pub stats: &'a RunStats,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let ground_y = state.ground_y();
        Self {
            tick: state.clock.ticks,
            phase: state.phase,
            view_width: state.view.width,
            view_height: state.view.height,
            ground_y,
            shake: state.shake,
            player: state.player.sprite(ground_y),
            motion: state.player.motion,
            has_shield: state.player.has_shield,
            invincible: state.player.invincible_ticks > 0,
            distracted: state.player.distraction_ticks > 0,
            obstacles: &state.entities.obstacles,
            bits: &state.entities.bits,
            pickups: &state.entities.pickups,
            particles: &state.entities.particles,
            texts: &state.entities.texts,
            stats: &state.stats,
        }
    }

    /// Serialize for a JS renderer
    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Failed to serialize snapshot: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::variant::ObstacleVariant;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(5);
        let ground = state.ground_y();
        state
            .entities
            .push_obstacle(ObstacleVariant::Drone.spec(), 900.0, ground);
        state.player.distraction_ticks = 10;

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.obstacles.len(), 1);
        assert!(snap.distracted);
        assert_eq!(snap.player.bottom(), ground);
    }

    #[test]
    fn test_snapshot_json() {
        let state = GameState::new(5);
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Playing");
        assert_eq!(value["stats"]["score"], 0);
    }
}
