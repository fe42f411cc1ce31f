//! Entity registry
//!
//! Owns every obstacle, bit, pickup and visual transient of a run. The spawner
//! and the collision resolver only index into these collections.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::PowerupKind;
use super::variant::{ObstacleVariant, VariantSpec};
use crate::consts::*;

/// Entity identifier, unique within a run
pub type EntityId = u32;

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Palette slot for transients (resolved by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Cyan,
    Magenta,
    Lime,
    Red,
    White,
    Dark,
    /// The equipped skin color
    Skin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub variant: ObstacleVariant,
    pub rect: Rect,
    /// Cleared by overclock, screen-clear, a spent life or popup trigger
    pub neutralized: bool,
    /// Lit phase of time-gated hazards
    pub lit: bool,
    /// Extra leftward speed on top of the world scroll
    pub fast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bit {
    pub id: EntityId,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub rect: Rect,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: Tint,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
    /// Drawn as a 0/1 glyph instead of a square
    pub digital: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub tint: Tint,
    pub life: f32,
}

/// Typed entity containers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    pub obstacles: Vec<Obstacle>,
    pub bits: Vec<Bit>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    next_id: EntityId,
}

impl Registry {
    /// Get next entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an obstacle with its left edge at `x`
    pub fn push_obstacle(&mut self, spec: &VariantSpec, x: f32, ground_y: f32) -> EntityId {
        let id = self.next_id();
        self.obstacles.push(Obstacle {
            id,
            variant: spec.variant,
            rect: Rect::new(x, spec.top(ground_y), spec.width, spec.height),
            neutralized: false,
            lit: false,
            fast: spec.fast,
        });
        id
    }

    pub fn push_bit(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.next_id();
        self.bits.push(Bit {
            id,
            rect: Rect::new(x, y, BIT_SIZE, BIT_SIZE),
        });
        id
    }

    pub fn push_pickup(&mut self, kind: PowerupKind, x: f32, y: f32) -> EntityId {
        let id = self.next_id();
        self.pickups.push(Pickup {
            id,
            kind,
            rect: Rect::new(x, y, POWERUP_SIZE, POWERUP_SIZE),
            active: true,
        });
        id
    }

    /// Spawn `count` particles at a point. Spread is hash-derived from the tick
    /// so bursts never consume the run's random source.
    pub fn burst(&mut self, x: f32, y: f32, tint: Tint, count: usize, tick: u64) {
        self.burst_with(x, y, tint, count, tick, false);
    }

    /// Like [`Registry::burst`], drawn as binary digits
    pub fn digital_burst(&mut self, x: f32, y: f32, tint: Tint, count: usize, tick: u64) {
        self.burst_with(x, y, tint, count, tick, true);
    }

    fn burst_with(&mut self, x: f32, y: f32, tint: Tint, count: usize, tick: u64, digital: bool) {
        // Salt with the id counter so two bursts in one tick differ
        let seed = (tick as u32) ^ self.next_id.wrapping_mul(40503);
        self.next_id += 1;

        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }
            let hash = seed
                .wrapping_mul(2654435761)
                .wrapping_add(i as u32 * 7919);
            let vx = ((hash % 1000) as f32 / 1000.0 - 0.5) * 8.0;
            let vy = ((hash / 1000 % 1000) as f32 / 1000.0 - 0.5) * 8.0;
            let size = 1.0 + ((hash / 1_000_000 % 100) as f32 / 100.0) * 3.0;

            self.particles.push(Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(vx, vy),
                tint,
                life: 1.0,
                size,
                digital: digital && hash & 1 == 0,
            });
        }
    }

    pub fn float_text(&mut self, x: f32, y: f32, text: &str, tint: Tint) {
        self.texts.push(FloatingText {
            pos: Vec2::new(x, y),
            text: text.to_string(),
            tint,
            life: 1.0,
        });
    }

    /// Move obstacles and pickups left with the world
    pub fn scroll(&mut self, speed: f32, fast_bonus: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.rect.x -= if obstacle.fast { speed + fast_bonus } else { speed };
        }
        for pickup in &mut self.pickups {
            pickup.rect.x -= speed;
        }
    }

    /// Move bits: on-screen bits ease toward `pull` when attracted, the rest
    /// scroll with the world
    pub fn drift_bits(&mut self, speed: f32, pull: Option<Vec2>, view_width: f32, ease: f32) {
        for bit in &mut self.bits {
            match pull {
                Some(target) if bit.rect.x > 0.0 && bit.rect.x < view_width => {
                    bit.rect.x += (target.x - bit.rect.x) * ease;
                    bit.rect.y += (target.y - bit.rect.y) * ease;
                }
                _ => bit.rect.x -= speed,
            }
        }
    }

    /// Age particles and floating texts
    pub fn animate(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= 0.03;
        }
        self.particles.retain(|p| p.life > 0.0);

        for text in &mut self.texts {
            text.pos.y -= 2.0;
            text.life -= 0.02;
        }
        self.texts.retain(|t| t.life > 0.0);
    }

    /// Drop everything past the despawn line, neutralized obstacles and spent
    /// pickups
    pub fn sweep(&mut self) {
        self.obstacles
            .retain(|o| !o.neutralized && o.rect.right() >= DESPAWN_X);
        self.bits.retain(|b| b.rect.x > DESPAWN_X);
        self.pickups.retain(|p| p.active && p.rect.x > DESPAWN_X);
    }

    /// Update lit phases of time-gated hazards
    pub fn update_duty_cycles(&mut self, tick: u64, period: u64, on_ticks: u64) {
        let lit = tick % period.max(1) < on_ticks;
        for obstacle in self
            .obstacles
            .iter_mut()
            .filter(|o| o.variant == ObstacleVariant::Laser)
        {
            obstacle.lit = lit;
        }
    }

    /// Live (non-neutralized) obstacles
    pub fn live_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.neutralized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 620.0;

    #[test]
    fn test_ids_are_unique() {
        let mut reg = Registry::default();
        let a = reg.push_bit(0.0, 0.0);
        let b = reg.push_pickup(PowerupKind::Shield, 0.0, 0.0);
        let c = reg.push_obstacle(ObstacleVariant::Spikes.spec(), 0.0, GROUND);
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_crawler_scrolls_faster() {
        let mut reg = Registry::default();
        reg.push_obstacle(ObstacleVariant::Spikes.spec(), 1000.0, GROUND);
        reg.push_obstacle(ObstacleVariant::Crawler.spec(), 1000.0, GROUND);
        reg.scroll(6.0, 3.0);
        assert_eq!(reg.obstacles[0].rect.x, 994.0);
        assert_eq!(reg.obstacles[1].rect.x, 991.0);
    }

    #[test]
    fn test_sweep_past_despawn_line() {
        let mut reg = Registry::default();
        // Right edge at -101, past the line
        reg.push_obstacle(ObstacleVariant::Spikes.spec(), -161.0, GROUND);
        // Right edge at -99, still inside
        reg.push_obstacle(ObstacleVariant::Spikes.spec(), -159.0, GROUND);
        reg.push_bit(-101.0, 0.0);
        reg.push_bit(50.0, 0.0);
        reg.sweep();
        assert_eq!(reg.obstacles.len(), 1);
        assert_eq!(reg.bits.len(), 1);
    }

    #[test]
    fn test_sweep_drops_neutralized_and_spent() {
        let mut reg = Registry::default();
        reg.push_obstacle(ObstacleVariant::Drone.spec(), 500.0, GROUND);
        reg.obstacles[0].neutralized = true;
        reg.push_pickup(PowerupKind::Magnet, 500.0, 400.0);
        reg.pickups[0].active = false;
        reg.sweep();
        assert!(reg.obstacles.is_empty());
        assert!(reg.pickups.is_empty());
    }

    #[test]
    fn test_magnet_pull_shrinks_distance() {
        let mut reg = Registry::default();
        reg.push_bit(600.0, 300.0);
        let target = Vec2::new(100.0, 580.0);
        reg.drift_bits(6.0, Some(target), 1280.0, 0.1);
        let bit = &reg.bits[0].rect;
        assert!((target.x - bit.x - 0.9 * (target.x - 600.0)).abs() < 1e-3);
        assert!((target.y - bit.y - 0.9 * (target.y - 300.0)).abs() < 1e-3);
    }

    #[test]
    fn test_offscreen_bits_ignore_magnet() {
        let mut reg = Registry::default();
        reg.push_bit(1400.0, 300.0);
        reg.drift_bits(6.0, Some(Vec2::new(100.0, 580.0)), 1280.0, 0.1);
        assert_eq!(reg.bits[0].rect.x, 1394.0);
        assert_eq!(reg.bits[0].rect.y, 300.0);
    }

    #[test]
    fn test_particle_cap() {
        let mut reg = Registry::default();
        for tick in 0..30 {
            reg.burst(0.0, 0.0, Tint::Red, 20, tick);
        }
        assert_eq!(reg.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_transients_fade() {
        let mut reg = Registry::default();
        reg.burst(10.0, 10.0, Tint::Cyan, 5, 1);
        reg.float_text(0.0, 100.0, "SHIELD BROKEN", Tint::White);
        for _ in 0..34 {
            reg.animate();
        }
        assert!(reg.particles.is_empty());
        assert_eq!(reg.texts.len(), 1);
        assert!(reg.texts[0].pos.y < 100.0);
        for _ in 0..20 {
            reg.animate();
        }
        assert!(reg.texts.is_empty());
    }

    #[test]
    fn test_laser_duty_cycle() {
        let mut reg = Registry::default();
        reg.push_obstacle(ObstacleVariant::Laser.spec(), 500.0, GROUND);
        reg.update_duty_cycles(39, 120, 40);
        assert!(reg.obstacles[0].lit);
        reg.update_duty_cycles(40, 120, 40);
        assert!(!reg.obstacles[0].lit);
        reg.update_duty_cycles(240, 120, 40);
        assert!(reg.obstacles[0].lit);
    }
}
