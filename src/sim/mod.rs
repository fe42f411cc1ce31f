//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (insertion order within each registry container)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entities;
pub mod modifiers;
pub mod physics;
pub mod rect;
pub mod rng;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod variant;

pub use clock::Clock;
pub use collision::{Resolution, resolve_contact};
pub use entities::{Bit, EntityId, FloatingText, Obstacle, Particle, Pickup, Registry, Tint};
pub use modifiers::{Effect, ModifierStack, Timer, apply_powerup, screen_clear};
pub use rect::Rect;
pub use rng::{RandomSource, run_rng};
pub use snapshot::Snapshot;
pub use spawner::SpawnSchedule;
pub use state::{
    ActiveModifier, Capabilities, GameEvent, GamePhase, GameState, MAX_UPGRADE_LEVEL, MotionState,
    Player, PowerupKind, RunConfig, RunStats, RunSummary, SpeedSample, UpgradeLevels, Viewport,
};
pub use tick::{TickInput, tick};
pub use variant::{ObstacleVariant, PatternShape, VariantSpec};
