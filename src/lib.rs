//! Glitch Runner - A cyberpunk endless runner
//!
//! Core modules:
//! - `sim`: Per-tick simulation (physics, spawning, modifiers, collisions)
//! - `tuning`: Data-driven game balance
//! - `profile`: Persistent player profile, shop and upgrades
//! - `platform`: Browser/native platform abstraction
//! - `audio`: Sound effects per event (Web Audio playback on wasm)
//! - `renderer`: Canvas 2D drawing of simulation snapshots (wasm only)

pub mod audio;
pub mod catalog;
pub mod platform;
pub mod profile;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use profile::{Profile, PurchaseOutcome};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the game was balanced at 60 ticks per second)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default viewport, overridden by the canvas size on web
    pub const VIEW_WIDTH: f32 = 1280.0;
    pub const VIEW_HEIGHT: f32 = 720.0;

    /// Height of the ground strip at the bottom of the view
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Player sprite box
    pub const PLAYER_SCREEN_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT_RUN: f32 = 80.0;
    pub const PLAYER_HEIGHT_SLIDE: f32 = 40.0;
    /// Hitbox inset from the sprite box (horizontal, vertical)
    pub const HITBOX_INSET_X: f32 = 10.0;
    pub const HITBOX_INSET_Y: f32 = 5.0;

    /// Lateral offset range while flying
    pub const FLIGHT_MIN_X: f32 = -50.0;
    pub const FLIGHT_MAX_X: f32 = 200.0;

    pub const POWERUP_SIZE: f32 = 30.0;
    pub const BIT_SIZE: f32 = 15.0;
    /// Horizontal spacing between bits in a pattern
    pub const BIT_SPACING: f32 = 50.0;

    /// Entities whose right edge is left of this line are culled
    pub const DESPAWN_X: f32 = -100.0;
}
