//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: every component function
//! takes it (or a piece of it) by reference. There are no ambient globals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::entities::Registry;
use super::modifiers::{Effect, ModifierStack};
use super::rect::Rect;
use super::spawner::SpawnSchedule;
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Discrete motion state of the player (exactly one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Running,
    Jumping,
    Sliding,
    Flying,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lateral offset from the anchor column (only moves while flying)
    pub x: f32,
    /// Vertical offset from the ground (0 = grounded, negative = up)
    pub y: f32,
    /// Vertical velocity (negative = up)
    pub vy: f32,
    pub motion: MotionState,
    /// Jumps used in the current airborne period
    pub jump_count: u8,
    pub height: f32,
    pub has_shield: bool,
    /// Ticks of contact immunity left
    pub invincible_ticks: u32,
    /// Ticks of popup spam left
    pub distraction_ticks: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vy: 0.0,
            motion: MotionState::Running,
            jump_count: 0,
            height: PLAYER_HEIGHT_RUN,
            has_shield: false,
            invincible_ticks: 0,
            distraction_ticks: 0,
        }
    }
}

impl Player {
    pub fn is_flying(&self) -> bool {
        self.motion == MotionState::Flying
    }

    /// Off the ground for any reason
    pub fn is_airborne(&self) -> bool {
        matches!(self.motion, MotionState::Jumping | MotionState::Flying) || self.y < 0.0
    }

    /// Full sprite box in screen space
    pub fn sprite(&self, ground_y: f32) -> Rect {
        Rect::new(
            PLAYER_SCREEN_X + self.x,
            ground_y - self.height + self.y,
            PLAYER_WIDTH,
            self.height,
        )
    }

    /// Collision box, inset from the sprite
    pub fn hitbox(&self, ground_y: f32) -> Rect {
        self.sprite(ground_y).inset(HITBOX_INSET_X, HITBOX_INSET_Y)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerupKind {
    /// Speed boost with contact immunity
    Overclock,
    Shield,
    /// "Root access": flight
    Flight,
    /// "Lag switch": slow motion
    SlowMotion,
    Magnet,
    /// "Debugger": clears every obstacle on screen
    ScreenClear,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 6] = [
        PowerupKind::Overclock,
        PowerupKind::Shield,
        PowerupKind::Flight,
        PowerupKind::SlowMotion,
        PowerupKind::Magnet,
        PowerupKind::ScreenClear,
    ];

    /// Timed modifier this pickup starts, if any
    pub fn effect(self) -> Option<Effect> {
        match self {
            PowerupKind::Overclock => Some(Effect::Overclock),
            PowerupKind::Flight => Some(Effect::Flight),
            PowerupKind::SlowMotion => Some(Effect::SlowMotion),
            PowerupKind::Magnet => Some(Effect::Magnet),
            PowerupKind::Shield | PowerupKind::ScreenClear => None,
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::Overclock => "OVERCLOCK",
            PowerupKind::Shield => "SHIELD",
            PowerupKind::Flight => "ROOT ACCESS",
            PowerupKind::SlowMotion => "LAG SWITCH",
            PowerupKind::Magnet => "MAGNET",
            PowerupKind::ScreenClear => "DEBUGGER",
        }
    }
}

/// Highest purchasable upgrade level
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Upgrade level per power-up (read-only during a run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeLevels(BTreeMap<PowerupKind, u8>);

impl UpgradeLevels {
    /// Level in 1..=MAX_UPGRADE_LEVEL; unknown or out-of-range entries clamp
    pub fn level(&self, kind: PowerupKind) -> u8 {
        self.0
            .get(&kind)
            .copied()
            .unwrap_or(1)
            .clamp(1, MAX_UPGRADE_LEVEL)
    }

    pub fn set(&mut self, kind: PowerupKind, level: u8) {
        self.0.insert(kind, level.clamp(1, MAX_UPGRADE_LEVEL));
    }
}

/// Passive abilities granted by the equipped module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub passive_magnet: bool,
    pub double_jump: bool,
    pub start_with_shield: bool,
    /// World accelerates at half rate
    pub time_dilation: bool,
    /// Flat score bonus
    pub score_hack: bool,
}

impl Capabilities {
    /// Map an equipped ability id to its capabilities (unknown ids grant none)
    pub fn from_ability(id: &str) -> Self {
        let mut caps = Self::default();
        match id {
            "ability_magnet" => caps.passive_magnet = true,
            "ability_double_jump" => caps.double_jump = true,
            "ability_shield_start" => caps.start_with_shield = true,
            "ability_time_dilation" => caps.time_dilation = true,
            "ability_score_hack" => caps.score_hack = true,
            "ability_none" => {}
            other => log::warn!("Unknown ability '{}', running without one", other),
        }
        caps
    }
}

/// Visible area of the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
        }
    }
}

impl Viewport {
    /// Screen y of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

/// Named simulation events for audio/VFX (fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    DoubleJump,
    Slide,
    Land,
    Collect,
    PowerupAcquired(PowerupKind),
    /// Shield absorbed a hit
    ShieldBreak,
    /// An extra life was spent; the profile must deduct one
    ExtraLifeUsed,
    /// Popup obstacle triggered screen spam
    Distraction,
    /// Overclock smashed through an obstacle
    ObstacleDeleted,
    ScreenCleared { count: u32 },
    /// Fatal collision, run is over
    Crash,
}

/// Remaining time of an active modifier, for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveModifier {
    pub kind: PowerupKind,
    /// Remaining fraction (1.0 = just started)
    pub progress: f32,
}

/// One point of the speed-over-distance chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub distance: u64,
    pub ratio: f32,
}

/// Externally visible run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Displayed distance (world units / 10)
    pub distance: u64,
    pub score: u64,
    /// Effective speed relative to the starting speed, one decimal
    pub speed_ratio: f32,
    pub bits_collected: u32,
    pub revives_left: u8,
    pub has_shield: bool,
    pub score_multiplier: f64,
    pub active: Vec<ActiveModifier>,
    pub speed_history: Vec<SpeedSample>,
}

/// What the profile receives when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub bits: u32,
    pub distance: u64,
}

/// Everything a run needs from the outside world
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub tuning: Tuning,
    pub capabilities: Capabilities,
    pub levels: UpgradeLevels,
    pub extra_lives: u8,
    pub view: Viewport,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed (for logging and reproduction)
    pub seed: u64,
    pub phase: GamePhase,
    pub view: Viewport,
    pub tuning: Tuning,
    pub caps: Capabilities,
    pub levels: UpgradeLevels,
    pub clock: Clock,
    pub schedule: SpawnSchedule,
    pub player: Player,
    pub modifiers: ModifierStack,
    pub entities: Registry,
    pub revives_left: u8,
    pub bits_collected: u32,
    /// Screen shake intensity (decays every tick)
    pub shake: f32,
    pub stats: RunStats,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    /// Input of the previous tick (for press edges)
    pub(crate) last_input: TickInput,
}

impl GameState {
    /// Create a run with default balance and no profile bonuses
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, RunConfig::default())
    }

    pub fn with_config(seed: u64, config: RunConfig) -> Self {
        let RunConfig {
            tuning,
            capabilities,
            levels,
            extra_lives,
            view,
        } = config;
        let tuning = tuning.sanitized();

        let player = Player {
            has_shield: capabilities.start_with_shield,
            ..Player::default()
        };

        let mut state = Self {
            seed,
            phase: GamePhase::Playing,
            view,
            clock: Clock::new(&tuning),
            schedule: SpawnSchedule::new(&tuning),
            tuning,
            caps: capabilities,
            levels,
            player,
            modifiers: ModifierStack::default(),
            entities: Registry::default(),
            revives_left: extra_lives,
            bits_collected: 0,
            shake: 0.0,
            stats: RunStats::default(),
            events: Vec::new(),
            last_input: TickInput::default(),
        };
        state.refresh_stats();
        log::info!(
            "Run started (seed {}, lives {}, shield {})",
            seed,
            extra_lives,
            state.player.has_shield
        );
        state
    }

    /// Screen y of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.view.ground_y()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.clock.score.floor() as u64,
            bits: self.bits_collected,
            distance: (self.clock.distance / 10.0).floor() as u64,
        }
    }

    /// End the run (idempotent)
    pub fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Crash);
        self.refresh_stats();
        let summary = self.summary();
        log::info!(
            "Run over: score {}, bits {}, distance {}",
            summary.score,
            summary.bits,
            summary.distance
        );
    }

    /// Project the externally visible statistics
    pub fn refresh_stats(&mut self) {
        let ratio = (self.clock.speed / self.tuning.base_speed.max(f32::EPSILON) * 10.0).round() / 10.0;

        if ratio != self.stats.speed_ratio && self.clock.ticks > 0 {
            self.stats.speed_history.push(SpeedSample {
                distance: self.stats.distance,
                ratio: self.stats.speed_ratio,
            });
        }

        let mut active: Vec<ActiveModifier> = Effect::ALL
            .iter()
            .filter_map(|&effect| {
                let timer = self.modifiers.timer(effect);
                timer.is_active().then(|| ActiveModifier {
                    kind: effect.powerup(),
                    progress: timer.progress(),
                })
            })
            .collect();
        if self.player.has_shield {
            active.push(ActiveModifier {
                kind: PowerupKind::Shield,
                progress: 1.0,
            });
        }

        self.stats.distance = (self.clock.distance / 10.0).floor() as u64;
        self.stats.score = self.clock.score.floor() as u64;
        self.stats.speed_ratio = ratio;
        self.stats.bits_collected = self.bits_collected;
        self.stats.revives_left = self.revives_left;
        self.stats.has_shield = self.player.has_shield;
        self.stats.score_multiplier = self.clock.score_multiplier;
        self.stats.active = active;
    }
}
