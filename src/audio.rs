//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The event → effect mapping is platform independent; playback is wasm only.

use crate::profile::PurchaseOutcome;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Slide,
    /// Bit collected
    Collect,
    /// Pickup collected or life restored
    Powerup,
    /// Shield broken or run over
    Crash,
    /// Shop purchase / equip
    Buy,
    /// Denied purchase, popup spam
    Error,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump | GameEvent::DoubleJump => Some(SoundEffect::Jump),
            GameEvent::Slide => Some(SoundEffect::Slide),
            GameEvent::Collect => Some(SoundEffect::Collect),
            GameEvent::PowerupAcquired(_) | GameEvent::ExtraLifeUsed => Some(SoundEffect::Powerup),
            GameEvent::ShieldBreak | GameEvent::Crash => Some(SoundEffect::Crash),
            GameEvent::Distraction => Some(SoundEffect::Error),
            GameEvent::Land | GameEvent::ObstacleDeleted | GameEvent::ScreenCleared { .. } => None,
        }
    }

    /// Feedback for a shop action
    pub fn for_purchase(outcome: PurchaseOutcome) -> Self {
        if outcome.is_success() {
            SoundEffect::Buy
        } else {
            SoundEffect::Error
        }
    }
}

/// Sound pack selected by the equipped audio item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundPack {
    /// Standard synthwave
    #[default]
    Cyber,
    /// Chiptune
    Chip,
    /// Industrial bass
    Dark,
}

impl SoundPack {
    /// Map an audio item id; unknown ids keep the default pack
    pub fn from_id(id: &str) -> Self {
        match id {
            "audio_chip" => SoundPack::Chip,
            "audio_dark" => SoundPack::Dark,
            "audio_cyber" => SoundPack::Cyber,
            other => {
                log::warn!("Unknown sound pack '{}', using default", other);
                SoundPack::Cyber
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundPack};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        pack: SoundPack,
        gain: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                pack: SoundPack::default(),
                gain: Settings::default().effect_gain(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_pack(&mut self, pack: SoundPack) {
            self.pack = pack;
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.gain = settings.effect_gain();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.gain;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_jump(ctx, vol),
                SoundEffect::Slide => self.play_slide(ctx, vol),
                SoundEffect::Collect => self.play_collect(ctx, vol),
                SoundEffect::Powerup => self.play_powerup(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Buy => self.play_buy(ctx, vol),
                SoundEffect::Error => self.play_error(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Jump - rising square chirp
        fn play_jump(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            if self.pack == SoundPack::Chip {
                osc.frequency().set_value_at_time(300.0, t).ok();
                osc.frequency().linear_ramp_to_value_at_time(600.0, t + 0.1).ok();
            } else {
                osc.frequency().set_value_at_time(150.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(600.0, t + 0.1)
                    .ok();
            }
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Slide - falling sawtooth scrape
        fn play_slide(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency().linear_ramp_to_value_at_time(50.0, t + 0.2).ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.2).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Collect - two-step blip (lower in the dark pack)
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            let (first, second, step) = match self.pack {
                SoundPack::Dark => (400.0, 800.0, 0.1),
                SoundPack::Cyber | SoundPack::Chip => (1200.0, 1800.0, 0.05),
            };
            osc.frequency().set_value_at_time(first, t).ok();
            osc.frequency().set_value_at_time(second, t + step).ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Powerup - rising major arpeggio
        fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency().set_value_at_time(554.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(659.0, t + 0.2).ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.4).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        /// Crash - collapsing sawtooth
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(10.0, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        /// Buy - bright octave sweep
        fn play_buy(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1760.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Error - low buzz
        fn play_error(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency().linear_ramp_to_value_at_time(100.0, t + 0.15).ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.15).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }
}
