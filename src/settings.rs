//! Game settings and preferences
//!
//! Persisted separately from the profile in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Particle bursts and floating texts
    pub particles: bool,
    /// Popup spam overlay when a popup is hit
    pub popup_overlay: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake and flashing overlays)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Visual effects - all on by default
            screen_shake: true,
            particles: true,
            popup_overlay: true,

            // HUD
            show_fps: false,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective popup overlay (respects reduced_motion)
    pub fn effective_popup_overlay(&self) -> bool {
        self.popup_overlay && !self.reduced_motion
    }

    /// Gain applied to sound effects
    pub fn effect_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Flip the mute flag, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "glitch_runner_settings";

    /// Load settings from LocalStorage
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_overrides() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_popup_overlay());
    }

    #[test]
    fn test_mute_silences_effects() {
        let mut settings = Settings::default();
        assert!((settings.effect_gain() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effect_gain(), 0.0);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert!(settings.particles);
    }

    #[test]
    fn test_toggle_mute() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert_eq!(settings.effect_gain(), 0.0);
        assert!(!settings.toggle_mute());
        assert!(settings.effect_gain() > 0.0);
    }
}
