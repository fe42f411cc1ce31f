//! Persistent player profile
//!
//! Currency, best score, unlocked and equipped items, consumables and upgrade
//! levels. Persisted to LocalStorage as one JSON document; malformed or
//! missing data falls back to a fresh profile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Category, MAX_RESTORES, RESTORE_ID};
use crate::platform::storage;
use crate::sim::{Capabilities, PowerupKind, RunConfig, RunSummary, UpgradeLevels};
use crate::tuning::Tuning;

/// Equipped item per slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipped {
    pub character: String,
    pub theme: String,
    pub skin: String,
    pub audio: String,
    pub ability: String,
}

impl Default for Equipped {
    fn default() -> Self {
        Self {
            character: "char_ninja".into(),
            theme: "theme_cyber".into(),
            skin: "skin_cyan".into(),
            audio: "audio_cyber".into(),
            ability: "ability_none".into(),
        }
    }
}

impl Equipped {
    fn slot_mut(&mut self, category: Category) -> Option<&mut String> {
        match category {
            Category::Characters => Some(&mut self.character),
            Category::Themes => Some(&mut self.theme),
            Category::Skins => Some(&mut self.skin),
            Category::Audio => Some(&mut self.audio),
            Category::Abilities => Some(&mut self.ability),
            Category::Consumables => None,
        }
    }
}

/// Result of a shop action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased,
    Equipped,
    Upgraded { level: u8 },
    InsufficientBits,
    AlreadyOwned,
    /// Consumable stack or upgrade level is full
    AtLimit,
    /// Equipping something not unlocked
    Locked,
    UnknownItem,
}

impl PurchaseOutcome {
    pub fn is_success(self) -> bool {
        matches!(
            self,
            PurchaseOutcome::Purchased | PurchaseOutcome::Equipped | PurchaseOutcome::Upgraded { .. }
        )
    }
}

/// Persisted player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Spendable currency
    pub total_bits: u64,
    pub high_score: u64,
    pub equipped: Equipped,
    pub unlocked: BTreeSet<String>,
    /// System restores held (extra lives per run)
    pub system_restore: u8,
    pub powerup_levels: UpgradeLevels,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            total_bits: 0,
            high_score: 0,
            equipped: Equipped::default(),
            unlocked: catalog::starter_items().map(|i| i.id.to_string()).collect(),
            system_restore: 0,
            powerup_levels: UpgradeLevels::default(),
        }
    }
}

impl Profile {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "glitch_runner_profile";

    /// Parse a stored profile, falling back to a fresh one
    pub fn from_json(json: &str) -> Self {
        storage::parse_json::<Profile>(Self::STORAGE_KEY, json)
            .map(Profile::repaired)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Restore invariants a hand-edited or older save may break
    fn repaired(mut self) -> Self {
        for item in catalog::starter_items() {
            self.unlocked.insert(item.id.to_string());
        }
        self.system_restore = self.system_restore.min(MAX_RESTORES);

        let defaults = Equipped::default();
        let unlocked = &self.unlocked;
        let fix = |slot: &mut String, fallback: &String| {
            if !unlocked.contains(slot.as_str()) {
                log::warn!("Equipped '{}' is not unlocked, reverting to '{}'", slot, fallback);
                *slot = fallback.clone();
            }
        };
        let eq = &mut self.equipped;
        fix(&mut eq.character, &defaults.character);
        fix(&mut eq.theme, &defaults.theme);
        fix(&mut eq.skin, &defaults.skin);
        fix(&mut eq.audio, &defaults.audio);
        fix(&mut eq.ability, &defaults.ability);
        self
    }

    /// Load the profile from LocalStorage (defaults if absent or malformed)
    pub fn load() -> Self {
        match storage::load_json::<Profile>(Self::STORAGE_KEY) {
            Some(profile) => {
                let profile = profile.repaired();
                log::info!(
                    "Loaded profile ({} bits, high score {})",
                    profile.total_bits,
                    profile.high_score
                );
                profile
            }
            None => {
                log::info!("No saved profile, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::debug!("Profile saved");
        }
    }

    /// Everything a new run needs from the profile
    pub fn run_config(&self, tuning: Tuning) -> RunConfig {
        RunConfig {
            tuning,
            capabilities: Capabilities::from_ability(&self.equipped.ability),
            levels: self.powerup_levels.clone(),
            extra_lives: self.system_restore,
            ..Default::default()
        }
    }

    /// Bank a finished run. Returns true on a new high score.
    pub fn record_run(&mut self, summary: &RunSummary) -> bool {
        self.total_bits += u64::from(summary.bits);
        let best = summary.score > self.high_score;
        if best {
            self.high_score = summary.score;
        }
        log::info!(
            "Run banked: +{} bits (total {}){}",
            summary.bits,
            self.total_bits,
            if best { ", new high score" } else { "" }
        );
        best
    }

    /// One restore was spent during a run
    pub fn consume_restore(&mut self) {
        self.system_restore = self.system_restore.saturating_sub(1);
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    fn spend(&mut self, price: u64) -> bool {
        if self.total_bits < price {
            return false;
        }
        self.total_bits -= price;
        true
    }

    /// Buy a catalog item (unlock or consumable)
    pub fn purchase(&mut self, id: &str) -> PurchaseOutcome {
        let Some(item) = catalog::find(id) else {
            log::warn!("Unknown shop item '{}'", id);
            return PurchaseOutcome::UnknownItem;
        };

        let outcome = if item.id == RESTORE_ID {
            if self.system_restore >= MAX_RESTORES {
                PurchaseOutcome::AtLimit
            } else if !self.spend(item.price) {
                PurchaseOutcome::InsufficientBits
            } else {
                self.system_restore += 1;
                PurchaseOutcome::Purchased
            }
        } else if self.is_unlocked(id) {
            PurchaseOutcome::AlreadyOwned
        } else if !self.spend(item.price) {
            PurchaseOutcome::InsufficientBits
        } else {
            self.unlocked.insert(id.to_string());
            PurchaseOutcome::Purchased
        };

        log::info!("Purchase '{}': {:?}", id, outcome);
        outcome
    }

    /// Raise a power-up's upgrade level by one
    pub fn upgrade(&mut self, kind: PowerupKind) -> PurchaseOutcome {
        let level = self.powerup_levels.level(kind);
        let outcome = match catalog::upgrade_cost(level) {
            None => PurchaseOutcome::AtLimit,
            Some(cost) if !self.spend(cost) => PurchaseOutcome::InsufficientBits,
            Some(_) => {
                self.powerup_levels.set(kind, level + 1);
                PurchaseOutcome::Upgraded { level: level + 1 }
            }
        };
        log::info!("Upgrade {:?}: {:?}", kind, outcome);
        outcome
    }

    /// Equip an unlocked item into its slot
    pub fn equip(&mut self, id: &str) -> PurchaseOutcome {
        let Some(item) = catalog::find(id) else {
            return PurchaseOutcome::UnknownItem;
        };
        if !self.is_unlocked(id) {
            return PurchaseOutcome::Locked;
        }
        match self.equipped.slot_mut(item.category) {
            Some(slot) => {
                *slot = id.to_string();
                PurchaseOutcome::Equipped
            }
            None => PurchaseOutcome::UnknownItem,
        }
    }

    /// Color of the equipped skin
    pub fn skin_color(&self) -> &'static str {
        catalog::find(&self.equipped.skin)
            .and_then(|i| i.color)
            .unwrap_or("#22d3ee")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich() -> Profile {
        Profile {
            total_bits: 10_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_profile_owns_starters() {
        let profile = Profile::default();
        assert!(profile.is_unlocked("char_ninja"));
        assert!(profile.is_unlocked("ability_none"));
        assert!(!profile.is_unlocked("item_restore"));
        assert_eq!(profile.run_config(Tuning::default()).extra_lives, 0);
    }

    #[test]
    fn test_purchase_and_equip() {
        let mut profile = rich();
        assert_eq!(profile.equip("ability_double_jump"), PurchaseOutcome::Locked);
        assert_eq!(profile.purchase("ability_double_jump"), PurchaseOutcome::Purchased);
        assert_eq!(profile.total_bits, 7_500);
        assert_eq!(profile.purchase("ability_double_jump"), PurchaseOutcome::AlreadyOwned);
        assert_eq!(profile.equip("ability_double_jump"), PurchaseOutcome::Equipped);
        assert!(profile.run_config(Tuning::default()).capabilities.double_jump);
    }

    #[test]
    fn test_purchase_denied_without_bits() {
        let mut profile = Profile::default();
        assert_eq!(profile.purchase("skin_white"), PurchaseOutcome::InsufficientBits);
        assert_eq!(profile.total_bits, 0);
        assert!(!profile.is_unlocked("skin_white"));
        assert_eq!(profile.purchase("skin_plaid"), PurchaseOutcome::UnknownItem);
    }

    #[test]
    fn test_restore_stack_limit() {
        let mut profile = rich();
        for _ in 0..MAX_RESTORES {
            assert_eq!(profile.purchase(RESTORE_ID), PurchaseOutcome::Purchased);
        }
        assert_eq!(profile.purchase(RESTORE_ID), PurchaseOutcome::AtLimit);
        assert_eq!(profile.system_restore, MAX_RESTORES);
        assert_eq!(profile.total_bits, 5_000);

        profile.consume_restore();
        assert_eq!(profile.system_restore, MAX_RESTORES - 1);
    }

    #[test]
    fn test_upgrade_costs_and_cap() {
        let mut profile = rich();
        assert_eq!(profile.upgrade(PowerupKind::Magnet), PurchaseOutcome::Upgraded { level: 2 });
        assert_eq!(profile.upgrade(PowerupKind::Magnet), PurchaseOutcome::Upgraded { level: 3 });
        assert_eq!(profile.upgrade(PowerupKind::Magnet), PurchaseOutcome::Upgraded { level: 4 });
        assert_eq!(profile.total_bits, 10_000 - 1_000 - 2_000 - 3_000);
        assert_eq!(profile.upgrade(PowerupKind::Magnet), PurchaseOutcome::Upgraded { level: 5 });
        assert_eq!(profile.upgrade(PowerupKind::Magnet), PurchaseOutcome::AtLimit);
        assert_eq!(profile.total_bits, 0);
    }

    #[test]
    fn test_record_run() {
        let mut profile = Profile::default();
        let run = RunSummary {
            score: 1200,
            bits: 40,
            distance: 900,
        };
        assert!(profile.record_run(&run));
        assert!(!profile.record_run(&RunSummary { score: 800, ..run }));
        assert_eq!(profile.high_score, 1200);
        assert_eq!(profile.total_bits, 80);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Profile::from_json("not json"), Profile::default());
    }

    #[test]
    fn test_repair_equipped_locked_item() {
        let profile = Profile::from_json(
            r#"{ "total_bits": 5, "equipped": { "skin": "skin_white" }, "system_restore": 9 }"#,
        );
        assert_eq!(profile.total_bits, 5);
        assert_eq!(profile.equipped.skin, "skin_cyan");
        assert_eq!(profile.system_restore, MAX_RESTORES);
        assert!(profile.is_unlocked("theme_cyber"));
    }

    #[test]
    fn test_json_round_trip_keeps_levels() {
        let mut profile = rich();
        profile.upgrade(PowerupKind::Flight);
        let json = profile.to_json().unwrap();
        let back = Profile::from_json(&json);
        assert_eq!(back.powerup_levels.level(PowerupKind::Flight), 2);
        assert_eq!(back, profile);
    }
}
