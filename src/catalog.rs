//! Shop catalog
//!
//! Static list of every purchasable item. Prices are in bits.

use serde::{Deserialize, Serialize};

use crate::sim::{MAX_UPGRADE_LEVEL, PowerupKind};

/// Shop tabs; the first five are also equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Characters,
    Themes,
    Skins,
    Audio,
    Abilities,
    Consumables,
}

/// Background palette of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub sky_start: &'static str,
    pub sky_end: &'static str,
    pub building: &'static str,
    pub ground: &'static str,
    pub grid: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub price: u64,
    pub description: &'static str,
    /// Skin color
    pub color: Option<&'static str>,
    pub palette: Option<ThemePalette>,
}

/// Id of the system-restore consumable
pub const RESTORE_ID: &str = "item_restore";
/// Most restores a profile can hold
pub const MAX_RESTORES: u8 = 5;
pub const UPGRADE_BASE_COST: u64 = 1000;

const fn item(
    id: &'static str,
    name: &'static str,
    category: Category,
    price: u64,
    description: &'static str,
) -> ShopItem {
    ShopItem {
        id,
        name,
        category,
        price,
        description,
        color: None,
        palette: None,
    }
}

const fn skin(id: &'static str, name: &'static str, color: &'static str, price: u64) -> ShopItem {
    ShopItem {
        id,
        name,
        category: Category::Skins,
        price,
        description: "",
        color: Some(color),
        palette: None,
    }
}

const fn theme(id: &'static str, name: &'static str, price: u64, palette: ThemePalette) -> ShopItem {
    ShopItem {
        id,
        name,
        category: Category::Themes,
        price,
        description: "",
        color: None,
        palette: Some(palette),
    }
}

pub const CATALOG: &[ShopItem] = &[
    // === Characters ===
    item("char_ninja", "CYBER NINJA", Category::Characters, 0, "Standard Runner Model."),
    item("char_bot", "GLITCH BOT", Category::Characters, 500, "Heavy duty chassis."),
    item("char_sphere", "DATA SPHERE", Category::Characters, 1000, "Pure energy form."),
    // === Themes ===
    theme(
        "theme_cyber",
        "NIGHT CITY",
        0,
        ThemePalette {
            sky_start: "#0a0515",
            sky_end: "#241235",
            building: "#1c0b2e",
            ground: "#151518",
            grid: "rgba(215, 40, 255, 0.05)",
        },
    ),
    theme(
        "theme_matrix",
        "THE SOURCE",
        300,
        ThemePalette {
            sky_start: "#000000",
            sky_end: "#022c02",
            building: "#001a00",
            ground: "#020617",
            grid: "rgba(34, 197, 94, 0.2)",
        },
    ),
    theme(
        "theme_retro",
        "SUNSET WAVE",
        600,
        ThemePalette {
            sky_start: "#2e1065",
            sky_end: "#f43f5e",
            building: "#4c1d95",
            ground: "#2e1065",
            grid: "rgba(244, 63, 94, 0.2)",
        },
    ),
    theme(
        "theme_mono",
        "MONOCHROME",
        800,
        ThemePalette {
            sky_start: "#000000",
            sky_end: "#1a1a1a",
            building: "#111111",
            ground: "#000000",
            grid: "rgba(255, 255, 255, 0.15)",
        },
    ),
    // === Skins ===
    skin("skin_cyan", "NEON CYAN", "#22d3ee", 0),
    skin("skin_magenta", "HOT MAGENTA", "#d946ef", 50),
    skin("skin_lime", "ACID LIME", "#a3e635", 150),
    skin("skin_orange", "PLASMA ORANGE", "#fb923c", 300),
    skin("skin_crimson", "CRIMSON GLITCH", "#f43f5e", 600),
    skin("skin_white", "GHOST", "#ffffff", 1000),
    // === Audio ===
    item("audio_cyber", "DEEP DIVE", Category::Audio, 0, "Standard Synthwave."),
    item("audio_chip", "8-BIT CRUNCH", Category::Audio, 400, "Retro chiptune sounds."),
    item("audio_dark", "VOID SIGNAL", Category::Audio, 800, "Heavy industrial bass."),
    // === Abilities ===
    item("ability_none", "NO MODULE", Category::Abilities, 0, "No active enhancements."),
    item("ability_magnet", "BIT MAGNET", Category::Abilities, 1500, "Passive: Attracts nearby data bits."),
    item("ability_double_jump", "AERO JETS", Category::Abilities, 2500, "Active: Press Jump in mid-air."),
    item(
        "ability_shield_start",
        "HARDENED KERNEL",
        Category::Abilities,
        3000,
        "Passive: Start every run with a Shield.",
    ),
    item(
        "ability_time_dilation",
        "CHRONO BRAKE",
        Category::Abilities,
        4000,
        "Passive: World accelerates 50% slower.",
    ),
    item(
        "ability_score_hack",
        "SCORE INJECTOR",
        Category::Abilities,
        5000,
        "Passive: +20% Score Multiplier.",
    ),
    // === Consumables ===
    item(
        RESTORE_ID,
        "SYSTEM RESTORE",
        Category::Consumables,
        1000,
        "Auto-revive on crash. One use per run.",
    ),
];

/// Look up an item by id
pub fn find(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}

/// Items of one category, in shop order
pub fn items_in(category: Category) -> impl Iterator<Item = &'static ShopItem> {
    CATALOG.iter().filter(move |item| item.category == category)
}

/// Free items every profile starts with
pub fn starter_items() -> impl Iterator<Item = &'static ShopItem> {
    CATALOG
        .iter()
        .filter(|item| item.price == 0 && item.category != Category::Consumables)
}

/// Cost of the next upgrade from `level`, `None` at the cap
pub fn upgrade_cost(level: u8) -> Option<u64> {
    (level < MAX_UPGRADE_LEVEL).then(|| UPGRADE_BASE_COST * u64::from(level.max(1)))
}

/// Shop text for a power-up upgrade
pub fn upgrade_description(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Overclock => "Increases duration of speed boost.",
        PowerupKind::Shield => "Increases recovery time after break.",
        PowerupKind::Flight => "Increases flight duration.",
        PowerupKind::SlowMotion => "Increases slow-motion duration.",
        PowerupKind::Magnet => "Increases magnet duration.",
        PowerupKind::ScreenClear => "Bonus score when clearing screen.",
    }
}

/// Shop line for a power-up at its current level, with the next price
pub fn upgrade_summary(kind: PowerupKind, level: u8) -> String {
    let next = match upgrade_cost(level) {
        Some(cost) => format!("NEXT {} BITS", cost),
        None => "MAXED".to_string(),
    };
    format!(
        "{} LV{}: {} {}",
        kind.label(),
        level,
        upgrade_description(kind),
        next
    )
}
