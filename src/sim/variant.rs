//! Obstacle variant table
//!
//! Each variant's footprint, vertical placement, lethality rule, guide pattern
//! and unlock tier live in one table so the spawner and the collision resolver
//! never branch on variant names directly.

use serde::{Deserialize, Serialize};

/// Closed set of obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleVariant {
    /// Ground spikes
    Spikes,
    /// Tall wall of corrupted glyphs
    Firewall,
    /// Low-flying drone
    Drone,
    /// High floating hazard
    Virus,
    /// Chasm in the ground
    Void,
    /// Popup window that spams the screen instead of hurting
    Popup,
    /// Ground crawler that moves faster than the world
    Crawler,
    /// Time-gated laser gate
    Laser,
}

/// How an obstacle is placed vertically relative to the ground line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Resting on the ground
    Ground,
    /// Floating with this much clearance between ground and its bottom edge
    Elevated(f32),
    /// A hole; its hazard strip is the last few pixels above the ground line
    Chasm,
}

/// What contact with the obstacle does before shields/lives are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lethality {
    /// Always hurts
    Solid,
    /// Only hurts a grounded player
    Chasm,
    /// Neutralizes itself and spams the screen
    Distraction,
    /// Only hurts while lit
    DutyCycle,
}

/// Collectible formations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternShape {
    Arc,
    Line,
    Wave,
    Diagonal,
}

/// A guide pattern spawned together with an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub shape: PatternShape,
    /// Start x relative to the right edge of the view
    pub x_offset: f32,
    /// Baseline height above the ground line
    pub lift: f32,
    pub count: usize,
}

/// Static description of a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSpec {
    pub variant: ObstacleVariant,
    pub width: f32,
    pub height: f32,
    pub placement: Placement,
    pub lethality: Lethality,
    pub guide: Option<Guide>,
    /// First difficulty tier the variant may appear in
    pub min_tier: u32,
    /// Extra leftward speed on top of the world scroll
    pub fast: bool,
}

const JUMP_ARC: Guide = Guide {
    shape: PatternShape::Arc,
    x_offset: -50.0,
    lift: 80.0,
    count: 5,
};

const HIGH_ARC: Guide = Guide {
    shape: PatternShape::Arc,
    x_offset: -60.0,
    lift: 110.0,
    count: 5,
};

const BRIDGE: Guide = Guide {
    shape: PatternShape::Line,
    x_offset: -20.0,
    lift: 80.0,
    count: 4,
};

const UNDERPASS: Guide = Guide {
    shape: PatternShape::Line,
    x_offset: 0.0,
    lift: 30.0,
    count: 4,
};

/// Variant table, in candidate order
pub const VARIANTS: [VariantSpec; 8] = [
    VariantSpec {
        variant: ObstacleVariant::Spikes,
        width: 60.0,
        height: 40.0,
        placement: Placement::Ground,
        lethality: Lethality::Solid,
        guide: Some(JUMP_ARC),
        min_tier: 0,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Virus,
        width: 50.0,
        height: 50.0,
        placement: Placement::Elevated(130.0),
        lethality: Lethality::Solid,
        guide: Some(UNDERPASS),
        min_tier: 0,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Drone,
        width: 70.0,
        height: 40.0,
        placement: Placement::Elevated(60.0),
        lethality: Lethality::Solid,
        guide: Some(UNDERPASS),
        min_tier: 1,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Firewall,
        width: 40.0,
        height: 90.0,
        placement: Placement::Ground,
        lethality: Lethality::Solid,
        guide: Some(HIGH_ARC),
        min_tier: 2,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Void,
        width: 120.0,
        height: 10.0,
        placement: Placement::Chasm,
        lethality: Lethality::Chasm,
        guide: Some(BRIDGE),
        min_tier: 3,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Crawler,
        width: 60.0,
        height: 40.0,
        placement: Placement::Ground,
        lethality: Lethality::Solid,
        guide: Some(JUMP_ARC),
        min_tier: 4,
        fast: true,
    },
    VariantSpec {
        variant: ObstacleVariant::Laser,
        width: 30.0,
        height: 100.0,
        placement: Placement::Ground,
        lethality: Lethality::DutyCycle,
        guide: Some(HIGH_ARC),
        min_tier: 5,
        fast: false,
    },
    VariantSpec {
        variant: ObstacleVariant::Popup,
        width: 50.0,
        height: 50.0,
        placement: Placement::Elevated(50.0),
        lethality: Lethality::Distraction,
        guide: None,
        min_tier: 1,
        fast: false,
    },
];

impl ObstacleVariant {
    /// Table entry for this variant
    pub fn spec(self) -> &'static VariantSpec {
        VARIANTS
            .iter()
            .find(|s| s.variant == self)
            .unwrap_or(&VARIANTS[0])
    }
}

impl VariantSpec {
    /// Top edge of the obstacle for a given ground line
    pub fn top(&self, ground_y: f32) -> f32 {
        match self.placement {
            Placement::Ground | Placement::Chasm => ground_y - self.height,
            Placement::Elevated(clearance) => ground_y - clearance - self.height,
        }
    }
}

/// Variants eligible at a tier, in table order
pub fn candidates(tier: u32) -> impl Iterator<Item = &'static VariantSpec> {
    VARIANTS.iter().filter(move |s| s.min_tier <= tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_grow_with_tier() {
        let mut last = 0;
        for tier in 0..=5 {
            let count = candidates(tier).count();
            assert!(count >= last, "tier {} shrank the candidate list", tier);
            last = count;
        }
        assert_eq!(candidates(0).count(), 2);
        assert_eq!(candidates(5).count(), VARIANTS.len());
    }

    #[test]
    fn test_every_variant_has_a_table_entry() {
        let all = [
            ObstacleVariant::Spikes,
            ObstacleVariant::Firewall,
            ObstacleVariant::Drone,
            ObstacleVariant::Virus,
            ObstacleVariant::Void,
            ObstacleVariant::Popup,
            ObstacleVariant::Crawler,
            ObstacleVariant::Laser,
        ];
        for v in all {
            assert_eq!(v.spec().variant, v);
        }
    }

    #[test]
    fn test_placement() {
        let ground = 620.0;
        assert_eq!(ObstacleVariant::Spikes.spec().top(ground), 580.0);
        assert_eq!(ObstacleVariant::Drone.spec().top(ground), 520.0);
        assert_eq!(ObstacleVariant::Virus.spec().top(ground), 440.0);
        assert_eq!(ObstacleVariant::Popup.spec().top(ground), 520.0);
        assert_eq!(ObstacleVariant::Void.spec().top(ground), ground - 10.0);
    }

    #[test]
    fn test_only_void_is_a_chasm() {
        let chasms: Vec<_> = VARIANTS
            .iter()
            .filter(|s| s.lethality == Lethality::Chasm)
            .map(|s| s.variant)
            .collect();
        assert_eq!(chasms, vec![ObstacleVariant::Void]);
    }
}
