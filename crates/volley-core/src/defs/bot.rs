//! Target bot records.

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::item::{ItemDef, Resistances};

bitflags! {
    /// Innate immunities a bot can carry.
    ///
    /// Serde impls come from the `bitflags` serde feature.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Immunities: u8 {
        /// Immune to every critical effect.
        const CRITICALS = 1 << 0;
        /// Immune to core-targeting effects.
        const CORING = 1 << 1;
        /// Parts cannot be severed or blasted off.
        const DISMEMBERMENT = 1 << 2;
        /// Cannot be disrupted.
        const DISRUPTION = 1 << 3;
        /// Immune to meltdown criticals.
        const MELTDOWN = 1 << 4;
    }
}

/// Bot size class; larger bots are easier to hit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotSize {
    /// Tiny chassis, -30 accuracy.
    Tiny,
    /// Small chassis, -10 accuracy.
    Small,
    /// Medium chassis, no modifier.
    Medium,
    /// Large chassis, +10 accuracy.
    Large,
    /// Huge chassis, +30 accuracy.
    Huge,
}

impl BotSize {
    /// Accuracy bonus granted to attackers by this size class.
    #[must_use]
    pub fn accuracy_bonus(self) -> i32 {
        match self {
            Self::Tiny => -30,
            Self::Small => -10,
            Self::Medium => 0,
            Self::Large => 10,
            Self::Huge => 30,
        }
    }
}

/// Movement class of the bot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Moves on treads.
    Treading,
    /// Moves on legs.
    Walking,
    /// Moves on wheels.
    Rolling,
    /// Hovers.
    Hovering,
    /// Flies.
    Flying,
}

impl Movement {
    /// Airborne movement imposes a flat accuracy penalty on attackers.
    #[must_use]
    pub fn airborne(self) -> bool {
        matches!(self, Self::Hovering | Self::Flying)
    }
}

/// Combat behavior profile of the bot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Stands its ground and fights.
    StandFight,
    /// Fights, entering siege mode once its siege timer elapses.
    SiegeFight,
    /// Fights, already in siege mode from the first volley.
    AlreadySiegedFight,
    /// Already running when the fight starts.
    Running,
    /// Starts running once hit.
    RunWhenHit,
}

/// A fully-resolved target bot record.
///
/// Resistances are totals as recorded in the source data — they already
/// include the contributions of the bot's stock equipment, which is why
/// part destruction subtracts from (rather than recomputes) them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotDef {
    /// Bot name.
    pub name: String,
    /// Size class.
    pub size: BotSize,
    /// Movement class.
    pub movement: Movement,
    /// Movement speed; sub-100 speed grants evasion while running.
    pub speed: i32,
    /// Core integrity.
    pub core_integrity: i32,
    /// Core exposure weight in the coverage tables.
    pub core_coverage: i32,
    /// Core integrity regenerated per turn.
    pub core_regen: i32,
    /// Part integrity regenerated per turn.
    pub part_regen: i32,
    /// Whether destroyed parts periodically regrow on their own
    /// (superfortress-class bots).
    pub regrows_parts: bool,
    /// Low end of the matter salvage range.
    pub salvage_low: i32,
    /// High end of the matter salvage range.
    pub salvage_high: i32,
    /// Innate immunities.
    pub immunities: Immunities,
    /// Total resistances, equipment contributions included.
    pub resistances: Resistances,
    /// Equipped parts, in manifest order.
    pub parts: Vec<Arc<ItemDef>>,
}

impl BotDef {
    /// Creates a minimal medium walker with the given core stats.
    ///
    /// Intended for tests and ad-hoc scenarios; data-backed callers build
    /// the struct directly.
    #[must_use]
    pub fn new(name: impl Into<String>, core_integrity: i32, core_coverage: i32) -> Self {
        Self {
            name: name.into(),
            size: BotSize::Medium,
            movement: Movement::Walking,
            speed: 100,
            core_integrity,
            core_coverage,
            core_regen: 0,
            part_regen: 0,
            regrows_parts: false,
            salvage_low: 0,
            salvage_high: 0,
            immunities: Immunities::empty(),
            resistances: Resistances::new(),
            parts: Vec::new(),
        }
    }

    /// Adds a part to the manifest.
    #[must_use]
    pub fn with_part(mut self, part: Arc<ItemDef>) -> Self {
        self.parts.push(part);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bonuses_are_symmetric() {
        assert_eq!(BotSize::Tiny.accuracy_bonus(), -BotSize::Huge.accuracy_bonus());
        assert_eq!(BotSize::Small.accuracy_bonus(), -BotSize::Large.accuracy_bonus());
        assert_eq!(BotSize::Medium.accuracy_bonus(), 0);
    }

    #[test]
    fn airborne_classes() {
        assert!(Movement::Flying.airborne());
        assert!(Movement::Hovering.airborne());
        assert!(!Movement::Walking.airborne());
        assert!(!Movement::Treading.airborne());
    }

    #[test]
    fn immunities_roundtrip_serde() {
        let flags = Immunities::CRITICALS | Immunities::MELTDOWN;
        let json = serde_json::to_string(&flags).unwrap();
        let back: Immunities = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, back);
    }
}
