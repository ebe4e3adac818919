//! Equippable item records and the part capability union.
//!
//! A [`ItemDef`] describes one equippable part of the target bot: its slot,
//! kind, size, integrity, hit coverage, and at most one special capability
//! ([`SpecialEffect`]). Capabilities form a closed tagged union
//! ([`PartEffect`]) keyed by kind — the defensive-state compiler dispatches
//! on the variant, never on item names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Damage types an attack or explosion can carry.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DamageType {
    /// Corrupting energy damage; drives the corruption accumulator.
    Electromagnetic,
    /// Decay damage used for internal destruction effects.
    Entropic,
    /// Area damage; resolved in multiple chunks.
    Explosive,
    /// Blunt melee damage; targets by part size rather than coverage.
    Impact,
    /// Standard ballistic damage.
    Kinetic,
    /// Damage dealt by phasing critical effects.
    Phasic,
    /// Armor-piercing melee damage; gains extra core exposure.
    Piercing,
    /// Edged melee damage.
    Slashing,
    /// Heat damage.
    Thermal,
}

/// Per-damage-type resistance percentages.
///
/// Only the types present in the map count as resisted; absence and a 0%
/// entry behave identically for damage math but differently for the
/// part-destruction bookkeeping, which only adjusts types the bot already
/// tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resistances(pub BTreeMap<DamageType, i32>);

impl Resistances {
    /// An empty resistance table.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Single-type resistance table.
    #[must_use]
    pub fn single(ty: DamageType, percent: i32) -> Self {
        let mut map = BTreeMap::new();
        map.insert(ty, percent);
        Self(map)
    }

    /// Applies this table to a damage amount, truncating toward zero.
    #[must_use]
    pub fn resist(&self, ty: DamageType, damage: i32) -> i32 {
        match self.0.get(&ty) {
            Some(percent) => {
                (f64::from(damage) * (1.0 - f64::from(*percent) / 100.0)).trunc() as i32
            }
            None => damage,
        }
    }

    /// Adds another table's entries onto the types already tracked here.
    ///
    /// Types this table does not track are ignored, mirroring how bot
    /// records already fold their equipment's resistances into the totals.
    pub fn absorb(&mut self, other: &Resistances) {
        for (ty, percent) in &other.0 {
            if let Some(existing) = self.0.get_mut(ty) {
                *existing += percent;
            }
        }
    }

    /// Removes another table's entries from the types tracked here.
    pub fn shed(&mut self, other: &Resistances) {
        for (ty, percent) in &other.0 {
            if let Some(existing) = self.0.get_mut(ty) {
                *existing -= percent;
            }
        }
    }
}

/// Slot an item occupies on the bot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Power sources; destroying one may chain into an engine explosion.
    Power,
    /// Propulsion (treads, legs, wheels, hover/flight units).
    Propulsion,
    /// Utilities.
    Utility,
    /// Weapons.
    Weapon,
}

/// Target of a shielding capability: an item slot, or the core itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShieldSlot {
    /// The bot's core.
    Core,
    /// Power-slot parts.
    Power,
    /// Propulsion-slot parts.
    Propulsion,
    /// Utility-slot parts.
    Utility,
    /// Weapon-slot parts.
    Weapon,
}

impl ShieldSlot {
    /// Number of shielding categories; sizes the per-slot shield lists.
    pub const COUNT: usize = 5;

    /// Dense index for per-slot storage.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Core => 0,
            Self::Power => 1,
            Self::Propulsion => 2,
            Self::Utility => 3,
            Self::Weapon => 4,
        }
    }
}

impl From<Slot> for ShieldSlot {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Power => Self::Power,
            Slot::Propulsion => Self::Propulsion,
            Slot::Utility => Self::Utility,
            Slot::Weapon => Self::Weapon,
        }
    }
}

/// Kind classification for equippable items.
///
/// Only the kinds the engine dispatches on are distinguished; everything
/// else is [`ItemKind::Device`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Generic utility or structural item.
    Device,
    /// Power-slot engine.
    Engine,
    /// Hackware; destroyed outright when removed by a critical.
    Hackware,
    /// Leg propulsion; relevant to running accuracy penalties.
    Leg,
    /// Processor; destroyed outright when removed by a critical.
    Processor,
    /// Armor plating; protection soaks overflow and resists criticals.
    Protection,
    /// Treads; may support siege mode and doubled siege coverage.
    Treads,
}

/// Siege mode class granted by siege-capable treads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiegeMode {
    /// Standard siege mode.
    Standard,
    /// High siege mode.
    High,
}

/// Spectrum rating: chance for a hit to chain-detonate an engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spectrum {
    /// 10% engine detonation chance.
    Wide,
    /// 30% engine detonation chance.
    Intermediate,
    /// 50% engine detonation chance.
    Narrow,
    /// 100% engine detonation chance.
    Fine,
}

impl Spectrum {
    /// Detonation chance as a percentage.
    #[must_use]
    pub fn chance(self) -> i32 {
        match self {
            Self::Wide => 10,
            Self::Intermediate => 30,
            Self::Narrow => 50,
            Self::Fine => 100,
        }
    }
}

/// Critical effect kinds a weapon can inflict.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Critical {
    /// Damages a part, then blows single-slot parts clean off.
    Blast,
    /// No distinct combat effect.
    Burn,
    /// Pins the corruption multiplier at its 1.5 maximum.
    Corrupt,
    /// Instantly zeroes the target's integrity.
    Destroy,
    /// Detonates the first power source found.
    Detonate,
    /// Doubles damage and costs the defender a full turn.
    Impale,
    /// Doubles damage.
    Intensify,
    /// Instant kill.
    Meltdown,
    /// Redirects the damage through to a different target.
    Phase,
    /// Severs one part outright.
    Sever,
    /// Like Destroy, but the full undealt damage overflows onward.
    Smash,
    /// Severs one or two parts outright.
    Sunder,
}

impl fmt::Display for Critical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// When a part's special capability applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectActivation {
    /// Applies for as long as the part is equipped, even at zero integrity.
    Always,
    /// Applies only while the part has integrity remaining.
    WhileActive,
}

/// The closed capability union for special parts.
///
/// Exactly one capability per part. The defensive-state compiler sorts
/// these into its category lists; resistances and self-reduction merge onto
/// the part itself instead of being listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartEffect {
    /// Chance to shoot down an incoming missile, rolled once per tile.
    Antimissile {
        /// Intercept chance per tile, percent.
        chance: i32,
    },
    /// Flat accuracy penalty applied to all incoming weapons.
    Avoidance {
        /// Penalty while the bot moves on legs.
        legs: i32,
        /// Penalty for any other movement.
        other: i32,
    },
    /// Chance to ignore an incoming corruption addition entirely.
    CorruptionIgnore {
        /// Ignore chance, percent.
        chance: i32,
    },
    /// Burns own integrity (2 per point) to prevent corruption.
    CorruptionPrevent,
    /// Reduces the bot's effective corruption reading.
    CorruptionReduce {
        /// Amount subtracted from the effective corruption.
        amount: i32,
    },
    /// Suppresses all critical effects against the bot.
    CriticalImmunity,
    /// Force-field style damage reduction.
    DamageReduction {
        /// Damage multiplier; 0.75 means 25% reduction.
        multiplier: f64,
        /// Remote projectors reduce differently from worn fields.
        remote: bool,
    },
    /// Flat resistances contributed while equipped.
    Resists(Resistances),
    /// Accuracy penalty applied only to ranged weapons.
    RangedAvoid {
        /// Penalty, percent.
        avoid: i32,
    },
    /// Reduces damage dealt to this part itself (powered armor).
    SelfShielding {
        /// Damage multiplier applied to incoming hits on this part.
        multiplier: f64,
    },
    /// Absorbs a fraction of damage aimed at a slot (or the core).
    SlotShielding {
        /// Which slot the shield covers.
        slot: ShieldSlot,
        /// Fraction of incoming damage absorbed.
        fraction: f64,
    },
}

/// A part capability with its activation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEffect {
    /// When the capability counts as active.
    pub activation: EffectActivation,
    /// The capability itself.
    pub effect: PartEffect,
}

/// Explosion profile for power-slot items.
///
/// Destroying such a part chains a secondary explosion back through the
/// damage engine and awards salvage immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineExplosion {
    /// Minimum explosion damage.
    pub damage_min: i32,
    /// Maximum explosion damage.
    pub damage_max: i32,
    /// Damage type of the explosion.
    pub damage_type: DamageType,
    /// Minimum number of damage chunks.
    pub chunks_min: i32,
    /// Maximum number of damage chunks.
    pub chunks_max: i32,
    /// Disruption chance carried by each chunk.
    pub disruption: i32,
    /// Spectrum of the explosion, for further chaining.
    pub spectrum: Option<Spectrum>,
    /// Salvage awarded when the engine goes up.
    pub salvage: i32,
}

/// A fully-resolved equippable item record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Item name; stable identifier within a data set.
    pub name: String,
    /// Slot the item occupies.
    pub slot: Slot,
    /// Kind classification.
    pub kind: ItemKind,
    /// Number of slots occupied; multi-slot parts resist sever effects.
    pub size: i32,
    /// Maximum integrity.
    pub integrity: i32,
    /// Relative hit-coverage weight.
    pub coverage: i32,
    /// Siege capability, for treads.
    pub siege: Option<SiegeMode>,
    /// Special capability, if any.
    pub special: Option<SpecialEffect>,
    /// Engine explosion profile, for power items.
    pub explosion: Option<EngineExplosion>,
}

impl ItemDef {
    /// Creates a plain item with no special capability.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        slot: Slot,
        kind: ItemKind,
        size: i32,
        integrity: i32,
        coverage: i32,
    ) -> Self {
        Self {
            name: name.into(),
            slot,
            kind,
            size,
            integrity,
            coverage,
            siege: None,
            special: None,
            explosion: None,
        }
    }

    /// Attaches a capability active only while the part has integrity.
    #[must_use]
    pub fn with_effect(mut self, effect: PartEffect) -> Self {
        self.special = Some(SpecialEffect {
            activation: EffectActivation::WhileActive,
            effect,
        });
        self
    }

    /// Attaches a siege capability.
    #[must_use]
    pub fn with_siege(mut self, mode: SiegeMode) -> Self {
        self.siege = Some(mode);
        self
    }

    /// Attaches an engine explosion profile.
    #[must_use]
    pub fn with_explosion(mut self, explosion: EngineExplosion) -> Self {
        self.explosion = Some(explosion);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resist_truncates_toward_zero() {
        let resists = Resistances::single(DamageType::Kinetic, 25);
        assert_eq!(resists.resist(DamageType::Kinetic, 10), 7);
        assert_eq!(resists.resist(DamageType::Thermal, 10), 10);
    }

    #[test]
    fn absorb_only_touches_tracked_types() {
        let mut base = Resistances::single(DamageType::Electromagnetic, 20);
        let part = {
            let mut map = BTreeMap::new();
            map.insert(DamageType::Electromagnetic, 25);
            map.insert(DamageType::Kinetic, 30);
            Resistances(map)
        };
        base.absorb(&part);
        assert_eq!(base.0.get(&DamageType::Electromagnetic), Some(&45));
        assert_eq!(base.0.get(&DamageType::Kinetic), None);
    }

    #[test]
    fn shed_reverses_absorb() {
        let mut base = Resistances::single(DamageType::Thermal, 30);
        let part = Resistances::single(DamageType::Thermal, 10);
        base.absorb(&part);
        base.shed(&part);
        assert_eq!(base, Resistances::single(DamageType::Thermal, 30));
    }

    #[test]
    fn spectrum_chances() {
        assert_eq!(Spectrum::Wide.chance(), 10);
        assert_eq!(Spectrum::Fine.chance(), 100);
    }

    #[test]
    fn item_defs_are_serializable() {
        let item = ItemDef::new("Shield Generator", Slot::Utility, ItemKind::Device, 1, 60, 40)
            .with_effect(PartEffect::DamageReduction {
                multiplier: 0.75,
                remote: false,
            });
        let json = serde_json::to_string(&item).unwrap();
        let back: ItemDef = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
