//! Derived defensive capability state.
//!
//! [`Defenses`] is compiled from the currently-equipped parts and is never
//! persisted: any event that drops a part's integrity to zero (or restores
//! a destroyed part) invalidates it, and callers recompile. Within a
//! compilation, each category is an ordered list consulted front-first;
//! spent entries are discarded lazily when next consulted
//! ([`front_active`]).

use std::collections::VecDeque;

use crate::defs::{EffectActivation, PartEffect, ShieldSlot};
use serde::{Deserialize, Serialize};

use super::part::{Part, PartId};

/// Battlefield-wide damage reduction effects imposed from outside the bot,
/// e.g. a nearby shield projector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalReduction {
    /// Remote shield projection, 25% reduction.
    RemoteShield,
    /// Active stasis trap, 25% reduction.
    StasisTrap,
    /// Phase wall, 50% reduction.
    PhaseWall,
    /// Remote force field projection, 50% reduction.
    RemoteForceField,
    /// Stasis bubble, 50% reduction.
    StasisBubble,
}

impl ExternalReduction {
    /// Damage multiplier of the effect.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::RemoteShield | Self::StasisTrap => 0.75,
            Self::PhaseWall | Self::RemoteForceField | Self::StasisBubble => 0.5,
        }
    }

    /// Whether the effect reduces remotely (affects how the reduction is
    /// applied to each chunk).
    #[must_use]
    pub fn remote(self) -> bool {
        matches!(self, Self::RemoteShield | Self::RemoteForceField)
    }

    /// Canonical effect name, used for priority ordering.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RemoteShield => "Remote Shield",
            Self::StasisTrap => "Stasis Trap",
            Self::PhaseWall => "Phase Wall",
            Self::RemoteForceField => "Remote Force Field",
            Self::StasisBubble => "Stasis Bubble",
        }
    }
}

/// Total order over named damage-reduction effects.
///
/// Only the first applicable defense on this list is consulted for a hit;
/// position here, not list insertion order, decides which one that is when
/// an external effect joins a part-provided one.
const REDUCTION_PRIORITY: [&str; 20] = [
    "Phase Wall",
    "Vortex Field Projector",
    "7V-RTL'S Ultimate Field",
    "Force Field",
    "Imp. Force Field",
    "Adv. Force Field",
    "Exp. Force Field",
    "Shield Generator",
    "Imp. Shield Generator",
    "Adv. Shield Generator",
    "Exp. Shield Generator",
    "Stasis Bubble",
    "Stasis Trap",
    "Remote Shield",
    "Imp. Remote Shield",
    "Remote Force Field",
    "Imp. Remote Force Field",
    "Energy Mantle",
    "Imp. Energy Mantle",
    "AEGIS Remote Shield",
];

fn reduction_priority(name: &str) -> i32 {
    REDUCTION_PRIORITY
        .iter()
        .position(|entry| *entry == name)
        .map_or(-1, |i| i32::try_from(i).unwrap_or(-1))
}

/// Antimissile or corruption-ignore entry: a part and a percent chance.
#[derive(Debug, Clone)]
pub struct ChanceEntry {
    /// Providing part.
    pub part: PartId,
    /// Chance, percent.
    pub chance: i32,
}

/// Avoidance entry with separate legged/other penalties.
#[derive(Debug, Clone)]
pub struct AvoidEntry {
    /// Providing part.
    pub part: PartId,
    /// Accuracy penalty while the bot walks on legs.
    pub legs: i32,
    /// Accuracy penalty otherwise.
    pub other: i32,
}

/// Entry carrying a flat amount (corruption reduction, ranged avoidance).
#[derive(Debug, Clone)]
pub struct AmountEntry {
    /// Providing part.
    pub part: PartId,
    /// The amount.
    pub amount: i32,
}

/// Marker entry: the part's presence is the capability.
#[derive(Debug, Clone)]
pub struct MarkerEntry {
    /// Providing part.
    pub part: PartId,
}

/// Damage-reduction stack entry.
///
/// External battlefield effects have no backing part and never deplete.
#[derive(Debug, Clone)]
pub struct ReductionEntry {
    /// Providing part, or `None` for an external effect.
    pub part: Option<PartId>,
    /// Damage multiplier.
    pub multiplier: f64,
    /// Remote-style reduction flag.
    pub remote: bool,
}

/// Per-slot shielding entry.
#[derive(Debug, Clone)]
pub struct ShieldEntry {
    /// Providing part; absorbs damage with its own integrity.
    pub part: PartId,
    /// Fraction of incoming damage absorbed.
    pub fraction: f64,
}

/// Entries that can be retired once their backing part is destroyed.
pub trait Depletable {
    /// The backing part, if the entry has one.
    fn source(&self) -> Option<PartId>;
}

impl Depletable for ChanceEntry {
    fn source(&self) -> Option<PartId> {
        Some(self.part)
    }
}
impl Depletable for AvoidEntry {
    fn source(&self) -> Option<PartId> {
        Some(self.part)
    }
}
impl Depletable for AmountEntry {
    fn source(&self) -> Option<PartId> {
        Some(self.part)
    }
}
impl Depletable for MarkerEntry {
    fn source(&self) -> Option<PartId> {
        Some(self.part)
    }
}
impl Depletable for ReductionEntry {
    fn source(&self) -> Option<PartId> {
        self.part
    }
}
impl Depletable for ShieldEntry {
    fn source(&self) -> Option<PartId> {
        Some(self.part)
    }
}

/// Returns the first entry whose backing part is still in one piece,
/// popping depleted entries off the front as it goes.
pub fn front_active<'a, T: Depletable>(
    list: &'a mut VecDeque<T>,
    parts: &[Part],
) -> Option<&'a T> {
    while let Some(entry) = list.front() {
        match entry.source() {
            Some(id) if parts[id.index()].integrity <= 0 => {
                list.pop_front();
            }
            _ => break,
        }
    }
    list.front()
}

/// Categorized defensive capabilities of the bot, derived from its
/// currently-equipped parts plus any external reduction effect.
#[derive(Debug, Clone, Default)]
pub struct Defenses {
    /// Missile interception chances.
    pub antimissile: VecDeque<ChanceEntry>,
    /// All-weapon avoidance utilities.
    pub avoid: VecDeque<AvoidEntry>,
    /// Chances to ignore incoming corruption.
    pub corruption_ignore: VecDeque<ChanceEntry>,
    /// Parts that burn integrity to prevent corruption.
    pub corruption_prevent: VecDeque<MarkerEntry>,
    /// Effective-corruption reducers. Consulted in aggregate, not popped.
    pub corruption_reduce: Vec<AmountEntry>,
    /// Critical-immunity utilities.
    pub crit_immunity: VecDeque<MarkerEntry>,
    /// The damage-reduction stack; only the head is ever consulted.
    pub damage_reduction: VecDeque<ReductionEntry>,
    /// Ranged-only avoidance utilities.
    pub ranged_avoid: VecDeque<AmountEntry>,
    /// Shielding lists indexed by [`ShieldSlot::index`].
    pub shields: [VecDeque<ShieldEntry>; ShieldSlot::COUNT],
}

impl Defenses {
    /// Compiles the defensive state from the active part set.
    ///
    /// Resistance and self-shielding capabilities merge onto the part
    /// itself (hence the mutable arena); everything else lands in exactly
    /// one category list, in active-list order. The output is pure given
    /// its inputs — callers must recompile after any integrity-zero
    /// crossing or part restoration, since category membership depends on
    /// which parts are currently equipped.
    #[must_use]
    pub fn compile(
        parts: &mut [Part],
        active: &[PartId],
        external: Option<ExternalReduction>,
    ) -> Self {
        let mut state = Self::default();

        for &id in active {
            let Some(special) = parts[id.index()].def.special.clone() else {
                continue;
            };
            let engaged = match special.activation {
                EffectActivation::Always => true,
                EffectActivation::WhileActive => parts[id.index()].integrity > 0,
            };
            if !engaged {
                continue;
            }

            match special.effect {
                PartEffect::Antimissile { chance } => {
                    state.antimissile.push_back(ChanceEntry { part: id, chance });
                }
                PartEffect::Avoidance { legs, other } => {
                    // Leg/hover/flight determination happens at accuracy
                    // update time, so both values are carried.
                    state.avoid.push_back(AvoidEntry { part: id, legs, other });
                }
                PartEffect::CorruptionIgnore { chance } => {
                    state
                        .corruption_ignore
                        .push_back(ChanceEntry { part: id, chance });
                }
                PartEffect::CorruptionPrevent => {
                    state.corruption_prevent.push_back(MarkerEntry { part: id });
                }
                PartEffect::CorruptionReduce { amount } => {
                    state.corruption_reduce.push(AmountEntry { part: id, amount });
                }
                PartEffect::CriticalImmunity => {
                    state.crit_immunity.push_back(MarkerEntry { part: id });
                }
                PartEffect::DamageReduction { multiplier, remote } => {
                    state.damage_reduction.push_back(ReductionEntry {
                        part: Some(id),
                        multiplier,
                        remote,
                    });
                }
                PartEffect::Resists(ref resists) => {
                    parts[id.index()].resistances = Some(resists.clone());
                }
                PartEffect::RangedAvoid { avoid } => {
                    state
                        .ranged_avoid
                        .push_back(AmountEntry { part: id, amount: avoid });
                }
                PartEffect::SelfShielding { multiplier } => {
                    parts[id.index()].self_damage_reduction = multiplier;
                }
                PartEffect::SlotShielding { slot, fraction } => {
                    state.shields[slot.index()].push_back(ShieldEntry { part: id, fraction });
                }
            }
        }

        if let Some(external) = external {
            state.merge_external(parts, external);
        }

        // All other lists would technically want the same priority
        // treatment, but no bot carries duplicate mixed-level defenses of
        // the other categories, so insertion order suffices there.

        state
    }

    /// Merges an external reduction effect into the reduction stack using
    /// the static priority table.
    fn merge_external(&mut self, parts: &[Part], external: ExternalReduction) {
        let entry = ReductionEntry {
            part: None,
            multiplier: external.multiplier(),
            remote: external.remote(),
        };

        match self.damage_reduction.front() {
            None => self.damage_reduction.push_back(entry),
            Some(head) => {
                let head_priority = head
                    .part
                    .map_or(-1, |id| reduction_priority(&parts[id.index()].def.name));
                if reduction_priority(external.name()) < head_priority {
                    self.damage_reduction.push_front(entry);
                } else {
                    self.damage_reduction.push_back(entry);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{DamageType, ItemDef, ItemKind, PartEffect, Resistances, Slot};
    use std::sync::Arc;

    fn special_part(name: &str, effect: PartEffect) -> Part {
        Part::from_def(Arc::new(
            ItemDef::new(name, Slot::Utility, ItemKind::Device, 1, 50, 20).with_effect(effect),
        ))
    }

    fn compile(parts: &mut Vec<Part>, external: Option<ExternalReduction>) -> Defenses {
        let active: Vec<PartId> = (0..parts.len())
            .map(|i| PartId::new(u32::try_from(i).unwrap()))
            .collect();
        Defenses::compile(parts, &active, external)
    }

    #[test]
    fn capabilities_land_in_one_category_each() {
        let mut parts = vec![
            special_part("Antimissile System", PartEffect::Antimissile { chance: 24 }),
            special_part("Phase Shifter", PartEffect::RangedAvoid { avoid: 5 }),
            special_part(
                "Shield Generator",
                PartEffect::DamageReduction {
                    multiplier: 0.75,
                    remote: false,
                },
            ),
            special_part(
                "Core Shielding",
                PartEffect::SlotShielding {
                    slot: ShieldSlot::Core,
                    fraction: 0.2,
                },
            ),
        ];
        let defenses = compile(&mut parts, None);
        assert_eq!(defenses.antimissile.len(), 1);
        assert_eq!(defenses.ranged_avoid.len(), 1);
        assert_eq!(defenses.damage_reduction.len(), 1);
        assert_eq!(defenses.shields[ShieldSlot::Core.index()].len(), 1);
        assert!(defenses.avoid.is_empty());
    }

    #[test]
    fn resistances_merge_onto_the_part() {
        let mut parts = vec![special_part(
            "EM Shield",
            PartEffect::Resists(Resistances::single(DamageType::Electromagnetic, 25)),
        )];
        let defenses = compile(&mut parts, None);
        assert!(defenses.damage_reduction.is_empty());
        assert_eq!(
            parts[0].resistances,
            Some(Resistances::single(DamageType::Electromagnetic, 25))
        );
    }

    #[test]
    fn external_reduction_becomes_sole_member_of_empty_stack() {
        let mut parts = Vec::new();
        let defenses = compile(&mut parts, Some(ExternalReduction::StasisBubble));
        assert_eq!(defenses.damage_reduction.len(), 1);
        let head = defenses.damage_reduction.front().unwrap();
        assert_eq!(head.part, None);
        assert!((head.multiplier - 0.5).abs() < f64::EPSILON);
        assert!(!head.remote);
    }

    #[test]
    fn external_phase_wall_outranks_shield_generator() {
        let mut parts = vec![special_part(
            "Shield Generator",
            PartEffect::DamageReduction {
                multiplier: 0.75,
                remote: false,
            },
        )];
        let defenses = compile(&mut parts, Some(ExternalReduction::PhaseWall));
        let head = defenses.damage_reduction.front().unwrap();
        assert_eq!(head.part, None, "phase wall should be consulted first");
    }

    #[test]
    fn external_remote_shield_yields_to_force_field() {
        let mut parts = vec![special_part(
            "Force Field",
            PartEffect::DamageReduction {
                multiplier: 0.5,
                remote: false,
            },
        )];
        let defenses = compile(&mut parts, Some(ExternalReduction::RemoteShield));
        let head = defenses.damage_reduction.front().unwrap();
        assert!(head.part.is_some(), "force field should stay in front");
        assert_eq!(defenses.damage_reduction.len(), 2);
    }

    #[test]
    fn front_active_pops_depleted_entries() {
        let mut parts = vec![
            special_part("Point Defense System", PartEffect::Antimissile { chance: 8 }),
            special_part("Antimissile System", PartEffect::Antimissile { chance: 24 }),
        ];
        let mut defenses = compile(&mut parts, None);

        parts[0].integrity = 0;
        let entry = front_active(&mut defenses.antimissile, &parts).unwrap();
        assert_eq!(entry.chance, 24);
        assert_eq!(defenses.antimissile.len(), 1, "spent entry is discarded");
    }

    #[test]
    fn front_active_keeps_external_entries_forever() {
        let mut parts = Vec::new();
        let mut defenses = compile(&mut parts, Some(ExternalReduction::RemoteShield));
        assert!(front_active(&mut defenses.damage_reduction, &parts).is_some());
    }
}
