//! Per-trial target bot state.

use std::sync::Arc;

use crate::defs::{Behavior, BotDef, Immunities, ItemKind, Resistances, ShieldSlot};
use crate::rng::Dice;

use super::defense::{front_active, Defenses, ExternalReduction, ReductionEntry, ShieldEntry};
use super::part::{CoverageTable, Part, PartId};

/// Schedule for spontaneous part regrowth on superfortress-class bots.
#[derive(Debug, Clone)]
pub struct RegrowthState {
    /// Elapsed-turn count at which the next regrowth attempt fires.
    pub next_attempt: i32,
}

/// Mutable per-trial snapshot of the target bot.
///
/// Created once per trial by cloning an immutable template
/// ([`BotState::fresh_trial`]); parts live in an arena indexed by stable
/// [`PartId`]s, with the `active`/`destroyed` lists partitioning them at
/// all times.
#[derive(Debug, Clone)]
pub struct BotState {
    /// The bot record this state instantiates.
    pub def: Arc<BotDef>,
    /// Part arena. Position equals the part's manifest index.
    pub parts: Vec<Part>,
    /// Parts currently in combat, in targeting order.
    pub active: Vec<PartId>,
    /// Parts removed from combat, retained for regeneration.
    pub destroyed: Vec<PartId>,
    /// Derived defensive capability lists.
    pub defenses: Defenses,
    /// Current core integrity.
    pub core_integrity: i32,
    /// Core integrity at trial start; regen cap and Tele threshold.
    pub initial_core_integrity: i32,
    /// Accumulated corruption. Kills at an effective 100.
    pub corruption: f64,
    /// Set once a disruption roll lands on the core.
    pub core_disrupted: bool,
    /// Core exposure weight.
    pub core_coverage: i32,
    /// Total coverage: core plus all active parts.
    pub total_coverage: i32,
    /// Coverage total while sieged.
    pub sieged_coverage: i32,
    /// Coverage total under armor analysis.
    pub armor_analyzed_coverage: i32,
    /// Coverage total under both armor analysis and siege.
    pub armor_analyzed_sieged_coverage: i32,
    /// Innate immunities.
    pub immunities: Immunities,
    /// Live resistance totals; adjusted as parts come and go.
    pub resistances: Resistances,
    /// Behavior profile driving siege/run transitions.
    pub behavior: Behavior,
    /// Whether the bot is currently in siege mode.
    pub sieged: bool,
    /// Whether the bot is currently running.
    pub running: bool,
    /// Running momentum, 0-3.
    pub running_momentum: i32,
    /// Evasion granted by sub-100 speed while running.
    pub running_evasion: i32,
    /// TU at which a siege-when-fighting bot plants itself.
    pub tus_to_siege: f64,
    /// Core integrity regenerated per full turn.
    pub core_regen: i32,
    /// Part integrity regenerated per full turn.
    pub part_regen: i32,
    /// Spontaneous part regrowth schedule, if the bot has one.
    pub regrowth: Option<RegrowthState>,
    /// Net salvage modifier accumulated from attacker weapons.
    pub salvage: i32,
    /// External damage reduction effect in play, if any.
    pub external_reduction: Option<ExternalReduction>,
}

impl BotState {
    /// Builds the immutable initial state for a bot under the given
    /// battlefield conditions.
    #[must_use]
    pub fn from_def(
        def: &Arc<BotDef>,
        behavior: Behavior,
        external: Option<ExternalReduction>,
    ) -> Self {
        let mut parts: Vec<Part> = def
            .parts
            .iter()
            .map(|item| Part::from_def(Arc::clone(item)))
            .collect();
        let active: Vec<PartId> = (0..parts.len())
            .map(|i| PartId::new(u32::try_from(i).unwrap_or(u32::MAX)))
            .collect();

        let core = def.core_coverage;
        let total_coverage = core + parts.iter().map(|p| p.coverage).sum::<i32>();
        let sieged_coverage = core + parts.iter().map(|p| p.sieged_coverage).sum::<i32>();
        let armor_analyzed_coverage =
            core + parts.iter().map(|p| p.armor_analyzed_coverage).sum::<i32>();
        let armor_analyzed_sieged_coverage = core
            + parts
                .iter()
                .map(|p| p.armor_analyzed_sieged_coverage)
                .sum::<i32>();

        let has_siege_treads = parts
            .iter()
            .any(|p| p.def.kind == ItemKind::Treads && p.def.siege.is_some());

        let running_evasion = if def.speed < 100 {
            (100 - def.speed) / 5
        } else {
            0
        };

        let defenses = Defenses::compile(&mut parts, &active, external);

        Self {
            core_integrity: def.core_integrity,
            initial_core_integrity: def.core_integrity,
            corruption: 0.0,
            core_disrupted: false,
            core_coverage: core,
            total_coverage,
            sieged_coverage,
            armor_analyzed_coverage,
            armor_analyzed_sieged_coverage,
            immunities: def.immunities,
            resistances: def.resistances.clone(),
            behavior,
            sieged: behavior == Behavior::AlreadySiegedFight && has_siege_treads,
            running: behavior == Behavior::Running,
            running_momentum: if behavior == Behavior::Running { 3 } else { 0 },
            running_evasion,
            tus_to_siege: if behavior == Behavior::SiegeFight {
                500.0
            } else {
                0.0
            },
            core_regen: def.core_regen,
            part_regen: def.part_regen,
            regrowth: def
                .regrows_parts
                .then_some(RegrowthState { next_attempt: 0 }),
            salvage: 0,
            external_reduction: external,
            parts,
            active,
            destroyed: Vec::new(),
            defenses,
            def: Arc::clone(def),
        }
    }

    /// Clones this template into a fresh trial state.
    ///
    /// Only mutable fields matter: the defensive lists are recompiled so
    /// their consumed-entry state starts clean.
    #[must_use]
    pub fn fresh_trial(&self) -> Self {
        let mut state = self.clone();
        state.salvage = 0;
        state.destroyed.clear();
        state.recompile_defenses();
        state
    }

    /// Recompiles the defensive capability lists from the active parts.
    pub fn recompile_defenses(&mut self) {
        self.defenses = Defenses::compile(&mut self.parts, &self.active, self.external_reduction);
    }

    /// Read access to a part by id.
    #[must_use]
    pub fn part(&self, id: PartId) -> &Part {
        &self.parts[id.index()]
    }

    /// Write access to a part by id.
    #[must_use]
    pub fn part_mut(&mut self, id: PartId) -> &mut Part {
        &mut self.parts[id.index()]
    }

    /// Position of a part in the active list, if it is in combat.
    #[must_use]
    pub fn active_index_of(&self, id: PartId) -> Option<usize> {
        self.active.iter().position(|&entry| entry == id)
    }

    /// Iterates the parts currently in combat.
    pub fn active_parts(&self) -> impl Iterator<Item = &Part> {
        self.active.iter().map(|id| &self.parts[id.index()])
    }

    /// Takes a part out of combat, adjusting coverage totals and shedding
    /// its resistance contribution. The part keeps its identity for later
    /// regeneration. Returns the removed part's id.
    pub fn remove_active(&mut self, index: usize) -> PartId {
        let id = self.active.remove(index);
        let part = &self.parts[id.index()];
        self.total_coverage -= part.coverage;
        self.sieged_coverage -= part.sieged_coverage;
        self.armor_analyzed_coverage -= part.armor_analyzed_coverage;
        self.armor_analyzed_sieged_coverage -= part.armor_analyzed_sieged_coverage;
        if let Some(resists) = self.parts[id.index()].resistances.clone() {
            self.resistances.shed(&resists);
        }
        id
    }

    /// Returns a destroyed part to combat at full integrity, restoring its
    /// coverage and resistance contributions exactly.
    pub fn restore(&mut self, id: PartId) {
        self.active.push(id);
        let part = &mut self.parts[id.index()];
        part.integrity = part.def.integrity;
        self.total_coverage += part.coverage;
        self.sieged_coverage += part.sieged_coverage;
        self.armor_analyzed_coverage += part.armor_analyzed_coverage;
        self.armor_analyzed_sieged_coverage += part.armor_analyzed_sieged_coverage;
        if let Some(resists) = self.parts[id.index()].resistances.clone() {
            self.resistances.absorb(&resists);
        }
    }

    /// Restores one random destroyed part, if any. Returns whether a part
    /// came back.
    pub fn restore_random_destroyed(&mut self, rng: &mut dyn Dice) -> bool {
        if self.destroyed.is_empty() {
            return false;
        }
        let upper = i32::try_from(self.destroyed.len()).unwrap_or(i32::MAX) - 1;
        let pick = usize::try_from(rng.roll(0, upper)).unwrap_or(0);
        let id = self.destroyed.remove(pick);
        self.restore(id);
        true
    }

    /// Corruption as read by end conditions and loot rolls, after
    /// corruption-reduction utilities.
    #[must_use]
    pub fn effective_corruption(&self) -> f64 {
        let mut corruption = self.corruption;
        for entry in &self.defenses.corruption_reduce {
            if self.parts[entry.part.index()].integrity >= 0 {
                corruption -= f64::from(entry.amount);
            }
        }
        corruption
    }

    /// Coverage total for the given table.
    #[must_use]
    pub fn coverage_total(&self, table: CoverageTable) -> i32 {
        match table {
            CoverageTable::Normal => self.total_coverage,
            CoverageTable::Sieged => self.sieged_coverage,
            CoverageTable::ArmorAnalyzed => self.armor_analyzed_coverage,
            CoverageTable::ArmorAnalyzedSieged => self.armor_analyzed_sieged_coverage,
        }
    }

    /// Whether criticals are suppressed wholesale, by innate immunity or a
    /// live critical-immunity utility.
    pub fn criticals_suppressed(&mut self) -> bool {
        self.immunities.contains(Immunities::CRITICALS)
            || front_active(&mut self.defenses.crit_immunity, &self.parts).is_some()
    }

    /// First live shielding entry for a slot, discarding spent ones.
    pub fn shielding(&mut self, slot: ShieldSlot) -> Option<ShieldEntry> {
        front_active(&mut self.defenses.shields[slot.index()], &self.parts).cloned()
    }

    /// The single consulted damage-reduction entry, if any.
    pub fn damage_reduction(&mut self) -> Option<ReductionEntry> {
        front_active(&mut self.defenses.damage_reduction, &self.parts).cloned()
    }

    /// Live antimissile intercept chance, if any.
    pub fn antimissile_chance(&mut self) -> Option<i32> {
        front_active(&mut self.defenses.antimissile, &self.parts).map(|e| e.chance)
    }

    /// Live avoidance utility as a (legs, other) penalty pair.
    pub fn avoidance(&mut self) -> Option<(i32, i32)> {
        front_active(&mut self.defenses.avoid, &self.parts).map(|e| (e.legs, e.other))
    }

    /// Live ranged-avoidance penalty, if any.
    pub fn ranged_avoidance(&mut self) -> Option<i32> {
        front_active(&mut self.defenses.ranged_avoid, &self.parts).map(|e| e.amount)
    }

    /// Live corruption-ignore chance, if any.
    pub fn corruption_ignore_chance(&mut self) -> Option<i32> {
        front_active(&mut self.defenses.corruption_ignore, &self.parts).map(|e| e.chance)
    }

    /// Live corruption-prevention part, if any.
    pub fn corruption_preventer(&mut self) -> Option<PartId> {
        front_active(&mut self.defenses.corruption_prevent, &self.parts).map(|e| e.part)
    }

    /// Whether any active part satisfies the predicate.
    pub fn any_active(&self, pred: impl Fn(&Part) -> bool) -> bool {
        self.active_parts().any(|p| pred(p))
    }

    /// Whether the bot still has siege-capable treads equipped.
    #[must_use]
    pub fn has_siege_treads(&self) -> bool {
        self.any_active(|p| p.def.kind == ItemKind::Treads && p.def.siege.is_some())
    }
}
