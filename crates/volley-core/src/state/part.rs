//! Part instances and their stable identities.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::defs::{ItemDef, ItemKind, Resistances};

/// Stable identity of a part within one trial.
///
/// Ids index the bot's part arena and equal the part's position in the
/// original manifest, which is what ties loot statistics to items across
/// destruction, regeneration, and trial resets.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartId(u32);

impl PartId {
    /// Creates an id from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index of this part.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartId({})", self.0)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which coverage table a hit draws from.
///
/// Armor analysis strips protection parts from the pool; siege mode doubles
/// the weight of protection and treads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoverageTable {
    /// Plain coverage.
    Normal,
    /// Bot is in siege mode.
    Sieged,
    /// Attacker's armor analyzer proc'd.
    ArmorAnalyzed,
    /// Both at once.
    ArmorAnalyzedSieged,
}

impl CoverageTable {
    /// Selects the table for a hit.
    #[must_use]
    pub fn select(armor_analyzed: bool, sieged: bool) -> Self {
        match (armor_analyzed, sieged) {
            (false, false) => Self::Normal,
            (false, true) => Self::Sieged,
            (true, false) => Self::ArmorAnalyzed,
            (true, true) => Self::ArmorAnalyzedSieged,
        }
    }
}

/// One equipped part inside a trial.
///
/// Owned exclusively by the [`crate::state::BotState`] arena; everything
/// else refers to parts by [`PartId`].
#[derive(Debug, Clone)]
pub struct Part {
    /// The item this part instantiates.
    pub def: Arc<ItemDef>,
    /// Current integrity. Zero or below means out of combat.
    pub integrity: i32,
    /// Plain coverage weight.
    pub coverage: i32,
    /// Coverage under armor analysis (protection drops to zero).
    pub armor_analyzed_coverage: i32,
    /// Coverage while the bot is sieged (protection/treads doubled).
    pub sieged_coverage: i32,
    /// Coverage under both armor analysis and siege.
    pub armor_analyzed_sieged_coverage: i32,
    /// Protection parts soak overflow and shrug off destroy-criticals.
    pub protection: bool,
    /// Damage multiplier for hits on this part itself; 1.0 when inert.
    pub self_damage_reduction: f64,
    /// Resistance contribution merged on by the defensive compiler.
    pub resistances: Option<Resistances>,
}

impl Part {
    /// Instantiates a part from its item record at full integrity.
    #[must_use]
    pub fn from_def(def: Arc<ItemDef>) -> Self {
        let protection = def.kind == ItemKind::Protection;
        let treads = def.kind == ItemKind::Treads;
        let coverage = def.coverage;
        let sieged_coverage = if protection || treads {
            2 * coverage
        } else {
            coverage
        };
        Self {
            integrity: def.integrity,
            coverage,
            armor_analyzed_coverage: if protection { 0 } else { coverage },
            sieged_coverage,
            armor_analyzed_sieged_coverage: if protection { 0 } else { sieged_coverage },
            protection,
            self_damage_reduction: 1.0,
            resistances: None,
            def,
        }
    }

    /// Coverage weight of this part in the given table.
    #[must_use]
    pub fn coverage_in(&self, table: CoverageTable) -> i32 {
        match table {
            CoverageTable::Normal => self.coverage,
            CoverageTable::Sieged => self.sieged_coverage,
            CoverageTable::ArmorAnalyzed => self.armor_analyzed_coverage,
            CoverageTable::ArmorAnalyzedSieged => self.armor_analyzed_sieged_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Slot;

    fn item(kind: ItemKind, coverage: i32) -> Arc<ItemDef> {
        Arc::new(ItemDef::new("test", Slot::Utility, kind, 1, 40, coverage))
    }

    #[test]
    fn protection_has_no_armor_analyzed_coverage() {
        let part = Part::from_def(item(ItemKind::Protection, 80));
        assert_eq!(part.coverage, 80);
        assert_eq!(part.armor_analyzed_coverage, 0);
        assert_eq!(part.sieged_coverage, 160);
        assert_eq!(part.armor_analyzed_sieged_coverage, 0);
    }

    #[test]
    fn treads_double_under_siege() {
        let part = Part::from_def(item(ItemKind::Treads, 50));
        assert_eq!(part.sieged_coverage, 100);
        assert_eq!(part.armor_analyzed_sieged_coverage, 100);
    }

    #[test]
    fn plain_parts_keep_coverage_everywhere() {
        let part = Part::from_def(item(ItemKind::Device, 30));
        for table in [
            CoverageTable::Normal,
            CoverageTable::Sieged,
            CoverageTable::ArmorAnalyzed,
            CoverageTable::ArmorAnalyzedSieged,
        ] {
            assert_eq!(part.coverage_in(table), 30);
        }
    }

    #[test]
    fn table_selection() {
        assert_eq!(CoverageTable::select(false, false), CoverageTable::Normal);
        assert_eq!(CoverageTable::select(true, true), CoverageTable::ArmorAnalyzedSieged);
    }
}
