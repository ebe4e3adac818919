//! Kill histograms and loot aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::defs::ItemDef;
use crate::rng::Dice;
use crate::state::BotState;

use super::Simulation;

/// Kill-speed histograms accumulated across trials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStats {
    /// Kills keyed by the volley count that achieved them.
    pub kill_volleys: BTreeMap<u32, u64>,
    /// Kills keyed by elapsed TUs, truncated to whole units.
    pub kill_tus: BTreeMap<u64, u64>,
}

impl TrialStats {
    /// Records one successful trial.
    pub fn record_kill(&mut self, volleys: u32, tus: f64) {
        *self.kill_volleys.entry(volleys).or_insert(0) += 1;
        *self.kill_tus.entry(tus.trunc() as u64).or_insert(0) += 1;
    }

    /// Folds another histogram set into this one.
    pub fn merge(&mut self, other: &TrialStats) {
        for (volleys, count) in &other.kill_volleys {
            *self.kill_volleys.entry(*volleys).or_insert(0) += count;
        }
        for (tus, count) in &other.kill_tus {
            *self.kill_tus.entry(*tus).or_insert(0) += count;
        }
    }
}

/// Drop statistics for one equipped item across all trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLoot {
    /// The item these statistics describe.
    pub def: Arc<ItemDef>,
    /// Number of trials in which the item dropped.
    pub drops: u64,
    /// Drops caused by critical removal rather than surviving the kill.
    pub crit_removals: u64,
    /// Drops cancelled because corruption fried the part.
    pub fried: u64,
    /// Total corruption percent carried by corrupted drops.
    pub corruption_percent: u64,
    /// Total remaining integrity across all drops.
    pub integrity: u64,
}

impl ItemLoot {
    fn new(def: Arc<ItemDef>) -> Self {
        Self {
            def,
            drops: 0,
            crit_removals: 0,
            fried: 0,
            corruption_percent: 0,
            integrity: 0,
        }
    }
}

/// Loot aggregates accumulated across trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTracker {
    /// Number of successful trials folded in.
    pub kills: u64,
    /// Per-item drop statistics, indexed by manifest position.
    pub items: Vec<ItemLoot>,
    /// Total matter dropped.
    pub matter: i64,
    /// Total matter blasted away by kinetic cannon fire.
    pub matter_blasted: i64,
}

impl LootTracker {
    /// Creates an empty tracker shaped after a bot's part manifest.
    #[must_use]
    pub fn for_template(bot: &BotState) -> Self {
        Self {
            kills: 0,
            items: bot
                .parts
                .iter()
                .map(|part| ItemLoot::new(Arc::clone(&part.def)))
                .collect(),
            matter: 0,
            matter_blasted: 0,
        }
    }

    /// Folds another tracker into this one. Item lists must describe the
    /// same manifest.
    pub fn merge(&mut self, other: &LootTracker) {
        self.kills += other.kills;
        self.matter += other.matter;
        self.matter_blasted += other.matter_blasted;
        for (mine, theirs) in self.items.iter_mut().zip(&other.items) {
            mine.drops += theirs.drops;
            mine.crit_removals += theirs.crit_removals;
            mine.fried += theirs.fried;
            mine.corruption_percent += theirs.corruption_percent;
            mine.integrity += theirs.integrity;
        }
    }
}

impl Simulation {
    /// Rolls loot for a killed bot: per-surviving-part drops with fry and
    /// corruption checks, then the aggregate matter drop.
    pub(crate) fn award_loot(&mut self, rng: &mut dyn Dice) {
        let corruption = self.bot.effective_corruption();

        for &id in &self.bot.active {
            let part = &self.bot.parts[id.index()];
            if part.integrity <= 0 {
                continue;
            }
            let entry = &mut self.loot.items[id.index()];

            // Base drop chance is half the remaining-integrity percentage,
            // shifted by the accumulated salvage modifier.
            let remaining =
                f64::from(part.integrity) / f64::from(part.def.integrity) * 100.0;
            let mut drop = rng.percent(remaining / 2.0 + f64::from(self.bot.salvage));

            if drop && corruption > 0.0 {
                // Corruption can fry the part instead of dropping it.
                if rng.percent(corruption - f64::from(part.def.integrity)) {
                    entry.fried += 1;
                    drop = false;
                }
            }

            if drop {
                entry.integrity += u64::try_from(part.integrity).unwrap_or(0);
                entry.drops += 1;

                if rng.percent(corruption) {
                    // Corrupted drops carry 1 to 10% of the bot's
                    // corruption, hard-capped at 15.
                    let cap = ((10.0 * corruption / 100.0).min(15.0)).trunc() as i32;
                    let gained = rng.roll(1, cap.max(1));
                    entry.corruption_percent += u64::try_from(gained).unwrap_or(0);
                }
            }
        }

        self.loot.kills += 1;

        let mut matter = rng.roll(self.bot.def.salvage_low, self.bot.def.salvage_high);
        matter += self.bot.salvage;
        matter = matter.clamp(0, self.bot.def.salvage_high.max(0));
        self.loot.matter += i64::from(matter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_merge_sums_buckets() {
        let mut a = TrialStats::default();
        a.record_kill(3, 600.0);
        a.record_kill(3, 625.5);
        let mut b = TrialStats::default();
        b.record_kill(3, 600.0);
        b.record_kill(5, 1000.0);

        a.merge(&b);
        assert_eq!(a.kill_volleys.get(&3), Some(&3));
        assert_eq!(a.kill_volleys.get(&5), Some(&1));
        assert_eq!(a.kill_tus.get(&600), Some(&2));
        assert_eq!(a.kill_tus.get(&625), Some(&1));
    }
}
