//! Parallel trial batches.
//!
//! Trials are fully isolated — each one clones the immutable initial state
//! — so batches fan out across threads with rayon. Determinism survives
//! the fan-out: every trial derives its own seed from the master seed and
//! its trial index, and the per-worker reports merge additively, so the
//! merged statistics are identical no matter how rayon partitions the
//! range.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{LootTracker, Simulation, TrialStats};
use crate::rng::seeded;

/// Merged outcome of a batch of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Trials attempted.
    pub trials: u64,
    /// Trials that met their end condition.
    pub kills: u64,
    /// Trials abandoned at the volley cap.
    pub failures: u64,
    /// Merged kill histograms.
    pub stats: TrialStats,
    /// Merged loot aggregates.
    pub loot: LootTracker,
}

impl BatchReport {
    fn empty_like(sim: &Simulation) -> Self {
        Self {
            trials: 0,
            kills: 0,
            failures: 0,
            stats: TrialStats::default(),
            loot: LootTracker::for_template(sim.initial_bot()),
        }
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: &BatchReport) {
        self.trials += other.trials;
        self.kills += other.kills;
        self.failures += other.failures;
        self.stats.merge(&other.stats);
        self.loot.merge(&other.loot);
    }

    /// Fraction of trials that failed to converge.
    #[must_use]
    pub fn non_convergence_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.failures as f64 / self.trials as f64
    }
}

/// Derives the independent seed for one trial of a batch.
fn trial_seed(master_seed: u64, trial: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    master_seed.hash(&mut hasher);
    trial.hash(&mut hasher);
    hasher.finish()
}

/// Runs `trials` independent trials of a configured simulation in
/// parallel, returning the merged report.
///
/// The input simulation is a configuration template; its own accumulated
/// statistics are left untouched.
#[must_use]
pub fn run_batch(sim: &Simulation, trials: u64, master_seed: u64) -> BatchReport {
    (0..trials)
        .into_par_iter()
        .fold(
            || {
                let mut worker = sim.clone();
                worker.reset_stats();
                (worker, 0u64, 0u64)
            },
            |(mut worker, kills, failures), trial| {
                let mut rng = seeded(trial_seed(master_seed, trial));
                if worker.simulate_trial(&mut rng) {
                    (worker, kills + 1, failures)
                } else {
                    (worker, kills, failures + 1)
                }
            },
        )
        .map(|(worker, kills, failures)| BatchReport {
            trials: kills + failures,
            kills,
            failures,
            stats: worker.stats().clone(),
            loot: worker.loot().clone(),
        })
        .reduce(
            || BatchReport::empty_like(sim),
            |mut merged, report| {
                merged.merge(&report);
                merged
            },
        )
}

/// Runs `trials` trials sequentially on this simulation with the given
/// dice, accumulating into its own statistics. Returns the number of
/// non-convergent trials.
pub fn run_trials(sim: &mut Simulation, trials: u64, rng: &mut dyn crate::rng::Dice) -> u64 {
    let mut failures = 0;
    for _ in 0..trials {
        if !sim.simulate_trial(rng) {
            failures += 1;
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BattleConfig, EndCondition, Loadout, WeaponConfig};
    use crate::defs::{BotDef, DamageType, WeaponDef, WeaponKind};
    use std::sync::Arc;

    fn quick_sim() -> Simulation {
        let weapon = Arc::new(
            WeaponDef::new("Rifle", WeaponKind::BallisticGun).with_damage(
                20,
                40,
                DamageType::Kinetic,
            ),
        );
        Simulation::new(
            &Arc::new(BotDef::new("target", 60, 100)),
            &Loadout::of_weapons(vec![WeaponConfig::single(weapon)]),
            &BattleConfig {
                end_condition: EndCondition::Kill,
                ..BattleConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn batch_counts_add_up() {
        let sim = quick_sim();
        let report = run_batch(&sim, 200, 7);
        assert_eq!(report.trials, 200);
        assert_eq!(report.kills + report.failures, 200);
        assert_eq!(report.kills, 200, "a plain rifle always kills eventually");
        let histogram_total: u64 = report.stats.kill_volleys.values().sum();
        assert_eq!(histogram_total, 200);
    }

    #[test]
    fn batch_leaves_the_template_untouched() {
        let sim = quick_sim();
        run_batch(&sim, 50, 7);
        assert!(sim.kill_volleys().is_empty());
        assert_eq!(sim.loot().kills, 0);
    }

    #[test]
    fn trial_seeds_differ_by_index() {
        assert_ne!(trial_seed(1, 0), trial_seed(1, 1));
        assert_ne!(trial_seed(1, 0), trial_seed(2, 0));
        assert_eq!(trial_seed(9, 4), trial_seed(9, 4));
    }
}
