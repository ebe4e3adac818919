//! Trial setup and combat resolution.
//!
//! The [`Simulation`] owns everything one engagement needs: the immutable
//! initial bot state, the resolved weapon array, the attacker's offensive
//! state, and the accumulated statistics. [`Simulation::simulate_trial`]
//! runs one full fight; the surrounding modules implement its pieces:
//!
//! - `setup`: configuration types and initial-state construction.
//! - `accuracy`: the situational hit-chance model.
//! - `target`: hit-part selection.
//! - `damage`: the damage pipeline and critical-effect state machine.
//! - `engine`: the volley loop and end conditions.
//! - `loot`: kill histograms and loot aggregation.

mod accuracy;
mod damage;
mod engine;
mod loot;
mod setup;
mod target;

pub use engine::{EndCondition, MAX_VOLLEYS};
pub use loot::{ItemLoot, LootTracker, TrialStats};
pub use setup::{
    BattleConfig, CombatType, Loadout, Momentum, OffensiveState, SiegePlan, SimWeapon,
    SneakAttacks, UtilityConfig, WeaponConfig,
};

use crate::state::BotState;

/// One configured engagement: attacker loadout versus target bot, plus the
/// statistics accumulated across every trial run so far.
///
/// Construction resolves and validates the configuration once
/// ([`Simulation::new`]); each call to
/// [`simulate_trial`](Simulation::simulate_trial) then clones the immutable
/// initial bot state and fights it out. The struct is `Clone` so batch
/// runners can hand each worker its own accumulator.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Immutable initial bot state, cloned at the start of every trial.
    pub(crate) template: BotState,
    /// The bot state of the trial currently (or last) resolved.
    pub(crate) bot: BotState,
    /// Attacker-side modifiers.
    pub(crate) offense: OffensiveState,
    /// Resolved weapons; accuracy fields mutate during a trial.
    pub(crate) weapons: Vec<SimWeapon>,
    /// What ends a trial besides a kill.
    pub(crate) end_condition: EndCondition,
    /// TU clock of the current trial.
    pub(crate) tus: f64,
    /// Actions taken this trial; drives the accuracy schedule.
    pub(crate) action_num: i32,
    /// Kill histograms.
    pub(crate) stats: TrialStats,
    /// Loot aggregates.
    pub(crate) loot: LootTracker,
}

impl Simulation {
    /// Kill-count histogram keyed by volleys-to-kill.
    #[must_use]
    pub fn kill_volleys(&self) -> &std::collections::BTreeMap<u32, u64> {
        &self.stats.kill_volleys
    }

    /// Kill-count histogram keyed by (truncated) TUs-to-kill.
    #[must_use]
    pub fn kill_tus(&self) -> &std::collections::BTreeMap<u64, u64> {
        &self.stats.kill_tus
    }

    /// Accumulated kill statistics.
    #[must_use]
    pub fn stats(&self) -> &TrialStats {
        &self.stats
    }

    /// Accumulated loot statistics.
    #[must_use]
    pub fn loot(&self) -> &LootTracker {
        &self.loot
    }

    /// Bot state of the most recently resolved trial.
    #[must_use]
    pub fn bot(&self) -> &BotState {
        &self.bot
    }

    /// The immutable initial bot state trials are cloned from.
    #[must_use]
    pub fn initial_bot(&self) -> &BotState {
        &self.template
    }

    /// TU clock of the most recently resolved trial.
    #[must_use]
    pub fn trial_tus(&self) -> f64 {
        self.tus
    }

    /// Resolved per-weapon state, accuracy included.
    #[must_use]
    pub fn weapons(&self) -> &[SimWeapon] {
        &self.weapons
    }

    /// Clears the accumulated statistics, keeping the configuration.
    pub fn reset_stats(&mut self) {
        self.stats = TrialStats::default();
        self.loot = LootTracker::for_template(&self.template);
    }
}
