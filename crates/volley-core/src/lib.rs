//! # Volley Core
//!
//! Stochastic combat-trial simulation engine.
//!
//! The crate pits a configured attacker loadout against a fully-resolved
//! target bot and resolves volley after volley of weapons fire until one of
//! several end conditions is met, over as many independent trials as the
//! caller asks for. The outputs are statistical: kill-speed histograms
//! (volleys and time units) and expected per-item loot drops.
//!
//! ## Architecture
//!
//! - **Definitions** ([`defs`]): immutable, already-validated item/weapon/bot
//!   records. This crate does not parse raw data tables.
//! - **Trial state** ([`state`]): the mutable per-trial snapshot — a part
//!   arena with stable identities, coverage totals, and the derived
//!   defensive capability lists.
//! - **Combat** ([`combat`]): trial setup, the accuracy model, hit-part
//!   targeting, the damage/critical pipeline, and the volley loop.
//! - **Batches** ([`batch`]): parallel trial execution with per-trial
//!   derived seeds and mergeable reports.
//!
//! ## Determinism
//!
//! Every stochastic draw goes through the injectable [`rng::Dice`] trait.
//! Feeding two runs the same seeded [`rng::SimRng`] produces bit-identical
//! results; [`batch::run_batch`] derives one independent seed per trial so
//! the merged statistics do not depend on thread scheduling.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use volley_core::{BattleConfig, Loadout, Simulation};
//!
//! let mut sim = Simulation::new(&bot, &loadout, &battle)?;
//! let mut rng = volley_core::rng::seeded(42);
//! let killed = sim.simulate_trial(&mut rng);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod combat;
pub mod defs;
pub mod error;
pub mod rng;
pub mod state;

#[cfg(test)]
mod tests;

pub use batch::{run_batch, BatchReport};
pub use combat::{
    BattleConfig, CombatType, EndCondition, ItemLoot, Loadout, LootTracker, SiegePlan, Simulation,
    SneakAttacks, TrialStats, UtilityConfig, WeaponConfig,
};
pub use error::SetupError;
pub use state::ExternalReduction;
