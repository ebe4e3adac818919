//! Mutable per-trial simulation state.
//!
//! - [`part`]: part instances with stable arena identity.
//! - [`bot`]: the target bot's trial state and coverage bookkeeping.
//! - [`defense`]: the derived defensive capability lists.

pub mod bot;
pub mod defense;
pub mod part;

pub use bot::{BotState, RegrowthState};
pub use defense::{Defenses, ExternalReduction};
pub use part::{CoverageTable, Part, PartId};
