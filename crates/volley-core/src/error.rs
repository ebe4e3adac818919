//! Errors raised while assembling a simulation.
//!
//! The engine itself has no recoverable mid-trial errors: every optional
//! stat defaults to a no-op, and the only intrinsic failure mode
//! (non-convergence) is a boolean trial result. What can fail is the
//! construction of a [`crate::Simulation`] from caller-supplied
//! configuration, and those failures are caller-side precondition
//! violations.

use thiserror::Error;

/// Configuration problems detected while building a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The loadout contains no weapons at all.
    #[error("loadout contains no weapons")]
    NoWeapons,

    /// A weapon's class does not match the configured combat type, e.g. a
    /// launcher in a melee battle.
    #[error("weapon `{weapon}` does not fit {expected} combat")]
    CombatMismatch {
        /// Name of the offending weapon.
        weapon: String,
        /// The combat type the battle was configured for.
        expected: &'static str,
    },
}
