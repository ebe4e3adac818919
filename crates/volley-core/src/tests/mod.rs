//! Test module for determinism and integration tests.
//!
//! - `determinism.rs`: fixed-seed reproducibility, sequentially and across
//!   parallel batches.
//! - `integration.rs`: end-to-end trials exercising the documented
//!   behavioral contracts.
//! - `helpers.rs`: factories for bots, parts, weapons, and simulations.

mod helpers;

pub use helpers::*;
