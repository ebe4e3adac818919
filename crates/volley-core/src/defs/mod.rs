//! Fully-resolved entity and item definitions.
//!
//! Everything in this module is an *input* to the engine: immutable records
//! that some external data layer has already parsed and validated. The
//! engine never checks them for internal consistency beyond what the
//! simulation constructor needs (see [`crate::error::SetupError`]).
//!
//! - [`item`]: equippable part records and the closed capability union.
//! - [`weapon`]: attacker weapon records.
//! - [`bot`]: target bot records (immunities, resistances, part manifest).

pub mod bot;
pub mod item;
pub mod weapon;

pub use bot::{Behavior, BotDef, BotSize, Immunities, Movement};
pub use item::{
    Critical, DamageType, EffectActivation, EngineExplosion, ItemDef, ItemKind, PartEffect,
    Resistances, ShieldSlot, SiegeMode, Slot, SpecialEffect, Spectrum,
};
pub use weapon::{DamageSpec, ExplosionSpec, WeaponDef, WeaponKind};
