//! Test setup utilities and factory functions.

use std::sync::Arc;

use crate::combat::{BattleConfig, EndCondition, Loadout, Simulation, WeaponConfig};
use crate::defs::{
    BotDef, DamageType, ItemDef, ItemKind, Slot, WeaponDef, WeaponKind,
};

/// A plain structural part with no special capability.
pub fn plain_part(name: &str, integrity: i32, coverage: i32) -> Arc<ItemDef> {
    Arc::new(ItemDef::new(
        name,
        Slot::Utility,
        ItemKind::Device,
        1,
        integrity,
        coverage,
    ))
}

/// An armor plate (protection kind).
pub fn armor_part(name: &str, integrity: i32, coverage: i32) -> Arc<ItemDef> {
    Arc::new(ItemDef::new(
        name,
        Slot::Utility,
        ItemKind::Protection,
        2,
        integrity,
        coverage,
    ))
}

/// A kinetic rifle with the given damage range. Guns never overflow.
pub fn rifle(min: i32, max: i32) -> Arc<WeaponDef> {
    Arc::new(
        WeaponDef::new("Assault Rifle", WeaponKind::BallisticGun).with_damage(
            min,
            max,
            DamageType::Kinetic,
        ),
    )
}

/// A kinetic cannon with the given damage range; cannons overflow.
pub fn cannon(min: i32, max: i32) -> Arc<WeaponDef> {
    Arc::new(
        WeaponDef::new("Heavy Cannon", WeaponKind::BallisticCannon).with_damage(
            min,
            max,
            DamageType::Kinetic,
        ),
    )
}

/// A guided fixed-damage weapon: always hits, always deals `damage`.
pub fn guided(damage: i32) -> Arc<WeaponDef> {
    let mut def = WeaponDef::new("Guided Launcher", WeaponKind::Launcher).with_damage(
        damage,
        damage,
        DamageType::Kinetic,
    );
    def.guided = true;
    def.missile = false;
    Arc::new(def)
}

/// A target bot with the given core stats and parts.
pub fn target_bot(core_integrity: i32, core_coverage: i32, parts: Vec<Arc<ItemDef>>) -> Arc<BotDef> {
    let mut def = BotDef::new("target", core_integrity, core_coverage);
    def.parts = parts;
    Arc::new(def)
}

/// A ranged kill-condition battle with default parameters.
pub fn kill_battle() -> BattleConfig {
    BattleConfig {
        end_condition: EndCondition::Kill,
        ..BattleConfig::default()
    }
}

/// Builds a simulation from a bot, one weapon, and a battle config.
pub fn simulation(bot: &Arc<BotDef>, weapon: Arc<WeaponDef>, battle: &BattleConfig) -> Simulation {
    Simulation::new(
        bot,
        &Loadout::of_weapons(vec![WeaponConfig::single(weapon)]),
        battle,
    )
    .expect("test configuration must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn guided_weapon_always_kills_quickly() {
        let bot = target_bot(10, 100, Vec::new());
        let mut sim = simulation(&bot, guided(10), &kill_battle());
        assert!(sim.simulate_trial(&mut seeded(1)));
        assert_eq!(sim.kill_volleys().get(&1), Some(&1));
    }

    #[test]
    fn factories_produce_consistent_kinds() {
        assert!(!rifle(1, 2).kind.is_melee());
        assert!(cannon(1, 2).kind.ballistic());
        assert!(guided(5).guided);
        assert_eq!(armor_part("plate", 10, 20).kind, ItemKind::Protection);
    }
}
