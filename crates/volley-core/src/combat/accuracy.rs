//! The situational accuracy model.
//!
//! Each weapon's hit chance is its immutable base plus a stack of
//! situational terms shared by the whole volley. The stack is recomputed on
//! state-changing events: trial start, the early-action schedule, siege
//! activations, run engagement, and any part destruction or restoration
//! (avoidance utilities live and die with their parts).

use crate::defs::{ItemKind, Movement};

use super::setup::weapon_recoil;
use super::Simulation;

/// Hit chance floor, both combat types.
pub(crate) const MIN_ACCURACY: f64 = 10.0;
/// Hit chance ceiling for ranged combat.
pub(crate) const MAX_RANGED_ACCURACY: f64 = 95.0;
/// Hit chance ceiling for melee combat.
pub(crate) const MAX_MELEE_ACCURACY: f64 = 100.0;

/// Accuracy bonus per melee analysis tier.
const MELEE_ANALYSIS_ACCURACY: [i32; 4] = [5, 6, 8, 12];
/// Accuracy penalty per force booster tier.
const FORCE_BOOSTER_ACCURACY_PENALTY: [f64; 3] = [4.0, 6.0, 8.0];

impl Simulation {
    /// Recomputes every weapon's hit chance from the current fight state.
    pub(crate) fn refresh_accuracy(&mut self) {
        let mut bonus: f64 = 0.0;

        let movement = self.bot.def.movement;
        if movement.airborne() {
            bonus -= 10.0;
        }

        if let Some((legs, other)) = self.bot.avoidance() {
            bonus -= f64::from(if movement == Movement::Walking {
                legs
            } else {
                other
            });
        }

        if self.offense.analysis {
            bonus += 5.0;
        }

        let mut siege_bonus = 0;
        if self.offense.melee {
            for (count, per_tier) in self
                .offense
                .melee_analysis
                .iter()
                .zip(MELEE_ANALYSIS_ACCURACY)
            {
                bonus += f64::from(count * per_tier);
            }

            // Force boosters cost accuracy the same way they add damage: a
            // doubled tier at 1.5x its penalty, a second booster at half.
            let mut boosters_processed = 0;
            for i in (0..self.offense.force_boosters.len()).rev() {
                if self.offense.force_boosters[i] == 2 {
                    bonus -= 1.5 * FORCE_BOOSTER_ACCURACY_PENALTY[i];
                    boosters_processed += 2;
                } else if self.offense.force_boosters[i] == 1 {
                    bonus -= FORCE_BOOSTER_ACCURACY_PENALTY[i]
                        * if boosters_processed == 0 { 1.0 } else { 0.5 };
                    boosters_processed += 1;
                }
            }
        } else {
            if self.offense.distance < 6 {
                bonus += f64::from((6 - self.offense.distance) * 3);
            }

            let (siege, siege_tus) = self.offense.siege_bonus;
            if self.tus >= siege_tus {
                siege_bonus = siege;
            }
            bonus += f64::from(siege_bonus);

            if let Some(avoid) = self.bot.ranged_avoidance() {
                bonus -= f64::from(avoid);
            }
        }

        // The third action onward carries a permanent +10% stillness bonus.
        bonus += f64::from(match self.action_num {
            0 => self.offense.action1_accuracy,
            1 => self.offense.action2_accuracy,
            _ => 10,
        });

        if self.bot.sieged {
            bonus += 20.0;
        }

        if self.bot.running {
            if self.bot.any_active(|p| p.def.kind == ItemKind::Leg) {
                bonus -= 5.0 * f64::from(self.bot.running_momentum);
            }
            bonus -= f64::from(self.bot.running_evasion);
        }

        let melee = self.offense.melee;
        let recoil = self.offense.recoil;
        let recoil_reduction = self.offense.recoil_reduction;
        for weapon in &mut self.weapons {
            if weapon.guided {
                // Guided weapons bypass every modifier.
                weapon.accuracy = 100.0;
                continue;
            }

            let mut accuracy = weapon.base_accuracy + bonus;

            if !melee && siege_bonus == 0 {
                // Everyone else's recoil, waived once sieged.
                accuracy -=
                    f64::from(recoil - weapon_recoil(&weapon.def, recoil_reduction));
            }

            let max = if melee {
                MAX_MELEE_ACCURACY
            } else {
                MAX_RANGED_ACCURACY
            };
            weapon.accuracy = accuracy.clamp(MIN_ACCURACY, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BattleConfig, Loadout, Simulation, WeaponConfig};
    use crate::defs::{BotDef, DamageType, WeaponDef, WeaponKind};
    use std::sync::Arc;

    fn sim_with(bot: BotDef, mut weapon: WeaponDef, battle: BattleConfig) -> Simulation {
        if weapon.damage.is_none() {
            weapon = weapon.with_damage(10, 20, DamageType::Kinetic);
        }
        let mut sim = Simulation::new(
            &Arc::new(bot),
            &Loadout::of_weapons(vec![WeaponConfig::single(Arc::new(weapon))]),
            &battle,
        )
        .unwrap();
        sim.refresh_accuracy();
        sim
    }

    #[test]
    fn guided_weapons_always_report_100() {
        let mut weapon = WeaponDef::new("Guided Launcher", WeaponKind::Launcher);
        weapon.guided = true;
        weapon.targeting = -40;
        let mut bot = BotDef::new("target", 100, 40);
        bot.size = crate::defs::BotSize::Tiny;
        let sim = sim_with(bot, weapon, BattleConfig::default());
        assert!((sim.weapons()[0].accuracy - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ranged_accuracy_clamps_at_95() {
        let mut weapon = WeaponDef::new("Laser", WeaponKind::EnergyGun);
        weapon.targeting = 80;
        let sim = sim_with(BotDef::new("target", 100, 40), weapon, BattleConfig::default());
        assert!((sim.weapons()[0].accuracy - MAX_RANGED_ACCURACY).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_never_drops_below_10() {
        let mut weapon = WeaponDef::new("Blunderbuss", WeaponKind::BallisticGun);
        weapon.targeting = -200;
        let sim = sim_with(BotDef::new("target", 100, 40), weapon, BattleConfig::default());
        assert!((sim.weapons()[0].accuracy - MIN_ACCURACY).abs() < f64::EPSILON);
    }

    #[test]
    fn airborne_targets_are_harder_to_hit() {
        let weapon = WeaponDef::new("Rifle", WeaponKind::BallisticGun);
        let grounded = sim_with(
            BotDef::new("walker", 100, 40),
            weapon.clone(),
            BattleConfig::default(),
        );
        let mut flyer_def = BotDef::new("flyer", 100, 40);
        flyer_def.movement = crate::defs::Movement::Flying;
        let flyer = sim_with(flyer_def, weapon, BattleConfig::default());
        assert!(
            (grounded.weapons()[0].accuracy - flyer.weapons()[0].accuracy - 10.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn combat_analysis_adds_five_accuracy() {
        let weapon = WeaponDef::new("Rifle", WeaponKind::BallisticGun);
        let plain = sim_with(
            BotDef::new("target", 100, 40),
            weapon.clone(),
            BattleConfig::default(),
        );
        let analyzed = sim_with(
            BotDef::new("target", 100, 40),
            weapon,
            BattleConfig {
                analysis: true,
                ..BattleConfig::default()
            },
        );
        assert!(
            (analyzed.weapons()[0].accuracy - plain.weapons()[0].accuracy - 5.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn close_range_grants_distance_bonus() {
        let weapon = WeaponDef::new("Rifle", WeaponKind::BallisticGun);
        let far = sim_with(
            BotDef::new("target", 100, 40),
            weapon.clone(),
            BattleConfig::default(),
        );
        let close = sim_with(
            BotDef::new("target", 100, 40),
            weapon,
            BattleConfig {
                distance: 2,
                ..BattleConfig::default()
            },
        );
        assert!(
            (close.weapons()[0].accuracy - far.weapons()[0].accuracy - 12.0).abs() < f64::EPSILON
        );
    }
}
