//! The volley loop.
//!
//! [`Simulation::simulate_trial`] drives a fresh clone of the initial bot
//! state through volley after volley until the configured end condition is
//! met, or until the volley cap declares the trial non-convergent.

use serde::{Deserialize, Serialize};

use crate::defs::{Behavior, DamageType, Slot, WeaponKind};
use crate::rng::Dice;
use crate::state::BotState;

use super::setup::SneakAttacks;
use super::Simulation;

/// Safety valve: a trial that reaches this many volleys is abandoned and
/// reported as a failure, not an error.
pub const MAX_VOLLEYS: u32 = 100_000;

/// Part name checked by [`EndCondition::KillOrNoTnc`].
const TRANSPORT_NETWORK_COUPLER: &str = "Transport Network Coupler";

/// What ends a trial besides running out of volleys.
///
/// Each profile supplies two predicates: a cheap per-projectile early-exit
/// check, and the full per-volley check evaluated after each volley.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCondition {
    /// Core destruction or terminal corruption.
    Kill,
    /// A kill, or the core disrupted.
    KillOrCoreDisrupt,
    /// A kill, or no power sources left.
    KillOrNoPower,
    /// A kill, or no weapons left.
    KillOrNoWeapons,
    /// A kill, or the transport network coupler destroyed.
    KillOrNoTnc,
    /// Architect telecollection: 80% core integrity, or down to one
    /// weapon or one propulsion part.
    Tele,
}

impl EndCondition {
    /// Early-exit check, evaluated after each projectile resolves.
    pub(crate) fn projectile_met(self, bot: &BotState) -> bool {
        bot.core_integrity <= 0
    }

    /// Full check, evaluated after each volley.
    pub(crate) fn volley_met(self, bot: &BotState) -> bool {
        let killed = bot.core_integrity <= 0 || bot.effective_corruption() >= 100.0;
        match self {
            Self::Kill => killed,
            Self::KillOrCoreDisrupt => killed || bot.core_disrupted,
            Self::KillOrNoPower => killed || !bot.any_active(|p| p.def.slot == Slot::Power),
            Self::KillOrNoWeapons => killed || !bot.any_active(|p| p.def.slot == Slot::Weapon),
            Self::KillOrNoTnc => {
                killed || !bot.any_active(|p| p.def.name == TRANSPORT_NETWORK_COUPLER)
            }
            Self::Tele => {
                f64::from(bot.core_integrity) <= f64::from(bot.initial_core_integrity) * 0.8
                    || bot
                        .active_parts()
                        .filter(|p| p.def.slot == Slot::Weapon)
                        .count()
                        == 1
                    || bot
                        .active_parts()
                        .filter(|p| p.def.slot == Slot::Propulsion)
                        .count()
                        == 1
            }
        }
    }
}

impl Simulation {
    /// Runs one full trial from a fresh clone of the initial state.
    ///
    /// Returns `true` if the end condition was met, `false` if the volley
    /// cap was exceeded (non-convergence). Successful trials fold their
    /// outcome into the kill histograms and loot aggregates.
    pub fn simulate_trial(&mut self, rng: &mut dyn Dice) -> bool {
        self.bot = self.template.fresh_trial();
        self.tus = 0.0;
        self.action_num = 0;
        let mut volleys: u32 = 0;
        let mut old_tus = 0.0;

        self.offense.sneak_attack = matches!(
            self.offense.sneak_strategy,
            SneakAttacks::All | SneakAttacks::FirstOnly
        );
        self.offense.momentum.current =
            self.offense.momentum.bonus + self.offense.momentum.initial;
        self.refresh_accuracy();

        let mut end = false;
        while !end {
            self.apply_regen(rng, old_tus);

            volleys += 1;
            let mut volley_time = self.offense.volley_time;

            if self.offense.melee {
                // The primary attack always fires.
                end = self.fire_weapon(rng, 0);
                self.action_num += 1;
                if self.action_num <= 2 {
                    self.refresh_accuracy();
                }

                for i in 1..self.weapons.len() {
                    if end {
                        break;
                    }
                    if rng.percent(f64::from(self.offense.followup_chances[i - 1])) {
                        end = self.fire_weapon(rng, i);
                        // Follow-ups contribute half their delay.
                        volley_time += 0.5 * f64::from(self.weapons[i].delay);
                    }
                }

                // Actuators scale the whole volley; the total time isn't
                // known until the follow-ups resolve.
                volley_time *= self.offense.volley_time_modifier;

                if volleys == 1 {
                    if self.offense.sneak_strategy == SneakAttacks::FirstOnly {
                        self.offense.sneak_attack = false;
                    }
                    self.offense.momentum.current = self.offense.momentum.bonus;
                }
            } else {
                let mut first_weapon = true;
                for i in 0..self.weapons.len() {
                    end = self.fire_weapon(rng, i);
                    if end {
                        break;
                    }
                    if first_weapon {
                        first_weapon = false;
                        self.action_num += 1;
                        if self.action_num <= 2 {
                            self.refresh_accuracy();
                        }
                    }
                }
            }

            if volleys >= MAX_VOLLEYS {
                tracing::debug!(volleys, "volley cap reached, abandoning trial");
                return false;
            }

            if self.offense.ramming {
                // Ramming paces at the slower of one turn or move speed.
                volley_time = f64::from(self.offense.speed).max(100.0);
            }

            old_tus = self.tus;
            self.tus += volley_time;

            let mut refresh = false;

            let (_, siege_tus) = self.offense.siege_bonus;
            if !self.offense.melee && old_tus < siege_tus && self.tus >= siege_tus {
                refresh = true;
            }

            if old_tus < self.bot.tus_to_siege
                && self.tus >= self.bot.tus_to_siege
                && self.bot.behavior == Behavior::SiegeFight
                && self.bot.has_siege_treads()
            {
                self.bot.sieged = true;
                refresh = true;
            }

            if self.bot.behavior == Behavior::RunWhenHit && self.bot.running_momentum < 3 {
                self.bot.running = true;
                self.bot.running_momentum =
                    ((self.tus / f64::from(self.bot.def.speed)).trunc() as i32).min(3);
                refresh = true;
            }

            if refresh {
                self.refresh_accuracy();
            }

            end = self.end_condition.volley_met(&self.bot);
        }

        self.stats.record_kill(volleys, self.tus);
        tracing::debug!(volleys, tus = self.tus, "trial met its end condition");
        self.award_loot(rng);
        true
    }

    /// Applies regeneration for the whole turns completed since the last
    /// volley: core regen, part regen, periodic destroyed-part restoration,
    /// and spontaneous regrowth.
    fn apply_regen(&mut self, rng: &mut dyn Dice, old_tus: f64) {
        let last_turns = (old_tus / 100.0).trunc() as i32;
        let new_turns = (self.tus / 100.0).trunc() as i32;
        let elapsed = new_turns - last_turns;

        self.bot.core_integrity = (self.bot.core_integrity + self.bot.core_regen * elapsed)
            .min(self.bot.initial_core_integrity);

        let part_regen = self.bot.part_regen * elapsed;
        for i in 0..self.bot.active.len() {
            let id = self.bot.active[i];
            let cap = self.bot.part(id).def.integrity;
            let part = self.bot.part_mut(id);
            part.integrity = (part.integrity + part_regen).min(cap);
        }

        if self.bot.part_regen > 0 {
            // One destroyed part comes back every tenth turn.
            let restores = (last_turns..new_turns).filter(|t| t % 10 == 0).count();
            for _ in 0..restores {
                self.restore_destroyed_part(rng);
            }
        }

        let next_attempt = self.bot.regrowth.as_ref().map(|r| r.next_attempt);
        if let Some(next_attempt) = next_attempt {
            if new_turns >= next_attempt {
                self.restore_destroyed_part(rng);
                // Reschedule the next attempt 5 to 25 turns out.
                let bump = rng.roll(5, 24);
                if let Some(regrowth) = &mut self.bot.regrowth {
                    regrowth.next_attempt += bump;
                }
            }
        }
    }

    /// Brings one destroyed part back, refreshing accuracy since avoidance
    /// utilities may have come back with it.
    fn restore_destroyed_part(&mut self, rng: &mut dyn Dice) {
        if self.bot.restore_random_destroyed(rng) {
            self.refresh_accuracy();
        }
    }

    /// Resolves one weapon's contribution to the volley. Returns `true`
    /// if the per-projectile end condition was met mid-fire.
    fn fire_weapon(&mut self, rng: &mut dyn Dice, index: usize) -> bool {
        if self.offense.ramming {
            return self.ram(rng, index);
        }

        let weapon = self.weapons[index].clone();
        for _ in 0..weapon.projectiles {
            // Sneak attacks bypass the accuracy roll outright. Accuracy is
            // re-read per projectile: a destruction mid-burst shifts it.
            let accuracy = self.weapons[index].accuracy;
            let mut hit =
                (self.offense.melee && self.offense.sneak_attack) || rng.percent(accuracy);

            if hit && weapon.missile {
                if let Some(intercept) = self.bot.antimissile_chance() {
                    // One intercept roll per tile, including the target's
                    // own tile, capped at four attempts.
                    let attempts = self.offense.distance.min(4);
                    for _ in 0..attempts {
                        if rng.percent(f64::from(intercept)) {
                            hit = false;
                            break;
                        }
                    }
                }
            }

            if !hit {
                continue;
            }

            if weapon.def.kind == WeaponKind::BallisticCannon && weapon.def.salvage < -2 {
                // Kinetic cannon hits blast matter right off the target.
                let blasted = rng.roll(0, -weapon.def.salvage);
                self.loot.matter_blasted += i64::from(blasted);
            }

            if let Some(damage_type) = weapon.damage_type {
                let mut damage = rng.roll(weapon.damage_min, weapon.damage_max);

                if weapon.overloaded {
                    damage = (f64::from(damage) * 2.0).trunc() as i32;
                }

                if self.offense.melee && self.offense.momentum.current > 0 {
                    damage = self.momentum_damage(damage, damage_type);
                }

                if self.offense.melee && self.offense.sneak_attack {
                    damage *= 2;
                }

                if self.offense.analysis {
                    damage = (1.1 * f64::from(damage)).trunc() as i32;
                }

                if weapon.accelerated {
                    damage = (self.offense.charger_bonus * f64::from(damage)).trunc() as i32;
                }

                damage = self.bot.resistances.resist(damage_type, damage);

                let armor_analyzed =
                    rng.percent(f64::from(self.offense.armor_analyzer_chance));
                let did_critical = rng.percent(f64::from(weapon.critical_chance));
                let critical = if did_critical { weapon.critical } else { None };

                if damage > 0 {
                    self.apply_damage(
                        rng,
                        damage,
                        1,
                        critical,
                        false,
                        armor_analyzed,
                        weapon.disruption,
                        weapon.spectrum,
                        weapon.overflow,
                        damage_type,
                        weapon.salvage,
                    );

                    // Exit mid-volley before the explosion if it's over.
                    if self.end_condition.projectile_met(&self.bot) {
                        return true;
                    }
                }
            }

            if let Some(explosion_type) = weapon.explosion_type {
                let mut damage = rng.roll(weapon.explosion_min, weapon.explosion_max);
                damage = self.bot.resistances.resist(explosion_type, damage);
                let chunks =
                    rng.roll(weapon.explosion_chunks_min, weapon.explosion_chunks_max);

                if damage > 0 {
                    self.apply_damage(
                        rng,
                        damage,
                        chunks,
                        None,
                        true,
                        false,
                        weapon.explosion_disruption,
                        0,
                        weapon.overflow,
                        explosion_type,
                        weapon.salvage,
                    );

                    if self.end_condition.projectile_met(&self.bot) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Ramming damage: mass, speed, and momentum against the target, as
    /// Impact damage with a fixed salvage bonus.
    fn ram(&mut self, rng: &mut dyn Dice, index: usize) -> bool {
        let speed_percent = 100.0 / f64::from(self.offense.speed) * 100.0;
        let mass = f64::from(self.weapons[index].def.mass);
        let momentum = f64::from(self.offense.momentum.current.max(1));
        let damage_max = (((10.0 + mass) / 5.0 + 1.0) * (speed_percent / 100.0) * momentum)
            .min(100.0);

        let damage = rng.roll(0, damage_max.trunc() as i32);
        let damage = self.bot.resistances.resist(DamageType::Impact, damage);

        if damage > 0 {
            self.apply_damage(
                rng,
                damage,
                1,
                None,
                false,
                false,
                0,
                0,
                true,
                DamageType::Impact,
                3,
            );
        }

        self.end_condition.projectile_met(&self.bot)
    }

    /// Melee momentum multiplier:
    /// `([momentum] * [speed%] / 1200) * 40`, clamped to 1-40 and doubled
    /// (uncapped) for Piercing damage.
    fn momentum_damage(&self, damage: i32, damage_type: DamageType) -> i32 {
        let speed_percent = 100.0 / f64::from(self.offense.speed) * 100.0;
        let mut multiplier =
            f64::from(self.offense.momentum.current) * speed_percent / 1200.0 * 40.0;
        multiplier = multiplier.trunc().clamp(1.0, 40.0);
        if damage_type == DamageType::Piercing {
            multiplier *= 2.0;
        }
        multiplier = multiplier / 100.0 + 1.0;
        (multiplier * f64::from(damage)).trunc() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BattleConfig, Loadout, Simulation, WeaponConfig};
    use crate::defs::{BotDef, ItemDef, ItemKind, WeaponDef};
    use crate::rng::seeded;
    use std::sync::Arc;

    fn one_shot_sim(end_condition: EndCondition, bot: BotDef) -> Simulation {
        let mut weapon = WeaponDef::new("Pinpoint", WeaponKind::BallisticGun).with_damage(
            1,
            1,
            DamageType::Kinetic,
        );
        weapon.guided = true; // pin at 100% accuracy
        let battle = BattleConfig {
            end_condition,
            ..BattleConfig::default()
        };
        Simulation::new(
            &Arc::new(bot),
            &Loadout::of_weapons(vec![WeaponConfig::single(Arc::new(weapon))]),
            &battle,
        )
        .unwrap()
    }

    #[test]
    fn guaranteed_one_damage_kills_one_integrity_core_in_one_volley() {
        let mut sim = one_shot_sim(EndCondition::Kill, BotDef::new("fragile", 1, 100));
        let mut rng = seeded(41);
        assert!(sim.simulate_trial(&mut rng));
        assert_eq!(sim.kill_volleys().get(&1), Some(&1));
        assert_eq!(sim.kill_volleys().len(), 1);
    }

    #[test]
    fn no_weapons_condition_ends_without_a_kill() {
        let weapon_part = ItemDef::new(
            "Beam Cannon",
            Slot::Weapon,
            ItemKind::Device,
            1,
            1,
            1_000_000,
        );
        let bot = BotDef::new("armed", 1_000_000, 1).with_part(Arc::new(weapon_part));
        let mut sim = one_shot_sim(EndCondition::KillOrNoWeapons, bot);
        let mut rng = seeded(42);
        assert!(sim.simulate_trial(&mut rng));
        assert!(sim.bot().core_integrity > 0);
        assert!(!sim.bot().any_active(|p| p.def.slot == Slot::Weapon));
    }

    #[test]
    fn tele_condition_triggers_at_eighty_percent_core() {
        let mut sim = one_shot_sim(EndCondition::Tele, BotDef::new("architect", 10, 100));
        let mut rng = seeded(43);
        assert!(sim.simulate_trial(&mut rng));
        assert!(sim.bot().core_integrity <= 8);
        assert!(sim.bot().core_integrity > 0);
    }

    #[test]
    fn core_regen_outpacing_damage_never_converges() {
        let mut bot = BotDef::new("regenerator", 100, 100);
        bot.core_regen = 50;
        let mut sim = one_shot_sim(EndCondition::Kill, bot);
        let mut rng = seeded(44);
        assert!(!sim.simulate_trial(&mut rng), "trial should hit the volley cap");
        assert!(sim.kill_volleys().is_empty());
    }

    #[test]
    fn kill_histograms_accumulate_across_trials() {
        let mut sim = one_shot_sim(EndCondition::Kill, BotDef::new("fragile", 1, 100));
        let mut rng = seeded(45);
        for _ in 0..10 {
            assert!(sim.simulate_trial(&mut rng));
        }
        assert_eq!(sim.kill_volleys().get(&1), Some(&10));
        assert_eq!(sim.loot().kills, 10);
    }
}
