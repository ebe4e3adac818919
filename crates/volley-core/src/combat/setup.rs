//! Engagement configuration and initial-state construction.
//!
//! [`Simulation::new`] is the single entry point: it resolves a bot record,
//! a weapon loadout, and battle parameters into the immutable initial
//! [`BotState`]/[`OffensiveState`] pair plus the per-weapon combat stats.
//! Invalid configurations are rejected here — the engine itself never
//! validates mid-trial.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::defs::{Behavior, BotDef, Critical, DamageType, SiegeMode, WeaponDef};
use crate::error::SetupError;
use crate::state::{BotState, ExternalReduction};

use super::engine::EndCondition;
use super::loot::{LootTracker, TrialStats};
use super::Simulation;

/// Base hit chance for ranged attacks before modifiers.
pub(crate) const INITIAL_RANGED_ACCURACY: f64 = 60.0;
/// Base hit chance for melee attacks before modifiers.
pub(crate) const INITIAL_MELEE_ACCURACY: f64 = 70.0;

/// Minimum-damage increase per melee analysis tier.
const MELEE_ANALYSIS_MIN_DAMAGE: [i32; 4] = [2, 3, 4, 6];
/// Maximum-damage increase per force booster tier.
const FORCE_BOOSTER_MAX_DAMAGE: [f64; 3] = [0.2, 0.3, 0.4];

/// Base volley time by ranged weapon count; flat past six weapons.
fn base_volley_time(weapons: usize) -> f64 {
    match weapons {
        0 => 0.0,
        1 => 200.0,
        2 => 300.0,
        3 => 325.0,
        4 => 350.0,
        5 => 375.0,
        _ => 400.0,
    }
}

/// Melee versus ranged engagement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatType {
    /// Stand-off combat; all weapons fire each volley.
    Ranged,
    /// Melee combat; a primary attack with probabilistic follow-ups.
    Melee,
}

/// Sneak-attack strategy for melee engagements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SneakAttacks {
    /// Never sneak-attack.
    None,
    /// Only the opening volley is a sneak attack.
    FirstOnly,
    /// Every volley is a sneak attack.
    All,
}

/// The attacker's siege-mode plan for the fight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiegePlan {
    /// Not using siege mode.
    None,
    /// Already in siege mode when the fight starts.
    Active(SiegeMode),
    /// Transitioning into siege mode; the bonus lands after 500 TUs.
    Entering(SiegeMode),
}

impl SiegePlan {
    /// Accuracy bonus once active.
    #[must_use]
    pub fn bonus(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Active(mode) | Self::Entering(mode) => match mode {
                SiegeMode::Standard => 20,
                SiegeMode::High => 30,
            },
        }
    }

    /// TUs after which the bonus applies.
    #[must_use]
    pub fn activation_tus(self) -> f64 {
        match self {
            Self::None | Self::Active(_) => 0.0,
            Self::Entering(_) => 500.0,
        }
    }
}

/// One weapon line in the loadout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// The weapon record.
    pub def: Arc<WeaponDef>,
    /// How many copies are equipped.
    pub count: i32,
    /// Overloaded (or exoskeleton-boosted) fire doubles damage.
    pub overloaded: bool,
}

impl WeaponConfig {
    /// One copy of a weapon, fired normally.
    #[must_use]
    pub fn single(def: Arc<WeaponDef>) -> Self {
        Self {
            def,
            count: 1,
            overloaded: false,
        }
    }
}

/// Attacker utility configuration. All values default to "not equipped".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtilityConfig {
    /// Kinecellerator minimum-damage bonus, percent.
    pub kinecellerator: i32,
    /// Particle charger damage bonus, percent. Multiple chargers do not
    /// stack; the strongest one applies.
    pub particle_charger: i32,
    /// Weapon cycling volley-time reduction, percent.
    pub weapon_cycling: i32,
    /// Actuator melee volley-time reduction, percent.
    pub actuator: i32,
    /// Actuator array follow-up chance bonus.
    pub actuator_array: i32,
    /// Armor integrity analyzer proc chance, percent.
    pub armor_analyzer: i32,
    /// Core analyzer exposure bonus, percent.
    pub core_analyzer: i32,
    /// Target analyzer critical-chance bonus.
    pub target_analyzer: i32,
    /// Salvage targeting computer bonus.
    pub salvage_targeting: i32,
    /// Total recoil reduction from stabilizers.
    pub recoil_reduction: i32,
    /// Equipped melee analysis counts per tier (base through experimental).
    pub melee_analysis: [i32; 4],
    /// Equipped force booster counts per tier (base through advanced).
    pub force_boosters: [i32; 3],
}

/// The attacker's full loadout: weapons plus supporting utilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadout {
    /// Weapon lines.
    pub weapons: Vec<WeaponConfig>,
    /// Utility configuration.
    pub utility: UtilityConfig,
}

impl Loadout {
    /// A loadout of the given weapons with no utilities.
    #[must_use]
    pub fn of_weapons(weapons: Vec<WeaponConfig>) -> Self {
        Self {
            weapons,
            utility: UtilityConfig::default(),
        }
    }
}

/// Battle parameters for an engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Melee or ranged.
    pub combat: CombatType,
    /// Distance to the target in tiles; closes distance bonuses under 6.
    pub distance: i32,
    /// The attacker's siege plan.
    pub siege: SiegePlan,
    /// Targeting computer accuracy bonus (ranged only).
    pub targeting_bonus: i32,
    /// Actions the attacker has stood still for when the fight starts.
    pub actions_since_moving: i32,
    /// Tiles run on legs immediately before the fight (ranged penalty).
    pub tiles_run: i32,
    /// Attacker speed; drives melee momentum and ramming time.
    pub speed: i32,
    /// Momentum bonus held every volley.
    pub momentum_bonus: i32,
    /// Extra momentum on the opening volley only.
    pub momentum_initial: i32,
    /// Sneak-attack strategy.
    pub sneak_attacks: SneakAttacks,
    /// Whether the target has been combat-analyzed (+10% damage, +5
    /// accuracy).
    pub analysis: bool,
    /// The attacker's own corruption, percent; degrades base accuracy.
    pub corruption: i32,
    /// What ends a trial.
    pub end_condition: EndCondition,
    /// External damage reduction effect protecting the target.
    pub external_reduction: Option<ExternalReduction>,
    /// Target behavior profile.
    pub enemy_behavior: Behavior,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            combat: CombatType::Ranged,
            distance: 6,
            siege: SiegePlan::None,
            targeting_bonus: 0,
            actions_since_moving: 2,
            tiles_run: 0,
            speed: 100,
            momentum_bonus: 0,
            momentum_initial: 0,
            sneak_attacks: SneakAttacks::None,
            analysis: false,
            corruption: 0,
            end_condition: EndCondition::Kill,
            external_reduction: None,
            enemy_behavior: Behavior::StandFight,
        }
    }
}

/// Melee momentum state.
#[derive(Debug, Copy, Clone)]
pub struct Momentum {
    /// Momentum held every volley.
    pub bonus: i32,
    /// Momentum in effect right now.
    pub current: i32,
    /// Extra momentum for the opening volley.
    pub initial: i32,
}

/// Attacker-side modifiers, resolved once per engagement.
#[derive(Debug, Clone)]
pub struct OffensiveState {
    /// Melee engagement flag.
    pub melee: bool,
    /// Whether the "attack" is actually ramming.
    pub ramming: bool,
    /// Whether the target has been combat-analyzed (+10% damage, +5 acc).
    pub analysis: bool,
    /// Armor integrity analyzer proc chance.
    pub armor_analyzer_chance: i32,
    /// Core analyzer exposure bonus.
    pub core_analyzer_chance: i32,
    /// Particle charger damage multiplier.
    pub charger_bonus: f64,
    /// Distance to the target.
    pub distance: i32,
    /// Follow-up chance per non-primary melee weapon.
    pub followup_chances: Vec<i32>,
    /// Force booster counts after half-stack reduction.
    pub force_boosters: [i32; 3],
    /// Melee analysis counts per tier.
    pub melee_analysis: [i32; 4],
    /// Melee momentum state.
    pub momentum: Momentum,
    /// Total recoil across the volley.
    pub recoil: i32,
    /// Recoil reduction from stabilizers.
    pub recoil_reduction: i32,
    /// Siege accuracy bonus and its activation TU.
    pub siege_bonus: (i32, f64),
    /// Whether the current volley is a sneak attack.
    pub sneak_attack: bool,
    /// Sneak-attack strategy.
    pub sneak_strategy: SneakAttacks,
    /// Attacker speed.
    pub speed: i32,
    /// Base volley time before per-volley adjustments.
    pub volley_time: f64,
    /// Actuator/cycler volley-time multiplier.
    pub volley_time_modifier: f64,
    /// Accuracy adjustment on the first action.
    pub action1_accuracy: i32,
    /// Accuracy adjustment on the second action.
    pub action2_accuracy: i32,
}

/// Per-trial combat stats for one equipped weapon.
///
/// Mostly immutable once resolved; `accuracy` is recomputed as the fight
/// state changes.
#[derive(Debug, Clone)]
pub struct SimWeapon {
    /// The weapon record.
    pub def: Arc<WeaponDef>,
    /// Live hit chance, percent.
    pub accuracy: f64,
    /// Hit chance component that never changes during the fight.
    pub base_accuracy: f64,
    /// Critical chance, percent.
    pub critical_chance: i32,
    /// Critical effect on a crit roll.
    pub critical: Option<Critical>,
    /// Minimum direct damage.
    pub damage_min: i32,
    /// Maximum direct damage.
    pub damage_max: i32,
    /// Direct damage type, if the weapon deals direct damage.
    pub damage_type: Option<DamageType>,
    /// Volley delay contribution.
    pub delay: i32,
    /// Disruption chance on hits.
    pub disruption: i32,
    /// Spectrum engine-detonation chance, percent.
    pub spectrum: i32,
    /// Minimum explosion damage.
    pub explosion_min: i32,
    /// Maximum explosion damage.
    pub explosion_max: i32,
    /// Explosion damage type, if the weapon explodes.
    pub explosion_type: Option<DamageType>,
    /// Explosion disruption chance.
    pub explosion_disruption: i32,
    /// Minimum explosion chunk count.
    pub explosion_chunks_min: i32,
    /// Maximum explosion chunk count.
    pub explosion_chunks_max: i32,
    /// Projectiles per volley.
    pub projectiles: i32,
    /// Whether excess destruction damage overflows onward.
    pub overflow: bool,
    /// Whether particle charging applies.
    pub accelerated: bool,
    /// Whether the weapon fires overloaded.
    pub overloaded: bool,
    /// Whether antimissile defenses can intercept it.
    pub missile: bool,
    /// Waypoint-guided weapons are pinned at 100% accuracy.
    pub guided: bool,
    /// Salvage modifier inflicted on hits.
    pub salvage: i32,
}

impl Simulation {
    /// Builds a simulation from a bot record, a loadout, and battle
    /// parameters.
    ///
    /// # Errors
    ///
    /// [`SetupError::NoWeapons`] for an empty loadout;
    /// [`SetupError::CombatMismatch`] when a weapon's class contradicts the
    /// configured combat type.
    pub fn new(
        bot: &Arc<BotDef>,
        loadout: &Loadout,
        battle: &BattleConfig,
    ) -> Result<Self, SetupError> {
        let melee = battle.combat == CombatType::Melee;
        let utility = &loadout.utility;

        // Expand weapon lines into individual weapons.
        let mut user_weapons: Vec<(Arc<WeaponDef>, bool)> = Vec::new();
        for line in &loadout.weapons {
            if line.def.kind.is_melee() != melee {
                return Err(SetupError::CombatMismatch {
                    weapon: line.def.name.clone(),
                    expected: if melee { "melee" } else { "ranged" },
                });
            }
            for _ in 0..line.count.max(0) {
                user_weapons.push((Arc::clone(&line.def), line.overloaded));
            }
        }
        if user_weapons.is_empty() {
            return Err(SetupError::NoWeapons);
        }

        // Force boosters half-stack: only the two highest-tier boosters
        // count at all.
        let mut force_boosters = utility.force_boosters;
        if melee {
            let mut remaining = 2;
            for count in force_boosters.iter_mut().rev() {
                if *count > remaining {
                    *count = remaining;
                    remaining = 0;
                } else {
                    remaining -= *count;
                }
            }
        }

        let distance = battle.distance.max(1);
        let corruption_penalty = battle.corruption / 4;
        let targeting_bonus = if melee { 0 } else { battle.targeting_bonus };
        let siege = if melee { SiegePlan::None } else { battle.siege };

        let all_recoil: i32 = user_weapons
            .iter()
            .map(|(def, _)| weapon_recoil(def, utility.recoil_reduction))
            .sum();

        let mut ramming = false;
        let weapons: Vec<SimWeapon> = user_weapons
            .iter()
            .enumerate()
            .map(|(index, (def, overloaded))| {
                if def.ram {
                    ramming = true;
                }
                resolve_weapon(
                    def,
                    *overloaded,
                    index,
                    melee,
                    bot,
                    utility,
                    &force_boosters,
                    targeting_bonus,
                    corruption_penalty,
                )
            })
            .collect();

        // Follow-up chance per non-primary melee weapon:
        // 20 + actuator array + (primary delay - own delay) / 10.
        let mut followup_chances = Vec::new();
        if melee {
            let base_chance = 20 + utility.actuator_array;
            for weapon in weapons.iter().skip(1) {
                let chance = base_chance + (weapons[0].delay - weapon.delay) / 10;
                followup_chances.push(chance.clamp(0, 100));
            }
        }

        let modifier_percent = if melee {
            utility.actuator
        } else {
            utility.weapon_cycling
        }
        .clamp(0, 99);
        let volley_time_modifier = 1.0 - f64::from(modifier_percent) / 100.0;

        let volley_time = if melee {
            f64::from(weapons[0].delay) + base_volley_time(1)
        } else {
            ranged_volley_time(&weapons, volley_time_modifier)
        };

        // Temporary accuracy schedule: -10% after moving, +10% after two
        // still actions; the third action onward is always +10%.
        let (mut action1_accuracy, action2_accuracy) = match battle.actions_since_moving {
            0 => (if melee { 0 } else { -10 }, 0),
            1 => (0, 10),
            _ => (10, 10),
        };
        if battle.tiles_run > 0 && !melee {
            action1_accuracy -= battle.tiles_run.min(3) * 5;
        }

        let offense = OffensiveState {
            melee,
            ramming,
            analysis: battle.analysis,
            armor_analyzer_chance: utility.armor_analyzer,
            core_analyzer_chance: utility.core_analyzer,
            charger_bonus: 1.0 + f64::from(utility.particle_charger.max(0)) / 100.0,
            distance,
            followup_chances,
            force_boosters,
            melee_analysis: utility.melee_analysis,
            momentum: Momentum {
                bonus: battle.momentum_bonus,
                current: battle.momentum_bonus + battle.momentum_initial,
                initial: battle.momentum_initial,
            },
            recoil: all_recoil,
            recoil_reduction: utility.recoil_reduction,
            siege_bonus: (siege.bonus(), siege.activation_tus()),
            sneak_attack: false,
            sneak_strategy: battle.sneak_attacks,
            speed: battle.speed,
            volley_time,
            volley_time_modifier,
            action1_accuracy,
            action2_accuracy,
        };

        let template = BotState::from_def(bot, battle.enemy_behavior, battle.external_reduction);
        let loot = LootTracker::for_template(&template);

        Ok(Self {
            bot: template.fresh_trial(),
            template,
            offense,
            weapons,
            end_condition: battle.end_condition,
            tus: 0.0,
            action_num: 0,
            stats: TrialStats::default(),
            loot,
        })
    }

}

/// Net recoil a weapon contributes to the rest of the volley.
pub(crate) fn weapon_recoil(def: &WeaponDef, recoil_reduction: i32) -> i32 {
    (def.recoil - recoil_reduction).max(0)
}

fn ranged_volley_time(weapons: &[SimWeapon], cycler_modifier: f64) -> f64 {
    let mut volley_time = base_volley_time(weapons.len());
    for weapon in weapons {
        volley_time += f64::from(weapon.delay);
    }
    volley_time *= cycler_modifier;
    volley_time.max(25.0).trunc()
}

#[allow(clippy::too_many_arguments)]
fn resolve_weapon(
    def: &Arc<WeaponDef>,
    overloaded: bool,
    index: usize,
    melee: bool,
    bot: &BotDef,
    utility: &UtilityConfig,
    force_boosters: &[i32; 3],
    targeting_bonus: i32,
    corruption_penalty: i32,
) -> SimWeapon {
    let mut damage_min = 0;
    let mut damage_max = 0;
    let mut damage_type = None;
    let mut disruption = 0;
    let mut spectrum = 0;

    if let Some(spec) = &def.damage {
        damage_min = spec.min;
        damage_max = spec.max;
        damage_type = Some(spec.ty);
        disruption = spec.disruption;
        spectrum = spec.spectrum.map_or(0, crate::defs::Spectrum::chance);

        if def.kind.ballistic() {
            // Kinecellerators raise minimum damage; the minimum may drag
            // the maximum up with it.
            damage_min = (f64::from(damage_min)
                * (1.0 + f64::from(utility.kinecellerator) / 100.0))
                .trunc() as i32;
            if damage_min > damage_max {
                damage_max = damage_min;
            }
        } else if melee {
            let min_increase: i32 = utility
                .melee_analysis
                .iter()
                .zip(MELEE_ANALYSIS_MIN_DAMAGE)
                .map(|(count, bonus)| count * bonus)
                .sum();
            damage_min = (damage_min + min_increase).min(damage_max);

            // Force boosters raise maximum damage; a doubled top tier
            // counts at 1.5x, a second booster at half value.
            let mut max_increase = 0.0;
            let mut boosters_processed = 0;
            for i in (0..force_boosters.len()).rev() {
                if force_boosters[i] == 2 {
                    max_increase = 1.5 * FORCE_BOOSTER_MAX_DAMAGE[i];
                    boosters_processed += 2;
                } else if force_boosters[i] == 1 {
                    max_increase += FORCE_BOOSTER_MAX_DAMAGE[i]
                        * if boosters_processed == 0 { 1.0 } else { 0.5 };
                    boosters_processed += 1;
                }
            }
            damage_max = (f64::from(damage_max) * (1.0 + max_increase)).floor() as i32;
        }
    }

    let (explosion_min, explosion_max, explosion_type, explosion_disruption) = def
        .explosion
        .as_ref()
        .map_or((0, 0, None, 0), |spec| {
            (spec.min, spec.max, Some(spec.ty), spec.disruption)
        });
    let (explosion_chunks_min, explosion_chunks_max) = def
        .explosion
        .as_ref()
        .map_or((1, 1), |spec| (spec.chunks_min, spec.chunks_max));

    // Target analyzers never help meltdown weapons or critless weapons.
    let critical_chance = if def.critical == Some(Critical::Meltdown) {
        def.critical_chance
    } else if def.critical_chance == 0 {
        0
    } else {
        def.critical_chance + utility.target_analyzer
    };

    let mut base_accuracy = if melee {
        INITIAL_MELEE_ACCURACY
    } else {
        INITIAL_RANGED_ACCURACY
    };
    base_accuracy += f64::from(targeting_bonus);
    base_accuracy += f64::from(bot.size.accuracy_bonus());
    base_accuracy += f64::from(def.targeting);
    base_accuracy -= f64::from(corruption_penalty);
    if melee && index != 0 {
        // Melee follow-up attacks aim 10% better.
        base_accuracy += 10.0;
    }

    let mut salvage = def.salvage;
    if utility.salvage_targeting > 0 && def.projectiles == 1 && def.kind.is_gun() {
        salvage += utility.salvage_targeting;
    }

    SimWeapon {
        accuracy: base_accuracy,
        base_accuracy,
        critical_chance,
        critical: def.critical,
        damage_min,
        damage_max,
        damage_type,
        delay: def.delay,
        disruption,
        spectrum,
        explosion_min,
        explosion_max,
        explosion_type,
        explosion_disruption,
        explosion_chunks_min,
        explosion_chunks_max,
        projectiles: def.projectiles,
        overflow: !def.kind.is_gun(),
        accelerated: def.kind.accelerated(),
        overloaded,
        missile: def.missile,
        guided: def.guided,
        salvage,
        def: Arc::clone(def),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::WeaponKind;

    fn rifle() -> Arc<WeaponDef> {
        Arc::new(
            WeaponDef::new("Assault Rifle", WeaponKind::BallisticGun).with_damage(
                10,
                20,
                DamageType::Kinetic,
            ),
        )
    }

    fn target() -> Arc<BotDef> {
        Arc::new(BotDef::new("target", 100, 40))
    }

    #[test]
    fn empty_loadout_is_rejected() {
        let err = Simulation::new(
            &target(),
            &Loadout::of_weapons(Vec::new()),
            &BattleConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SetupError::NoWeapons);
    }

    #[test]
    fn melee_weapon_in_ranged_battle_is_rejected() {
        let spear = Arc::new(
            WeaponDef::new("Spear", WeaponKind::PiercingWeapon).with_damage(
                5,
                15,
                DamageType::Piercing,
            ),
        );
        let err = Simulation::new(
            &target(),
            &Loadout::of_weapons(vec![WeaponConfig::single(spear)]),
            &BattleConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::CombatMismatch { .. }));
    }

    #[test]
    fn weapon_lines_expand_by_count() {
        let sim = Simulation::new(
            &target(),
            &Loadout::of_weapons(vec![WeaponConfig {
                def: rifle(),
                count: 3,
                overloaded: false,
            }]),
            &BattleConfig::default(),
        )
        .unwrap();
        assert_eq!(sim.weapons().len(), 3);
    }

    #[test]
    fn kinecellerator_raises_min_damage() {
        let mut loadout = Loadout::of_weapons(vec![WeaponConfig::single(rifle())]);
        loadout.utility.kinecellerator = 50;
        let sim = Simulation::new(&target(), &loadout, &BattleConfig::default()).unwrap();
        assert_eq!(sim.weapons()[0].damage_min, 15);
        assert_eq!(sim.weapons()[0].damage_max, 20);
    }

    #[test]
    fn ranged_volley_time_includes_delays_and_floor() {
        let slow = Arc::new({
            let mut def = WeaponDef::new("Cannon", WeaponKind::BallisticCannon);
            def.delay = 50;
            def.damage = Some(crate::defs::DamageSpec {
                min: 10,
                max: 20,
                ty: DamageType::Kinetic,
                disruption: 0,
                spectrum: None,
            });
            def
        });
        let sim = Simulation::new(
            &target(),
            &Loadout::of_weapons(vec![
                WeaponConfig::single(Arc::clone(&slow)),
                WeaponConfig::single(slow),
            ]),
            &BattleConfig::default(),
        )
        .unwrap();
        // 2 weapons -> 300 base, +100 delay.
        assert!((sim.offense.volley_time - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn guns_never_overflow() {
        let sim = Simulation::new(
            &target(),
            &Loadout::of_weapons(vec![WeaponConfig::single(rifle())]),
            &BattleConfig::default(),
        )
        .unwrap();
        assert!(!sim.weapons()[0].overflow);
    }

    #[test]
    fn force_boosters_reduce_to_two_highest() {
        let spear = Arc::new(
            WeaponDef::new("Spear", WeaponKind::PiercingWeapon).with_damage(
                10,
                20,
                DamageType::Piercing,
            ),
        );
        let mut loadout = Loadout::of_weapons(vec![WeaponConfig::single(spear)]);
        loadout.utility.force_boosters = [2, 1, 1];
        let battle = BattleConfig {
            combat: CombatType::Melee,
            ..BattleConfig::default()
        };
        let sim = Simulation::new(&target(), &loadout, &battle).unwrap();
        // Advanced and improved boosters survive; the base pair is dropped.
        assert_eq!(sim.offense.force_boosters, [0, 1, 1]);
    }
}
