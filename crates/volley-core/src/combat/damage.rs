//! The damage application engine.
//!
//! One call to [`Simulation::apply_damage`] resolves a final calculated
//! damage total against the bot: splitting into chunks, consulting the
//! damage-reduction stack, picking hit parts, running shielding, resolving
//! the critical-effect state machine, chaining engine explosions and
//! overflow, and feeding the corruption pipeline. Everything recursive
//! (overflow, phasing, blasts, engine explosions) re-enters through the
//! same internal entry points.

use std::sync::Arc;

use crate::defs::{Critical, DamageType, Immunities, ItemKind, ShieldSlot, Slot};
use crate::rng::Dice;

use super::target::{random_non_core_part, select_hit_part};
use super::Simulation;

/// Why a part left combat; critical removals keep their loot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RemovalCause {
    /// Integrity ran out (or an effect zeroed it).
    Depleted,
    /// A critical effect removed the part while still intact.
    CritRemoved,
}

/// Context shared by every recursive step of one `apply_damage` call.
struct DamageCtx {
    /// Whether excess destruction damage may overflow onward.
    can_overflow: bool,
    /// The critical rolled for the attack itself; overflow is suppressed
    /// for critical attacks, and the Corrupt critical pins the corruption
    /// multiplier.
    attack_critical: Option<Critical>,
}

struct Chunk {
    armor_analyzed: bool,
    core_bonus: i32,
    critical: Option<Critical>,
    disrupt_chance: i32,
    original_damage: i32,
    real_damage: i32,
    spectrum: i32,
}

fn critical_destroys_part(critical: Option<Critical>) -> bool {
    matches!(critical, Some(Critical::Destroy | Critical::Smash))
}

impl Simulation {
    /// Applies a final calculated damage value to the bot, splitting it
    /// into `num_chunks` equal truncated chunks.
    ///
    /// AoE chunks skip criticals, armor analysis, core bonuses, disruption
    /// and spectrum. The salvage modifier lands once for the whole call.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn apply_damage(
        &mut self,
        rng: &mut dyn Dice,
        total_damage: i32,
        num_chunks: i32,
        critical: Option<Critical>,
        is_aoe: bool,
        armor_analyzed: bool,
        disrupt_chance: i32,
        spectrum: i32,
        can_overflow: bool,
        damage_type: DamageType,
        salvage: i32,
    ) {
        if num_chunks <= 0 {
            return;
        }
        // The remainder of the division is discarded, not redistributed.
        let damage = total_damage / num_chunks;

        let mut chunks = Vec::with_capacity(usize::try_from(num_chunks).unwrap_or(0));
        for _ in 0..num_chunks {
            if is_aoe {
                chunks.push(Chunk {
                    armor_analyzed: false,
                    core_bonus: 0,
                    critical: None,
                    disrupt_chance: 0,
                    original_damage: damage,
                    real_damage: 0,
                    spectrum: 0,
                });
            } else {
                chunks.push(Chunk {
                    armor_analyzed,
                    core_bonus: self.offense.core_analyzer_chance,
                    critical,
                    disrupt_chance,
                    original_damage: damage,
                    real_damage: 0,
                    spectrum,
                });
            }
        }

        // At most one reduction entry applies per hit. Remote projectors
        // shave off only the reduced fraction; worn fields scale directly.
        match self.bot.damage_reduction() {
            Some(entry) if entry.remote => {
                for chunk in &mut chunks {
                    let original = f64::from(chunk.original_damage);
                    chunk.real_damage = chunk.original_damage
                        - (original * (1.0 - entry.multiplier)).trunc() as i32;
                }
            }
            Some(entry) => {
                for chunk in &mut chunks {
                    chunk.real_damage =
                        (f64::from(chunk.original_damage) * entry.multiplier).trunc() as i32;
                }
            }
            None => {
                for chunk in &mut chunks {
                    chunk.real_damage = chunk.original_damage;
                }
            }
        }

        self.bot.salvage += salvage;

        let ctx = DamageCtx {
            can_overflow,
            attack_critical: critical,
        };

        for chunk in &chunks {
            if chunk.real_damage == 0 {
                // A chunk ground down to nothing ends the application;
                // zero-damage chunks never mutate state.
                return;
            }

            let target = select_hit_part(
                &self.bot,
                rng,
                chunk.core_bonus,
                damage_type,
                false,
                chunk.armor_analyzed,
            );
            self.apply_chunk_to_part(
                rng,
                &ctx,
                chunk.real_damage,
                damage_type,
                chunk.critical,
                f64::from(chunk.disrupt_chance),
                chunk.spectrum,
                false,
                target,
            );

            if damage_type == DamageType::Electromagnetic {
                self.apply_chunk_corruption(rng, &ctx, chunk.original_damage);
            }
        }
    }

    /// EM chunks corrupt in proportion to their pre-reduction damage.
    fn apply_chunk_corruption(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        original_damage: i32,
    ) {
        let applies = match self.bot.corruption_ignore_chance() {
            Some(chance) => !rng.percent(f64::from(chance)),
            None => true,
        };
        if !applies {
            return;
        }

        let corrupt_critical = ctx.attack_critical == Some(Critical::Corrupt)
            && !self.bot.immunities.contains(Immunities::CRITICALS);
        // The Corrupt critical pins the multiplier at its 1.5 maximum.
        let percent = if corrupt_critical {
            1.5
        } else {
            f64::from(rng.roll(50, 150)) / 100.0
        };
        let corruption = f64::from(original_damage) * percent;
        self.apply_corruption(rng, ctx, corruption);
    }

    /// Re-entry point for overflow and engine-explosion chunks: picks a
    /// target and resolves against it.
    #[allow(clippy::too_many_arguments)]
    fn apply_followup_chunk(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        damage: i32,
        damage_type: DamageType,
        is_overflow: bool,
        disrupt_chance: f64,
        spectrum: i32,
    ) {
        let target = select_hit_part(&self.bot, rng, 0, damage_type, is_overflow, false);
        self.apply_chunk_to_part(
            rng,
            ctx,
            damage,
            damage_type,
            None,
            disrupt_chance,
            spectrum,
            is_overflow,
            target,
        );
    }

    /// Resolves one damage chunk against a specific target (`None` = core).
    #[allow(clippy::too_many_arguments)]
    fn apply_chunk_to_part(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        mut damage: i32,
        damage_type: DamageType,
        mut critical: Option<Critical>,
        disrupt_chance: f64,
        spectrum: i32,
        is_overflow: bool,
        target: Option<usize>,
    ) {
        // Pin the target's identity now: critical pre-effects below can
        // reshuffle the active list before the hit itself resolves.
        let target_id = target.map(|index| self.bot.active[index]);

        // Totally immune bots never see criticals at all.
        if critical.is_some() && self.bot.criticals_suppressed() {
            critical = None;
        }

        match critical {
            // Meltdown is immediate death unless specifically immune.
            Some(Critical::Meltdown)
                if !self.bot.immunities.contains(Immunities::MELTDOWN) =>
            {
                self.bot.core_integrity = 0;
                return;
            }
            Some(Critical::Intensify) => damage *= 2,
            Some(Critical::Impale) => {
                damage *= 2;
                // Impalement costs the attacker a full turn.
                self.tus += 100.0;
            }
            Some(Critical::Detonate) => {
                // Detonate the first power source found, if any.
                let engine = self
                    .bot
                    .active
                    .iter()
                    .position(|id| self.bot.part(*id).def.slot == Slot::Power);
                if let Some(index) = engine {
                    let engine_id = self.bot.active[index];
                    self.destroy_part(
                        rng,
                        ctx,
                        engine_id,
                        0,
                        DamageType::Entropic,
                        RemovalCause::Depleted,
                    );
                    self.engine_explosion(rng, ctx, engine_id);
                    if target_id == Some(engine_id) {
                        // The detonation consumed the part we were hitting.
                        return;
                    }
                }
            }
            Some(Critical::Sever | Critical::Sunder)
                if self.bot.immunities.contains(Immunities::DISMEMBERMENT) =>
            {
                critical = None;
            }
            Some(Critical::Phase)
                if self.bot.immunities.contains(Immunities::CORING)
                    || self.bot.shielding(ShieldSlot::Core).is_some() =>
            {
                critical = None;
            }
            _ => {}
        }

        match target_id {
            None => self.resolve_core_hit(rng, ctx, damage, critical, disrupt_chance, is_overflow),
            Some(id) => self.resolve_part_hit(
                rng,
                ctx,
                damage,
                damage_type,
                critical,
                spectrum,
                is_overflow,
                id,
            ),
        }
    }

    fn resolve_core_hit(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        mut damage: i32,
        mut critical: Option<Critical>,
        disrupt_chance: f64,
        is_overflow: bool,
    ) {
        let shielding = if is_overflow {
            None
        } else {
            self.bot.shielding(ShieldSlot::Core)
        };

        // Core-targeting criticals are stripped by coring immunity or any
        // live core shielding.
        if matches!(
            critical,
            Some(
                Critical::Destroy
                    | Critical::Phase
                    | Critical::Smash
                    | Critical::Sunder
                    | Critical::Sever
            )
        ) && (self.bot.immunities.contains(Immunities::CORING) || shielding.is_some())
        {
            critical = None;
        }

        if let Some(shield) = &shielding {
            // Shielding may absorb more damage than it has integrity.
            let absorbed = (shield.fraction * f64::from(damage)).trunc() as i32;
            self.bot.part_mut(shield.part).integrity -= absorbed;
            if self.bot.part(shield.part).integrity <= 0 {
                self.destroy_part(
                    rng,
                    ctx,
                    shield.part,
                    0,
                    DamageType::Entropic,
                    RemovalCause::Depleted,
                );
            }
            damage -= absorbed;
        }

        if critical_destroys_part(critical) {
            self.bot.core_integrity = 0;
        } else {
            self.bot.core_integrity -= damage;
        }
        if self.bot.core_integrity == 0 {
            return;
        }

        // Core disruption runs at half the listed chance.
        if !self.bot.immunities.contains(Immunities::DISRUPTION)
            && rng.percent(disrupt_chance / 2.0)
        {
            self.bot.core_disrupted = true;
        }

        match critical {
            Some(crit @ (Critical::Sever | Critical::Sunder)) => {
                let num_parts = if crit == Critical::Sunder {
                    rng.roll(1, 2)
                } else {
                    1
                };
                for _ in 0..num_parts {
                    let Some(index) = random_non_core_part(&self.bot, rng, None) else {
                        continue;
                    };
                    let id = self.bot.active[index];
                    let slot = self.bot.part(id).def.slot;
                    if self.bot.shielding(ShieldSlot::from(slot)).is_some() {
                        // Shielding protects against severing completely.
                        continue;
                    }
                    if self.bot.part(id).def.size > 1 {
                        // Multi-slot parts can't be torn off.
                        continue;
                    }
                    // Severed parts lose 5-25% of max integrity on the way out.
                    let bite = self.bot.part(id).def.integrity * rng.roll(5, 25) / 100;
                    self.bot.part_mut(id).integrity -= bite;
                    self.destroy_part(
                        rng,
                        ctx,
                        id,
                        0,
                        DamageType::Phasic,
                        RemovalCause::CritRemoved,
                    );
                }
            }
            Some(Critical::Blast) => {
                let Some(index) = random_non_core_part(&self.bot, rng, None) else {
                    return;
                };
                let id = self.bot.active[index];
                let slot = self.bot.part(id).def.slot;
                if self.bot.shielding(ShieldSlot::from(slot)).is_some() {
                    return;
                }
                self.blast_part(rng, ctx, damage, index, id);
            }
            Some(Critical::Phase) => {
                // Phase damage jumps from the core to a random part.
                let target = random_non_core_part(&self.bot, rng, None);
                self.apply_chunk_to_part(
                    rng,
                    ctx,
                    damage,
                    DamageType::Phasic,
                    None,
                    0.0,
                    0,
                    false,
                    target,
                );
            }
            _ => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_part_hit(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        mut damage: i32,
        damage_type: DamageType,
        mut critical: Option<Critical>,
        spectrum: i32,
        is_overflow: bool,
        id: crate::state::PartId,
    ) {
        let Some(index) = self.bot.active_index_of(id) else {
            return;
        };
        let def = Arc::clone(&self.bot.part(id).def);

        // Protection and overflow hits bypass slot shielding.
        let shielding = if def.kind == ItemKind::Protection || is_overflow {
            None
        } else {
            self.bot.shielding(ShieldSlot::from(def.slot))
        };

        if shielding.is_some() && critical_destroys_part(critical) {
            critical = None;
        }

        // Spectrum weapons can chain-detonate the engine they strike.
        let engine_explosion =
            def.slot == Slot::Power && rng.percent(f64::from(spectrum));

        // Protection can't be instantly destroyed, nor can planted siege
        // treads; both convert the critical into 20% bonus damage.
        let sieged_treads = self.bot.sieged
            && def.kind == ItemKind::Treads
            && def.siege.is_some();
        if (critical_destroys_part(critical) && self.bot.part(id).protection) || sieged_treads {
            critical = None;
            damage = (1.2 * f64::from(damage)).trunc() as i32;
        }

        // Powered armor soaks its own hits; planted siege treads otherwise
        // take reduced damage by siege class.
        let self_reduction = self.bot.part(id).self_damage_reduction;
        if self_reduction != 0.0 {
            damage = (f64::from(damage) * self_reduction).trunc() as i32;
        } else if sieged_treads {
            let factor = match def.siege {
                Some(crate::defs::SiegeMode::High) => 0.5,
                _ => 0.75,
            };
            damage = (f64::from(damage) * factor).trunc() as i32;
        }

        if let Some(shield) = &shielding {
            let absorbed = (shield.fraction * f64::from(damage)).trunc() as i32;
            self.bot.part_mut(shield.part).integrity -= absorbed;
            if self.bot.part(shield.part).integrity <= 0 {
                self.destroy_part(
                    rng,
                    ctx,
                    shield.part,
                    0,
                    DamageType::Entropic,
                    RemovalCause::Depleted,
                );
            }
            damage -= absorbed;
        }

        let destroyed = self.bot.part(id).integrity <= damage
            || critical_destroys_part(critical)
            || engine_explosion;

        // Severing removes (not destroys) single-slot unshielded parts,
        // protection included.
        if !destroyed
            && matches!(critical, Some(Critical::Sever | Critical::Sunder))
            && def.size == 1
            && shielding.is_none()
        {
            self.destroy_part(
                rng,
                ctx,
                id,
                0,
                DamageType::Slashing,
                RemovalCause::CritRemoved,
            );
        }

        if destroyed {
            // Smash deals its full damage onward; ordinary destruction
            // only the excess beyond the part's remaining integrity.
            let overflow_damage = if critical == Some(Critical::Smash) {
                damage
            } else {
                damage - self.bot.part(id).integrity
            };
            self.destroy_part(rng, ctx, id, overflow_damage, damage_type, RemovalCause::Depleted);
        } else {
            self.bot.part_mut(id).integrity -= damage;
        }

        match critical {
            Some(Critical::Blast) => {
                let ignore = destroyed.then_some(index);
                let Some(target_index) = random_non_core_part(&self.bot, rng, ignore) else {
                    return;
                };
                if shielding.is_some() {
                    return;
                }
                let target_id = self.bot.active[target_index];
                self.blast_part(rng, ctx, damage, target_index, target_id);
            }
            Some(Critical::Phase) => {
                // Phase damage jumps from the part through to the core.
                self.apply_chunk_to_part(
                    rng,
                    ctx,
                    damage,
                    DamageType::Phasic,
                    None,
                    0.0,
                    0,
                    false,
                    None,
                );
            }
            _ => {}
        }

        if engine_explosion {
            self.engine_explosion(rng, ctx, id);
        }
    }

    /// Blast resolution against a picked part: damage first, then
    /// single-slot parts are blown off if still intact and the bot is not
    /// dismemberment-immune.
    fn blast_part(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        damage: i32,
        index: usize,
        id: crate::state::PartId,
    ) {
        let single_slot = self.bot.part(id).def.size == 1;
        self.apply_chunk_to_part(
            rng,
            ctx,
            damage,
            DamageType::Phasic,
            None,
            0.0,
            0,
            false,
            Some(index),
        );

        if single_slot
            && self.bot.part(id).integrity > 0
            && !self.bot.immunities.contains(Immunities::DISMEMBERMENT)
        {
            self.destroy_part(rng, ctx, id, 0, DamageType::Phasic, RemovalCause::CritRemoved);
        }
    }

    /// Takes a part out of combat: coverage/resistance bookkeeping,
    /// overflow, impact corruption, loot for critical removals, and the
    /// accuracy refresh every destruction forces.
    fn destroy_part(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        id: crate::state::PartId,
        overflow_damage: i32,
        damage_type: DamageType,
        cause: RemovalCause,
    ) {
        let Some(index) = self.bot.active_index_of(id) else {
            return;
        };
        self.bot.remove_active(index);

        let protection = self.bot.part(id).protection;
        if overflow_damage > 0
            && !protection
            && ctx.can_overflow
            && ctx.attack_critical.is_none()
        {
            // Excess damage against a non-protection part carries onward.
            self.apply_followup_chunk(rng, ctx, overflow_damage, damage_type, true, 0.0, 0);
        }

        if damage_type == DamageType::Impact {
            // Impact destructions always corrupt, resisted like EM damage.
            let corruption = rng.roll(50, 150);
            let corruption = self
                .bot
                .resistances
                .resist(DamageType::Electromagnetic, corruption);
            self.apply_corruption(rng, ctx, f64::from(corruption));
        }

        let integrity = self.bot.part(id).integrity;
        let kind = self.bot.part(id).def.kind;
        if cause == RemovalCause::CritRemoved
            && integrity > 0
            && kind != ItemKind::Processor
            && kind != ItemKind::Hackware
        {
            // Parts knocked off intact are guaranteed drops; processors
            // and hackware shatter instead.
            let entry = &mut self.loot.items[id.index()];
            entry.drops += 1;
            entry.crit_removals += 1;
            entry.integrity += u64::try_from(integrity).unwrap_or(0);
        }

        self.bot.part_mut(id).integrity = 0;
        tracing::trace!(part = %self.bot.part(id).def.name, ?cause, "part destroyed");
        self.refresh_accuracy();

        self.bot.destroyed.push(id);
    }

    /// Chains a destroyed power source's explosion back through the
    /// damage engine and awards its salvage.
    fn engine_explosion(
        &mut self,
        rng: &mut dyn Dice,
        ctx: &DamageCtx,
        id: crate::state::PartId,
    ) {
        let def = Arc::clone(&self.bot.part(id).def);
        if def.slot != Slot::Power {
            return;
        }
        let Some(explosion) = &def.explosion else {
            return;
        };
        if explosion.damage_max <= 0 {
            return;
        }

        let base_damage = rng.roll(explosion.damage_min, explosion.damage_max);
        let num_chunks = rng.roll(explosion.chunks_min, explosion.chunks_max);
        self.bot.salvage += explosion.salvage;
        if num_chunks <= 0 {
            return;
        }

        let chunk_damage = base_damage / num_chunks;
        let spectrum = explosion.spectrum.map_or(0, crate::defs::Spectrum::chance);
        for _ in 0..num_chunks {
            self.apply_followup_chunk(
                rng,
                ctx,
                chunk_damage,
                explosion.damage_type,
                false,
                f64::from(explosion.disruption),
                spectrum,
            );
        }
    }

    /// Runs a corruption amount through the prevention pipeline, then
    /// accumulates the rest.
    fn apply_corruption(&mut self, rng: &mut dyn Dice, ctx: &DamageCtx, mut corruption: f64) {
        while corruption > 0.0 {
            let Some(id) = self.bot.corruption_preventer() else {
                break;
            };
            // Prevention burns 2 integrity per point of corruption purged.
            let max_prevention = (f64::from(self.bot.part(id).integrity) / 2.0).ceil();
            if max_prevention < corruption {
                self.bot.defenses.corruption_prevent.pop_front();
                self.destroy_part(
                    rng,
                    ctx,
                    id,
                    0,
                    DamageType::Entropic,
                    RemovalCause::Depleted,
                );
                corruption -= max_prevention;
            } else {
                self.bot.part_mut(id).integrity -= (corruption * 2.0).ceil() as i32;
                corruption = 0.0;
            }
        }

        self.bot.corruption += corruption;
    }
}
