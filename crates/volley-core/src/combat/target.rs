//! Hit-part selection.
//!
//! Given one damage chunk, decides which active part (or the core, as
//! `None`) absorbs it. Three regimes, in priority order: Impact damage
//! draws uniformly over part *sizes*; overflow damage prefers the
//! protection pool; everything else draws over one of the four coverage
//! tables, with core-analyzer and Piercing bonuses inflating the core's
//! share.

use crate::defs::DamageType;
use crate::rng::Dice;
use crate::state::{BotState, CoverageTable};

/// Selects the active-list index of the part hit by a damage chunk, or
/// `None` for a core hit.
pub(crate) fn select_hit_part(
    bot: &BotState,
    rng: &mut dyn Dice,
    core_bonus: i32,
    damage_type: DamageType,
    is_overflow: bool,
    armor_analyzed: bool,
) -> Option<usize> {
    if damage_type == DamageType::Impact {
        // Impact ignores coverage entirely: each part weighs in at its
        // slot size, and the draw runs one past the total so the core
        // keeps a share.
        let total_size: i32 = bot.active_parts().map(|p| p.def.size).sum();
        let mut roll = rng.roll(0, total_size);
        for (index, part) in bot.active_parts().enumerate() {
            if roll < part.def.size {
                return Some(index);
            }
            roll -= part.def.size;
        }
        return None;
    }

    if is_overflow {
        let pool: Vec<usize> = bot
            .active_parts()
            .enumerate()
            .filter(|(_, p)| p.protection && p.coverage > 0)
            .map(|(i, _)| i)
            .collect();
        if !pool.is_empty() {
            // Overflow lands on armor when there is any, weighted by
            // coverage within the protection pool alone.
            let total: i32 = pool
                .iter()
                .map(|&i| bot.parts[bot.active[i].index()].coverage)
                .sum();
            let mut roll = rng.roll(0, total);
            for &index in &pool {
                roll -= bot.parts[bot.active[index].index()].coverage;
                if roll < 0 {
                    return Some(index);
                }
            }
            // An off-the-end draw falls through to the standard tables.
        }
    }

    let table = CoverageTable::select(armor_analyzed, bot.sieged);
    let mut total = f64::from(bot.coverage_total(table));

    let mut bonus = core_bonus;
    if damage_type == DamageType::Piercing {
        // Piercing always gets extra core exposure.
        bonus += 8;
    }

    if bonus > 0 {
        // Swap the core's plain share for a boosted one, capped so a huge
        // bonus can't wrap into punishing the attacker.
        total -= f64::from(bot.core_coverage);
        let core_share = (f64::from(bot.core_coverage) / f64::from(bot.total_coverage)
            + f64::from(bonus) / 100.0)
            .min(0.999);
        total += f64::from(bot.total_coverage) * core_share;
    }

    let mut roll = (rng.fraction() * total).floor();
    for (index, part) in bot.active_parts().enumerate() {
        roll -= f64::from(part.coverage_in(table));
        if roll < 0.0 {
            return Some(index);
        }
    }
    None
}

/// Picks a random active part ignoring coverage, optionally excluding one
/// index; used by the part-removal critical effects. `None` means the draw
/// fell outside the part list.
pub(crate) fn random_non_core_part(
    bot: &BotState,
    rng: &mut dyn Dice,
    ignore: Option<usize>,
) -> Option<usize> {
    let len = i32::try_from(bot.active.len()).unwrap_or(0);
    let upper = len - 1 - i32::from(ignore.is_some());
    if upper < 0 {
        return None;
    }

    let mut pick = rng.roll(0, upper);
    if let Some(ignore) = ignore {
        let ignore = i32::try_from(ignore).unwrap_or(0);
        if ignore > 0 && pick >= ignore {
            pick += 1;
        }
    }

    if pick >= len {
        return None;
    }
    usize::try_from(pick).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{Behavior, BotDef, ItemDef, ItemKind, Slot};
    use crate::rng::seeded;
    use std::sync::Arc;

    fn bot(parts: Vec<ItemDef>) -> BotState {
        let mut def = BotDef::new("target", 100, 40);
        for part in parts {
            def = def.with_part(Arc::new(part));
        }
        BotState::from_def(&Arc::new(def), Behavior::StandFight, None)
    }

    fn plated(name: &str, kind: ItemKind, coverage: i32) -> ItemDef {
        ItemDef::new(name, Slot::Utility, kind, 1, 40, coverage)
    }

    #[test]
    fn zero_coverage_parts_are_never_hit_by_standard_draws() {
        let state = bot(vec![
            plated("exposed", ItemKind::Device, 120),
            plated("internal", ItemKind::Device, 0),
        ]);
        let mut rng = seeded(11);
        for _ in 0..500 {
            let hit = select_hit_part(&state, &mut rng, 0, DamageType::Kinetic, false, false);
            assert_ne!(hit, Some(1), "zero-coverage part was hit");
        }
    }

    #[test]
    fn impact_draw_ignores_coverage_weights() {
        // A part with enormous coverage but size 1 must not dominate an
        // impact draw over a same-size sibling.
        let state = bot(vec![
            plated("huge-coverage", ItemKind::Device, 1000),
            plated("tiny-coverage", ItemKind::Device, 1),
        ]);
        let mut rng = seeded(12);
        let mut hits = [0u32; 2];
        for _ in 0..3000 {
            if let Some(i) = select_hit_part(&state, &mut rng, 0, DamageType::Impact, false, false)
            {
                hits[i] += 1;
            }
        }
        let ratio = f64::from(hits[0]) / f64::from(hits[1].max(1));
        assert!(ratio > 0.5 && ratio < 2.0, "impact hits skewed: {hits:?}");
    }

    #[test]
    fn overflow_prefers_protection_pool() {
        let state = bot(vec![
            plated("armor", ItemKind::Protection, 10),
            plated("gadget", ItemKind::Device, 1000),
        ]);
        let mut rng = seeded(13);
        let mut armor_hits = 0;
        for _ in 0..300 {
            if select_hit_part(&state, &mut rng, 0, DamageType::Kinetic, true, false) == Some(0) {
                armor_hits += 1;
            }
        }
        // The armor's pool-local weight is 10/11; the gadget's enormous
        // coverage must not matter.
        assert!(armor_hits > 200, "armor only took {armor_hits} overflow hits");
    }

    #[test]
    fn overflow_without_protection_uses_standard_tables() {
        let state = bot(vec![plated("gadget", ItemKind::Device, 1000)]);
        let mut rng = seeded(14);
        let mut part_hits = 0;
        for _ in 0..300 {
            if select_hit_part(&state, &mut rng, 0, DamageType::Kinetic, true, false).is_some() {
                part_hits += 1;
            }
        }
        assert!(part_hits > 250, "coverage-weighted fallback missing");
    }

    #[test]
    fn core_bonus_inflates_core_hits() {
        let state = bot(vec![plated("plating", ItemKind::Device, 360)]);
        // Core share without bonus: 40/400 = 10%.
        let mut rng = seeded(15);
        let mut plain = 0;
        let mut boosted = 0;
        for _ in 0..4000 {
            if select_hit_part(&state, &mut rng, 0, DamageType::Kinetic, false, false).is_none() {
                plain += 1;
            }
            if select_hit_part(&state, &mut rng, 40, DamageType::Kinetic, false, false).is_none() {
                boosted += 1;
            }
        }
        assert!(boosted > plain * 3, "core bonus had no effect: {plain} vs {boosted}");
    }

    #[test]
    fn random_non_core_part_respects_empty_list() {
        let state = bot(Vec::new());
        let mut rng = seeded(16);
        assert_eq!(random_non_core_part(&state, &mut rng, None), None);
    }

    #[test]
    fn random_non_core_part_skips_ignored_index() {
        let state = bot(vec![
            plated("a", ItemKind::Device, 10),
            plated("b", ItemKind::Device, 10),
            plated("c", ItemKind::Device, 10),
        ]);
        let mut rng = seeded(17);
        for _ in 0..200 {
            let pick = random_non_core_part(&state, &mut rng, Some(1));
            assert_ne!(pick, Some(1));
        }
    }
}
