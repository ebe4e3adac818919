//! Throughput benchmarks for trial resolution.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use volley_core::defs::{BotDef, DamageType, ItemDef, ItemKind, Slot, WeaponDef, WeaponKind};
use volley_core::rng::seeded;
use volley_core::{run_batch, BattleConfig, EndCondition, Loadout, Simulation, WeaponConfig};

fn benchmark_sim() -> Simulation {
    let cannon = Arc::new(
        WeaponDef::new("Heavy Cannon", WeaponKind::BallisticCannon).with_damage(
            20,
            40,
            DamageType::Kinetic,
        ),
    );
    let mut bot = BotDef::new("target", 300, 80);
    bot.parts = vec![
        Arc::new(ItemDef::new("Plating", Slot::Utility, ItemKind::Protection, 2, 100, 120)),
        Arc::new(ItemDef::new("Strut", Slot::Utility, ItemKind::Device, 1, 40, 60)),
        Arc::new(ItemDef::new("Engine", Slot::Power, ItemKind::Engine, 1, 50, 40)),
    ];
    Simulation::new(
        &Arc::new(bot),
        &Loadout::of_weapons(vec![WeaponConfig::single(cannon)]),
        &BattleConfig {
            end_condition: EndCondition::Kill,
            ..BattleConfig::default()
        },
    )
    .expect("benchmark configuration is valid")
}

fn single_trials(c: &mut Criterion) {
    let sim = benchmark_sim();
    c.bench_function("simulate_trial", |b| {
        b.iter_batched(
            || (sim.clone(), seeded(42)),
            |(mut sim, mut rng)| sim.simulate_trial(&mut rng),
            BatchSize::SmallInput,
        );
    });
}

fn parallel_batches(c: &mut Criterion) {
    let sim = benchmark_sim();
    c.bench_function("run_batch_1k", |b| {
        b.iter(|| run_batch(&sim, 1_000, 42));
    });
}

criterion_group!(benches, single_trials, parallel_batches);
criterion_main!(benches);
