//! Compare sequential vs parallel batch run times, plus single-match cost.
//!
//! Run with: `cargo bench --bench batch`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use warband::character::{Job, PrimaryStats, UnitSnapshot};
use warband::core::CombatTuning;
use warband::simulator::{run_batch, simulate_match, BatchConfig, TeamBuffers};

fn squad(base_id: u32) -> Vec<UnitSnapshot> {
    vec![
        UnitSnapshot::new(base_id, "Vanguard", Job::Warrior, 10, PrimaryStats::new(10, 9, 6, 1, 3)),
        UnitSnapshot::new(
            base_id + 1,
            "Skirmisher",
            Job::Rogue,
            10,
            PrimaryStats::new(7, 5, 12, 1, 9),
        ),
        UnitSnapshot::new(base_id + 2, "Adept", Job::Mage, 10, PrimaryStats::new(1, 6, 7, 13, 4)),
        UnitSnapshot::new(
            base_id + 3,
            "Chaplain",
            Job::Priest,
            10,
            PrimaryStats::new(2, 7, 5, 11, 5),
        ),
    ]
}

fn bench_single_match(c: &mut Criterion) {
    let tuning = CombatTuning::default();
    let a = TeamBuffers::from_snapshots(&squad(1));
    let b = TeamBuffers::from_snapshots(&squad(10));

    let mut group = c.benchmark_group("match");
    group.throughput(Throughput::Elements(1));
    group.bench_function("4v4", |bench| {
        let mut seed = 0u64;
        bench.iter(|| {
            seed += 1;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            black_box(simulate_match(&a, &b, &tuning, 200_000, &mut rng))
        });
    });
    group.finish();
}

fn bench_batch_sequential_vs_parallel(c: &mut Criterion) {
    let tuning = CombatTuning::default();
    let team_a = squad(1);
    let team_b = squad(10);
    let rounds = 5_000;

    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.throughput(Throughput::Elements(rounds as u64));

    group.bench_function("sequential", |bench| {
        let config = BatchConfig::sequential(rounds, 42);
        bench.iter(|| black_box(run_batch(&team_a, &team_b, &tuning, &config)))
    });

    group.bench_function("parallel", |bench| {
        let config = BatchConfig::parallel(rounds, 42);
        bench.iter(|| black_box(run_batch(&team_a, &team_b, &tuning, &config)))
    });

    group.finish();
}

criterion_group!(benches, bench_single_match, bench_batch_sequential_vs_parallel);
criterion_main!(benches);
