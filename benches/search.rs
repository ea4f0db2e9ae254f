//! Benchmarks for the gene operators and search engines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pacgene::schema::{Gene, GeneticAlgorithmConfig, HaltPolicy};
use pacgene::search::evolve::EvolutionEngine;
use pacgene::search::gene::{hamming_distance, mutate_exclusive, random_gene};
use pacgene::search::oracle::{ContestOracle, ContestOutcome, OracleError, MAX_ROUNDS};
use pacgene::search::score::ScoringPolicy;

/// Cheap stand-in for the battle simulator: survivors proportional to the
/// count of 3s on each side, full-length contests only.
struct CountingOracle;

impl ContestOracle for CountingOracle {
    fn battle(&self, first: &Gene, second: &Gene) -> Result<ContestOutcome, OracleError> {
        let threes = |gene: &Gene| gene.symbols().iter().filter(|&&s| s == 3).count() as u32;
        ContestOutcome::new(MAX_ROUNDS, 1 + threes(first), 1 + threes(second))
            .map_err(OracleError::from)
    }
}

fn bench_gene_ops(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let first = random_gene(&mut rng);
    let second = random_gene(&mut rng);

    c.bench_function("hamming_distance", |b| {
        b.iter(|| hamming_distance(black_box(&first), black_box(&second)))
    });

    c.bench_function("mutate_exclusive", |b| {
        b.iter(|| {
            let mut gene = first;
            mutate_exclusive(&mut rng, &mut gene, 0.01);
            gene
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let policy = ScoringPolicy::default();
    let oracle = CountingOracle;
    let gene = random_gene(&mut rng);

    let mut group = c.benchmark_group("evaluate");
    for opponents in [5usize, 20, 50] {
        let pool: Vec<Gene> = (0..opponents).map(|_| random_gene(&mut rng)).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(opponents),
            &pool,
            |b, pool| b.iter(|| policy.evaluate(&oracle, black_box(&gene), pool).unwrap()),
        );
    }
    group.finish();
}

fn bench_ga_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_generation");
    group.sample_size(10);

    for size in [50usize, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let config = GeneticAlgorithmConfig {
                    population_size: size,
                    halt: HaltPolicy::MaxGenerations { limit: 1 },
                    ..Default::default()
                };
                let mut engine = EvolutionEngine::new(config, Some(42)).unwrap();
                engine.run(&CountingOracle, |_| {}).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gene_ops, bench_evaluate, bench_ga_generation);
criterion_main!(benches);
