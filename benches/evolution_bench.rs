//! Criterion benchmarks for the eukaryote generational loop.
//!
//! Uses synthetic problems (Sphere function, string matching) to measure
//! engine overhead independent of any real domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eukaryote::genetic::{
    Environment, EnvironmentConfig, Reproduction, Selection, SelectionStrategy, SimilarStrings,
};
use eukaryote::random::create_rng;
use rand::Rng;

// ===========================================================================
// Sphere function: maximize -sum(x_i^2)
// ===========================================================================

fn sphere(genes: &[f64]) -> f64 {
    -genes.iter().map(|x| x * x).sum::<f64>()
}

fn nudge(genes: &mut [f64]) {
    let mut rng = rand::rng();
    let i = rng.random_range(0..genes.len());
    genes[i] += rng.random_range(-0.5..0.5);
}

fn sphere_config(pop: usize, gen: usize) -> EnvironmentConfig {
    EnvironmentConfig::default()
        .with_population_size(pop)
        .with_number_of_generations(gen)
        .with_seed(42)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_environment_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("environment_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &(dim, pop, gen),
            |b, &(dim, pop, gen)| {
                b.iter(|| {
                    let mut env = Environment::<Vec<f64>>::builder()
                        .config(sphere_config(pop, gen))
                        .fitness_sync(|g| Ok(sphere(g)))
                        .mutate_sync(|g| {
                            nudge(g);
                            Ok(())
                        })
                        .selection(Selection::top_x_percent(0.2).unwrap())
                        .reproduction(Reproduction::sequential_random(2).unwrap())
                        .build()
                        .unwrap();
                    let report = env.seed_blocking(black_box(vec![3.0; dim])).unwrap();
                    black_box(report)
                })
            },
        );
    }
    group.finish();
}

fn bench_async_hooks(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_hooks");
    group.sample_size(10);

    for limit in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(limit), &limit, |b, &limit| {
            b.iter(|| {
                let mut env = Environment::<Vec<f64>>::builder()
                    .config(sphere_config(100, 20).with_max_concurrency(limit))
                    .fitness(|g: Vec<f64>| async move { Ok(sphere(&g)) })
                    .mutate(|mut g: Vec<f64>| async move {
                        nudge(&mut g);
                        Ok(g)
                    })
                    .build()
                    .unwrap();
                let report = env.seed_blocking(black_box(vec![3.0; 20])).unwrap();
                black_box(report)
            })
        });
    }
    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    let strategies = [
        ("top_x", Selection::top_x(50).unwrap()),
        ("top_x_percent", Selection::top_x_percent(0.1).unwrap()),
        ("random_weighted_by_rank", Selection::RandomWeightedByRank),
    ];
    for (name, strategy) in strategies {
        group.bench_function(name, |b| {
            let mut rng = create_rng(42);
            b.iter(|| {
                let mut population: Vec<u32> = (0..1000).collect();
                strategy.select(&mut population, &mut rng).unwrap();
                black_box(population)
            })
        });
    }
    group.finish();
}

fn bench_similar_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("similar_strings");

    for &len in &[16usize, 256, 4096] {
        let parents: Vec<String> = ["a", "b", "c"].iter().map(|s| s.repeat(len)).collect();
        let crossover = SimilarStrings::default();
        group.bench_with_input(BenchmarkId::from_parameter(len), &parents, |b, parents| {
            let mut rng = create_rng(42);
            b.iter(|| black_box(crossover.cross(black_box(parents), &mut rng).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_environment_sphere,
    bench_async_hooks,
    bench_selection,
    bench_similar_strings
);
criterion_main!(benches);
