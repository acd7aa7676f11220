//! Evolves a random string into "hello world" through the public API.

use eukaryote::genetic::{
    Environment, EnvironmentConfig, GenerationSummary, Reproduction, Selection, SimilarStrings,
};
use eukaryote::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::{Arc, Mutex};

const TARGET: &str = "hello world";
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";

#[derive(Debug, Clone, PartialEq)]
struct Guess {
    genotype: String,
}

fn fitness(guess: &Guess) -> f64 {
    guess
        .genotype
        .chars()
        .zip(TARGET.chars())
        .filter(|(a, b)| a == b)
        .count() as f64
}

fn mutate(guess: &mut Guess, rng: &mut StdRng) {
    let mut genes: Vec<u8> = guess.genotype.bytes().collect();
    let i = rng.random_range(0..genes.len());
    genes[i] = ALPHABET[rng.random_range(0..ALPHABET.len())];
    guess.genotype = genes.into_iter().map(char::from).collect();
}

fn seed() -> Guess {
    Guess {
        genotype: "x".repeat(TARGET.len()),
    }
}

fn config() -> EnvironmentConfig {
    EnvironmentConfig::default()
        .with_population_size(100)
        .with_number_of_generations(3000)
        .with_seed(2024)
}

#[test]
fn test_hello_world_with_crossover() {
    let rng = Arc::new(Mutex::new(create_rng(1)));
    let mutate_rng = Arc::clone(&rng);
    let crossover_rng = Arc::clone(&rng);
    let crossover = SimilarStrings::new(2, 50.0).unwrap();

    let mut env = Environment::<Guess>::builder()
        .config(config())
        .fitness_sync(|g| Ok(fitness(g)))
        .mutate_sync(move |g| {
            mutate(g, &mut mutate_rng.lock().unwrap());
            Ok(())
        })
        .crossover_sync(move |parents| {
            let offspring = crossover.recombine(
                parents,
                |g: &mut Guess| &mut g.genotype,
                &mut *crossover_rng.lock().unwrap(),
            )?;
            Ok(offspring)
        })
        .generation_sync(|summary| Ok(summary.best.genotype != TARGET))
        .build()
        .unwrap();

    let report = env.seed_blocking(seed()).unwrap();

    assert!(report.halted);
    assert_eq!(report.best.genotype, TARGET);
    assert_eq!(report.best_fitness, TARGET.len() as f64);
    assert_eq!(env.population()[0].genotype, TARGET);
    assert_eq!(env.population().len(), 100);
    assert!(env
        .population()
        .iter()
        .all(|g| g.genotype.chars().count() == TARGET.len()));
    // TopXPercent keeps the fittest, so the best never regresses.
    assert!(report.fitness_history.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_hello_world_sequential_random() {
    let rng = Arc::new(Mutex::new(create_rng(2)));

    let mut env = Environment::<Guess>::builder()
        .config(config())
        .fitness_sync(|g| Ok(fitness(g)))
        .mutate_sync(move |g| {
            mutate(g, &mut rng.lock().unwrap());
            Ok(())
        })
        .generation_sync(|summary| Ok(summary.best_fitness < TARGET.len() as f64))
        .selection(Selection::top_x(10).unwrap())
        .reproduction(Reproduction::sequential_random(2).unwrap())
        .build()
        .unwrap();

    let report = env.seed_blocking(seed()).unwrap();
    assert_eq!(report.best.genotype, TARGET);
    assert_eq!(report.generations, report.fitness_history.len());
}

#[tokio::test]
async fn test_hello_world_async_hooks() {
    let rng = Arc::new(Mutex::new(create_rng(3)));
    let generations = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&generations);

    let mut env = Environment::<Guess>::builder()
        .config(config().with_max_concurrency(16))
        .fitness(|g: Guess| async move {
            tokio::task::yield_now().await;
            Ok(fitness(&g))
        })
        .mutate(move |mut g: Guess| {
            mutate(&mut g, &mut rng.lock().unwrap());
            async move { Ok(g) }
        })
        .generation(move |summary: GenerationSummary<Guess>| {
            log.lock().unwrap().push(summary.generation);
            async move { Ok(summary.best.genotype != TARGET) }
        })
        .build()
        .unwrap();

    let report = env.seed(seed()).await.unwrap();

    assert_eq!(report.best.genotype, TARGET);
    let seen = generations.lock().unwrap().clone();
    assert_eq!(seen, (0..report.generations).collect::<Vec<_>>());
}
