//! The generational loop.
//!
//! An [`Environment`] owns a population and drives it through
//! selection → reproduction → crossover → mutation → fitness sort, once per
//! generation, until the configured number of generations has passed or the
//! generation hook asks it to stop.

use super::config::EnvironmentConfig;
use super::hooks::{
    AsyncCrossover, AsyncFitness, AsyncGeneration, AsyncMutate, CrossoverHook, FitnessHook,
    GenerationHook, MutateHook, SyncCrossover, SyncFitness, SyncGeneration, SyncMutate,
};
use super::reproduction::{Reproduction, ReproductionStrategy};
use super::selection::{Selection, SelectionStrategy};
use super::types::{GenerationSummary, Individual};
use crate::error::{EvolutionError, HookResult, Result};
use crate::random::rng_from_seed;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::future::Future;
use tracing::{debug, info, trace};

/// Outcome of a completed [`Environment::seed`] run.
#[derive(Debug, Clone)]
pub struct EvolutionReport<I> {
    /// The fittest individual of the final population.
    pub best: I,

    /// Fitness of [`best`](Self::best).
    pub best_fitness: f64,

    /// Number of generations that ran to completion.
    pub generations: usize,

    /// Whether the generation hook stopped the run early.
    pub halted: bool,

    /// Best fitness at the end of each generation.
    pub fitness_history: Vec<f64>,
}

/// Collects hooks, strategies and configuration for an [`Environment`].
///
/// `fitness` and `mutate` are required, each in exactly one of its forms.
/// `crossover` and `generation` are optional, but still at most one form each.
pub struct EnvironmentBuilder<I: Individual> {
    config: EnvironmentConfig,
    fitness: Option<Box<AsyncFitness<I>>>,
    fitness_sync: Option<Box<SyncFitness<I>>>,
    mutate: Option<Box<AsyncMutate<I>>>,
    mutate_sync: Option<Box<SyncMutate<I>>>,
    crossover: Option<Box<AsyncCrossover<I>>>,
    crossover_sync: Option<Box<SyncCrossover<I>>>,
    generation: Option<Box<AsyncGeneration<I>>>,
    generation_sync: Option<Box<SyncGeneration<I>>>,
    selection: Option<Box<dyn SelectionStrategy<I>>>,
    reproduction: Option<Box<dyn ReproductionStrategy<I>>>,
}

impl<I: Individual> Default for EnvironmentBuilder<I> {
    fn default() -> Self {
        Self {
            config: EnvironmentConfig::default(),
            fitness: None,
            fitness_sync: None,
            mutate: None,
            mutate_sync: None,
            crossover: None,
            crossover_sync: None,
            generation: None,
            generation_sync: None,
            selection: None,
            reproduction: None,
        }
    }
}

impl<I: Individual> EnvironmentBuilder<I> {
    pub fn config(mut self, config: EnvironmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets an asynchronous fitness hook. It receives a clone of the
    /// individual. Higher is fitter.
    pub fn fitness<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<f64>> + Send + 'static,
    {
        self.fitness = Some(Box::new(move |individual| f(individual).boxed()));
        self
    }

    /// Sets a synchronous fitness hook. Higher is fitter.
    pub fn fitness_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&I) -> HookResult<f64> + Send + Sync + 'static,
    {
        self.fitness_sync = Some(Box::new(f));
        self
    }

    /// Sets an asynchronous mutate hook. It takes ownership of an offspring
    /// and hands back the mutated individual.
    pub fn mutate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<I>> + Send + 'static,
    {
        self.mutate = Some(Box::new(move |individual| f(individual).boxed()));
        self
    }

    /// Sets a synchronous mutate hook that alters an offspring in place.
    pub fn mutate_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut I) -> HookResult<()> + Send + Sync + 'static,
    {
        self.mutate_sync = Some(Box::new(f));
        self
    }

    /// Sets an asynchronous crossover hook over cloned parents.
    pub fn crossover<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Vec<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<Vec<I>>> + Send + 'static,
    {
        self.crossover = Some(Box::new(move |parents| f(parents).boxed()));
        self
    }

    /// Sets a synchronous crossover hook over cloned parents.
    pub fn crossover_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<I>) -> HookResult<Vec<I>> + Send + Sync + 'static,
    {
        self.crossover_sync = Some(Box::new(f));
        self
    }

    /// Sets an asynchronous generation hook. Resolving to `false` halts the
    /// run once the current generation has completed.
    pub fn generation<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(GenerationSummary<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<bool>> + Send + 'static,
    {
        self.generation = Some(Box::new(move |summary| f(summary).boxed()));
        self
    }

    /// Sets a synchronous generation hook. Returning `false` halts the run
    /// once the current generation has completed.
    pub fn generation_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&GenerationSummary<I>) -> HookResult<bool> + Send + Sync + 'static,
    {
        self.generation_sync = Some(Box::new(f));
        self
    }

    /// Replaces the default [`Selection::TopXPercent`] strategy.
    pub fn selection(mut self, strategy: impl SelectionStrategy<I> + 'static) -> Self {
        self.selection = Some(Box::new(strategy));
        self
    }

    /// Uses a closure as the selection strategy.
    pub fn selection_fn<F>(self, f: F) -> Self
    where
        F: Fn(&mut Vec<I>, &mut dyn RngCore) -> Result<()> + Send + Sync + 'static,
    {
        self.selection(f)
    }

    /// Replaces the default [`Reproduction::random`] strategy.
    pub fn reproduction(mut self, strategy: impl ReproductionStrategy<I> + 'static) -> Self {
        self.reproduction = Some(Box::new(strategy));
        self
    }

    /// Validates the configuration, resolves every hook to its single form
    /// and fills in default strategies.
    pub fn build(self) -> Result<Environment<I>> {
        self.config.validate()?;

        let fitness =
            FitnessHook::resolve_required(self.fitness_sync, self.fitness, "fitness", "fitness_sync")?;
        let mutate =
            MutateHook::resolve_required(self.mutate_sync, self.mutate, "mutate", "mutate_sync")?;
        let crossover = CrossoverHook::resolve(
            self.crossover_sync,
            self.crossover,
            "crossover",
            "crossover_sync",
        )?;
        let generation = GenerationHook::resolve(
            self.generation_sync,
            self.generation,
            "generation",
            "generation_sync",
        )?;

        let selection = self
            .selection
            .unwrap_or_else(|| Box::new(Selection::default()));
        selection.validate()?;
        let reproduction = self
            .reproduction
            .unwrap_or_else(|| Box::new(Reproduction::default()));
        reproduction.validate()?;

        Ok(Environment {
            config: self.config,
            fitness,
            mutate,
            crossover,
            generation,
            selection,
            reproduction,
            population: Vec::new(),
            scores: Vec::new(),
        })
    }
}

/// A population competing for survival under user-supplied hooks.
///
/// # Usage
///
/// ```
/// use eukaryote::genetic::{Environment, EnvironmentConfig};
///
/// let mut env = Environment::<i64>::builder()
///     .config(
///         EnvironmentConfig::default()
///             .with_population_size(10)
///             .with_number_of_generations(5)
///             .with_seed(42),
///     )
///     .fitness_sync(|x: &i64| Ok(*x as f64))
///     .mutate_sync(|x: &mut i64| {
///         *x += 1;
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// let report = env.seed_blocking(0).unwrap();
/// assert!(report.best >= 5);
/// assert_eq!(env.population().len(), 10);
/// ```
pub struct Environment<I: Individual> {
    config: EnvironmentConfig,
    fitness: FitnessHook<I>,
    mutate: MutateHook<I>,
    crossover: Option<CrossoverHook<I>>,
    generation: Option<GenerationHook<I>>,
    selection: Box<dyn SelectionStrategy<I>>,
    reproduction: Box<dyn ReproductionStrategy<I>>,
    population: Vec<I>,
    scores: Vec<f64>,
}

impl<I: Individual> Environment<I> {
    pub fn builder() -> EnvironmentBuilder<I> {
        EnvironmentBuilder::default()
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// The current population. Sorted fittest-first after a completed
    /// generation; after a failed run it is left as the failure found it.
    pub fn population(&self) -> &[I] {
        &self.population
    }

    /// Fitness scores aligned with [`population`](Self::population).
    ///
    /// Empty until a generation has been sorted, and cleared again at the
    /// start of every generation.
    pub fn fitness_scores(&self) -> &[f64] {
        &self.scores
    }

    /// Fills the population with clones of `individual` and evolves it.
    ///
    /// Stops after `number_of_generations`, when the generation hook returns
    /// `false`, or at the first error. Errors leave the population as they
    /// found it; there is no rollback.
    pub async fn seed(&mut self, individual: I) -> Result<EvolutionReport<I>> {
        let population_size = self.config.population_size;
        let number_of_generations = self.config.number_of_generations;
        let mut rng = rng_from_seed(self.config.seed);

        info!(population_size, number_of_generations, "seeding environment");
        self.population = vec![individual; population_size];
        self.scores.clear();

        let mut fitness_history = Vec::with_capacity(number_of_generations);
        let mut halted = false;

        for generation in 0..number_of_generations {
            self.scores.clear();
            self.apply_selection(&mut rng)?;
            self.refill(&mut rng).await?;
            self.sort_by_fitness(&mut rng).await?;

            let summary = GenerationSummary::from_sorted(generation, &self.population, &self.scores)
                .ok_or_else(|| EvolutionError::illegal_return("population is empty after refill"))?;
            debug!(
                generation,
                best = summary.best_fitness,
                mean = summary.mean_fitness,
                worst = summary.worst_fitness,
                "generation complete"
            );
            fitness_history.push(summary.best_fitness);

            let report = self.generation.as_ref().map(|hook| hook.report(summary));
            if let Some(report) = report {
                if !report.await? {
                    info!(generation, "generation hook halted evolution");
                    halted = true;
                    break;
                }
            }
        }

        let (best, best_fitness) = match (self.population.first(), self.scores.first()) {
            (Some(best), Some(&fitness)) => (best.clone(), fitness),
            _ => {
                return Err(EvolutionError::illegal_return(
                    "no generation produced a sorted population",
                ))
            }
        };
        info!(
            generations = fitness_history.len(),
            best_fitness, halted, "evolution finished"
        );

        Ok(EvolutionReport {
            best,
            best_fitness,
            generations: fitness_history.len(),
            halted,
            fitness_history,
        })
    }

    /// Runs [`seed`](Self::seed) to completion on the current thread.
    pub fn seed_blocking(&mut self, individual: I) -> Result<EvolutionReport<I>> {
        futures::executor::block_on(self.seed(individual))
    }

    fn apply_selection(&mut self, rng: &mut StdRng) -> Result<()> {
        let before = self.population.len();
        self.selection.select(&mut self.population, rng)?;
        let survivors = self.population.len();
        if survivors == 0 {
            return Err(EvolutionError::illegal_return(
                "selection removed every individual",
            ));
        }
        if survivors > before {
            return Err(EvolutionError::illegal_return(format!(
                "selection grew the population from {before} to {survivors}"
            )));
        }
        debug!(before, survivors, "selection applied");
        Ok(())
    }

    /// Grows the population back to `population_size` with mutated
    /// offspring. Parents are drawn from the growing population, so earlier
    /// offspring of this generation may become parents themselves.
    async fn refill(&mut self, rng: &mut StdRng) -> Result<()> {
        let capacity = self.config.population_size;
        let limit = self.config.max_concurrency;

        self.reproduction.begin();
        while self.population.len() < capacity {
            let chosen = self.reproduction.choose(&self.population, &mut *rng)?;
            let parents = clone_chosen(&self.population, &chosen)?;

            let recombined = self.recombine(parents);
            let offspring = recombined.await?;
            let mutated = self.mutate.mutate_all(offspring, limit);
            let offspring = mutated.await?;

            let room = capacity - self.population.len();
            trace!(parents = chosen.len(), offspring = offspring.len(), room, "refill");
            self.population.extend(offspring.into_iter().take(room));
        }
        self.reproduction.end();
        Ok(())
    }

    /// Scores every individual once and sorts fittest-first. Ties are
    /// shuffled first when `shuffle_ties` is set; the sort itself is stable.
    /// NaN scores sort last.
    async fn sort_by_fitness(&mut self, rng: &mut StdRng) -> Result<()> {
        let evaluated = self.fitness.evaluate_all(
            &self.population,
            self.config.max_concurrency,
            self.config.parallel,
        );
        let scores = evaluated.await?;

        let mut scored: Vec<(I, f64)> = std::mem::take(&mut self.population)
            .into_iter()
            .zip(scores)
            .collect();
        if self.config.shuffle_ties {
            scored.shuffle(rng);
        }
        scored.sort_by(|a, b| sort_key(b.1).total_cmp(&sort_key(a.1)));
        (self.population, self.scores) = scored.into_iter().unzip();
        Ok(())
    }

    fn recombine(&self, parents: Vec<I>) -> BoxFuture<'static, Result<Vec<I>>> {
        match &self.crossover {
            Some(hook) => hook.recombine(parents),
            None => future::ok(parents).boxed(),
        }
    }
}

/// Total order for fitness scores: NaN ranks below every number, and the
/// two zeros tie.
fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score + 0.0
    }
}

fn clone_chosen<I: Clone>(population: &[I], chosen: &[usize]) -> Result<Vec<I>> {
    if chosen.is_empty() {
        return Err(EvolutionError::illegal_return(
            "reproduction chose no individuals",
        ));
    }
    chosen
        .iter()
        .map(|&index| {
            population.get(index).cloned().ok_or_else(|| {
                EvolutionError::illegal_return(format!(
                    "reproduction chose index {index}; population length: {}",
                    population.len()
                ))
            })
        })
        .collect()
}
