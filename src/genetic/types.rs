//! Core type definitions for the evolutionary engine.
//!
//! The engine imposes no schema on individuals: anything that can be deep
//! copied and moved between threads can live in a population. Genotype,
//! phenotype and fitness bookkeeping all belong to caller code.

/// A candidate solution in the population.
///
/// `Clone` must be a structural deep copy: the engine hands clones of
/// population members to reproduction, crossover and mutation, and relies on
/// mutations of a clone never reaching the original.
///
/// Implemented automatically for every eligible type.
///
/// ```
/// #[derive(Clone)]
/// struct Guess {
///     genotype: String,
/// }
///
/// fn assert_individual<I: eukaryote::genetic::Individual>() {}
/// assert_individual::<Guess>();
/// ```
pub trait Individual: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Individual for T {}

/// Snapshot of the population handed to the generation hook.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary<I> {
    /// Index of the generation that just completed, starting at 0.
    pub generation: usize,

    /// Number of individuals in the population.
    pub population_size: usize,

    /// Clone of the fittest individual (`population[0]`).
    pub best: I,

    /// Fitness of [`best`](Self::best).
    pub best_fitness: f64,

    /// Arithmetic mean of all fitness scores.
    pub mean_fitness: f64,

    /// Fitness of the least fit individual.
    pub worst_fitness: f64,
}

impl<I: Individual> GenerationSummary<I> {
    /// Builds a summary from a population sorted fittest-first and its
    /// aligned fitness scores. Returns `None` for an empty population.
    pub(crate) fn from_sorted(generation: usize, population: &[I], scores: &[f64]) -> Option<Self> {
        let best = population.first()?.clone();
        let best_fitness = *scores.first()?;
        let worst_fitness = *scores.last()?;
        let mean_fitness = scores.iter().sum::<f64>() / scores.len() as f64;
        Some(Self {
            generation,
            population_size: population.len(),
            best,
            best_fitness,
            mean_fitness,
            worst_fitness,
        })
    }
}
