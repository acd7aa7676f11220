//! Reproduction strategies.
//!
//! A reproduction strategy decides which survivors of selection become the
//! parents of the next offspring. The environment drives it through a
//! per-generation lifecycle:
//!
//! 1. [`begin`](ReproductionStrategy::begin) once, before the refill loop
//! 2. [`choose`](ReproductionStrategy::choose) as many times as it takes to
//!    refill the population
//! 3. [`end`](ReproductionStrategy::end) once, after the population is full
//!
//! `choose` returns **indices**. The environment clones the individuals at
//! those indices, so a strategy never hands out aliases of population
//! members.
//!
//! Stateful strategies keep their cursor inside the instance. Every
//! [`Environment`](super::Environment) owns its strategy, so two engines
//! never share a cursor.

use crate::error::{EvolutionError, Result};
use crate::validate;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chooses parents from the current population.
pub trait ReproductionStrategy<I>: Send {
    /// Called once at the beginning of every generation's refill.
    fn begin(&mut self) {}

    /// Returns the indices of the individuals that reproduce next.
    ///
    /// May be called any number of times per generation. `population` grows
    /// between calls as offspring are inserted.
    fn choose(&mut self, population: &[I], rng: &mut dyn RngCore) -> Result<Vec<usize>>;

    /// Called once when the population is full again.
    fn end(&mut self) {}

    /// Checks the strategy's own parameters. Called once when the
    /// environment is built.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// How a built-in [`Reproduction`] picks individuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReproductionKind {
    /// Every pick is uniform over the population, with replacement.
    Random,

    /// Picks walk a cursor through the fitness-sorted population starting at
    /// the fittest, wrapping to the front once exhausted. Every individual
    /// is used once before any is used twice.
    Sequential,

    /// The first pick follows the sequential cursor; the remaining picks are
    /// uniform. Every individual is guaranteed to be a primary parent in
    /// turn.
    SequentialRandom,
}

impl ReproductionKind {
    /// Smallest legal `number_of_individuals` for this kind.
    pub fn min_individuals(self) -> usize {
        match self {
            ReproductionKind::Random | ReproductionKind::Sequential => 1,
            ReproductionKind::SequentialRandom => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ReproductionKind::Random => "random",
            ReproductionKind::Sequential => "sequential",
            ReproductionKind::SequentialRandom => "sequentialRandom",
        }
    }
}

/// Built-in reproduction strategy.
///
/// ```
/// use eukaryote::genetic::{Reproduction, ReproductionKind};
///
/// let r = Reproduction::sequential_random(3).unwrap();
/// assert_eq!(r.kind(), ReproductionKind::SequentialRandom);
/// assert_eq!(r.number_of_individuals(), 3);
///
/// // SequentialRandom needs a primary parent plus at least one mate.
/// assert!(Reproduction::sequential_random(1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reproduction {
    #[serde(rename = "type")]
    kind: ReproductionKind,
    number_of_individuals: usize,
    #[serde(skip)]
    cursor: usize,
}

impl Default for Reproduction {
    fn default() -> Self {
        Self {
            kind: ReproductionKind::Random,
            number_of_individuals: 2,
            cursor: 0,
        }
    }
}

impl Reproduction {
    /// Creates a strategy of `kind` choosing `number_of_individuals` per call.
    pub fn new(kind: ReproductionKind, number_of_individuals: usize) -> Result<Self> {
        let strategy = Self {
            kind,
            number_of_individuals,
            cursor: 0,
        };
        ReproductionStrategy::<()>::validate(&strategy)?;
        Ok(strategy)
    }

    /// Uniform picks with replacement (`n >= 1`).
    pub fn random(number_of_individuals: usize) -> Result<Self> {
        Self::new(ReproductionKind::Random, number_of_individuals)
    }

    /// Cursor-ordered picks (`n >= 1`).
    pub fn sequential(number_of_individuals: usize) -> Result<Self> {
        Self::new(ReproductionKind::Sequential, number_of_individuals)
    }

    /// Cursor-ordered primary parent plus uniform mates (`n >= 2`).
    pub fn sequential_random(number_of_individuals: usize) -> Result<Self> {
        Self::new(ReproductionKind::SequentialRandom, number_of_individuals)
    }

    /// Builds a strategy from a JSON option bag.
    ///
    /// The `type` key picks the kind (`random`, `sequential`,
    /// `sequentialRandom`); `numberOfIndividuals` defaults to 2. `null`
    /// yields the default strategy.
    ///
    /// ```
    /// use eukaryote::genetic::{Reproduction, ReproductionKind};
    /// use serde_json::json;
    ///
    /// let r = Reproduction::from_options(&json!({"type": "sequential"})).unwrap();
    /// assert_eq!(r.kind(), ReproductionKind::Sequential);
    /// assert_eq!(r.number_of_individuals(), 2);
    /// ```
    pub fn from_options(options: &Value) -> Result<Self> {
        let Some(map) = validate::options_object(options, "reproduction")? else {
            return Ok(Self::default());
        };
        let kind = match validate::read_str(Some(map), "type")? {
            Some("random") => ReproductionKind::Random,
            Some("sequential") => ReproductionKind::Sequential,
            Some("sequentialRandom") => ReproductionKind::SequentialRandom,
            Some(other) => {
                return Err(EvolutionError::illegal_argument(format!(
                    "unknown reproduction type; actual: {other}"
                )))
            }
            None => {
                return Err(EvolutionError::illegal_argument(
                    "reproduction options require a `type`",
                ))
            }
        };
        let n = validate::read_count(Some(map), "numberOfIndividuals")?.unwrap_or(2);
        Self::new(kind, n)
    }

    pub fn kind(&self) -> ReproductionKind {
        self.kind
    }

    pub fn number_of_individuals(&self) -> usize {
        self.number_of_individuals
    }

    /// Position of the next sequential pick.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn next_sequential(&mut self, len: usize) -> usize {
        if self.cursor >= len {
            self.cursor = 0;
        }
        let index = self.cursor;
        self.cursor += 1;
        index
    }
}

impl<I> ReproductionStrategy<I> for Reproduction {
    fn begin(&mut self) {
        self.cursor = 0;
    }

    fn choose(&mut self, population: &[I], rng: &mut dyn RngCore) -> Result<Vec<usize>> {
        let len = population.len();
        if len == 0 {
            return Err(EvolutionError::illegal_argument(
                "cannot choose individuals from an empty population",
            ));
        }
        let n = self.number_of_individuals;
        let chosen: Vec<usize> = match self.kind {
            ReproductionKind::Random => (0..n).map(|_| rng.random_range(0..len)).collect(),
            ReproductionKind::Sequential => (0..n).map(|_| self.next_sequential(len)).collect(),
            ReproductionKind::SequentialRandom => {
                let mut chosen = Vec::with_capacity(n);
                chosen.push(self.next_sequential(len));
                chosen.extend((1..n).map(|_| rng.random_range(0..len)));
                chosen
            }
        };
        Ok(chosen)
    }

    fn validate(&self) -> Result<()> {
        let min = self.kind.min_individuals();
        if self.number_of_individuals < min {
            return Err(EvolutionError::illegal_argument(format!(
                "{} numberOfIndividuals range: {min} <= i <= population.length; actual: {}",
                self.kind.name(),
                self.number_of_individuals
            )));
        }
        Ok(())
    }
}
