//! Environment configuration.
//!
//! [`EnvironmentConfig`] holds every parameter of the generational loop that
//! is not a hook or a strategy. It is immutable once an
//! [`Environment`](super::Environment) is built.

use crate::error::{EvolutionError, Result};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for an [`Environment`](super::Environment).
///
/// # Defaults
///
/// ```
/// use eukaryote::genetic::EnvironmentConfig;
///
/// let config = EnvironmentConfig::default();
/// assert_eq!(config.population_size, 250);
/// assert_eq!(config.number_of_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use eukaryote::genetic::EnvironmentConfig;
///
/// let config = EnvironmentConfig::default()
///     .with_population_size(100)
///     .with_number_of_generations(50)
///     .with_max_concurrency(8)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// Number of individuals alive at every generation boundary. At least 2.
    pub population_size: usize,

    /// Number of generations to evolve unless the generation hook halts
    /// earlier. At least 1.
    pub number_of_generations: usize,

    /// Shuffle the population before the stable fitness sort.
    ///
    /// Without it, individuals tied on fitness keep their insertion order
    /// generation after generation, which biases sequential reproduction
    /// towards whoever was inserted first.
    pub shuffle_ties: bool,

    /// Upper bound on concurrently running async fitness/mutate hooks within
    /// one generation. `None` runs every invocation at once.
    pub max_concurrency: Option<usize>,

    /// Evaluate a synchronous fitness hook across the population with rayon.
    ///
    /// Only honoured when the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Seed for strategy randomness (selection draws, reproduction picks,
    /// tie shuffling). `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            population_size: 250,
            number_of_generations: 500,
            shuffle_ties: true,
            max_concurrency: None,
            parallel: false,
            seed: None,
        }
    }
}

impl EnvironmentConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_number_of_generations(mut self, n: usize) -> Self {
        self.number_of_generations = n;
        self
    }

    /// Enables or disables shuffling before the fitness sort.
    pub fn with_shuffle_ties(mut self, shuffle: bool) -> Self {
        self.shuffle_ties = shuffle;
        self
    }

    /// Bounds the async hook fan-out within a generation.
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = Some(n);
        self
    }

    /// Enables or disables parallel evaluation of a synchronous fitness hook.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(EvolutionError::illegal_argument(format!(
                "populationSize range: 2 <= p; actual: {}",
                self.population_size
            )));
        }
        if self.number_of_generations < 1 {
            return Err(EvolutionError::illegal_argument(format!(
                "numberOfGenerations range: 1 <= g; actual: {}",
                self.number_of_generations
            )));
        }
        if self.max_concurrency == Some(0) {
            return Err(EvolutionError::illegal_argument(
                "maxConcurrency range: 1 <= c; actual: 0",
            ));
        }
        Ok(())
    }

    /// Builds a configuration from a JSON option bag.
    ///
    /// Recognised keys: `populationSize`, `numberOfGenerations`,
    /// `shuffleTies`, `maxConcurrency`, `parallel`, `seed`. Missing keys (or
    /// `null`) take their defaults; anything malformed is rejected.
    ///
    /// ```
    /// use eukaryote::genetic::EnvironmentConfig;
    /// use serde_json::json;
    ///
    /// let config = EnvironmentConfig::from_options(&json!({"populationSize": 10})).unwrap();
    /// assert_eq!(config.population_size, 10);
    /// assert_eq!(config.number_of_generations, 500);
    ///
    /// assert!(EnvironmentConfig::from_options(&json!({"populationSize": 2.5})).is_err());
    /// ```
    pub fn from_options(options: &Value) -> Result<Self> {
        let map = validate::options_object(options, "environment")?;
        let mut config = Self::default();
        if let Some(n) = validate::read_count(map, "populationSize")? {
            config.population_size = n;
        }
        if let Some(n) = validate::read_count(map, "numberOfGenerations")? {
            config.number_of_generations = n;
        }
        if let Some(shuffle) = validate::read_bool(map, "shuffleTies")? {
            config.shuffle_ties = shuffle;
        }
        if let Some(n) = validate::read_count(map, "maxConcurrency")? {
            config.max_concurrency = Some(n);
        }
        if let Some(parallel) = validate::read_bool(map, "parallel")? {
            config.parallel = parallel;
        }
        if let Some(seed) = validate::read_count(map, "seed")? {
            config.seed = Some(seed as u64);
        }
        config.validate()?;
        Ok(config)
    }
}
