//! Selection strategies.
//!
//! Selection runs first in every generation and removes unfit individuals
//! from the population, in place, to make room for offspring. Strategies
//! rely on the population being sorted fittest-first, which the
//! [`Environment`](super::Environment) guarantees from the second generation
//! on (the freshly seeded population consists of identical clones).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::error::{EvolutionError, Result};
use crate::validate;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Removes individuals from a population sorted fittest-first.
///
/// Implemented by the built-in [`Selection`] variants and by any closure
/// `Fn(&mut Vec<I>, &mut dyn RngCore) -> Result<()>`.
pub trait SelectionStrategy<I>: Send + Sync {
    /// Prunes `population` in place.
    fn select(&self, population: &mut Vec<I>, rng: &mut dyn RngCore) -> Result<()>;

    /// Checks the strategy's own parameters. Called once when the
    /// environment is built.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<I, F> SelectionStrategy<I> for F
where
    F: Fn(&mut Vec<I>, &mut dyn RngCore) -> Result<()> + Send + Sync,
{
    fn select(&self, population: &mut Vec<I>, rng: &mut dyn RngCore) -> Result<()> {
        self(population, rng)
    }
}

/// Built-in selection strategies.
///
/// # Examples
///
/// ```
/// use eukaryote::genetic::Selection;
///
/// // Keep the 5 fittest individuals.
/// let sel = Selection::top_x(5).unwrap();
///
/// // Keep the fittest quarter.
/// let sel = Selection::top_x_percent(0.25).unwrap();
///
/// // Probabilistic, rank-weighted culling.
/// let sel = Selection::RandomWeightedByRank;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    /// Exactly the first `number_of_individuals` entries survive.
    ///
    /// Fails at selection time when the population holds fewer individuals
    /// than requested.
    TopX {
        #[serde(rename = "numberOfIndividuals")]
        number_of_individuals: usize,
    },

    /// The fittest `floor(len * probability)` entries survive, and never
    /// fewer than one.
    ///
    /// `probability` lies in the open range `(0, 1)`.
    TopXPercent { probability: f64 },

    /// Soft culling weighted by rank.
    ///
    /// Scanning from least fit to fittest, the individual at rank `i`
    /// (0 = fittest) dies with probability `(i + 1) / (n (n + 1) / 2)`.
    /// Fitter individuals are likelier, but not certain, to survive. The
    /// last remaining individual is never removed.
    RandomWeightedByRank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::TopXPercent { probability: 0.1 }
    }
}

impl Selection {
    /// `TopX` keeping `number_of_individuals` survivors (must be ≥ 1).
    pub fn top_x(number_of_individuals: usize) -> Result<Self> {
        let sel = Selection::TopX {
            number_of_individuals,
        };
        SelectionStrategy::<()>::validate(&sel)?;
        Ok(sel)
    }

    /// `TopXPercent` keeping the fittest `probability` share (`0 < p < 1`).
    pub fn top_x_percent(probability: f64) -> Result<Self> {
        let sel = Selection::TopXPercent { probability };
        SelectionStrategy::<()>::validate(&sel)?;
        Ok(sel)
    }

    /// Builds a strategy from a JSON option bag.
    ///
    /// The `type` key picks the variant (`topX`, `topXPercent`,
    /// `randomWeightedByRank`); the remaining keys are that variant's
    /// options, with the defaults `numberOfIndividuals = 1` and
    /// `probability = 0.1`. `null` yields the default strategy.
    ///
    /// ```
    /// use eukaryote::genetic::Selection;
    /// use serde_json::json;
    ///
    /// let sel = Selection::from_options(&json!({"type": "topX", "numberOfIndividuals": 3})).unwrap();
    /// assert_eq!(sel, Selection::TopX { number_of_individuals: 3 });
    /// ```
    pub fn from_options(options: &Value) -> Result<Self> {
        let Some(map) = validate::options_object(options, "selection")? else {
            return Ok(Self::default());
        };
        let kind = validate::read_str(Some(map), "type")?.ok_or_else(|| {
            EvolutionError::illegal_argument("selection options require a `type`")
        })?;
        match kind {
            "topX" => {
                let n = validate::read_count(Some(map), "numberOfIndividuals")?.unwrap_or(1);
                Self::top_x(n)
            }
            "topXPercent" => {
                let p = validate::read_number(Some(map), "probability")?.unwrap_or(0.1);
                Self::top_x_percent(p)
            }
            "randomWeightedByRank" => Ok(Selection::RandomWeightedByRank),
            other => Err(EvolutionError::illegal_argument(format!(
                "unknown selection type; actual: {other}"
            ))),
        }
    }
}

impl<I> SelectionStrategy<I> for Selection {
    fn select(&self, population: &mut Vec<I>, rng: &mut dyn RngCore) -> Result<()> {
        match *self {
            Selection::TopX {
                number_of_individuals,
            } => top_x(population, number_of_individuals),
            Selection::TopXPercent { probability } => {
                top_x_percent(population, probability);
                Ok(())
            }
            Selection::RandomWeightedByRank => {
                random_weighted_by_rank(population, rng);
                Ok(())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Selection::TopX {
                number_of_individuals,
            } if number_of_individuals == 0 => Err(EvolutionError::illegal_argument(
                "numberOfIndividuals range: 0 < i <= population.length; actual: 0",
            )),
            Selection::TopXPercent { probability }
                if !validate::is_finite(probability) || probability <= 0.0 || probability >= 1.0 =>
            {
                Err(EvolutionError::illegal_argument(format!(
                    "probability range: 0 < f < 1; actual: {probability}"
                )))
            }
            _ => Ok(()),
        }
    }
}

fn top_x<I>(population: &mut Vec<I>, n: usize) -> Result<()> {
    if n == 0 || n > population.len() {
        return Err(EvolutionError::illegal_argument(format!(
            "numberOfIndividuals range: 0 < i <= population.length; actual: {n} (population.length: {})",
            population.len()
        )));
    }
    population.truncate(n);
    Ok(())
}

fn top_x_percent<I>(population: &mut Vec<I>, probability: f64) {
    let survivors = ((population.len() as f64 * probability).floor() as usize).max(1);
    population.truncate(survivors);
}

fn random_weighted_by_rank<I>(population: &mut Vec<I>, rng: &mut dyn RngCore) {
    let n = population.len();
    let summation = (n * (n + 1)) as f64 / 2.0;
    // Back to front, so a removal never shifts a rank still to be visited.
    for index in (0..n).rev() {
        let probability_of_death = (index + 1) as f64 / summation;
        let draw: f64 = rng.random();
        if draw <= probability_of_death && population.len() > 1 {
            population.remove(index);
        }
    }
}
