//! Crossover strategies.
//!
//! A crossover strategy recombines the genotypes of the individuals chosen by
//! reproduction into offspring genotypes. The engine itself only knows the
//! crossover *hook*; the strategies here are ready-made building blocks for
//! writing one.
//!
//! # Similar-segment string crossover
//!
//! [`SimilarStrings`] cuts every parent genotype at the same position into a
//! head, a "chromosome" and a tail, then assembles each offspring from a
//! randomly chosen parent's head, a randomly chosen parent's chromosome and a
//! randomly chosen parent's tail:
//!
//! ```text
//! 'abc'  + 'xyz'   =>  'xbc'  & 'ayz'
//! 'abcd' + 'xyz'   =>  'aycd' & 'xbz'
//! ```
//!
//! With more than two parents an offspring can combine segments of three
//! different individuals.

use crate::error::{EvolutionError, Result};
use crate::validate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Similar-segment recombination of string genotypes.
///
/// ```
/// use eukaryote::genetic::SimilarStrings;
/// use eukaryote::random::create_rng;
///
/// let crossover = SimilarStrings::default();
/// let offspring = crossover.cross(&["abc", "xyz"], &mut create_rng(42)).unwrap();
/// assert_eq!(offspring.len(), 2);
/// assert!(offspring.iter().all(|g| g.chars().count() == 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarStrings {
    number_of_offspring: usize,
    chromosome_length_as_percent_of_genotype: f64,
}

impl Default for SimilarStrings {
    fn default() -> Self {
        Self {
            number_of_offspring: 2,
            chromosome_length_as_percent_of_genotype: 50.0,
        }
    }
}

impl SimilarStrings {
    /// Creates a crossover producing `number_of_offspring` (≥ 1) genotypes
    /// per call, exchanging a chromosome `percent` (1–99) of the shortest
    /// parent's length.
    pub fn new(number_of_offspring: usize, percent: f64) -> Result<Self> {
        if number_of_offspring < 1 {
            return Err(EvolutionError::illegal_argument(format!(
                "numberOfOffspring range: 1 <= n; actual: {number_of_offspring}"
            )));
        }
        if !validate::is_finite(percent) || !(1.0..=99.0).contains(&percent) {
            return Err(EvolutionError::illegal_argument(format!(
                "chromosomeLengthAsPercentOfGenotype range: 0 < n < 100; actual: {percent}"
            )));
        }
        Ok(Self {
            number_of_offspring,
            chromosome_length_as_percent_of_genotype: percent,
        })
    }

    /// Builds a crossover from a JSON option bag with keys
    /// `numberOfOffspring` (default 2) and
    /// `chromosomeLengthAsPercentOfGenotype` (default 50).
    pub fn from_options(options: &Value) -> Result<Self> {
        let map = validate::options_object(options, "crossover")?;
        let defaults = Self::default();
        let n = validate::read_count(map, "numberOfOffspring")?.unwrap_or(defaults.number_of_offspring);
        let percent = validate::read_number(map, "chromosomeLengthAsPercentOfGenotype")?
            .unwrap_or(defaults.chromosome_length_as_percent_of_genotype);
        Self::new(n, percent)
    }

    pub fn number_of_offspring(&self) -> usize {
        self.number_of_offspring
    }

    pub fn chromosome_length_percent(&self) -> f64 {
        self.chromosome_length_as_percent_of_genotype
    }

    /// Recombines `genotypes` into [`number_of_offspring`](Self::number_of_offspring)
    /// new genotypes.
    ///
    /// Lengths are measured in characters, not bytes. Fails with
    /// `IllegalArgument` when `genotypes` is empty.
    pub fn cross<S, R>(&self, genotypes: &[S], rng: &mut R) -> Result<Vec<String>>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if genotypes.is_empty() {
            return Err(EvolutionError::illegal_argument(
                "genotypes must be a non-empty array of strings",
            ));
        }
        let parents: Vec<Vec<char>> = genotypes
            .iter()
            .map(|g| g.as_ref().chars().collect())
            .collect();

        let shortest = parents.iter().map(Vec::len).min().unwrap_or(0);
        let chromosome_length =
            (shortest as f64 * self.chromosome_length_as_percent_of_genotype / 100.0).floor() as usize;
        let max_index = shortest - chromosome_length;
        // Never cut at 0: every head keeps at least one gene.
        let cut = rng.random_range(0..=max_index).max(1);

        let segments: Vec<[String; 3]> = parents
            .iter()
            .map(|genes| split_segments(genes, cut, chromosome_length))
            .collect();

        let offspring = (0..self.number_of_offspring)
            .map(|_| {
                let head = &segments[rng.random_range(0..segments.len())][0];
                let chromosome = &segments[rng.random_range(0..segments.len())][1];
                let tail = &segments[rng.random_range(0..segments.len())][2];
                format!("{head}{chromosome}{tail}")
            })
            .collect();
        Ok(offspring)
    }

    /// Builds offspring individuals from `parents`.
    ///
    /// Genotypes are read through `genotype`, recombined with
    /// [`cross`](Self::cross), and written into clones of the parents (the
    /// `k`-th offspring starts as a clone of parent `k % parents.len()`).
    ///
    /// ```
    /// use eukaryote::genetic::SimilarStrings;
    /// use eukaryote::random::create_rng;
    ///
    /// #[derive(Clone)]
    /// struct Guess { genotype: String }
    ///
    /// let parents = vec![Guess { genotype: "hello".into() }, Guess { genotype: "world".into() }];
    /// let children = SimilarStrings::default()
    ///     .recombine(parents, |g: &mut Guess| &mut g.genotype, &mut create_rng(7))
    ///     .unwrap();
    /// assert_eq!(children.len(), 2);
    /// ```
    pub fn recombine<I, F, R>(&self, mut parents: Vec<I>, mut genotype: F, rng: &mut R) -> Result<Vec<I>>
    where
        I: Clone,
        F: FnMut(&mut I) -> &mut String,
        R: Rng + ?Sized,
    {
        let genotypes: Vec<String> = parents.iter_mut().map(|p| genotype(p).clone()).collect();
        let offspring_genotypes = self.cross(&genotypes, rng)?;
        let offspring = offspring_genotypes
            .into_iter()
            .enumerate()
            .map(|(k, g)| {
                let mut child = parents[k % parents.len()].clone();
                *genotype(&mut child) = g;
                child
            })
            .collect();
        Ok(offspring)
    }
}

/// Splits `genes` into head / chromosome / tail, clamping every bound to the
/// genotype's length.
fn split_segments(genes: &[char], cut: usize, chromosome_length: usize) -> [String; 3] {
    let len = genes.len();
    let start = cut.min(len);
    let end = (cut + chromosome_length).min(len);
    [
        genes[..start].iter().collect(),
        genes[start..end].iter().collect(),
        genes[end..].iter().collect(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::random::testing::ConstRng;
    use serde_json::json;

    fn sorted_chars(strings: &[String]) -> Vec<char> {
        let mut chars: Vec<char> = strings.iter().flat_map(|s| s.chars()).collect();
        chars.sort_unstable();
        chars
    }

    // ---- Options ----

    #[test]
    fn test_defaults() {
        let c = SimilarStrings::default();
        assert_eq!(c.number_of_offspring(), 2);
        assert!((c.chromosome_length_percent() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_option_ranges() {
        assert!(SimilarStrings::new(0, 50.0).is_err());
        assert!(SimilarStrings::new(1, 0.5).is_err());
        assert!(SimilarStrings::new(1, 100.0).is_err());
        assert!(SimilarStrings::new(1, f64::NAN).is_err());
        assert!(SimilarStrings::new(1, 1.0).is_ok());
        assert!(SimilarStrings::new(5, 99.0).is_ok());
    }

    #[test]
    fn test_from_options() {
        let c = SimilarStrings::from_options(&json!({"numberOfOffspring": 3})).unwrap();
        assert_eq!(c.number_of_offspring(), 3);
        assert!((c.chromosome_length_percent() - 50.0).abs() < 1e-12);

        assert_eq!(SimilarStrings::from_options(&Value::Null).unwrap(), SimilarStrings::default());
        assert!(SimilarStrings::from_options(&json!({"numberOfOffspring": 1.5})).is_err());
        assert!(SimilarStrings::from_options(&json!({"chromosomeLengthAsPercentOfGenotype": "half"})).is_err());
        assert!(SimilarStrings::from_options(&json!({"chromosomeLengthAsPercentOfGenotype": 100})).is_err());
    }

    // ---- cross ----

    #[test]
    fn test_empty_genotypes_rejected() {
        let genotypes: [&str; 0] = [];
        let err = SimilarStrings::default()
            .cross(&genotypes, &mut create_rng(1))
            .unwrap_err();
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn test_abc_xyz_offspring_use_parent_genes() {
        let crossover = SimilarStrings::default();
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let offspring = crossover.cross(&["abc", "xyz"], &mut rng).unwrap();
            assert_eq!(offspring.len(), 2);
            let total: usize = offspring.iter().map(|s| s.chars().count()).sum();
            assert_eq!(total, 6);
            assert!(sorted_chars(&offspring)
                .iter()
                .all(|c| "abcxyz".contains(*c)));
        }
    }

    #[test]
    fn test_segments_keep_positions() {
        // Every gene stays at the position it had in its parent.
        let crossover = SimilarStrings::new(4, 40.0).unwrap();
        let mut rng = create_rng(7);
        for _ in 0..200 {
            for child in crossover.cross(&["aaaaa", "bbbbb", "ccccc"], &mut rng).unwrap() {
                assert_eq!(child.len(), 5);
            }
            for child in crossover.cross(&["01234", "56789"], &mut rng).unwrap() {
                for (pos, c) in child.chars().enumerate() {
                    let d = c.to_digit(10).unwrap() as usize;
                    assert_eq!(d % 5, pos, "gene {c} moved in {child}");
                }
            }
        }
    }

    #[test]
    fn test_cut_never_at_zero() {
        // ConstRng(0) draws the lowest index for every choice, including the
        // cut; the head must still keep one gene of the first parent.
        let offspring = SimilarStrings::new(1, 50.0)
            .unwrap()
            .cross(&["abcd", "wxyz"], &mut ConstRng(0))
            .unwrap();
        assert_eq!(offspring, vec!["abcd".to_string()]);
    }

    #[test]
    fn test_uneven_lengths() {
        let crossover = SimilarStrings::default();
        let mut rng = create_rng(3);
        for _ in 0..200 {
            let offspring = crossover.cross(&["abc", "wxyz"], &mut rng).unwrap();
            for child in &offspring {
                let n = child.chars().count();
                assert!((3..=4).contains(&n), "unexpected length {n} for {child}");
            }
        }
    }

    #[test]
    fn test_single_parent_reproduces_itself() {
        let offspring = SimilarStrings::new(3, 30.0)
            .unwrap()
            .cross(&["genome"], &mut create_rng(9))
            .unwrap();
        assert_eq!(offspring, vec!["genome"; 3]);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut rng = create_rng(11);
        for _ in 0..50 {
            let offspring = SimilarStrings::default()
                .cross(&["αβγδ", "абвг"], &mut rng)
                .unwrap();
            assert!(offspring.iter().all(|s| s.chars().count() == 4));
        }
    }

    #[test]
    fn test_short_genotypes() {
        // Length-1 parents: chromosome is empty, cut clamps past the end.
        let offspring = SimilarStrings::default()
            .cross(&["a", "b"], &mut create_rng(5))
            .unwrap();
        assert!(offspring.iter().all(|s| s == "a" || s == "b"));

        let offspring = SimilarStrings::default()
            .cross(&["", "xy"], &mut create_rng(5))
            .unwrap();
        assert_eq!(offspring.len(), 2);
    }

    // ---- recombine ----

    #[derive(Clone, Debug, PartialEq)]
    struct Guess {
        genotype: String,
        tag: u32,
    }

    #[test]
    fn test_recombine_writes_genotypes_into_clones() {
        let parents = vec![
            Guess { genotype: "aaaa".into(), tag: 1 },
            Guess { genotype: "bbbb".into(), tag: 2 },
        ];
        let children = SimilarStrings::new(3, 50.0)
            .unwrap()
            .recombine(parents, |g: &mut Guess| &mut g.genotype, &mut create_rng(21))
            .unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(
            children.iter().map(|c| c.tag).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
        for child in &children {
            assert_eq!(child.genotype.len(), 4);
            assert!(child.genotype.chars().all(|c| c == 'a' || c == 'b'));
        }
    }
}
