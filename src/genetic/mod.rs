//! Generational evolution framework.
//!
//! Callers describe their problem through hooks: how fit an individual is,
//! how it mutates, and optionally how parents recombine and what happens
//! after each generation. The [`Environment`] supplies the loop and the
//! pluggable strategies that decide who survives and who breeds.
//!
//! # Key Types
//!
//! - [`Environment`] / [`EnvironmentBuilder`]: owns the population and runs generations
//! - [`EnvironmentConfig`]: population size, generation count, concurrency, seed
//! - [`EvolutionReport`]: best individual and fitness history of a run
//! - [`GenerationSummary`]: what the generation hook sees
//!
//! # Strategies
//!
//! - [`Selection`] / [`SelectionStrategy`]: prunes the sorted population
//! - [`Reproduction`] / [`ReproductionStrategy`]: picks parents during refill
//! - [`SimilarStrings`]: segment-swapping crossover for string genotypes
//!
//! # Hooks
//!
//! Every hook comes in a synchronous and an asynchronous form; see
//! [`Hook`] for the signatures.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod crossover;
mod environment;
mod hooks;
mod reproduction;
mod selection;
mod types;

pub use config::EnvironmentConfig;
pub use crossover::SimilarStrings;
pub use environment::{Environment, EnvironmentBuilder, EvolutionReport};
pub use hooks::{
    AsyncCrossover, AsyncFitness, AsyncGeneration, AsyncMutate, CrossoverHook, FitnessHook,
    GenerationHook, Hook, MutateHook, SyncCrossover, SyncFitness, SyncGeneration, SyncMutate,
};
pub use reproduction::{Reproduction, ReproductionKind, ReproductionStrategy};
pub use selection::{Selection, SelectionStrategy};
pub use types::{GenerationSummary, Individual};
