//! Generic evolutionary computation engine.
//!
//! The caller owns the genome: what an individual is, how fit it is, how it
//! mutates and how parents recombine. This crate owns the generational loop:
//!
//! - **Environment**: seeds a population from one individual and, for each
//!   generation, applies selection, refills the population through
//!   reproduction, crossover and mutation, and re-sorts it by fitness.
//! - **Strategies**: pluggable selection (top-x, top-x-percent,
//!   rank-weighted culling) and reproduction (random, sequential,
//!   sequential-random) policies, plus a reference string crossover.
//! - **Hooks**: fitness, mutate, crossover and generation callbacks, each
//!   accepted in a synchronous or an asynchronous form and driven through
//!   one calling convention.
//!
//! # Example
//!
//! ```
//! use eukaryote::genetic::{Environment, EnvironmentConfig, Reproduction};
//!
//! let target = 42i64;
//! let mut env = Environment::<i64>::builder()
//!     .config(
//!         EnvironmentConfig::default()
//!             .with_population_size(20)
//!             .with_number_of_generations(200)
//!             .with_seed(7),
//!     )
//!     .fitness_sync(move |x| Ok(-((target - *x).abs() as f64)))
//!     .mutate_sync(|x| {
//!         *x += 1;
//!         Ok(())
//!     })
//!     .generation_sync(move |summary| Ok(summary.best != target))
//!     .reproduction(Reproduction::sequential(2).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let report = env.seed_blocking(0).unwrap();
//! assert_eq!(report.best, target);
//! assert!(report.halted);
//! ```
//!
//! # Logging
//!
//! The engine emits [`tracing`] events: run start and finish at `info`,
//! one event per generation at `debug`, refill iterations at `trace`, and
//! failing hooks at `warn`. No subscriber is installed.

pub mod error;
pub mod genetic;
pub mod random;
pub mod validate;
