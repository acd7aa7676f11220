//! User hooks and the calling convention the engine drives them with.
//!
//! Every hook exists in a synchronous and an asynchronous form. Which one a
//! caller supplied is resolved once, when the environment is built, into a
//! [`Hook`]. From then on the generational loop awaits every hook the same
//! way: synchronous hooks simply complete without suspending.
//!
//! | hook       | sync form                                       | async form                                  |
//! |------------|-------------------------------------------------|---------------------------------------------|
//! | fitness    | `Fn(&I) -> HookResult<f64>`                     | `Fn(I) -> Future<HookResult<f64>>`          |
//! | mutate     | `Fn(&mut I) -> HookResult<()>`                  | `Fn(I) -> Future<HookResult<I>>`            |
//! | crossover  | `Fn(Vec<I>) -> HookResult<Vec<I>>`              | `Fn(Vec<I>) -> Future<HookResult<Vec<I>>>`  |
//! | generation | `Fn(&GenerationSummary<I>) -> HookResult<bool>` | `Fn(GenerationSummary<I>) -> Future<HookResult<bool>>` |
//!
//! Async fitness receives a clone of the individual and async mutate takes
//! ownership of one and hands it back, so concurrently running invocations
//! never share mutable state.

use super::types::{GenerationSummary, Individual};
use crate::error::{EvolutionError, HookError, HookKind, HookResult, Result};
use futures::future::{self, BoxFuture};
use futures::stream::{self, StreamExt, TryStreamExt};
use futures::FutureExt;
use tracing::warn;

/// A hook in exactly one of its two forms.
pub enum Hook<S: ?Sized, A: ?Sized> {
    Sync(Box<S>),
    Async(Box<A>),
}

pub type SyncFitness<I> = dyn Fn(&I) -> HookResult<f64> + Send + Sync;
pub type AsyncFitness<I> = dyn Fn(I) -> BoxFuture<'static, HookResult<f64>> + Send + Sync;
pub type FitnessHook<I> = Hook<SyncFitness<I>, AsyncFitness<I>>;

pub type SyncMutate<I> = dyn Fn(&mut I) -> HookResult<()> + Send + Sync;
pub type AsyncMutate<I> = dyn Fn(I) -> BoxFuture<'static, HookResult<I>> + Send + Sync;
pub type MutateHook<I> = Hook<SyncMutate<I>, AsyncMutate<I>>;

pub type SyncCrossover<I> = dyn Fn(Vec<I>) -> HookResult<Vec<I>> + Send + Sync;
pub type AsyncCrossover<I> = dyn Fn(Vec<I>) -> BoxFuture<'static, HookResult<Vec<I>>> + Send + Sync;
pub type CrossoverHook<I> = Hook<SyncCrossover<I>, AsyncCrossover<I>>;

pub type SyncGeneration<I> = dyn Fn(&GenerationSummary<I>) -> HookResult<bool> + Send + Sync;
pub type AsyncGeneration<I> =
    dyn Fn(GenerationSummary<I>) -> BoxFuture<'static, HookResult<bool>> + Send + Sync;
pub type GenerationHook<I> = Hook<SyncGeneration<I>, AsyncGeneration<I>>;

impl<S: ?Sized, A: ?Sized> Hook<S, A> {
    /// Resolves the two optional forms of a hook.
    ///
    /// Both present is an error; neither present yields `None`.
    pub(crate) fn resolve(
        sync: Option<Box<S>>,
        r#async: Option<Box<A>>,
        async_name: &str,
        sync_name: &str,
    ) -> Result<Option<Self>> {
        match (sync, r#async) {
            (Some(_), Some(_)) => Err(EvolutionError::illegal_argument(format!(
                "only one function required, `{async_name}` or `{sync_name}`"
            ))),
            (Some(f), None) => Ok(Some(Hook::Sync(f))),
            (None, Some(f)) => Ok(Some(Hook::Async(f))),
            (None, None) => Ok(None),
        }
    }

    /// Like [`resolve`](Self::resolve), but one form is mandatory.
    pub(crate) fn resolve_required(
        sync: Option<Box<S>>,
        r#async: Option<Box<A>>,
        async_name: &str,
        sync_name: &str,
    ) -> Result<Self> {
        Self::resolve(sync, r#async, async_name, sync_name)?.ok_or_else(|| {
            EvolutionError::illegal_argument(format!(
                "required `{async_name}` or `{sync_name}` functions undefined"
            ))
        })
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Hook::Async(_))
    }
}

fn hook_failed(hook: HookKind, source: HookError) -> EvolutionError {
    warn!(%hook, error = %source, "hook failed");
    EvolutionError::hook(hook, source)
}

/// Runs `futures` concurrently, at most `limit` at a time, and collects their
/// outputs in input order. Stops at the first error.
async fn fan_out<T>(futures: Vec<BoxFuture<'static, HookResult<T>>>, limit: Option<usize>) -> HookResult<Vec<T>> {
    match limit {
        Some(n) => stream::iter(futures).buffered(n).try_collect().await,
        None => future::try_join_all(futures).await,
    }
}

// The methods below return `'static` futures that own everything they
// await. No borrow of a hook lives across a suspension point, so the
// environment's `seed` future stays `Send`.

impl<I: Individual> FitnessHook<I> {
    /// Scores every individual, returning scores aligned with `population`.
    pub(crate) fn evaluate_all(
        &self,
        population: &[I],
        limit: Option<usize>,
        parallel: bool,
    ) -> BoxFuture<'static, Result<Vec<f64>>> {
        match self {
            Hook::Sync(f) => {
                let scores = evaluate_sync(&**f, population, parallel)
                    .map_err(|e| hook_failed(HookKind::Fitness, e));
                future::ready(scores).boxed()
            }
            Hook::Async(f) => {
                let pending: Vec<_> = population.iter().map(|ind| f(ind.clone())).collect();
                async move {
                    fan_out(pending, limit)
                        .await
                        .map_err(|e| hook_failed(HookKind::Fitness, e))
                }
                .boxed()
            }
        }
    }
}

#[cfg(feature = "parallel")]
fn evaluate_sync<I: Individual>(
    f: &SyncFitness<I>,
    population: &[I],
    parallel: bool,
) -> HookResult<Vec<f64>> {
    use rayon::prelude::*;

    if parallel {
        population.par_iter().map(f).collect()
    } else {
        population.iter().map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_sync<I: Individual>(
    f: &SyncFitness<I>,
    population: &[I],
    _parallel: bool,
) -> HookResult<Vec<f64>> {
    population.iter().map(f).collect()
}

impl<I: Individual> MutateHook<I> {
    /// Mutates every individual and hands them back in input order.
    pub(crate) fn mutate_all(
        &self,
        individuals: Vec<I>,
        limit: Option<usize>,
    ) -> BoxFuture<'static, Result<Vec<I>>> {
        match self {
            Hook::Sync(f) => {
                let mut individuals = individuals;
                let mutated = individuals.iter_mut().try_for_each(|individual| f(individual));
                let outcome = match mutated {
                    Ok(()) => Ok(individuals),
                    Err(e) => Err(hook_failed(HookKind::Mutate, e)),
                };
                future::ready(outcome).boxed()
            }
            Hook::Async(f) => {
                let pending: Vec<_> = individuals.into_iter().map(|ind| f(ind)).collect();
                async move {
                    fan_out(pending, limit)
                        .await
                        .map_err(|e| hook_failed(HookKind::Mutate, e))
                }
                .boxed()
            }
        }
    }
}

impl<I: Individual> CrossoverHook<I> {
    /// Recombines `parents` into offspring.
    ///
    /// An empty result is an `IllegalReturn`: the refill loop could never
    /// make progress with it.
    pub(crate) fn recombine(&self, parents: Vec<I>) -> BoxFuture<'static, Result<Vec<I>>> {
        let expected = parents.len();
        let pending = match self {
            Hook::Sync(f) => future::ready(f(parents)).boxed(),
            Hook::Async(f) => f(parents),
        };
        async move {
            let offspring = pending
                .await
                .map_err(|e| hook_failed(HookKind::Crossover, e))?;
            if offspring.is_empty() {
                return Err(EvolutionError::illegal_return(format!(
                    "crossover returned no offspring from {expected} parents; expected at least 1"
                )));
            }
            Ok(offspring)
        }
        .boxed()
    }
}

impl<I: Individual> GenerationHook<I> {
    /// Reports a finished generation. Resolves to whether evolution continues.
    pub(crate) fn report(&self, summary: GenerationSummary<I>) -> BoxFuture<'static, Result<bool>> {
        let pending = match self {
            Hook::Sync(f) => future::ready(f(&summary)).boxed(),
            Hook::Async(f) => f(summary),
        };
        pending
            .map(|outcome| outcome.map_err(|e| hook_failed(HookKind::Generation, e)))
            .boxed()
    }
}
