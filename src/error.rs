//! Error types shared by every component of the engine.
//!
//! Three classes of failure exist:
//!
//! - [`EvolutionError::IllegalArgument`]: malformed configuration or strategy
//!   options, detected eagerly at construction or at the start of a call.
//! - [`EvolutionError::IllegalReturn`]: a user hook or strategy handed back a
//!   value that breaks its contract (e.g. crossover produced no offspring).
//! - [`EvolutionError::Hook`]: an error raised by a user hook during a run,
//!   propagated to the caller of [`seed`](crate::genetic::Environment::seed)
//!   without retry.

use std::fmt;
use thiserror::Error;

/// Error type user hooks return.
///
/// Any `std::error::Error + Send + Sync` converts into it with `?` or `.into()`,
/// and so does a plain `String` or `&str`.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for user hooks.
pub type HookResult<T> = std::result::Result<T, HookError>;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Identifies which user hook produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Fitness,
    Mutate,
    Crossover,
    Generation,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::Fitness => "fitness",
            HookKind::Mutate => "mutate",
            HookKind::Crossover => "crossover",
            HookKind::Generation => "generation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("Illegal return: {0}")]
    IllegalReturn(String),

    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: HookKind,
        #[source]
        source: HookError,
    },
}

impl EvolutionError {
    pub(crate) fn illegal_argument(message: impl Into<String>) -> Self {
        EvolutionError::IllegalArgument(message.into())
    }

    pub(crate) fn illegal_return(message: impl Into<String>) -> Self {
        EvolutionError::IllegalReturn(message.into())
    }

    pub(crate) fn hook(hook: HookKind, source: HookError) -> Self {
        EvolutionError::Hook { hook, source }
    }

    /// Returns `true` for configuration and option errors.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, EvolutionError::IllegalArgument(_))
    }

    /// Returns `true` when a hook or strategy broke its return contract.
    pub fn is_illegal_return(&self) -> bool {
        matches!(self, EvolutionError::IllegalReturn(_))
    }

    /// The hook that failed, if this error came from one.
    pub fn hook_kind(&self) -> Option<HookKind> {
        match self {
            EvolutionError::Hook { hook, .. } => Some(*hook),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EvolutionError::illegal_argument("populationSize range: 2 <= p");
        assert_eq!(err.to_string(), "Illegal argument: populationSize range: 2 <= p");

        let err = EvolutionError::illegal_return("crossover returned no offspring");
        assert_eq!(err.to_string(), "Illegal return: crossover returned no offspring");

        let err = EvolutionError::hook(HookKind::Mutate, "genome corrupted".into());
        assert_eq!(err.to_string(), "mutate hook failed: genome corrupted");
    }

    #[test]
    fn test_classification() {
        assert!(EvolutionError::illegal_argument("x").is_illegal_argument());
        assert!(EvolutionError::illegal_return("x").is_illegal_return());

        let err = EvolutionError::hook(HookKind::Fitness, "boom".into());
        assert_eq!(err.hook_kind(), Some(HookKind::Fitness));
        assert!(!err.is_illegal_argument());
    }

    #[test]
    fn test_hook_source_is_preserved() {
        use std::error::Error as _;

        let err = EvolutionError::hook(HookKind::Generation, "io timeout".into());
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("io timeout"));
    }
}
