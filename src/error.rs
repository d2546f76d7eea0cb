//! Error types for the engine
//!
//! Illegal move application and empty belief sets are logic errors and are
//! propagated to the caller. `Interrupted` is the only recoverable variant; the
//! iterative deepening driver absorbs it.

use crate::core::board::Side;
use crate::core::moves::Move;
use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A move was applied that is not legal for the given side
    #[error("Invalid move {mv} for {side:?}")]
    InvalidMove { mv: Move, side: Side },

    /// A belief set ran empty
    #[error("Inconsistent belief state: no position matches the observations")]
    InconsistentBeliefState,

    /// The search budget ran out mid-depth
    #[error("Search interrupted")]
    Interrupted,

    /// Board text could not be parsed
    #[error("Failed to parse board: {0}")]
    ParseBoard(String),

    /// Move text could not be parsed
    #[error("Failed to parse move: {0}")]
    ParseMove(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
