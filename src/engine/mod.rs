//! Engine components
//!
//! This module contains the decision engine:
//! - Belief states and their expansion
//! - Vector-valued static evaluation
//! - Negamax search with iterative deepening
//! - Transposition table

pub mod belief;
pub mod eval;
pub mod search;
pub mod tt;

pub use belief::{after_opponent_move, after_own_move, filter_consistent, BeliefSet, Node};
pub use eval::{evaluate, is_terminal, material_evaluation, Score, MATE_THRESHOLD, WIN_SCORE};
pub use search::{DepthReport, SearchLimits, SearchOutcome, SearchStats, Searcher, MAX_DEPTH};
pub use tt::{TTEntry, TTFlag, TranspositionTable};
