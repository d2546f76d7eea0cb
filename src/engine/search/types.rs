//! Search limits, stats, reports, and constants.

use std::time::Duration;

use crate::core::moves::Move;
use crate::engine::eval::Score;

pub const MAX_DEPTH: u32 = 64;

#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    /// Deepest iteration to run
    pub depth: Option<u32>,
    /// Node budget across the whole search
    pub nodes: Option<u64>,
    /// Wall-clock budget in milliseconds
    pub movetime: Option<u64>,
    /// Ignore `movetime`; only `depth`, `nodes` or the stop flag end the search
    pub infinite: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
}

/// Result of one completed iterative-deepening pass
#[derive(Clone, Debug)]
pub struct DepthReport {
    pub depth: u32,
    pub score: Score,
    pub principal_variation: Vec<Move>,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// What iterative deepening hands back to the caller
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    /// First move of the deepest completed line, or a fallback legal move
    pub best_move: Option<Move>,
    /// Score of the deepest completed pass
    pub score: Option<Score>,
    pub principal_variation: Vec<Move>,
    /// Deepest fully completed depth
    pub depth: Option<u32>,
    /// One report per completed depth, shallowest first
    pub reports: Vec<DepthReport>,
    pub stats: SearchStats,
}
