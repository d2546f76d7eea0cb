//! Search: iterative deepening, negamax with alpha-beta, transposition lookups.

mod negamax;
mod pv;
mod searcher;
mod types;

pub(crate) use pv::format_score;
pub use searcher::Searcher;
pub use types::{DepthReport, SearchLimits, SearchOutcome, SearchStats, MAX_DEPTH};
