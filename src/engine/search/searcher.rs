//! Searcher: iterative deepening driver, time/node limits, and search entry point.

use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::board::Side;
use crate::core::moves::Move;
use crate::engine::belief::Node;
use crate::engine::eval::Score;
use crate::engine::tt::{TTEntry, TranspositionTable};
use crate::error::{EngineError, Result};

use super::pv;
use super::types::{DepthReport, SearchLimits, SearchOutcome, SearchStats, MAX_DEPTH};

pub struct Searcher {
    pub(super) tt: TranspositionTable,
    pub(super) stats: SearchStats,
    pub(super) stop: Arc<AtomicBool>,
    pub(super) start_time: Instant,
    pub(super) time_limit: Option<Duration>,
    pub(super) node_limit: Option<u64>,
    root_pv: Vec<Move>,
}

impl Searcher {
    pub fn new() -> Self {
        Searcher {
            tt: TranspositionTable::new(),
            stats: SearchStats::default(),
            stop: Arc::new(AtomicBool::new(false)),
            start_time: Instant::now(),
            time_limit: None,
            node_limit: None,
            root_pv: Vec::new(),
        }
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Forget everything learned so far (new game)
    pub fn clear(&mut self) {
        self.tt.clear();
        self.root_pv.clear();
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Principal variation written by the last `minimax` call that finished
    pub fn last_principal_variation(&self) -> &[Move] {
        &self.root_pv
    }

    /// Stored entry for `node`, typically the root of the last search
    pub fn entry(&self, node: &Node) -> Option<&TTEntry> {
        self.tt.probe(node)
    }

    pub(super) fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if self.stats.nodes >= limit {
                return true;
            }
        }
        if let Some(limit) = self.time_limit {
            if self.start_time.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    pub fn calculate_time(&self, limits: &SearchLimits) -> Option<Duration> {
        if limits.infinite {
            return None;
        }
        limits.movetime.map(Duration::from_millis)
    }

    /// Search `node` to `depth` with a full window.
    ///
    /// The score is returned from our point of view whatever the side to
    /// move, and the line becomes the last written principal variation.
    pub fn minimax(&mut self, node: &Node, depth: u32) -> Result<(Score, Vec<Move>)> {
        let (value, line) = self.negamax(node, depth, -Score::INFINITY, Score::INFINITY)?;
        self.root_pv = line.clone();
        if node.turn() {
            Ok((value, line))
        } else {
            Ok((-value, line))
        }
    }

    /// Deepen from depth 0 until the depth limit or the budget runs out.
    ///
    /// A pass cut short by the budget is discarded; the outcome describes the
    /// deepest pass that finished. Entries it stored stay in the table.
    pub fn iterative_deepening(&mut self, root: &Node, limits: SearchLimits) -> Result<SearchOutcome> {
        self.stop.store(false, Ordering::Relaxed);
        self.start_time = Instant::now();
        self.stats = SearchStats::default();
        self.time_limit = self.calculate_time(&limits);
        self.node_limit = limits.nodes;

        let max_depth = limits.depth.unwrap_or(MAX_DEPTH);
        let mut outcome = SearchOutcome::default();

        for depth in 0..=max_depth {
            if self.should_stop() {
                break;
            }

            let (score, line) = match self.minimax(root, depth) {
                Ok(result) => result,
                Err(EngineError::Interrupted) => {
                    debug!("depth {} interrupted after {} nodes", depth, self.stats.nodes);
                    break;
                }
                Err(e) => return Err(e),
            };

            let report = DepthReport {
                depth,
                score,
                principal_variation: line.clone(),
                nodes: self.stats.nodes,
                elapsed: self.start_time.elapsed(),
            };
            pv::report_info(&self.tt, &report);

            if let Some(&first) = line.first() {
                outcome.best_move = Some(first);
            }
            outcome.score = Some(score);
            outcome.depth = Some(depth);
            outcome.principal_variation = line;
            outcome.reports.push(report);

            // Nothing deeper to find: no moves, or a forced result inside the horizon
            let line_len = outcome.principal_variation.len() as u32;
            let forced = score.mate_distance().is_some() && line_len < depth;
            if depth > 0 && (line_len == 0 || forced) {
                break;
            }
        }

        if outcome.best_move.is_none() && root.turn() {
            let fallback = match root.view() {
                Some(view) => view.legal_moves(Side::Us),
                None => root.representative().legal_moves(Side::Us),
            };
            if let Some(&mv) = fallback.first() {
                warn!("no completed search line, falling back to {}", mv);
                outcome.best_move = Some(mv);
            }
        }

        outcome.stats = self.stats.clone();
        debug!(
            "search done: {} nodes, {} leaves, {} table hits, {} cutoffs, {} entries",
            self.stats.nodes,
            self.stats.leaves,
            self.stats.tt_hits,
            self.stats.tt_cutoffs,
            self.tt.len()
        );

        Ok(outcome)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
