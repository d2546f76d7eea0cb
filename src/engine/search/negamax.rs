//! Negamax with alpha-beta pruning over belief-state nodes.

use crate::core::moves::Move;
use crate::engine::belief::Node;
use crate::engine::eval::{evaluate, is_terminal, Score};
use crate::engine::tt::TTFlag;
use crate::error::{EngineError, Result};

use super::searcher::Searcher;

impl Searcher {
    /// Value of `node` for the side to move, and the line that achieves it.
    ///
    /// Fails with `Interrupted` when the budget runs out; the interrupted node
    /// and its ancestors store nothing.
    pub(super) fn negamax(
        &mut self,
        node: &Node,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
    ) -> Result<(Score, Vec<Move>)> {
        if self.should_stop() {
            return Err(EngineError::Interrupted);
        }
        self.stats.nodes += 1;

        let alpha_orig = alpha;

        if let Some(entry) = self.tt.probe(node) {
            self.stats.tt_hits += 1;
            if entry.depth >= depth {
                match entry.flag {
                    TTFlag::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return Ok((entry.value, entry.principal_variation.clone()));
                    }
                    TTFlag::LowerBound => alpha = alpha.max(entry.value),
                    TTFlag::UpperBound => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return Ok((entry.value, entry.principal_variation.clone()));
                }
            }
        }

        if depth == 0 || is_terminal(node) {
            return Ok((self.leaf(node), Vec::new()));
        }

        let children = node.children()?;
        if children.is_empty() {
            return Ok((self.leaf(node), Vec::new()));
        }

        let mut value = -Score::INFINITY;
        let mut best: Option<(Move, Vec<Move>)> = None;

        for (child, mv) in &children {
            let (child_value, line) = self.negamax(child, depth - 1, -beta, -alpha)?;
            let child_value = (-child_value).decay_mate();

            if best.is_none() || child_value > value {
                value = child_value;
                best = Some((*mv, line));
            }

            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        let line = match best {
            Some((mv, rest)) => {
                let mut line = Vec::with_capacity(rest.len() + 1);
                line.push(mv);
                line.extend(rest);
                line
            }
            None => Vec::new(),
        };

        let flag = if value <= alpha_orig {
            TTFlag::UpperBound
        } else if value >= beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(node, value, line.clone(), depth, flag);

        Ok((value, line))
    }

    /// Static score seen by the side to move
    fn leaf(&mut self, node: &Node) -> Score {
        self.stats.leaves += 1;
        let score = evaluate(node);
        if node.turn() { score } else { -score }
    }
}
