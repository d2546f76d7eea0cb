//! Transposition Table
//!
//! Stores search results per belief-state node so that repeated nodes, and
//! nodes revisited by the next iterative-deepening pass, are not searched
//! again. Entries are keyed by the node itself; the node's precomputed
//! Zobrist key is what the map hashes.
//!
//! The table never evicts. Memory grows with the number of distinct nodes
//! searched during a game; `Searcher::clear` drops it between games.

use std::collections::HashMap;

use crate::core::moves::Move;

use super::belief::Node;
use super::eval::Score;

/// Entry type in the transposition table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TTFlag {
    /// Exact score
    Exact,
    /// Lower bound (beta cutoff)
    LowerBound,
    /// Upper bound (failed low)
    UpperBound,
}

/// A single entry in the transposition table
#[derive(Clone, Debug)]
pub struct TTEntry {
    /// Score from the point of view of the side to move at the node
    pub value: Score,
    /// Best line found from the node
    pub principal_variation: Vec<Move>,
    /// Remaining depth the node was searched to
    pub depth: u32,
    /// Entry type
    pub flag: TTFlag,
}

/// Transposition table
#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<Node, TTEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable { entries: HashMap::new() }
    }

    /// Probe the table for an entry
    pub fn probe(&self, node: &Node) -> Option<&TTEntry> {
        self.entries.get(node)
    }

    /// Store an entry, replacing whatever the node held before
    pub fn store(
        &mut self,
        node: &Node,
        value: Score,
        principal_variation: Vec<Move>,
        depth: u32,
        flag: TTFlag,
    ) {
        let entry = TTEntry { value, principal_variation, depth, flag };
        match self.entries.get_mut(node) {
            Some(slot) => *slot = entry,
            None => {
                self.entries.insert(node.clone(), entry);
            }
        }
    }

    /// Number of stored nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the table
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
