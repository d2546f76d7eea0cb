//! Zobrist hashing for boards and belief sets
//!
//! Every (cell, content) pair gets a random 64-bit key. A board hashes to the
//! XOR of its cell keys; a belief set hashes to the XOR of its member boards,
//! which does not depend on member order.

use super::board::{Cell, NUM_CELLS};

/// Number of distinct cell contents (empty, unknown, four pieces)
const CELL_KINDS: usize = 6;

/// Zobrist random keys
pub struct ZobristKeys {
    /// Keys for each cell content on each cell [cell][content]
    cells: [[u64; CELL_KINDS]; NUM_CELLS],
    /// Key for a node where the engine is to move
    our_turn: u64,
    /// Key for a node that carries no view
    no_view: u64,
}

impl ZobristKeys {
    /// Get the global Zobrist keys instance
    pub fn instance() -> &'static ZobristKeys {
        static KEYS: std::sync::OnceLock<ZobristKeys> = std::sync::OnceLock::new();
        KEYS.get_or_init(ZobristKeys::new)
    }

    fn new() -> Self {
        let mut cells = [[0u64; CELL_KINDS]; NUM_CELLS];
        for cell_keys in cells.iter_mut() {
            for key in cell_keys.iter_mut() {
                *key = rand::random::<u64>();
            }
        }

        ZobristKeys {
            cells,
            our_turn: rand::random::<u64>(),
            no_view: rand::random::<u64>(),
        }
    }

    /// Key for `cell` at flat index `idx`
    #[inline]
    pub fn cell(&self, idx: usize, cell: Cell) -> u64 {
        self.cells[idx][cell.index()]
    }

    #[inline]
    pub fn our_turn(&self) -> u64 {
        self.our_turn
    }

    #[inline]
    pub fn no_view(&self) -> u64 {
        self.no_view
    }
}
