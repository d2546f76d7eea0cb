//! Board oracle types
//!
//! This module contains the game rules the engine consumes:
//! - Triangular board, cells, pieces and sides
//! - Move encoding
//! - Zobrist keys for hashing boards and belief sets

pub mod board;
pub mod moves;
pub mod zobrist;

pub use board::{Board, Cell, Coord, Piece, PieceKind, Side, NUM_CELLS, ROWS};
pub use moves::Move;
pub use zobrist::ZobristKeys;
