//! Move representation
//!
//! A move is an origin and a target cell. Text form is `row,col-row,col`,
//! e.g. `4,4-3,3`.

use super::board::Coord;
use crate::error::EngineError;
use std::fmt;
use std::str::FromStr;

/// A piece move on the triangular board
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    #[inline]
    pub const fn new(from: Coord, to: Coord) -> Self {
        Move { from, to }
    }

    /// Row and column distance covered by the move
    #[inline]
    pub fn delta(self) -> (u8, u8) {
        (self.from.row.abs_diff(self.to.row), self.from.col.abs_diff(self.to.col))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| EngineError::ParseMove(s.to_string()))?;
        let from = from
            .parse::<Coord>()
            .map_err(|_| EngineError::ParseMove(s.to_string()))?;
        let to = to
            .parse::<Coord>()
            .map_err(|_| EngineError::ParseMove(s.to_string()))?;
        Ok(Move::new(from, to))
    }
}

/// Render a move sequence the way search reports print it
pub fn format_line(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
