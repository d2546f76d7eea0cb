//! Static evaluation
//!
//! Scores are vectors compared lexicographically: a lost or won king first,
//! then knight material, then visibility (how much less fog we face than the
//! opponent).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg};

use crate::core::board::{Board, Side};

use super::belief::Node;

/// Terminal score for a captured king
pub const WIN_SCORE: i32 = 2000;

/// Terminal components above this are wins still being counted down
pub const MATE_THRESHOLD: i32 = 1000;

/// A `(terminal, material, visibility)` score
#[derive(Clone, Copy, Debug)]
pub struct Score {
    pub terminal: i32,
    pub material: i32,
    pub visibility: f64,
}

impl Score {
    /// Bound above every reachable score
    pub const INFINITY: Score = Score {
        terminal: 30000,
        material: 30000,
        visibility: f64::INFINITY,
    };

    pub const ZERO: Score = Score {
        terminal: 0,
        material: 0,
        visibility: 0.0,
    };

    pub fn new(terminal: i32, material: i32, visibility: f64) -> Self {
        // +0.0 normalises -0.0 so that equal scores compare equal
        Score { terminal, material, visibility: visibility + 0.0 }
    }

    /// Count a forced win down by one ply so faster wins rank higher
    #[inline]
    pub fn decay_mate(self) -> Self {
        if self.terminal > MATE_THRESHOLD {
            Score { terminal: self.terminal - 1, ..self }
        } else {
            self
        }
    }

    /// Plies to the king capture if this is a forced result
    pub fn mate_distance(&self) -> Option<i32> {
        if self.terminal.abs() > MATE_THRESHOLD {
            Some(WIN_SCORE - self.terminal.abs())
        } else {
            None
        }
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.terminal
            .cmp(&other.terminal)
            .then(self.material.cmp(&other.material))
            .then(self.visibility.total_cmp(&other.visibility))
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        Score::new(
            self.terminal + rhs.terminal,
            self.material + rhs.material,
            self.visibility + rhs.visibility,
        )
    }
}

impl Neg for Score {
    type Output = Score;
    fn neg(self) -> Score {
        Score::new(-self.terminal, -self.material, -self.visibility)
    }
}

impl Mul<i32> for Score {
    type Output = Score;
    fn mul(self, n: i32) -> Score {
        Score::new(self.terminal * n, self.material * n, self.visibility * n as f64)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:.2})", self.terminal, self.material, self.visibility)
    }
}

/// Whether either king is gone, judged on the representative candidate
pub fn is_terminal(node: &Node) -> bool {
    let position = node.representative();
    !position.has_king(Side::Us) || !position.has_king(Side::Them)
}

fn terminal_score(position: &Board) -> i32 {
    if !position.has_king(Side::Us) {
        -WIN_SCORE
    } else if !position.has_king(Side::Them) {
        WIN_SCORE
    } else {
        0
    }
}

/// Scalar evaluation: the terminal score if a king is gone, else knight balance
pub fn material_evaluation(node: &Node) -> i32 {
    let position = node.representative();
    match terminal_score(position) {
        0 => position.knights(Side::Us) as i32 - position.knights(Side::Them) as i32,
        decided => decided,
    }
}

fn average_fog(node: &Node, side: Side) -> f64 {
    let possible = node.possible();
    let total: usize = possible.iter().map(|p| p.view(side).unknown_count()).sum();
    -(total as f64) / possible.len() as f64
}

/// Evaluate `node` from our point of view
pub fn evaluate(node: &Node) -> Score {
    let position = node.representative();
    let terminal = terminal_score(position);
    let material = position.knights(Side::Us) as i32 - position.knights(Side::Them) as i32;

    let ours = match node.view() {
        Some(view) if node.turn() => -(view.unknown_count() as f64),
        _ => average_fog(node, Side::Us),
    };
    let theirs = average_fog(node, Side::Them);

    Score::new(terminal, material, ours - theirs)
}
