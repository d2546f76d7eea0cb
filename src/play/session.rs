//! Game session: the referee's true position plus the engine's belief.
//!
//! The opponent (side `Them`) moves first. After each move the engine only
//! learns its own new view and narrows its belief set accordingly.

use log::{debug, info};

use crate::core::board::{Board, Side};
use crate::core::moves::{format_line, Move};
use crate::engine::belief::{after_opponent_move, after_own_move, filter_consistent, BeliefSet, Node};
use crate::engine::eval::material_evaluation;
use crate::engine::search::{format_score, SearchLimits, SearchOutcome, Searcher};
use crate::error::{EngineError, Result};

/// How a game stands for the side about to move
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Ongoing,
    /// `Side` has lost its king
    KingLost(Side),
    /// `Side` is to move and has no legal move
    NoMoves(Side),
}

pub struct Session {
    position: Board,
    belief: BeliefSet,
    searcher: Searcher,
    limits: SearchLimits,
    plies: u32,
    last_search: Option<SearchOutcome>,
}

impl Session {
    /// New game from the standard start
    pub fn new(limits: SearchLimits) -> Self {
        Session::from_position(Board::start(), limits)
    }

    /// New game from `position`, which the engine is assumed to know exactly
    pub fn from_position(position: Board, limits: SearchLimits) -> Self {
        Session {
            position,
            belief: BeliefSet::known(position),
            searcher: Searcher::new(),
            limits,
            plies: 0,
            last_search: None,
        }
    }

    pub fn position(&self) -> &Board {
        &self.position
    }

    pub fn belief(&self) -> &BeliefSet {
        &self.belief
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    pub fn last_search(&self) -> Option<&SearchOutcome> {
        self.last_search.as_ref()
    }

    /// What the opponent currently sees
    pub fn opponent_view(&self) -> Board {
        self.position.view(Side::Them)
    }

    /// What the engine currently sees
    pub fn engine_view(&self) -> Board {
        self.position.view(Side::Us)
    }

    /// Game state with `to_move` about to play
    pub fn outcome(&self, to_move: Side) -> Outcome {
        for side in [Side::Us, Side::Them] {
            if !self.position.has_king(side) {
                return Outcome::KingLost(side);
            }
        }
        if self.position.legal_moves(to_move).is_empty() {
            return Outcome::NoMoves(to_move);
        }
        Outcome::Ongoing
    }

    /// Play an opponent move and update the engine's belief from its new view
    pub fn play_opponent(&mut self, mv: Move) -> Result<()> {
        self.position = self.position.apply_move(mv, Side::Them)?;
        self.plies += 1;

        let view = self.engine_view();
        self.belief = after_opponent_move(&self.belief, &view)?.non_empty()?;
        debug!("opponent played {}; {} candidate positions", mv, self.belief.len());
        Ok(())
    }

    /// Search, play the engine's move, and update its belief.
    ///
    /// Returns `None` when the engine has no legal move.
    pub fn engine_reply(&mut self) -> Result<Option<Move>> {
        let root = Node::our_turn(self.engine_view(), self.belief.clone())?;
        let outcome = self.searcher.iterative_deepening(&root, self.limits.clone())?;

        if let Some(score) = outcome.score {
            info!(
                "engine: depth {:?} score {} material {} line {}",
                outcome.depth,
                format_score(&score),
                material_evaluation(&root),
                format_line(&outcome.principal_variation)
            );
        }

        let best = outcome.best_move;
        self.last_search = Some(outcome);
        let Some(mv) = best else {
            return Ok(None);
        };

        self.position = self.position.apply_move(mv, Side::Us)?;
        self.plies += 1;

        let moved = after_own_move(&self.belief, mv)?;
        self.belief = filter_consistent(&moved, Side::Us, &self.engine_view()).non_empty()?;
        debug!("engine played {}; {} candidate positions", mv, self.belief.len());
        Ok(Some(mv))
    }

    /// A uniformly random legal move for the opponent
    pub fn random_opponent_move(&self) -> Option<Move> {
        let moves = self.position.legal_moves(Side::Them);
        if moves.is_empty() {
            return None;
        }
        moves.get(rand::random_range(0..moves.len())).copied()
    }

    /// Check the engine's belief still contains the true position
    pub fn check_belief(&self) -> Result<()> {
        if self.belief.contains(&self.position) {
            Ok(())
        } else {
            Err(EngineError::InconsistentBeliefState)
        }
    }
}
