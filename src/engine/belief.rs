//! Belief states
//!
//! A belief set is every position the engine still considers possible. A
//! [`Node`] pairs a belief set with whose turn it is and, on the engine's
//! turn, the view it currently has. Search expands nodes over both the
//! opponent's hidden configurations and the opponent's moves.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::board::{Board, Side};
use crate::core::moves::Move;
use crate::core::zobrist::ZobristKeys;
use crate::error::{EngineError, Result};

/// A set of candidate positions.
///
/// Members are kept sorted and unique, so equality does not depend on the
/// order positions were discovered in. The hash key is the XOR of the member
/// Zobrist hashes.
#[derive(Clone)]
pub struct BeliefSet {
    positions: Vec<Board>,
    key: u64,
}

impl BeliefSet {
    pub fn new<I: IntoIterator<Item = Board>>(positions: I) -> Self {
        let mut positions: Vec<Board> = positions.into_iter().collect();
        positions.sort_unstable();
        positions.dedup();
        let key = positions.iter().fold(0, |k, p| k ^ p.zobrist());
        BeliefSet { positions, key }
    }

    /// Belief of a side that knows the position exactly
    pub fn known(position: Board) -> Self {
        BeliefSet::new([position])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Board> {
        self.positions.iter()
    }

    pub fn contains(&self, position: &Board) -> bool {
        self.positions.binary_search(position).is_ok()
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Fail with `InconsistentBeliefState` if nothing is left
    pub fn non_empty(self) -> Result<Self> {
        if self.is_empty() {
            Err(EngineError::InconsistentBeliefState)
        } else {
            Ok(self)
        }
    }
}

impl PartialEq for BeliefSet {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.positions == other.positions
    }
}

impl Eq for BeliefSet {}

impl Hash for BeliefSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.key);
    }
}

impl FromIterator<Board> for BeliefSet {
    fn from_iter<I: IntoIterator<Item = Board>>(iter: I) -> Self {
        BeliefSet::new(iter)
    }
}

impl<'a> IntoIterator for &'a BeliefSet {
    type Item = &'a Board;
    type IntoIter = std::slice::Iter<'a, Board>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

impl fmt::Debug for BeliefSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.positions.iter()).finish()
    }
}

/// Candidates whose view for `side` equals `view`
pub fn filter_consistent(possible: &BeliefSet, side: Side, view: &Board) -> BeliefSet {
    possible
        .iter()
        .filter(|p| p.view(side) == *view)
        .copied()
        .collect()
}

/// Apply one of our moves to every candidate
pub fn after_own_move(possible: &BeliefSet, mv: Move) -> Result<BeliefSet> {
    possible
        .iter()
        .map(|p| p.apply_move(mv, Side::Us))
        .collect::<Result<Vec<_>>>()
        .map(BeliefSet::new)
}

/// Apply every legal opponent move to every candidate and keep the results
/// that look like `view` to us
pub fn after_opponent_move(possible: &BeliefSet, view: &Board) -> Result<BeliefSet> {
    let mut next = Vec::new();
    for position in possible {
        for mv in position.legal_moves(Side::Them) {
            let moved = position.apply_move(mv, Side::Them)?;
            if moved.view(Side::Us) == *view {
                next.push(moved);
            }
        }
    }
    Ok(BeliefSet::new(next))
}

/// A search tree vertex.
///
/// On our turn `view` holds what we see and every candidate projects to it.
/// On their turn `view` is `None`: the candidates are the positions right
/// after our last move, before we observe anything new.
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    view: Option<Board>,
    possible: BeliefSet,
    turn: bool,
    key: u64,
}

impl Node {
    /// Node where we are to move
    pub fn our_turn(view: Board, possible: BeliefSet) -> Result<Self> {
        Node::build(Some(view), possible, true)
    }

    /// Node where the opponent is to move
    pub fn their_turn(possible: BeliefSet) -> Result<Self> {
        Node::build(None, possible, false)
    }

    /// Our-turn node for a position we know exactly
    pub fn from_position(position: Board) -> Self {
        let view = position.view(Side::Us);
        let possible = BeliefSet::known(position);
        let key = Node::combine_key(Some(&view), &possible, true);
        Node { view: Some(view), possible, turn: true, key }
    }

    fn build(view: Option<Board>, possible: BeliefSet, turn: bool) -> Result<Self> {
        let possible = possible.non_empty()?;
        let key = Node::combine_key(view.as_ref(), &possible, turn);
        Ok(Node { view, possible, turn, key })
    }

    fn combine_key(view: Option<&Board>, possible: &BeliefSet, turn: bool) -> u64 {
        let keys = ZobristKeys::instance();
        let mut key = possible.key();
        key ^= view.map_or(keys.no_view(), |v| v.zobrist().rotate_left(17));
        if turn {
            key ^= keys.our_turn();
        }
        key
    }

    #[inline]
    pub fn view(&self) -> Option<&Board> {
        self.view.as_ref()
    }

    #[inline]
    pub fn possible(&self) -> &BeliefSet {
        &self.possible
    }

    /// True when we are to move
    #[inline]
    pub fn turn(&self) -> bool {
        self.turn
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// An arbitrary candidate standing in for the whole set.
    ///
    /// Piece counts are identical across candidates as long as no piece can
    /// be captured, so counting kings or knights on one member is enough.
    #[inline]
    pub fn representative(&self) -> &Board {
        &self.possible.positions[0]
    }

    /// Moves available to the side to move, paired with the resulting nodes
    pub fn children(&self) -> Result<Vec<(Node, Move)>> {
        if self.turn {
            self.our_children()
        } else {
            self.their_children()
        }
    }

    fn our_children(&self) -> Result<Vec<(Node, Move)>> {
        let moves = match &self.view {
            Some(view) => view.legal_moves(Side::Us),
            None => self.representative().legal_moves(Side::Us),
        };
        moves
            .into_iter()
            .map(|mv| -> Result<(Node, Move)> {
                let possible = after_own_move(&self.possible, mv)?;
                Ok((Node::their_turn(possible)?, mv))
            })
            .collect()
    }

    fn their_children(&self) -> Result<Vec<(Node, Move)>> {
        // Candidates sharing a view, and the belief after a given observation,
        // are shared by many (candidate, move) pairs.
        let mut narrowed: HashMap<Board, BeliefSet> = HashMap::new();
        let mut observed: HashMap<(Board, Board), BeliefSet> = HashMap::new();
        let mut children = Vec::new();

        for position in &self.possible {
            let seen = position.view(Side::Us);
            let group = narrowed
                .entry(seen)
                .or_insert_with(|| filter_consistent(&self.possible, Side::Us, &seen))
                .clone();

            for mv in position.legal_moves(Side::Them) {
                let next_view = position.apply_move(mv, Side::Them)?.view(Side::Us);
                let possible = match observed.get(&(seen, next_view)) {
                    Some(p) => p.clone(),
                    None => {
                        let p = after_opponent_move(&group, &next_view)?;
                        observed.insert((seen, next_view), p.clone());
                        p
                    }
                };
                children.push((Node::our_turn(next_view, possible)?, mv));
            }
        }

        Ok(children)
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.key);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("turn", &self.turn)
            .field("view", &self.view)
            .field("candidates", &self.possible.len())
            .finish()
    }
}
