//! Engine Module Tests
//!
//! Tests for belief sets, node expansion, static evaluation, and the
//! transposition table.

use fog_chess::core::board::{Board, Side};
use fog_chess::core::moves::Move;
use fog_chess::engine::belief::{
    after_opponent_move, after_own_move, filter_consistent, BeliefSet, Node,
};
use fog_chess::engine::eval::{evaluate, is_terminal, material_evaluation, Score, WIN_SCORE};
use fog_chess::engine::tt::{TTFlag, TranspositionTable};
use fog_chess::error::EngineError;
use std::collections::HashSet;

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

/// The start position followed by every legal opening move of ours
fn sample_positions() -> Vec<Board> {
    let start = Board::start();
    let mut positions = vec![start];
    for m in start.legal_moves(Side::Us) {
        positions.push(start.apply_move(m, Side::Us).unwrap());
    }
    positions
}

// ============================================================================
// Belief Set Tests
// ============================================================================

#[test]
fn test_belief_set_order_independent() {
    let positions = sample_positions();
    let forward = BeliefSet::new(positions.iter().copied());
    let backward = BeliefSet::new(positions.iter().rev().copied());
    assert_eq!(forward, backward);
    assert_eq!(forward.key(), backward.key());
    assert_eq!(forward.len(), positions.len());
}

#[test]
fn test_view_consistency() {
    for p in sample_positions() {
        for side in [Side::Us, Side::Them] {
            let filtered = filter_consistent(&BeliefSet::known(p), side, &p.view(side));
            assert!(filtered.contains(&p));
        }
    }
}

#[test]
fn test_filter_consistent_drops_mismatches() {
    let positions = sample_positions();
    let all = BeliefSet::new(positions.iter().copied());
    let target = positions[3];
    let filtered = filter_consistent(&all, Side::Us, &target.view(Side::Us));
    assert!(filtered.contains(&target));
    assert!(filtered.iter().all(|p| p.view(Side::Us) == target.view(Side::Us)));
    assert!(!filtered.contains(&Board::start()));
}

#[test]
fn test_after_own_move_maps_each_candidate() {
    let start = Board::start();
    let m = mv("4,4-3,3");
    let moved = after_own_move(&BeliefSet::known(start), m).unwrap();
    assert_eq!(moved.len(), 1);
    assert!(moved.contains(&start.apply_move(m, Side::Us).unwrap()));
}

#[test]
fn test_after_own_move_rejects_illegal() {
    let err = after_own_move(&BeliefSet::known(Board::start()), mv("4,4-5,4")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidMove { side: Side::Us, .. }));
}

#[test]
fn test_after_opponent_move_keeps_true_position() {
    let start = Board::start();
    let belief = BeliefSet::known(start);
    for r in start.legal_moves(Side::Them) {
        let actual = start.apply_move(r, Side::Them).unwrap();
        let next = after_opponent_move(&belief, &actual.view(Side::Us)).unwrap();
        assert!(next.contains(&actual));
        assert!(next.iter().all(|p| p.view(Side::Us) == actual.view(Side::Us)));
    }
}

#[test]
fn test_fog_merges_hidden_moves() {
    // Opponent moves that stay off the cells we see all look the same to us
    let start = Board::start();
    let belief = BeliefSet::known(start);
    let hidden = start.apply_move(mv("1,1-0,0"), Side::Them).unwrap();
    let next = after_opponent_move(&belief, &hidden.view(Side::Us)).unwrap();
    assert!(next.len() > 1);
    assert!(!next.contains(&start.apply_move(mv("3,0-4,2"), Side::Them).unwrap()));
}

// ============================================================================
// Node Expansion Tests
// ============================================================================

#[test]
fn test_our_children_from_start() {
    let root = Node::from_position(Board::start());
    let children = root.children().unwrap();
    assert_eq!(children.len(), 9);
    for (child, m) in &children {
        assert!(!child.turn());
        assert!(child.view().is_none());
        assert_eq!(child.possible().len(), 1);
        assert!(child.possible().contains(&Board::start().apply_move(*m, Side::Us).unwrap()));
    }
}

#[test]
fn test_their_children_respect_views() {
    let start = Board::start();
    let after = start.apply_move(mv("5,4-4,2"), Side::Us).unwrap();
    let node = Node::their_turn(BeliefSet::known(after)).unwrap();
    let children = node.children().unwrap();
    assert_eq!(children.len(), after.legal_moves(Side::Them).len());

    for (child, r) in &children {
        assert!(child.turn());
        let view = child.view().unwrap();
        let actual = after.apply_move(*r, Side::Them).unwrap();
        assert_eq!(*view, actual.view(Side::Us));
        assert!(child.possible().contains(&actual));
        assert!(child.possible().iter().all(|p| p.view(Side::Us) == *view));
    }
}

#[test]
fn test_their_children_branch_over_candidates() {
    let start = Board::start();
    let a = start.apply_move(mv("1,1-0,0"), Side::Them).unwrap();
    let b = start.apply_move(mv("1,1-2,0"), Side::Them).unwrap();
    let m = mv("4,4-3,3");
    let belief = BeliefSet::new([a, b]);
    let node = Node::their_turn(after_own_move(&belief, m).unwrap()).unwrap();

    let expected: usize = node.possible().iter().map(|p| p.legal_moves(Side::Them).len()).sum();
    assert_eq!(node.children().unwrap().len(), expected);
}

#[test]
fn test_node_equality_ignores_discovery_order() {
    let positions = sample_positions();
    let a = Node::their_turn(BeliefSet::new(positions.iter().copied())).unwrap();
    let b = Node::their_turn(BeliefSet::new(positions.iter().rev().copied())).unwrap();
    assert_eq!(a, b);
    let set: HashSet<Node> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

// ============================================================================
// Evaluation Tests
// ============================================================================

#[test]
fn test_start_evaluation() {
    let root = Node::from_position(Board::start());
    let score = evaluate(&root);
    assert_eq!(score.terminal, 0);
    assert_eq!(score.material, 0);
    assert_eq!(score.visibility, 0.0);
    assert_eq!(material_evaluation(&root), 0);
    assert!(!is_terminal(&root));
}

#[test]
fn test_visibility_for_their_turn_node() {
    let start = Board::start();
    let after = start.apply_move(mv("4,4-3,3"), Side::Us).unwrap();
    let node = Node::their_turn(BeliefSet::known(after)).unwrap();
    let ours = after.view(Side::Us).unknown_count() as f64;
    let theirs = after.view(Side::Them).unknown_count() as f64;
    assert_eq!(evaluate(&node).visibility, theirs - ours);
}

#[test]
fn test_visibility_averages_candidates() {
    let start = Board::start();
    let a = start.apply_move(mv("1,1-0,0"), Side::Them).unwrap();
    let b = start.apply_move(mv("1,0-3,1"), Side::Them).unwrap();
    let node = Node::their_turn(BeliefSet::new([a, b])).unwrap();

    let fog = |p: &Board, s: Side| p.view(s).unknown_count() as f64;
    let ours = (fog(&a, Side::Us) + fog(&b, Side::Us)) / 2.0;
    let theirs = (fog(&a, Side::Them) + fog(&b, Side::Them)) / 2.0;
    assert!((evaluate(&node).visibility - (theirs - ours)).abs() < 1e-9);
}

#[test]
fn test_terminal_detection() {
    let no_their_king = Node::from_position(board("./n./.../n.../....K/......"));
    let score = evaluate(&no_their_king);
    assert!(is_terminal(&no_their_king));
    assert_eq!(score.terminal, WIN_SCORE);
    assert_eq!(score.material, -2);
    assert!(score > Score::new(0, 5, 100.0));
    assert_eq!(material_evaluation(&no_their_king), WIN_SCORE);

    let no_our_king = Node::from_position(board("./nk/.../..../...../..N.N."));
    assert!(is_terminal(&no_our_king));
    assert_eq!(evaluate(&no_our_king).terminal, -WIN_SCORE);
    assert!(evaluate(&no_our_king) < Score::new(0, -5, -100.0));
    assert_eq!(material_evaluation(&no_our_king), -WIN_SCORE);
}

#[test]
fn test_evaluation_symmetry() {
    for p in sample_positions() {
        let ours = evaluate(&Node::from_position(p));
        let mirrored = Node::their_turn(BeliefSet::known(p.swap_sides())).unwrap();
        assert_eq!(evaluate(&mirrored), -ours);
    }
}

// ============================================================================
// Transposition Table Tests
// ============================================================================

#[test]
fn test_tt_store_probe() {
    let mut tt = TranspositionTable::new();
    let node = Node::from_position(Board::start());
    let line = vec![mv("4,4-3,3")];
    tt.store(&node, Score::new(0, 1, 2.0), line.clone(), 3, TTFlag::Exact);

    let entry = tt.probe(&node).unwrap();
    assert_eq!(entry.value, Score::new(0, 1, 2.0));
    assert_eq!(entry.principal_variation, line);
    assert_eq!(entry.depth, 3);
    assert_eq!(entry.flag, TTFlag::Exact);
}

#[test]
fn test_tt_overwrites_and_clears() {
    let mut tt = TranspositionTable::new();
    let node = Node::from_position(Board::start());
    tt.store(&node, Score::ZERO, Vec::new(), 5, TTFlag::LowerBound);
    tt.store(&node, Score::new(0, 1, 0.0), vec![mv("5,2-3,1")], 2, TTFlag::UpperBound);
    assert_eq!(tt.len(), 1);

    let entry = tt.probe(&node).unwrap();
    assert_eq!(entry.depth, 2);
    assert_eq!(entry.flag, TTFlag::UpperBound);

    let other = Node::their_turn(BeliefSet::known(Board::start())).unwrap();
    assert!(tt.probe(&other).is_none());

    tt.clear();
    assert!(tt.is_empty());
}
