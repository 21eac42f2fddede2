//! Monte Carlo Tree Search with a static evaluation in place of playouts.
//!
//! This module implements:
//! - An arena tree: every node lives in one `Vec`, and a node's children
//!   occupy a contiguous index range allocated when the node is first reached
//! - UCB1 selection, lowest value wins, since child scores are from the
//!   child's own side-to-move perspective
//! - Negamax backpropagation through recursive return values
//!
//! Each iteration descends from the root by UCB until it reaches a node that
//! has never been expanded. That node is fully expanded, scored once with
//! [`evaluate`] (or [`terminal_score`] if it has no moves), and the score is
//! passed back up with its sign flipped at every ply.

use std::ops::Range;

use log::debug;

use crate::constants::{UCB_EXPLORE, UNVISITED_SCORE};
use crate::eval::{evaluate, terminal_score};
use crate::movegen::gen_moves;
use crate::position::{play_move, Move, Position};

/// A node in the search tree.
///
/// Scores are accumulated from the perspective of the node's side to move.
#[derive(Clone, Debug)]
pub struct TreeNode {
    /// The position at this node
    pub pos: Position,
    /// Move that led here from the parent (`None` for the root)
    pub mv: Option<Move>,
    /// Arena indices of the children, set on first expansion
    children: Option<Range<usize>>,
    /// Cached terminal score (0 until computed)
    terminal: i32,
    /// Number of times a child was selected from this node
    pub v: u32,
    /// Sum of all scores added to this node
    pub total: i64,
}

impl TreeNode {
    /// Create an unexpanded node for the given position.
    pub fn new(pos: Position, mv: Option<Move>) -> Self {
        Self {
            pos,
            mv,
            children: None,
            terminal: 0,
            v: 0,
            total: 0,
        }
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// Number of children; 0 before expansion and for terminal nodes.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, |r| r.len())
    }

    /// Expanded with no legal moves.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_expanded() && self.child_count() == 0
    }

    /// Average score, or `None` if never visited.
    #[inline]
    pub fn average(&self) -> Option<f64> {
        (self.v > 0).then(|| self.total as f64 / self.v as f64)
    }
}

/// The search tree for a single move decision.
///
/// Owns every node plus the random source used to break ties between
/// unvisited children.
pub struct SearchTree {
    nodes: Vec<TreeNode>,
    rng: fastrand::Rng,
}

/// Arena index of the root node.
pub const ROOT: usize = 0;

impl SearchTree {
    /// Create a tree rooted at `pos`, with a seeded tie-break generator.
    pub fn new(pos: &Position, seed: u64) -> Self {
        Self {
            nodes: vec![TreeNode::new(pos.clone(), None)],
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    /// Total nodes allocated so far, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Arena indices of a node's children (empty if unexpanded or terminal).
    pub fn children(&self, idx: usize) -> Range<usize> {
        self.nodes[idx].children.clone().unwrap_or(0..0)
    }

    /// Run one search iteration from the root.
    ///
    /// Returns the value passed up out of the root, i.e. the negation of
    /// what was added to the root's total.
    pub fn iterate(&mut self) -> i32 {
        self.search(ROOT)
    }

    /// Recursive step of one iteration.
    fn search(&mut self, idx: usize) -> i32 {
        let value = match self.nodes[idx].children.clone() {
            None => {
                if expand(self, idx) == 0 {
                    self.terminal_value(idx)
                } else {
                    evaluate(&self.nodes[idx].pos)
                }
            }
            Some(range) if range.is_empty() => self.terminal_value(idx),
            Some(_) => {
                let child = self.select_child(idx, UCB_EXPLORE);
                self.search(child)
            }
        };
        update(&mut self.nodes[idx], value)
    }

    /// Terminal score of a node, computed once and cached.
    fn terminal_value(&mut self, idx: usize) -> i32 {
        let node = &mut self.nodes[idx];
        if node.terminal == 0 {
            node.terminal = terminal_score(&node.pos);
        }
        node.terminal
    }

    /// Count a visit to `idx` and pick the child with the lowest UCB value.
    ///
    /// Must only be called on an expanded, non-terminal node.
    fn select_child(&mut self, idx: usize, exploration: f64) -> usize {
        self.nodes[idx].v += 1;
        let parent_visits = self.nodes[idx].v;

        let mut best = self.children(idx).start;
        let mut best_value = f64::INFINITY;
        for child in self.children(idx) {
            let value = ucb(&self.nodes[child], parent_visits, exploration, &mut self.rng);
            if value < best_value {
                best_value = value;
                best = child;
            }
        }
        best
    }

    /// The move to play: the root child with the best exploitation score.
    ///
    /// With exploration switched off a lower child score is better for the
    /// root's side. A child is scored by its average, or by its cached
    /// terminal score if it has no moves. Children never passed through are
    /// skipped; if none qualify the first child is taken. Returns `None` if
    /// the root has no legal moves or was never expanded.
    pub fn best_move(&self) -> Option<Move> {
        let children = self.children(ROOT);
        let first = children.start;
        let best = children
            .filter_map(|c| exploit_score(&self.nodes[c]).map(|score| (c, score)))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(c, _)| c);

        match best {
            Some(c) => self.nodes[c].mv,
            None if self.root().child_count() > 0 => self.nodes[first].mv,
            None => None,
        }
    }
}

/// Score of a child for final move choice, from the child's perspective.
fn exploit_score(node: &TreeNode) -> Option<f64> {
    if node.is_terminal() && node.terminal != 0 {
        return Some(node.terminal as f64);
    }
    node.average()
}

/// Expand a node into one child per legal move.
///
/// Children are appended to the arena as one contiguous block. Returns the
/// number of children created. Expanding an already expanded node is a no-op
/// that returns its existing child count.
pub fn expand(tree: &mut SearchTree, idx: usize) -> usize {
    if tree.nodes[idx].is_expanded() {
        return tree.nodes[idx].child_count();
    }

    let parent = tree.nodes[idx].pos.clone();
    let moves = gen_moves(&parent);
    let start = tree.nodes.len();
    tree.nodes.reserve(moves.len());
    for mv in moves {
        let mut pos = parent.clone();
        play_move(&mut pos, mv);
        tree.nodes.push(TreeNode::new(pos, Some(mv)));
    }
    let end = tree.nodes.len();
    tree.nodes[idx].children = Some(start..end);
    end - start
}

/// Add `value` to a node's total and return what its parent receives.
#[inline]
fn update(node: &mut TreeNode, value: i32) -> i32 {
    node.total += value as i64;
    -value
}

/// UCB selection value of a child; lower is better for the parent.
///
/// Unvisited children get `UNVISITED_SCORE` plus a random fraction, so they
/// are all tried, in random order, before any statistics are used.
fn ucb(node: &TreeNode, parent_visits: u32, exploration: f64, rng: &mut fastrand::Rng) -> f64 {
    match node.average() {
        None => UNVISITED_SCORE + rng.f64(),
        Some(avg) => {
            let bonus = ((parent_visits as f64).ln() / node.v as f64).sqrt();
            avg - exploration * bonus
        }
    }
}

/// Log statistics for every root child at debug level.
pub fn dump_children(tree: &SearchTree) {
    for c in tree.children(ROOT) {
        let child = tree.node(c);
        if let Some(mv) = child.mv {
            debug!(
                "move {} v={} total={} avg={:.3}",
                mv,
                child.v,
                child.total,
                child.average().unwrap_or(f64::NAN)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TERMINAL_SCORE;
    use crate::position::Color;

    fn full_board(to_move: Color) -> Position {
        Position::from_diagram(
            &[
                "XXXXXXX", "XXXXXXX", "XXXXXXX", "XXXOOOO", "OOOOOOO", "OOOOOOO", "OOOOOOO",
            ],
            to_move,
        )
        .unwrap()
    }

    #[test]
    fn test_new_tree_is_unexpanded() {
        let tree = SearchTree::new(&Position::new(), 1);
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.root().is_expanded());
        assert_eq!(tree.root().child_count(), 0);
        assert_eq!(tree.best_move(), None);
    }

    #[test]
    fn test_expand_children_match_moves() {
        let pos = Position::new();
        let mut tree = SearchTree::new(&pos, 1);
        let n = expand(&mut tree, ROOT);
        let moves = gen_moves(&pos);
        assert_eq!(n, moves.len());
        for (c, mv) in tree.children(ROOT).zip(moves) {
            let child = tree.node(c);
            assert_eq!(child.mv, Some(mv));
            let mut expected = pos.clone();
            play_move(&mut expected, mv);
            assert_eq!(child.pos, expected);
            assert_eq!(child.pos.to_move, Color::White);
        }
        // A second expansion does not allocate.
        assert_eq!(expand(&mut tree, ROOT), n);
        assert_eq!(tree.node_count(), n + 1);
    }

    #[test]
    fn test_first_iteration_scores_root_statically() {
        let mut tree = SearchTree::new(&Position::new(), 1);
        let value = tree.iterate();
        assert_eq!(value, 0);
        assert_eq!(tree.root().total, 0);
        assert_eq!(tree.root().v, 0);
        assert_eq!(tree.root().child_count(), 16);
    }

    #[test]
    fn test_iteration_is_zero_sum() {
        let mut tree = SearchTree::new(&Position::new(), 7);
        tree.iterate();
        for _ in 0..50 {
            let before = tree.root().total;
            let returned = tree.iterate();
            let added = tree.root().total - before;
            assert_eq!(returned as i64, -added);
        }
    }

    #[test]
    fn test_each_root_pass_counts_one_selection() {
        let mut tree = SearchTree::new(&Position::new(), 3);
        tree.iterate();
        let n = tree.root().child_count();
        for _ in 0..n {
            tree.iterate();
        }
        assert_eq!(tree.root().v as usize, n);
        // Every child reached from the root was expanded on its first pass.
        let reached: Vec<usize> = tree
            .children(ROOT)
            .filter(|&c| tree.node(c).is_expanded())
            .collect();
        assert!(!reached.is_empty());
        // A child counts a visit only when it selects a grandchild, so the
        // visits below the root never exceed the passes through it.
        let below: u32 = tree.children(ROOT).map(|c| tree.node(c).v).sum();
        assert!((below as usize) < n);
        for c in tree.children(ROOT) {
            if tree.node(c).v > 0 {
                assert!(reached.contains(&c));
            }
        }
    }

    #[test]
    fn test_best_move_takes_winning_terminal_child() {
        // Black fills the last cell and the board is full with Black ahead.
        let pos = Position::from_diagram(
            &[
                "XXXXXXX", "XXXXXXX", "XXXXXXX", "XXXXX.O", "OOOOOOO", "OOOOOOO", "OOOOOOO",
            ],
            Color::Black,
        )
        .unwrap();
        let mut tree = SearchTree::new(&pos, 11);
        for _ in 0..100 {
            tree.iterate();
        }
        let best = tree.best_move().unwrap();
        assert_eq!(best.to, (3, 5));
        let child = tree
            .children(ROOT)
            .map(|c| tree.node(c))
            .find(|n| n.mv == Some(best))
            .unwrap();
        assert!(child.is_terminal());
        assert_eq!(child.terminal, -TERMINAL_SCORE);
    }

    #[test]
    fn test_terminal_root() {
        let mut tree = SearchTree::new(&full_board(Color::White), 1);
        assert_eq!(tree.iterate(), -TERMINAL_SCORE);
        assert!(tree.root().is_terminal());
        assert_eq!(tree.iterate(), -TERMINAL_SCORE);
        assert_eq!(tree.root().total, 2 * TERMINAL_SCORE as i64);
        assert_eq!(tree.root().v, 0);
        assert_eq!(tree.best_move(), None);

        let mut losing = SearchTree::new(&full_board(Color::Black), 1);
        assert_eq!(losing.iterate(), TERMINAL_SCORE);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let run = |seed| {
            let mut tree = SearchTree::new(&Position::new(), seed);
            for _ in 0..200 {
                tree.iterate();
            }
            let visits: Vec<u32> = tree.children(ROOT).map(|c| tree.node(c).v).collect();
            (visits, tree.best_move())
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_best_move_prefers_lowest_child_average() {
        let mut tree = SearchTree::new(&Position::new(), 5);
        for _ in 0..300 {
            tree.iterate();
        }
        let best = tree.best_move().unwrap();
        let best_avg = tree
            .children(ROOT)
            .map(|c| tree.node(c))
            .find(|n| n.mv == Some(best))
            .and_then(|n| n.average())
            .unwrap();
        for c in tree.children(ROOT) {
            if let Some(avg) = tree.node(c).average() {
                assert!(best_avg <= avg);
            }
        }
    }

    #[test]
    fn test_ucb_unvisited_below_visited() {
        let mut rng = fastrand::Rng::with_seed(9);
        let fresh = TreeNode::new(Position::new(), None);
        let mut seen = TreeNode::new(Position::new(), None);
        seen.v = 1;
        seen.total = -49;
        let a = ucb(&fresh, 10, UCB_EXPLORE, &mut rng);
        let b = ucb(&seen, 10, UCB_EXPLORE, &mut rng);
        assert!(a < b);
        assert!((UNVISITED_SCORE..UNVISITED_SCORE + 1.0).contains(&a));
    }

    #[test]
    fn test_ucb_without_exploration_is_average() {
        let mut rng = fastrand::Rng::with_seed(9);
        let mut node = TreeNode::new(Position::new(), None);
        node.v = 4;
        node.total = 10;
        assert_eq!(ucb(&node, 100, 0.0, &mut rng), 2.5);
    }
}
