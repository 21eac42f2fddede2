//! Search loops that decide when to stop iterating.
//!
//! An iteration always runs to completion; limits are only checked between
//! iterations.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::constants::{DEFAULT_TIME_MS, TIME_THRESHOLD};
use crate::mcts::{dump_children, SearchTree};
use crate::position::Move;

/// Wall-clock limits for one move decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchLimits {
    /// Total time allowed for the move, measured from process start
    pub budget: Duration,
    /// Fraction of `budget` spent iterating before committing
    pub threshold: f64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            budget: Duration::from_millis(DEFAULT_TIME_MS),
            threshold: TIME_THRESHOLD,
        }
    }
}

impl SearchLimits {
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Time after which no new iteration is started.
    pub fn cutoff(&self) -> Duration {
        self.budget.mul_f64(self.threshold)
    }
}

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport {
    /// Chosen move, `None` if the side to move has no legal move
    pub best: Option<Move>,
    /// Iterations run
    pub iterations: usize,
    /// Time spent, measured from the start instant given to the search
    pub elapsed: Duration,
}

/// Run `iterations` iterations and return the chosen move.
///
/// At least one iteration is always run so the root gets expanded.
pub fn tree_search(tree: &mut SearchTree, iterations: usize) -> Option<Move> {
    let iterations = iterations.max(1);
    for _ in 0..iterations {
        tree.iterate();
    }
    finish(tree, iterations)
}

/// Iterate until the cutoff of `limits` has passed since `started`.
///
/// At least one iteration is always run so the root gets expanded.
pub fn timed_search(tree: &mut SearchTree, started: Instant, limits: &SearchLimits) -> SearchReport {
    let cutoff = limits.cutoff();
    let mut iterations = 0;
    loop {
        tree.iterate();
        iterations += 1;
        if started.elapsed() >= cutoff {
            break;
        }
    }
    let best = finish(tree, iterations);
    SearchReport {
        best,
        iterations,
        elapsed: started.elapsed(),
    }
}

fn finish(tree: &SearchTree, iterations: usize) -> Option<Move> {
    dump_children(tree);
    let best = tree.best_move();
    debug!(
        "{} iterations, {} nodes, root v={} total={}",
        iterations,
        tree.node_count(),
        tree.root().v,
        tree.root().total
    );
    match best {
        Some(mv) => info!("best move {mv}"),
        None => info!("no legal move"),
    }
    best
}
