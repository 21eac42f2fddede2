//! Ataxx-MCTS: a time-bounded Monte Carlo Tree Search engine for Ataxx.
//!
//! The engine picks one move for the side to move on a 7x7 Ataxx board.
//! Leaves are scored by piece differential instead of random playouts, and
//! scores are backed up negamax-style.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, move offsets, and search parameters
//! - [`position`] - Packed board, moves, and capture rule
//! - [`movegen`] - Legal move generation
//! - [`eval`] - Piece counting, static evaluation, terminal scoring
//! - [`mcts`] - Arena search tree with UCB selection
//! - [`driver`] - Iteration-count and wall-clock search loops
//! - [`transcript`] - Turn-history replay and move output
//!
//! ## Example
//!
//! ```
//! use ataxx_mcts::driver::tree_search;
//! use ataxx_mcts::mcts::SearchTree;
//! use ataxx_mcts::position::{play_move, Move, Position};
//!
//! // Play an opening clone move
//! let mut pos = Position::new();
//! play_move(&mut pos, Move::new((0, 0), (1, 1)));
//!
//! // Search the reply
//! let mut tree = SearchTree::new(&pos, 42);
//! let best = tree_search(&mut tree, 200);
//! assert!(best.is_some());
//! ```

pub mod constants;
pub mod driver;
pub mod eval;
pub mod mcts;
pub mod movegen;
pub mod position;
pub mod transcript;
