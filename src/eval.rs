//! Static position evaluation.
//!
//! The search never plays random games to the end. A leaf is scored once by
//! the piece differential, and a position with no legal moves gets a fixed
//! win/loss score from the piece majority. Both scores are from the
//! perspective of the side to move.

use crate::constants::{CODE_BLACK, CODE_EMPTY, CODE_OUT, CODE_WHITE, MAJORITY, N, TERMINAL_SCORE};
use crate::position::{Color, Position};

/// Number of playable cells holding each cell code, indexed by code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PieceCounts([usize; 4]);

impl PieceCounts {
    #[inline]
    pub fn empty(&self) -> usize {
        self.0[CODE_EMPTY as usize]
    }

    #[inline]
    pub fn of(&self, color: Color) -> usize {
        self.0[color.code() as usize]
    }

    /// Total pieces of both colours.
    #[inline]
    pub fn pieces(&self) -> usize {
        self.0[CODE_BLACK as usize] + self.0[CODE_WHITE as usize]
    }

    /// Playable cells reading as off-board. Always zero for a sound board.
    #[inline]
    pub fn out(&self) -> usize {
        self.0[CODE_OUT as usize]
    }
}

/// Count every playable cell by its code.
pub fn count_pieces(pos: &Position) -> PieceCounts {
    let mut counts = [0usize; 4];
    for x in 0..N {
        for y in 0..N {
            counts[pos.piece_at(x, y) as usize] += 1;
        }
    }
    PieceCounts(counts)
}

/// Piece differential for the side to move.
pub fn evaluate(pos: &Position) -> i32 {
    let counts = count_pieces(pos);
    counts.of(pos.to_move) as i32 - counts.of(pos.to_move.opponent()) as i32
}

/// Outcome of a position with no legal moves for the side to move.
///
/// Returns `TERMINAL_SCORE` if the side to move holds more than half the
/// board, otherwise `-TERMINAL_SCORE`. Does not check that the position is
/// actually terminal; callers must have found no legal moves first. There is
/// no pass rule: a side that cannot move loses unless it already holds the
/// majority, even if the opponent could still play on.
pub fn terminal_score(pos: &Position) -> i32 {
    if count_pieces(pos).of(pos.to_move) > MAJORITY {
        TERMINAL_SCORE
    } else {
        -TERMINAL_SCORE
    }
}
