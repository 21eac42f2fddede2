//! Constants for board geometry, move offsets, and search parameters.
//!
//! The board is stored as one packed integer per row. Each row holds nine
//! 2-bit fields: the seven playable cells plus a sentinel field on either
//! side that always reads as off-board.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Ataxx is played on 7x7.
pub const N: usize = 7;

/// Number of playable cells.
pub const CELLS: usize = N * N;

/// Bits per cell in a packed row.
pub const CELL_BITS: u32 = 2;

/// Mask for one packed cell.
pub const CELL_MASK: u32 = 0b11;

// =============================================================================
// Cell Codes
// =============================================================================

/// Off-board sentinel field.
pub const CODE_OUT: u8 = 0;

/// Empty playable cell.
pub const CODE_EMPTY: u8 = 1;

/// Black piece. Black moves first.
pub const CODE_BLACK: u8 = 2;

/// White piece.
pub const CODE_WHITE: u8 = 3;

/// Set in both player codes, clear in `CODE_OUT` and `CODE_EMPTY`.
pub const CODE_PIECE_BIT: u8 = 0b10;

// =============================================================================
// Move Offsets
// =============================================================================

/// Offsets from a destination cell to every cell that can move into it.
///
/// The first 8 are at Chebyshev distance 1 (clone moves), the remaining 16
/// are at distance 2 (jump moves). Move generation scans them in this order.
pub const MOVE_OFFSETS: [(isize, isize); 24] = [
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (2, 0),
    (2, 1),
    (2, 2),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-2, 2),
    (-2, 1),
    (-2, 0),
    (-2, -1),
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (2, -1),
];

/// Number of leading entries in `MOVE_OFFSETS` that are clone offsets.
pub const CLONE_OFFSETS: usize = 8;

// =============================================================================
// Search Parameters
// =============================================================================

/// Coefficient of the exploration term in UCB selection.
pub const UCB_EXPLORE: f64 = 2.0;

/// Magnitude of the score given to a position with no legal moves.
pub const TERMINAL_SCORE: i32 = 50;

/// Cells a side must hold (strictly more than) to win a terminal position.
pub const MAJORITY: usize = CELLS / 2;

/// Selection value of an unvisited child; below any real UCB value.
pub const UNVISITED_SCORE: f64 = -1000.0;

/// Fraction of the time budget spent searching before committing to a move.
pub const TIME_THRESHOLD: f64 = 0.965;

/// Default time budget per move, in milliseconds.
pub const DEFAULT_TIME_MS: u64 = 1000;
