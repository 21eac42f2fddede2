//! Ataxx position representation and move execution.
//!
//! The board is seven packed `u32` rows, indexed by `x`. Within a row, the
//! cell at column `y` lives in the 2-bit field starting at bit `2 * (y + 1)`.
//! Fields 0 and 8 are sentinels that stay `CODE_OUT`, so a row read one step
//! past either edge yields "off-board" rather than garbage.
//!
//! Cell codes are chosen so that the high bit of a field says whether it
//! holds a piece:
//!
//! | code | meaning   |
//! |------|-----------|
//! | `0`  | off-board |
//! | `1`  | empty     |
//! | `2`  | Black     |
//! | `3`  | White     |

use std::fmt;

use crate::constants::*;

/// A cell on the board as `(x, y)`, both in `0..N`.
pub type Point = (usize, usize);

/// A player colour. The discriminant is the packed cell code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Packed cell code for this colour's pieces.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Color::Black => CODE_BLACK,
            Color::White => CODE_WHITE,
        }
    }

    /// The other side. With codes 2 and 3 this is `5 - code`.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn from_code(code: u8) -> Option<Color> {
        match code {
            CODE_BLACK => Some(Color::Black),
            CODE_WHITE => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// A move from one cell to another.
///
/// Chebyshev distance 1 is a clone (the source piece stays), distance 2 is a
/// jump (the source cell is vacated).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Point,
    pub to: Point,
}

impl Move {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Chebyshev distance between source and destination.
    #[inline]
    pub fn distance(&self) -> usize {
        self.from.0.abs_diff(self.to.0).max(self.from.1.abs_diff(self.to.1))
    }

    #[inline]
    pub fn is_jump(&self) -> bool {
        self.distance() == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.from.0, self.from.1, self.to.0, self.to.1)
    }
}

/// Reason a move was rejected by [`try_play`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate is outside the 7x7 board
    OffBoard,
    /// Source cell does not hold a piece of the side to move
    NotOwnPiece,
    /// Destination cell is not empty
    Occupied,
    /// Source and destination are not 1 or 2 cells apart
    BadDistance,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OffBoard => write!(f, "illegal move: coordinate off the board"),
            MoveError::NotOwnPiece => {
                write!(f, "illegal move: source is not a piece of the side to move")
            }
            MoveError::Occupied => write!(f, "illegal move: destination not empty"),
            MoveError::BadDistance => write!(f, "illegal move: distance must be 1 or 2"),
        }
    }
}

impl std::error::Error for MoveError {}

/// An Ataxx position: the packed board plus the side to move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    rows: [u32; N],
    /// Side to move
    pub to_move: Color,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// A packed row with every playable cell empty and both sentinels off-board.
const EMPTY_ROW: u32 = {
    let mut row = 0u32;
    let mut y = 0;
    while y < N {
        row |= (CODE_EMPTY as u32) << field_shift(y);
        y += 1;
    }
    row
};

/// Bit offset of column `y` within a packed row.
#[inline]
const fn field_shift(y: usize) -> u32 {
    (y as u32 + 1) * CELL_BITS
}

impl Position {
    /// The standard starting position: a piece in each corner, Black on
    /// (0,0) and (6,6), White on (0,6) and (6,0), Black to move.
    pub fn new() -> Self {
        let mut pos = Self::empty(Color::Black);
        pos.set_code(0, 0, CODE_BLACK);
        pos.set_code(N - 1, N - 1, CODE_BLACK);
        pos.set_code(0, N - 1, CODE_WHITE);
        pos.set_code(N - 1, 0, CODE_WHITE);
        pos
    }

    /// A board with every cell empty.
    pub fn empty(to_move: Color) -> Self {
        Self {
            rows: [EMPTY_ROW; N],
            to_move,
        }
    }

    /// Build a position from a diagram of `N` rows, one per `x`.
    ///
    /// `X` is Black, `O` is White, `.` is empty. Whitespace inside a row is
    /// ignored. Returns `None` if a row has the wrong length or an unknown
    /// character.
    pub fn from_diagram(rows: &[&str], to_move: Color) -> Option<Self> {
        if rows.len() != N {
            return None;
        }
        let mut pos = Self::empty(to_move);
        for (x, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != N {
                return None;
            }
            for (y, ch) in cells.into_iter().enumerate() {
                let code = match ch {
                    'X' => CODE_BLACK,
                    'O' => CODE_WHITE,
                    '.' => CODE_EMPTY,
                    _ => return None,
                };
                pos.set_code(x, y, code);
            }
        }
        Some(pos)
    }

    /// Raw cell code at `(x, y)`.
    #[inline]
    pub fn piece_at(&self, x: usize, y: usize) -> u8 {
        ((self.rows[x] >> field_shift(y)) & CELL_MASK) as u8
    }

    /// Colour of the piece at `(x, y)`, if any.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        Color::from_code(self.piece_at(x, y))
    }

    /// True if `(x, y)` holds no piece.
    #[inline]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.piece_at(x, y) & CODE_PIECE_BIT == 0
    }

    /// True if `(x, y)` holds a piece of the side to move.
    #[inline]
    pub fn is_own_piece(&self, x: usize, y: usize) -> bool {
        self.piece_at(x, y) == self.to_move.code()
    }

    /// The packed rows, sentinel fields included.
    pub fn rows(&self) -> &[u32; N] {
        &self.rows
    }

    #[inline]
    fn set_code(&mut self, x: usize, y: usize, code: u8) {
        let shift = field_shift(y);
        self.rows[x] = (self.rows[x] & !(CELL_MASK << shift)) | ((code as u32) << shift);
    }
}

/// True if `(x, y)` is a playable cell.
#[inline]
pub fn on_board(x: isize, y: isize) -> bool {
    (0..N as isize).contains(&x) && (0..N as isize).contains(&y)
}

/// Play a move for the side to move, without checking legality.
///
/// A jump vacates the source. The destination always receives the mover's
/// piece, and every opposing piece in the 3x3 block around the destination
/// is converted. Empty and own cells in that block are untouched. The side
/// to move then passes to the opponent.
pub fn play_move(pos: &mut Position, mv: Move) {
    let me = pos.to_move.code();
    let them = pos.to_move.opponent().code();

    if mv.is_jump() {
        pos.set_code(mv.from.0, mv.from.1, CODE_EMPTY);
    }
    pos.set_code(mv.to.0, mv.to.1, me);

    let (tx, ty) = mv.to;
    for x in tx.saturating_sub(1)..=(tx + 1).min(N - 1) {
        for y in ty.saturating_sub(1)..=(ty + 1).min(N - 1) {
            if pos.piece_at(x, y) == them {
                pos.set_code(x, y, me);
            }
        }
    }

    pos.to_move = pos.to_move.opponent();
}

/// Check a move against the rules, then play it.
///
/// The position is left untouched when an error is returned.
pub fn try_play(pos: &mut Position, mv: Move) -> Result<(), MoveError> {
    let (fx, fy) = mv.from;
    let (tx, ty) = mv.to;
    if fx >= N || fy >= N || tx >= N || ty >= N {
        return Err(MoveError::OffBoard);
    }
    if !pos.is_own_piece(fx, fy) {
        return Err(MoveError::NotOwnPiece);
    }
    if !pos.is_empty(tx, ty) {
        return Err(MoveError::Occupied);
    }
    if !matches!(mv.distance(), 1 | 2) {
        return Err(MoveError::BadDistance);
    }
    play_move(pos, mv);
    Ok(())
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..N {
            for y in 0..N {
                let ch = match self.color_at(x, y) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{} to move", self.to_move)
    }
}
