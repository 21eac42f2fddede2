//! Turn-history replay and move output for the host process.
//!
//! The host sends whitespace-separated integers:
//!
//! ```text
//! turn
//! (opponent move, own move) repeated turn - 1 times
//! opponent move
//! ```
//!
//! Each move is `fromX fromY toX toY`, or `-1 -1 -1 -1` when no move was
//! made that half-turn. The engine answers with one line in the same move
//! format.
//!
//! ## Example
//!
//! ```
//! use ataxx_mcts::position::Color;
//! use ataxx_mcts::transcript::parse_transcript;
//!
//! // Second turn: we moved first, the opponent has replied once.
//! let pos = parse_transcript("2\n-1 -1 -1 -1\n0 0 1 1\n6 0 5 0\n").unwrap();
//! assert_eq!(pos.to_move, Color::Black);
//! ```

use std::fmt;
use std::io::Read;

use log::{debug, trace};

use crate::constants::N;
use crate::position::{try_play, Move, MoveError, Position};

/// Reason a transcript was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// Input ended before the named value
    Truncated { expected: String },
    /// A token is not an integer
    InvalidNumber { token: String },
    /// Turn number is below 1
    InvalidTurn(i64),
    /// A move record is neither the no-move sentinel nor on the board
    InvalidRecord { record: usize, values: [i64; 4] },
    /// A move record breaks the rules in the replayed position
    IllegalMove { record: usize, mv: Move, reason: MoveError },
    /// The input could not be read
    Io(String),
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptError::Truncated { expected } => {
                write!(f, "transcript ended early: expected {expected}")
            }
            TranscriptError::InvalidNumber { token } => {
                write!(f, "transcript token {token:?} is not an integer")
            }
            TranscriptError::InvalidTurn(turn) => {
                write!(f, "turn number must be at least 1 (got {turn})")
            }
            TranscriptError::InvalidRecord { record, values } => write!(
                f,
                "move record {record} ({} {} {} {}) is neither -1 -1 -1 -1 nor on the board",
                values[0], values[1], values[2], values[3]
            ),
            TranscriptError::IllegalMove { record, mv, reason } => {
                write!(f, "move record {record} ({mv}): {reason}")
            }
            TranscriptError::Io(err) => write!(f, "failed to read transcript: {err}"),
        }
    }
}

impl std::error::Error for TranscriptError {}

/// Integer token stream over the raw input.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            iter: input.split_whitespace(),
        }
    }

    fn next_int(&mut self, expected: impl FnOnce() -> String) -> Result<i64, TranscriptError> {
        let token = self
            .iter
            .next()
            .ok_or_else(|| TranscriptError::Truncated { expected: expected() })?;
        token.parse().map_err(|_| TranscriptError::InvalidNumber {
            token: token.to_string(),
        })
    }

    /// Read one move record; `Ok(None)` is the no-move sentinel.
    fn next_move(&mut self, record: usize) -> Result<Option<Move>, TranscriptError> {
        let mut values = [0i64; 4];
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.next_int(|| format!("value {} of move record {record}", i + 1))?;
        }
        if values == [-1; 4] {
            return Ok(None);
        }
        if values.iter().any(|&v| !(0..N as i64).contains(&v)) {
            return Err(TranscriptError::InvalidRecord { record, values });
        }
        let [fx, fy, tx, ty] = values.map(|v| v as usize);
        Ok(Some(Move::new((fx, fy), (tx, ty))))
    }

    fn remaining(self) -> usize {
        self.iter.count()
    }
}

/// Replay a transcript onto the starting position.
///
/// Records are numbered from 1 in input order. Sentinel records are skipped
/// and do not change the side to move. Trailing tokens after the last
/// record are ignored.
pub fn parse_transcript(input: &str) -> Result<Position, TranscriptError> {
    let mut tokens = Tokens::new(input);
    let turn = tokens.next_int(|| "turn number".to_string())?;
    if turn < 1 {
        return Err(TranscriptError::InvalidTurn(turn));
    }

    let mut pos = Position::new();
    let records = usize::try_from(turn).unwrap_or(usize::MAX).saturating_mul(2) - 1;
    for record in 1..=records {
        let Some(mv) = tokens.next_move(record)? else {
            trace!("record {record}: no move");
            continue;
        };
        let side = pos.to_move;
        try_play(&mut pos, mv).map_err(|reason| TranscriptError::IllegalMove { record, mv, reason })?;
        trace!("record {record}: {side} plays {mv}");
    }

    let extra = tokens.remaining();
    if extra > 0 {
        debug!("ignoring {extra} trailing tokens after the transcript");
    }
    Ok(pos)
}

/// Read a whole transcript from `reader` and replay it.
pub fn read_transcript<R: Read>(mut reader: R) -> Result<Position, TranscriptError> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| TranscriptError::Io(e.to_string()))?;
    parse_transcript(&input)
}

/// Format the engine's answer; no move is written as `-1 -1 -1 -1`.
pub fn format_move(mv: Option<Move>) -> String {
    match mv {
        Some(mv) => mv.to_string(),
        None => "-1 -1 -1 -1".to_string(),
    }
}
