//! Legal move generation.
//!
//! Moves are found destination-first: for every empty cell, each of the 24
//! offsets in [`MOVE_OFFSETS`] is tried as a source. Output order is by
//! destination `x`, then destination `y`, then offset index.

use crate::constants::{MOVE_OFFSETS, N};
use crate::position::{on_board, Move, Position};

/// Generate every legal move for the side to move.
pub fn gen_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    gen_moves_into(pos, &mut moves);
    moves
}

/// Append every legal move for the side to move to `out`.
pub fn gen_moves_into(pos: &Position, out: &mut Vec<Move>) {
    for x0 in 0..N {
        for y0 in 0..N {
            if !pos.is_empty(x0, y0) {
                continue;
            }
            for &(dx, dy) in &MOVE_OFFSETS {
                let x1 = x0 as isize + dx;
                let y1 = y0 as isize + dy;
                if !on_board(x1, y1) {
                    continue;
                }
                let (x1, y1) = (x1 as usize, y1 as usize);
                if pos.is_own_piece(x1, y1) {
                    out.push(Move::new((x1, y1), (x0, y0)));
                }
            }
        }
    }
}

/// True if the side to move has at least one legal move.
pub fn has_moves(pos: &Position) -> bool {
    (0..N).any(|x0| {
        (0..N).any(|y0| {
            pos.is_empty(x0, y0)
                && MOVE_OFFSETS.iter().any(|&(dx, dy)| {
                    let x1 = x0 as isize + dx;
                    let y1 = y0 as isize + dy;
                    on_board(x1, y1) && pos.is_own_piece(x1 as usize, y1 as usize)
                })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CLONE_OFFSETS;
    use crate::position::{Color, Point};

    #[test]
    fn test_opening_moves() {
        // Each corner piece reaches 3 clone and 5 jump destinations.
        let pos = Position::new();
        let moves = gen_moves(&pos);
        assert_eq!(moves.len(), 16);
        assert_eq!(moves.iter().filter(|m| m.distance() == 1).count(), 6);
        assert_eq!(moves.iter().filter(|m| m.is_jump()).count(), 10);
        for mv in &moves {
            assert!(pos.is_own_piece(mv.from.0, mv.from.1));
            assert!(pos.is_empty(mv.to.0, mv.to.1));
        }
    }

    #[test]
    fn test_move_order() {
        let pos = Position::new();
        let moves = gen_moves(&pos);
        // First destination scanned is (0,1), reached by a clone from (0,0).
        assert_eq!(moves[0], Move::new((0, 0), (0, 1)));
        let keys: Vec<Point> = moves.iter().map(|m| (m.to.0, m.to.1)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_offset_table_covers_distance_two_ring() {
        let mut seen = std::collections::HashSet::new();
        for (i, &(dx, dy)) in MOVE_OFFSETS.iter().enumerate() {
            let d = dx.abs().max(dy.abs());
            assert_eq!(d, if i < CLONE_OFFSETS { 1 } else { 2 });
            assert!(seen.insert((dx, dy)));
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let pos = Position::from_diagram(
            &[
                "XXXXXXX", "XXXXXXX", "XXXXXXX", "XXXOOOO", "OOOOOOO", "OOOOOOO", "OOOOOOO",
            ],
            Color::White,
        )
        .unwrap();
        assert!(gen_moves(&pos).is_empty());
        assert!(!has_moves(&pos));
    }

    #[test]
    fn test_blocked_side_has_no_moves() {
        let pos = Position::from_diagram(
            &[
                "O..XXXX", "...XXXX", "...XXXX", "XXXXXXX", "XXXXXXX", "XXXXXXX", "XXXXXXX",
            ],
            Color::White,
        )
        .unwrap();
        assert!(!gen_moves(&pos).is_empty());

        // Empty cells remain, but none within reach of the White piece.
        let blocked = Position::from_diagram(
            &[
                "OXXX...", "XXXX...", "XXXX...", "XXXX...", "XXXXXXX", "XXXXXXX", "XXXXXXX",
            ],
            Color::White,
        )
        .unwrap();
        assert!(gen_moves(&blocked).is_empty());
        assert!(!has_moves(&blocked));
    }

    #[test]
    fn test_has_moves_agrees_with_gen_moves() {
        let pos = Position::new();
        assert_eq!(has_moves(&pos), !gen_moves(&pos).is_empty());
    }
}
