//! Attack detection.
//!
//! A square is attacked when some piece of the given color could capture on
//! it. Every piece is asked for its reach on the current board; there are no
//! precomputed tables, which keeps the routine trivially correct on an 8×8
//! board.

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{Color, Square};

/// Is `sq` attacked by any piece of color `by`?
///
/// En passant and castling are ignored: neither can capture on an arbitrary
/// square.
pub fn is_square_attacked(sq: Square, by: Color, board: &Board) -> bool {
    board
        .pieces()
        .filter(|(_, p)| p.color == by)
        .any(|(from, piece)| movegen::attack_squares(from, piece, board).contains(&sq))
}

/// All pieces of color `by` that attack `sq`.
pub fn attackers(sq: Square, by: Color, board: &Board) -> Vec<Square> {
    board
        .pieces()
        .filter(|(_, p)| p.color == by)
        .filter(|&(from, piece)| movegen::attack_squares(from, piece, board).contains(&sq))
        .map(|(from, _)| from)
        .collect()
}
