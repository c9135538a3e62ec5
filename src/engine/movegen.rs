//! Move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal destinations for one piece (movement pattern
//!      and occupancy, plus en passant and castling).
//!   2. Filter: lay each move onto a copy of the board and keep it only if
//!      the mover's king is not attacked afterwards.
//!
//! The filter is exhaustive simulate-and-test with no pin shortcuts.
//! Destinations come out in a fixed order driven by the direction tables.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::game::GameState;
use crate::engine::types::{
    CastleSide, CastlingRights, Color, KING_HOME_COL, Piece, PieceType, Square,
};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

// =========================================================================
// Public API
// =========================================================================

/// Legal destinations for `piece` standing on `from`.
///
/// The caller vouches that `piece` is what stands on `from` in `state`.
pub fn legal_moves(from: Square, piece: Piece, state: &GameState) -> Vec<Square> {
    let board = state.board();
    let en_passant = state.en_passant_target();
    let them = !piece.color;

    pseudo_legal_moves(from, piece, board, en_passant, state.castling_rights())
        .into_iter()
        .filter(|&to| {
            let Some(after) = board.place(from, to, en_passant) else {
                return false;
            };
            let king_sq = if piece.kind == PieceType::King {
                to
            } else {
                state.king_position(piece.color)
            };
            !attacks::is_square_attacked(king_sq, them, &after.board)
        })
        .collect()
}

/// Pseudo-legal destinations: movement pattern and occupancy only, so the
/// result may leave the mover's own king in check.
pub fn pseudo_legal_moves(
    from: Square,
    piece: Piece,
    board: &Board,
    en_passant: Option<Square>,
    castling: CastlingRights,
) -> Vec<Square> {
    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceType::Pawn => {
            push_pawn_advances(from, piece.color, board, &mut moves);
            push_pawn_captures(from, piece.color, board, &mut moves);
            push_en_passant(from, piece.color, en_passant, &mut moves);
        }
        PieceType::King => {
            push_steps(from, piece.color, board, &KING_OFFSETS, &mut moves);
            push_castling(from, piece.color, board, castling, &mut moves);
        }
        _ => push_reach(from, piece, board, &mut moves),
    }
    moves
}

/// Squares `piece` on `from` could capture on. Used by attack detection.
pub(crate) fn attack_squares(from: Square, piece: Piece, board: &Board) -> Vec<Square> {
    let mut squares = Vec::with_capacity(28);
    match piece.kind {
        PieceType::Pawn => {
            let dr = piece.color.pawn_direction();
            squares.extend([-1, 1].into_iter().filter_map(|dc| from.offset(dr, dc)));
        }
        _ => push_reach(from, piece, board, &mut squares),
    }
    squares
}

// =========================================================================
// Pattern helpers
// =========================================================================

/// Non-pawn movement without special moves.
fn push_reach(from: Square, piece: Piece, board: &Board, moves: &mut Vec<Square>) {
    match piece.kind {
        PieceType::Knight => push_steps(from, piece.color, board, &KNIGHT_OFFSETS, moves),
        PieceType::King => push_steps(from, piece.color, board, &KING_OFFSETS, moves),
        PieceType::Bishop => push_rays(from, piece.color, board, &BISHOP_DIRECTIONS, moves),
        PieceType::Rook => push_rays(from, piece.color, board, &ROOK_DIRECTIONS, moves),
        PieceType::Queen => push_rays(from, piece.color, board, &QUEEN_DIRECTIONS, moves),
        PieceType::Pawn => unreachable!("pawns have their own generators"),
    }
}

/// Single-step leapers: on the board and not onto a friendly piece.
fn push_steps(
    from: Square,
    us: Color,
    board: &Board,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc)
            && board.get(to).is_none_or(|p| p.color != us)
        {
            moves.push(to);
        }
    }
}

/// Sliders: each ray runs to the edge or the first occupied square, which
/// is included only when it holds an enemy piece.
fn push_rays(
    from: Square,
    us: Color,
    board: &Board,
    directions: &[(i8, i8)],
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in directions {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match board.get(to) {
                None => moves.push(to),
                Some(p) => {
                    if p.color != us {
                        moves.push(to);
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn push_pawn_advances(from: Square, us: Color, board: &Board, moves: &mut Vec<Square>) {
    let dr = us.pawn_direction();
    let Some(one) = from.offset(dr, 0) else {
        return;
    };
    if !board.is_empty(one) {
        return;
    }
    moves.push(one);

    if from.row() == us.pawn_start_row()
        && let Some(two) = one.offset(dr, 0)
        && board.is_empty(two)
    {
        moves.push(two);
    }
}

fn push_pawn_captures(from: Square, us: Color, board: &Board, moves: &mut Vec<Square>) {
    let dr = us.pawn_direction();
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dr, dc)
            && board.get(to).is_some_and(|p| p.color != us)
        {
            moves.push(to);
        }
    }
}

/// The target must sit one row ahead and one file aside.
fn push_en_passant(from: Square, us: Color, en_passant: Option<Square>, moves: &mut Vec<Square>) {
    let Some(ep) = en_passant else {
        return;
    };
    let ahead = from.row() as i8 + us.pawn_direction();
    if ep.row() as i8 == ahead && ep.col().abs_diff(from.col()) == 1 {
        moves.push(ep);
    }
}

// =========================================================================
// Castling
// =========================================================================

/// Castling from the king's home square, checked against the pre-move board.
fn push_castling(
    from: Square,
    us: Color,
    board: &Board,
    castling: CastlingRights,
    moves: &mut Vec<Square>,
) {
    let row = us.home_row();
    if from != Square::at(row, KING_HOME_COL) {
        return;
    }
    let them = !us;
    let home_rook = Piece::new(us, PieceType::Rook);

    for side in CastleSide::ALL {
        if !castling.has(us, side) {
            continue;
        }
        if board.get(Square::at(row, side.rook_col())) != Some(home_rook) {
            continue;
        }
        if side
            .between_cols()
            .iter()
            .any(|&col| !board.is_empty(Square::at(row, col)))
        {
            continue;
        }
        if side
            .king_path_cols()
            .iter()
            .any(|&col| attacks::is_square_attacked(Square::at(row, col), them, board))
        {
            continue;
        }
        moves.push(Square::at(row, side.king_target_col()));
    }
}

// =========================================================================
// Tests
// =========================================================================
