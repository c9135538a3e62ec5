//! Mailbox board representation.
//!
//! `Board` is an 8×8 grid of optional pieces, row 0 = rank 8. It holds
//! occupancy and nothing else: selection and highlight state belong to the
//! caller. Boards are `Copy`, so simulating a move never touches the
//! original.

use serde::{Deserialize, Serialize};

use crate::engine::types::{CastleSide, Color, Piece, PieceType, SpecialMove, Square};

// ---------------------------------------------------------------------------
// Placement: a move laid onto a board
// ---------------------------------------------------------------------------

/// Outcome of laying a move onto a board, including special-move side effects.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Placement {
    pub board: Board,
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting position: Black on rows 0–1, White on rows 6–7.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.put(Square::at(0, col), Piece::new(Color::Black, kind));
            board.put(Square::at(1, col), Piece::new(Color::Black, PieceType::Pawn));
            board.put(Square::at(6, col), Piece::new(Color::White, PieceType::Pawn));
            board.put(Square::at(7, col), Piece::new(Color::White, kind));
        }
        board
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Place a piece, replacing whatever stood there.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Clear a square, returning what stood there.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    /// All occupied squares, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Squares holding a king of `color`.
    pub fn kings(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|(_, p)| p.color == color && p.kind == PieceType::King)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// The board seen from the other side: rows flipped, colors swapped.
    pub fn mirrored(&self) -> Board {
        let mut out = Board::empty();
        for (sq, p) in self.pieces() {
            out.put(sq.flip_vertical(), Piece::new(!p.color, p.kind));
        }
        out
    }

    // -----------------------------------------------------------------------
    // Move placement
    // -----------------------------------------------------------------------

    /// Lay `from → to` onto a copy of this board.
    ///
    /// A king moving two files is a castle: the rook on that wing jumps to
    /// the square beside the king. A pawn landing on the en-passant target
    /// removes the enemy pawn behind it (same row as `from`, same column as
    /// `to`); any other piece there is left alone.
    /// Returns `None` when `from` is empty. Legality is the caller's concern.
    pub(crate) fn place(
        &self,
        from: Square,
        to: Square,
        en_passant: Option<Square>,
    ) -> Option<Placement> {
        let piece = self.get(from)?;
        let mut board = *self;
        board.remove(from);
        let mut captured = board.remove(to);
        let mut special = None;

        if piece.kind == PieceType::King && from.col().abs_diff(to.col()) == 2 {
            let side = if to.col() > from.col() {
                CastleSide::KingSide
            } else {
                CastleSide::QueenSide
            };
            let rook_from = Square::at(from.row(), side.rook_col());
            let rook_to = Square::at(from.row(), side.rook_target_col());
            if let Some(rook) = board.remove(rook_from) {
                board.put(rook_to, rook);
            }
            special = Some(SpecialMove::Castle);
        } else if piece.kind == PieceType::Pawn && captured.is_none() && en_passant == Some(to) {
            let behind = Square::at(from.row(), to.col());
            if board.get(behind) == Some(Piece::new(!piece.color, PieceType::Pawn)) {
                captured = board.remove(behind);
                special = Some(SpecialMove::EnPassant);
            }
        }

        board.put(to, piece);
        Some(Placement {
            board,
            captured,
            special,
        })
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = self.get(Square::at(row, col)).map_or('.', Piece::to_char);
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
