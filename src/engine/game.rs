//! Game state aggregate.
//!
//! `GameState` bundles the board with turn, castling rights, en-passant
//! target, cached king squares and move history. It is a value: every
//! accepted move produces a fresh state and the old one stays valid, so
//! callers never observe a half-applied move.

use serde::{Deserialize, Serialize};

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, KING_HOME_COL, Piece, PieceType, SpecialMove,
    Square,
};

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece that moved.
    pub piece: Piece,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_piece: Option<Piece>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_move: Option<SpecialMove>,
}

// =========================================================================
// KingPositions
// =========================================================================

/// Cached king squares, so check tests never scan the board for the king.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KingPositions {
    pub white: Square,
    pub black: Square,
}

impl KingPositions {
    #[inline]
    pub fn get(self, color: Color) -> Square {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    fn set(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white = sq,
            Color::Black => self.black = sq,
        }
    }
}

// =========================================================================
// GameState
// =========================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    current_turn: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    king_positions: KingPositions,
    move_history: Vec<MoveRecord>,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Standard starting position, White to move, all castling rights.
    pub fn new() -> Self {
        GameState {
            board: Board::standard(),
            current_turn: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant_target: None,
            king_positions: KingPositions {
                white: Square::at(Color::White.home_row(), KING_HOME_COL),
                black: Square::at(Color::Black.home_row(), KING_HOME_COL),
            },
            move_history: Vec::new(),
        }
    }

    /// Set up an arbitrary position with an empty history.
    ///
    /// Requires exactly one king per side, and the side not to move must
    /// not be in check. Every castling right that is granted needs its king
    /// and rook on their home squares. An en-passant target must sit on the
    /// row the opponent's pawn just crossed, with that pawn right behind it.
    pub fn from_board(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        en_passant_target: Option<Square>,
    ) -> Result<Self, ChessError> {
        let mut kings = [Square::at(0, 0); 2];
        for color in [Color::White, Color::Black] {
            match board.kings(color).as_slice() {
                [sq] => kings[color.index()] = *sq,
                found => {
                    return Err(ChessError::InvalidPosition(format!(
                        "{color} has {} kings (expected 1)",
                        found.len()
                    )));
                }
            }
        }

        let waiting = !turn;
        if attacks::is_square_attacked(kings[waiting.index()], turn, &board) {
            return Err(ChessError::InvalidPosition(format!(
                "{waiting} is in check but {turn} is to move"
            )));
        }

        for color in [Color::White, Color::Black] {
            let row = color.home_row();
            for side in CastleSide::ALL {
                if !castling_rights.has(color, side) {
                    continue;
                }
                let king_home = board.get(Square::at(row, KING_HOME_COL))
                    == Some(Piece::new(color, PieceType::King));
                let rook_home = board.get(Square::at(row, side.rook_col()))
                    == Some(Piece::new(color, PieceType::Rook));
                if !king_home || !rook_home {
                    return Err(ChessError::InvalidPosition(format!(
                        "{color} {side:?} castling right without king and rook at home"
                    )));
                }
            }
        }

        if let Some(ep) = en_passant_target {
            // The side that just moved is !turn; its pawn crossed the row
            // next to its start row.
            let mover = !turn;
            let crossed = mover.pawn_start_row() as i8 + mover.pawn_direction();
            let pawn_behind = ep
                .offset(mover.pawn_direction(), 0)
                .and_then(|behind| board.get(behind))
                == Some(Piece::new(mover, PieceType::Pawn));
            if ep.row() as i8 != crossed || !board.is_empty(ep) || !pawn_behind {
                return Err(ChessError::InvalidPosition(format!(
                    "en passant target {ep} is not a square {mover} could have passed over"
                )));
            }
        }

        Ok(GameState {
            board,
            current_turn: turn,
            castling_rights,
            en_passant_target,
            king_positions: KingPositions {
                white: kings[Color::White.index()],
                black: kings[Color::Black.index()],
            },
            move_history: Vec::new(),
        })
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn king_position(&self, color: Color) -> Square {
        self.king_positions.get(color)
    }

    pub fn king_positions(&self) -> KingPositions {
        self.king_positions
    }

    /// Completed move history, oldest first.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Legal destinations for the piece on `from`.
    ///
    /// Empty when the square is empty or holds a piece of the side not to
    /// move.
    pub fn legal_moves(&self, from: Square) -> Vec<Square> {
        match self.board.get(from) {
            Some(piece) if piece.color == self.current_turn => {
                movegen::legal_moves(from, piece, self)
            }
            _ => Vec::new(),
        }
    }

    /// Is `color`'s king attacked right now?
    pub fn is_check(&self, color: Color) -> bool {
        attacks::is_square_attacked(self.king_position(color), !color, &self.board)
    }

    /// Pieces giving check to the side to move.
    pub fn checkers(&self) -> Vec<Square> {
        let us = self.current_turn;
        attacks::attackers(self.king_position(us), !us, &self.board)
    }

    // -----------------------------------------------------------------
    // Apply move
    // -----------------------------------------------------------------

    /// Play `from → to` and return the resulting state with its record.
    ///
    /// The move must be legal for the side to move; otherwise
    /// `ChessError::IllegalMove` is returned and `self` is unchanged.
    pub fn apply_move(&self, from: Square, to: Square) -> Result<(GameState, MoveRecord), ChessError> {
        let illegal = |reason: String| ChessError::IllegalMove { from, to, reason };

        let piece = self
            .board
            .get(from)
            .ok_or_else(|| illegal("no piece on the source square".into()))?;
        if piece.color != self.current_turn {
            return Err(illegal(format!("it is {}'s turn", self.current_turn)));
        }
        if !movegen::legal_moves(from, piece, self).contains(&to) {
            return Err(illegal("not a legal move".into()));
        }

        let placement = self
            .board
            .place(from, to, self.en_passant_target)
            .ok_or_else(|| illegal("no piece on the source square".into()))?;

        // Castling rights: king or rook leaving home, or a rook taken on its corner.
        let mut castling_rights = self.castling_rights;
        match piece.kind {
            PieceType::King => castling_rights.revoke_all(piece.color),
            PieceType::Rook => {
                if let Some(side) = CastleSide::from_rook_corner(piece.color, from) {
                    castling_rights.revoke(piece.color, side);
                }
            }
            _ => {}
        }
        if let Some(victim) = placement.captured
            && victim.kind == PieceType::Rook
            && let Some(side) = CastleSide::from_rook_corner(victim.color, to)
        {
            castling_rights.revoke(victim.color, side);
        }

        let en_passant_target = (piece.kind == PieceType::Pawn && from.row().abs_diff(to.row()) == 2)
            .then(|| Square::at((from.row() + to.row()) / 2, from.col()));

        let mut king_positions = self.king_positions;
        if piece.kind == PieceType::King {
            king_positions.set(piece.color, to);
        }

        let record = MoveRecord {
            from,
            to,
            piece,
            captured_piece: placement.captured,
            special_move: placement.special,
        };

        let mut move_history = Vec::with_capacity(self.move_history.len() + 1);
        move_history.extend_from_slice(&self.move_history);
        move_history.push(record);

        let next = GameState {
            board: placement.board,
            current_turn: !self.current_turn,
            castling_rights,
            en_passant_target,
            king_positions,
            move_history,
        };
        Ok((next, record))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn piece(c: char) -> Piece {
        let (color, kind) = PieceType::from_char(c).unwrap();
        Piece::new(color, kind)
    }

    fn board(pieces: &[(&str, char)]) -> Board {
        let mut b = Board::empty();
        for &(name, c) in pieces {
            b.put(sq(name), piece(c));
        }
        b
    }

    fn play(state: &GameState, from: &str, to: &str) -> GameState {
        state.apply_move(sq(from), sq(to)).unwrap().0
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_defaults() {
        let g = GameState::new();
        assert_eq!(g.current_turn(), Color::White);
        assert_eq!(g.castling_rights(), CastlingRights::ALL);
        assert_eq!(g.en_passant_target(), None);
        assert_eq!(g.king_position(Color::White), sq("e1"));
        assert_eq!(g.king_position(Color::Black), sq("e8"));
        assert!(g.move_history().is_empty());
    }

    #[test]
    fn from_board_requires_one_king_each() {
        let b = board(&[("e1", 'K')]);
        let err = GameState::from_board(b, Color::White, CastlingRights::NONE, None).unwrap_err();
        assert!(matches!(err, ChessError::InvalidPosition(_)));

        let b = board(&[("e1", 'K'), ("d1", 'K'), ("e8", 'k')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, None).is_err());
    }

    #[test]
    fn from_board_caches_kings() {
        let b = board(&[("c3", 'K'), ("h7", 'k')]);
        let g = GameState::from_board(b, Color::Black, CastlingRights::NONE, None).unwrap();
        assert_eq!(g.king_position(Color::White), sq("c3"));
        assert_eq!(g.king_position(Color::Black), sq("h7"));
        assert_eq!(g.current_turn(), Color::Black);
    }

    #[test]
    fn from_board_rejects_castling_without_rook() {
        let b = board(&[("e1", 'K'), ("e8", 'k')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::ALL, None).is_err());
    }

    #[test]
    fn from_board_checks_en_passant_row() {
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("d5", 'p'), ("e5", 'P')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, Some(sq("d6"))).is_ok());
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, Some(sq("d3"))).is_err());
        assert!(GameState::from_board(b, Color::Black, CastlingRights::NONE, Some(sq("d6"))).is_err());
    }

    #[test]
    fn from_board_rejects_capturable_king() {
        // Black is in check with White to move: Rxe8 would take the king.
        let b = board(&[("e1", 'K'), ("e4", 'R'), ("e8", 'k')]);
        let err = GameState::from_board(b, Color::White, CastlingRights::NONE, None).unwrap_err();
        assert!(matches!(err, ChessError::InvalidPosition(_)));

        // The same board is fine when Black has to answer the check.
        let g = GameState::from_board(b, Color::Black, CastlingRights::NONE, None).unwrap();
        assert!(g.is_check(Color::Black));
        assert_eq!(g.checkers(), vec![sq("e4")]);
    }

    #[test]
    fn from_board_needs_enemy_pawn_behind_en_passant_target() {
        // Own knight behind the target: nothing to take en passant.
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("e5", 'P'), ("d5", 'N')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, Some(sq("d6"))).is_err());

        // Empty square behind the target.
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("e5", 'P')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, Some(sq("d6"))).is_err());

        // Enemy piece that is not a pawn.
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("e5", 'P'), ("d5", 'n')]);
        assert!(GameState::from_board(b, Color::White, CastlingRights::NONE, Some(sq("d6"))).is_err());
    }

    #[test]
    fn checkers_empty_when_not_in_check() {
        assert!(GameState::new().checkers().is_empty());
    }

    // -----------------------------------------------------------------
    // legal_moves wrapper
    // -----------------------------------------------------------------

    #[test]
    fn legal_moves_empty_for_empty_or_enemy_square() {
        let g = GameState::new();
        assert!(g.legal_moves(sq("e4")).is_empty());
        assert!(g.legal_moves(sq("e7")).is_empty());
        assert_eq!(g.legal_moves(sq("e2")), vec![sq("e3"), sq("e4")]);
    }

    // -----------------------------------------------------------------
    // apply_move
    // -----------------------------------------------------------------

    #[test]
    fn e2e4_sets_en_passant_and_flips_turn() {
        let g = GameState::new();
        let (next, record) = g.apply_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(next.en_passant_target(), Square::new(5, 4).ok());
        assert_eq!(next.current_turn(), Color::Black);
        assert_eq!(record.captured_piece, None);
        assert_eq!(record.special_move, None);
        assert_eq!(record.piece, piece('P'));
        assert_eq!(next.move_history(), &[record]);
        // Source state untouched.
        assert_eq!(g, GameState::new());
    }

    #[test]
    fn single_step_clears_en_passant() {
        let g = play(&GameState::new(), "e2", "e4");
        let g = play(&g, "d7", "d6");
        assert_eq!(g.en_passant_target(), None);
    }

    #[test]
    fn illegal_destination_is_rejected() {
        let g = GameState::new();
        let err = g.apply_move(sq("e2"), sq("e5")).unwrap_err();
        assert_eq!(
            err,
            ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e5"),
                reason: "not a legal move".into(),
            }
        );
    }

    #[test]
    fn moving_out_of_turn_is_rejected() {
        let g = GameState::new();
        let err = g.apply_move(sq("e7"), sq("e5")).unwrap_err();
        assert!(matches!(err, ChessError::IllegalMove { ref reason, .. } if reason.contains("white")));
    }

    #[test]
    fn moving_from_empty_square_is_rejected() {
        let g = GameState::new();
        assert!(g.apply_move(sq("e4"), sq("e5")).is_err());
    }

    #[test]
    fn capture_is_recorded() {
        let g = play(&GameState::new(), "e2", "e4");
        let g = play(&g, "d7", "d5");
        let (g, record) = g.apply_move(sq("e4"), sq("d5")).unwrap();
        assert_eq!(record.captured_piece, Some(piece('p')));
        assert_eq!(g.piece_at(sq("d5")), Some(piece('P')));
        assert_eq!(g.board().pieces().count(), 31);
    }

    #[test]
    fn kingside_castle_moves_rook_and_clears_rights() {
        let mut g = GameState::new();
        for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")] {
            g = play(&g, from, to);
        }
        assert!(g.legal_moves(sq("e1")).contains(&sq("g1")));

        let (g, record) = g.apply_move(sq("e1"), sq("g1")).unwrap();
        assert_eq!(record.special_move, Some(SpecialMove::Castle));
        assert_eq!(g.piece_at(sq("g1")), Some(piece('K')));
        assert_eq!(g.piece_at(sq("f1")), Some(piece('R')));
        assert_eq!(g.piece_at(sq("h1")), None);
        assert_eq!(g.king_position(Color::White), sq("g1"));
        assert!(!g.castling_rights().white_king_side);
        assert!(!g.castling_rights().white_queen_side);
        assert!(g.castling_rights().black_king_side);
    }

    #[test]
    fn queenside_castle_for_black() {
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("a8", 'r')]);
        let mut rights = CastlingRights::NONE;
        rights.black_queen_side = true;
        let g = GameState::from_board(b, Color::Black, rights, None).unwrap();
        let (g, record) = g.apply_move(sq("e8"), sq("c8")).unwrap();
        assert_eq!(record.special_move, Some(SpecialMove::Castle));
        assert_eq!(g.piece_at(sq("d8")), Some(piece('r')));
        assert_eq!(g.piece_at(sq("c8")), Some(piece('k')));
        assert_eq!(g.castling_rights(), CastlingRights::NONE);
    }

    #[test]
    fn rook_move_clears_only_its_side() {
        let b = board(&[("e1", 'K'), ("a1", 'R'), ("h1", 'R'), ("e8", 'k')]);
        let mut rights = CastlingRights::NONE;
        rights.white_king_side = true;
        rights.white_queen_side = true;
        let g = GameState::from_board(b, Color::White, rights, None).unwrap();
        let g = play(&g, "h1", "h2");
        assert!(!g.castling_rights().white_king_side);
        assert!(g.castling_rights().white_queen_side);
    }

    #[test]
    fn rook_captured_on_corner_clears_right() {
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("h8", 'r'), ("h2", 'R')]);
        let mut rights = CastlingRights::NONE;
        rights.black_king_side = true;
        let g = GameState::from_board(b, Color::White, rights, None).unwrap();
        let (g, record) = g.apply_move(sq("h2"), sq("h8")).unwrap();
        assert_eq!(record.captured_piece, Some(piece('r')));
        assert!(!g.castling_rights().black_king_side);
    }

    #[test]
    fn en_passant_capture_and_expiry() {
        let b = board(&[("e1", 'K'), ("e8", 'k'), ("e5", 'P'), ("d7", 'p'), ("a2", 'P'), ("h7", 'p')]);
        let g = GameState::from_board(b, Color::Black, CastlingRights::NONE, None).unwrap();
        let g = play(&g, "d7", "d5");
        assert_eq!(g.en_passant_target(), Some(sq("d6")));
        assert!(g.legal_moves(sq("e5")).contains(&sq("d6")));

        let (after, record) = g.apply_move(sq("e5"), sq("d6")).unwrap();
        assert_eq!(record.special_move, Some(SpecialMove::EnPassant));
        assert_eq!(record.captured_piece, Some(piece('p')));
        assert_eq!(after.piece_at(sq("d5")), None);
        assert_eq!(after.en_passant_target(), None);

        // An intervening move forfeits the capture.
        let g = play(&g, "a2", "a3");
        let g = play(&g, "h7", "h6");
        assert_eq!(g.en_passant_target(), None);
        assert!(!g.legal_moves(sq("e5")).contains(&sq("d6")));
    }

    #[test]
    fn is_check_tracks_king_cache() {
        let b = board(&[("e1", 'K'), ("a8", 'k'), ("d8", 'r')]);
        let g = GameState::from_board(b, Color::White, CastlingRights::NONE, None).unwrap();
        assert!(!g.is_check(Color::White));
        let g = play(&g, "e1", "f1");
        assert_eq!(g.king_position(Color::White), sq("f1"));
        assert!(!g.is_check(Color::White));
        let g = play(&g, "d8", "f8");
        assert!(g.is_check(Color::White));
        assert!(!g.is_check(Color::Black));
        assert!(!g.legal_moves(sq("f1")).contains(&sq("f2")));
    }

    #[test]
    fn mirrored_position_has_mirrored_moves() {
        let b = board(&[("e1", 'K'), ("h1", 'R'), ("e8", 'k'), ("c4", 'B'), ("f6", 'n'), ("d2", 'P')]);
        let mut rights = CastlingRights::NONE;
        rights.white_king_side = true;
        let white = GameState::from_board(b, Color::White, rights, None).unwrap();
        let black =
            GameState::from_board(b.mirrored(), Color::Black, rights.swap_colors(), None).unwrap();

        for (from, _) in b.pieces().filter(|(_, p)| p.color == Color::White) {
            let mut expected: Vec<Square> = white
                .legal_moves(from)
                .into_iter()
                .map(Square::flip_vertical)
                .collect();
            let mut actual = black.legal_moves(from.flip_vertical());
            expected.sort_by_key(|s| (s.row(), s.col()));
            actual.sort_by_key(|s| (s.row(), s.col()));
            assert_eq!(actual, expected, "{from}");
        }
    }

    #[test]
    fn history_is_append_only() {
        let g1 = play(&GameState::new(), "g1", "f3");
        let g2 = play(&g1, "g8", "f6");
        assert_eq!(g1.move_history().len(), 1);
        assert_eq!(g2.move_history().len(), 2);
        assert_eq!(g2.move_history()[0], g1.move_history()[0]);
    }

    #[test]
    fn json_shape_matches_front_end() {
        let g = play(&GameState::new(), "e2", "e4");
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["currentTurn"], "black");
        assert_eq!(json["enPassantTarget"]["row"], 5);
        assert_eq!(json["enPassantTarget"]["col"], 4);
        assert_eq!(json["castlingRights"]["whiteKingSide"], true);
        assert_eq!(json["kingPositions"]["white"]["row"], 7);
        assert_eq!(json["moveHistory"][0]["piece"]["type"], "pawn");
        assert!(json["moveHistory"][0].get("capturedPiece").is_none());
        assert_eq!(json["board"][4][4]["color"], "white");
    }
}
