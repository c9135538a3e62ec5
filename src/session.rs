//! Play sessions.
//!
//! A `Session` owns the current `GameState` of one player and swaps it for
//! the engine's successor only when a move is accepted. It also derives the
//! presentation data the board UI needs: the selection highlight, captured
//! pieces, and the lesson card of the last move.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::game::{GameState, MoveRecord};
use crate::engine::types::{ChessError, Color, Piece, PieceType, Square};
use crate::lessons::{self, LessonCard};

/// Destination square flagged for the board highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub square: Square,
    /// Moving here takes a piece (including en passant).
    pub capture: bool,
}

/// A selected piece and where it may go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub from: Square,
    pub piece: Option<Piece>,
    pub destinations: Vec<Highlight>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    /// Black pieces taken by White.
    pub by_white: Vec<Piece>,
    /// White pieces taken by Black.
    pub by_black: Vec<Piece>,
}

/// Result of an accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub lesson: &'static LessonCard,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub player: String,
    pub created_at: DateTime<Utc>,
    state: GameState,
    last_lesson: Option<&'static LessonCard>,
}

impl Session {
    pub fn new(player: impl Into<String>) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            player: player.into(),
            created_at: Utc::now(),
            state: GameState::new(),
            last_lesson: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn last_lesson(&self) -> Option<&'static LessonCard> {
        self.last_lesson
    }

    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        self.state.is_check(self.state.current_turn())
    }

    /// Play `from → to`. On error the session is left untouched.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        let (next, record) = self.state.apply_move(from, to)?;
        let lesson = lessons::lesson_for(record.piece.kind);
        self.state = next;
        self.last_lesson = Some(lesson);
        Ok(MoveOutcome { record, lesson })
    }

    /// Highlight view for a clicked square.
    ///
    /// Empty squares and pieces of the side not to move yield a selection
    /// with no destinations.
    pub fn select(&self, from: Square) -> Selection {
        let piece = self.state.piece_at(from);
        let ep = self.state.en_passant_target();
        let destinations = self
            .state
            .legal_moves(from)
            .into_iter()
            .map(|square| Highlight {
                square,
                capture: self.state.piece_at(square).is_some()
                    || (piece.is_some_and(|p| p.kind == PieceType::Pawn) && ep == Some(square)),
            })
            .collect();
        Selection {
            from,
            piece,
            destinations,
        }
    }

    /// Pieces taken so far, in the order they fell.
    pub fn captured_pieces(&self) -> CapturedPieces {
        let mut out = CapturedPieces::default();
        for record in self.state.move_history() {
            if let Some(victim) = record.captured_piece {
                match record.piece.color {
                    Color::White => out.by_white.push(victim),
                    Color::Black => out.by_black.push(victim),
                }
            }
        }
        out
    }
}
