use serde::{Deserialize, Serialize};

use crate::engine::game::{GameState, MoveRecord};
use crate::engine::types::{ChessError, Square};
use crate::lessons::LessonCard;
use crate::session::{CapturedPieces, Session};

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub player: Option<String>,
}

/// Raw board coordinates as sent by the client. Range is checked on
/// conversion so bad input surfaces as `OUT_OF_BOUNDS`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coords {
    pub row: i32,
    pub col: i32,
}

impl Coords {
    pub fn to_square(self) -> Result<Square, ChessError> {
        Square::new(self.row, self.col)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: Coords,
    pub to: Coords,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesQuery {
    pub row: i32,
    pub col: i32,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    pub uptime: u64,
    pub games: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Session snapshot: the full game state plus derived presentation data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub player: String,
    pub created_at: String,
    #[serde(flatten)]
    pub state: GameState,
    pub check: bool,
    /// Squares of the pieces giving check to the side to move.
    pub checkers: Vec<Square>,
    pub captured_pieces: CapturedPieces,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_lesson: Option<&'static LessonCard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesResponse {
    pub games: Vec<GameResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub record: MoveRecord,
    pub lesson: &'static LessonCard,
    pub game: GameResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveListResponse {
    pub moves: Vec<MoveRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonListResponse {
    pub lessons: &'static [LessonCard],
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn game_to_response(session: &Session) -> GameResponse {
    GameResponse {
        id: session.id.clone(),
        player: session.player.clone(),
        created_at: session.created_at.to_rfc3339(),
        state: session.state().clone(),
        check: session.in_check(),
        checkers: session.state().checkers(),
        captured_pieces: session.captured_pieces(),
        last_lesson: session.last_lesson(),
    }
}
