use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::engine::types::{PieceType, Square};
use crate::lessons::{self, LessonCard};
use crate::session::{Selection, Session};

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let games = state.games.read().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: "boardroom-chess".to_string(),
        uptime,
        games,
    })
}

// =========================================================================
// Create Game
// =========================================================================

/// POST /api/games
pub async fn create_game(
    State(state): State<SharedState>,
    Json(input): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let mut games = state.games.write().await;
    if games.len() >= state.config.max_games {
        tracing::warn!(max = state.config.max_games, "session limit reached");
        return Err(ApiError::TooManyGames(state.config.max_games));
    }

    let player = input
        .player
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "Player".into());
    let session = Session::new(player);
    let response = game_to_response(&session);

    tracing::info!(id = %session.id, player = %session.player, "game created");
    games.insert(session.id.clone(), session);

    Ok((StatusCode::CREATED, Json(response)))
}

// =========================================================================
// List Games
// =========================================================================

/// GET /api/games
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<ListGamesQuery>,
) -> Json<ListGamesResponse> {
    let games = state.games.read().await;

    let limit = query.limit.unwrap_or(10).min(100);
    let offset = query.offset.unwrap_or(0);

    let mut sessions: Vec<&Session> = games.values().collect();
    let total = sessions.len();

    // Newest first.
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let page: Vec<GameResponse> = sessions
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(game_to_response)
        .collect();

    Json(ListGamesResponse {
        games: page,
        total,
        limit,
        offset,
    })
}

// =========================================================================
// Get Game
// =========================================================================

/// GET /api/games/:id
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let games = state.games.read().await;
    let session = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    Ok(Json(game_to_response(session)))
}

// =========================================================================
// Delete Game
// =========================================================================

/// DELETE /api/games/:id
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut games = state.games.write().await;
    games
        .remove(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    tracing::info!(%id, "game deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Game deleted".to_string(),
    }))
}

// =========================================================================
// Make Move
// =========================================================================

/// POST /api/games/:id/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let from = input.from.to_square()?;
    let to = input.to.to_square()?;

    // The write lock serializes moves on a session; the state swap happens under it.
    let mut games = state.games.write().await;
    let session = games
        .get_mut(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;

    let outcome = session.play(from, to).map_err(|err| {
        tracing::debug!(%id, %from, %to, error = %err, "move rejected");
        ApiError::from(err)
    })?;

    tracing::info!(
        %id,
        %from,
        %to,
        piece = %outcome.record.piece,
        special = ?outcome.record.special_move,
        "move played"
    );

    Ok(Json(MoveResponse {
        record: outcome.record,
        lesson: outcome.lesson,
        game: game_to_response(session),
    }))
}

// =========================================================================
// Move history
// =========================================================================

/// GET /api/games/:id/moves
pub async fn get_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MoveListResponse>, ApiError> {
    let games = state.games.read().await;
    let session = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    Ok(Json(MoveListResponse {
        moves: session.state().move_history().to_vec(),
    }))
}

// =========================================================================
// Legal moves (selection view)
// =========================================================================

/// GET /api/games/:id/legal-moves?row=&col=
pub async fn legal_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<LegalMovesQuery>,
) -> Result<Json<Selection>, ApiError> {
    let from = Square::new(query.row, query.col)?;
    let games = state.games.read().await;
    let session = games
        .get(&id)
        .ok_or_else(|| ApiError::GameNotFound(id.clone()))?;
    Ok(Json(session.select(from)))
}

// =========================================================================
// Lessons
// =========================================================================

/// GET /api/lessons
pub async fn list_lessons() -> Json<LessonListResponse> {
    Json(LessonListResponse {
        lessons: lessons::lessons(),
    })
}

/// GET /api/lessons/:piece
pub async fn get_lesson(Path(piece): Path<String>) -> Result<Json<&'static LessonCard>, ApiError> {
    let kind = PieceType::from_name(&piece).ok_or(ApiError::UnknownPiece(piece))?;
    Ok(Json(lessons::lesson_for(kind)))
}

// =========================================================================
// Tests
// =========================================================================
