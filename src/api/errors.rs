use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::engine::ChessError;

/// Structured API error that serializes to JSON.
#[derive(Debug)]
pub enum ApiError {
    GameNotFound(String),
    IllegalMove(ChessError),
    OutOfBounds(ChessError),
    InvalidRequest(String),
    UnknownPiece(String),
    TooManyGames(usize),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                "GAME_NOT_FOUND",
                format!("Game not found: {id}"),
            ),
            ApiError::IllegalMove(err) => {
                (StatusCode::BAD_REQUEST, "ILLEGAL_MOVE", err.to_string())
            }
            ApiError::OutOfBounds(err) => {
                (StatusCode::BAD_REQUEST, "OUT_OF_BOUNDS", err.to_string())
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::UnknownPiece(name) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_PIECE",
                format!("No lesson for piece: {name}"),
            ),
            ApiError::TooManyGames(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TOO_MANY_GAMES",
                format!("Session limit reached ({max})"),
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChessError> for ApiError {
    fn from(err: ChessError) -> Self {
        match &err {
            ChessError::IllegalMove { .. } => ApiError::IllegalMove(err),
            ChessError::OutOfBounds { .. } => ApiError::OutOfBounds(err),
            ChessError::InvalidSquare(_) | ChessError::InvalidPosition(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
        }
    }
}
