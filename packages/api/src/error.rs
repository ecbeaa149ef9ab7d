use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use shared::repositories::errors::store_errors::QueueStoreError;
use shared::services::errors::{
    matchmaking_service_errors::MatchmakingServiceError, room_service_errors::RoomServiceError,
    token_service_errors::TokenServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    Matchmaking(MatchmakingServiceError),
    Room(RoomServiceError),
    Token(TokenServiceError),
    Store(QueueStoreError),
    Unauthorized,
}

impl From<MatchmakingServiceError> for ApiError {
    fn from(error: MatchmakingServiceError) -> Self {
        ApiError::Matchmaking(error)
    }
}

impl From<RoomServiceError> for ApiError {
    fn from(error: RoomServiceError) -> Self {
        ApiError::Room(error)
    }
}

impl From<TokenServiceError> for ApiError {
    fn from(error: TokenServiceError) -> Self {
        ApiError::Token(error)
    }
}

impl From<QueueStoreError> for ApiError {
    fn from(error: QueueStoreError) -> Self {
        ApiError::Store(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Matchmaking(MatchmakingServiceError::InvalidGameType) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Matchmaking(MatchmakingServiceError::ValidationError(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Matchmaking(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::Room(RoomServiceError::RoomNotFound) => StatusCode::NOT_FOUND,
            ApiError::Room(RoomServiceError::PlayerMismatch { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Room(RoomServiceError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Room(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::Token(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Matchmaking(MatchmakingServiceError::InvalidGameType) => "invalid_game_type",
            ApiError::Matchmaking(MatchmakingServiceError::ValidationError(_)) => {
                "validation_error"
            }
            ApiError::Matchmaking(_) => "internal_error",

            ApiError::Room(RoomServiceError::RoomNotFound) => "room_not_found",
            ApiError::Room(RoomServiceError::PlayerMismatch { .. }) => "player_mismatch",
            ApiError::Room(RoomServiceError::InvalidTransition { .. }) => "invalid_transition",
            ApiError::Room(RoomServiceError::TerminalWriteFailed(_)) => "persist_failed",
            ApiError::Room(_) => "internal_error",

            ApiError::Token(TokenServiceError::ExpiredToken) => "expired_token",
            ApiError::Token(_) => "invalid_token",
            ApiError::Store(_) => "internal_error",
            ApiError::Unauthorized => "unauthorized",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Matchmaking(e) => e.to_string(),
            ApiError::Room(e) => e.to_string(),
            ApiError::Token(e) => e.to_string(),
            ApiError::Store(e) => e.to_string(),
            ApiError::Unauthorized => "Missing or invalid credentials".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.code(),
            "message": self.message(),
        });

        // Callers fixing a player_mismatch need both sides of the check.
        if let ApiError::Room(RoomServiceError::PlayerMismatch { expected, provided }) = &self {
            body["expected"] = json!(expected);
            body["provided"] = json!(provided);
        }

        (self.status(), Json(body)).into_response()
    }
}
