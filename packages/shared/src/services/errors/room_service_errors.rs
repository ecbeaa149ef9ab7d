use crate::repositories::errors::game_result_repository_errors::GameResultRepositoryError;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use crate::repositories::errors::store_errors::QueueStoreError;
use crate::services::errors::token_service_errors::TokenServiceError;

#[derive(Debug)]
pub enum RoomServiceError {
    RoomNotFound,
    /// `started` payload did not match the seated players. Carries both
    /// sides, sorted, for the structured callback error.
    PlayerMismatch {
        expected: Vec<String>,
        provided: Vec<String>,
    },
    InvalidTransition {
        from: String,
        to: String,
    },
    /// The terminal result write failed after a fallback record was
    /// captured; the recovery sweep repairs it asynchronously.
    TerminalWriteFailed(String),
    StoreError(String),
    RepositoryError(String),
    TokenError(String),
}

impl std::fmt::Display for RoomServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomServiceError::RoomNotFound => write!(f, "Room not found"),
            RoomServiceError::PlayerMismatch { expected, provided } => write!(
                f,
                "Provided player_ids do not match room players (expected {:?}, provided {:?})",
                expected, provided
            ),
            RoomServiceError::InvalidTransition { from, to } => {
                write!(f, "Invalid room transition: {} -> {}", from, to)
            }
            RoomServiceError::TerminalWriteFailed(msg) => {
                write!(f, "Terminal result write failed: {}", msg)
            }
            RoomServiceError::StoreError(msg) => write!(f, "Queue store error: {}", msg),
            RoomServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            RoomServiceError::TokenError(msg) => write!(f, "Token error: {}", msg),
        }
    }
}

impl std::error::Error for RoomServiceError {}

impl From<QueueStoreError> for RoomServiceError {
    fn from(err: QueueStoreError) -> Self {
        RoomServiceError::StoreError(err.to_string())
    }
}

impl From<RoomRepositoryError> for RoomServiceError {
    fn from(err: RoomRepositoryError) -> Self {
        match err {
            RoomRepositoryError::NotFound => RoomServiceError::RoomNotFound,
            other => RoomServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<MatchRepositoryError> for RoomServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        RoomServiceError::RepositoryError(err.to_string())
    }
}

impl From<GameResultRepositoryError> for RoomServiceError {
    fn from(err: GameResultRepositoryError) -> Self {
        RoomServiceError::RepositoryError(err.to_string())
    }
}

impl From<TokenServiceError> for RoomServiceError {
    fn from(err: TokenServiceError) -> Self {
        RoomServiceError::TokenError(err.to_string())
    }
}
