use crate::repositories::errors::game_type_repository_errors::GameTypeRepositoryError;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use crate::repositories::errors::store_errors::QueueStoreError;
use crate::services::errors::room_service_errors::RoomServiceError;

#[derive(Debug)]
pub enum MatchmakingServiceError {
    InvalidGameType,
    ValidationError(String),
    StoreError(String),
    RepositoryError(String),
    RoomCreationError(String),
}

impl std::fmt::Display for MatchmakingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchmakingServiceError::InvalidGameType => write!(f, "Invalid game type"),
            MatchmakingServiceError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            MatchmakingServiceError::StoreError(msg) => write!(f, "Queue store error: {}", msg),
            MatchmakingServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
            MatchmakingServiceError::RoomCreationError(msg) => {
                write!(f, "Room creation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchmakingServiceError {}

impl From<QueueStoreError> for MatchmakingServiceError {
    fn from(err: QueueStoreError) -> Self {
        MatchmakingServiceError::StoreError(err.to_string())
    }
}

impl From<RoomRepositoryError> for MatchmakingServiceError {
    fn from(err: RoomRepositoryError) -> Self {
        MatchmakingServiceError::RepositoryError(err.to_string())
    }
}

impl From<MatchRepositoryError> for MatchmakingServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        MatchmakingServiceError::RepositoryError(err.to_string())
    }
}

impl From<GameTypeRepositoryError> for MatchmakingServiceError {
    fn from(err: GameTypeRepositoryError) -> Self {
        MatchmakingServiceError::RepositoryError(err.to_string())
    }
}

impl From<RoomServiceError> for MatchmakingServiceError {
    fn from(err: RoomServiceError) -> Self {
        MatchmakingServiceError::RoomCreationError(err.to_string())
    }
}
