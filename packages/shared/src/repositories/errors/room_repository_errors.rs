#[derive(Debug)]
pub enum RoomRepositoryError {
    NotFound,
    ResultAlreadyExists,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for RoomRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomRepositoryError::NotFound => write!(f, "Room not found"),
            RoomRepositoryError::ResultAlreadyExists => {
                write!(f, "GameResult already exists for room")
            }
            RoomRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            RoomRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for RoomRepositoryError {}
