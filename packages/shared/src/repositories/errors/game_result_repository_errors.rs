#[derive(Debug)]
pub enum GameResultRepositoryError {
    AlreadyExists,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameResultRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResultRepositoryError::AlreadyExists => {
                write!(f, "GameResult already exists for room")
            }
            GameResultRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameResultRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameResultRepositoryError {}
