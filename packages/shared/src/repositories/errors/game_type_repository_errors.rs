#[derive(Debug)]
pub enum GameTypeRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameTypeRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameTypeRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameTypeRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameTypeRepositoryError {}
