/// Error type shared by the Redis-backed queue-store repositories.
#[derive(Debug)]
pub enum QueueStoreError {
    Redis(String),
    Serialization(String),
}

impl std::fmt::Display for QueueStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStoreError::Redis(msg) => write!(f, "Redis error: {}", msg),
            QueueStoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for QueueStoreError {}

impl From<redis::RedisError> for QueueStoreError {
    fn from(err: redis::RedisError) -> Self {
        QueueStoreError::Redis(err.to_string())
    }
}
