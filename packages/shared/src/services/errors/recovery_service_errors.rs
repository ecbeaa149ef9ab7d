use crate::repositories::errors::store_errors::QueueStoreError;

#[derive(Debug)]
pub enum RecoveryServiceError {
    StoreError(String),
}

impl std::fmt::Display for RecoveryServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoveryServiceError::StoreError(msg) => write!(f, "Queue store error: {}", msg),
        }
    }
}

impl std::error::Error for RecoveryServiceError {}

impl From<QueueStoreError> for RecoveryServiceError {
    fn from(err: QueueStoreError) -> Self {
        RecoveryServiceError::StoreError(err.to_string())
    }
}
