#[derive(Debug)]
pub enum GameClientError {
    /// No way back into the game: stored session missing, the room is gone,
    /// or the server refused our credentials. The caller returns to
    /// matchmaking.
    SessionUnrecoverable(String),
    /// The server actively rejected a join attempt.
    Rejected(String),
    /// Endpoint lookup failed (HTTP layer).
    Endpoint(String),
    /// Websocket-level failure; worth retrying.
    Transport(String),
    Serialization(String),
}

impl std::fmt::Display for GameClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameClientError::SessionUnrecoverable(msg) => {
                write!(f, "Session unrecoverable: {}", msg)
            }
            GameClientError::Rejected(msg) => write!(f, "Join rejected: {}", msg),
            GameClientError::Endpoint(msg) => write!(f, "Endpoint lookup failed: {}", msg),
            GameClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            GameClientError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for GameClientError {}

impl From<reqwest::Error> for GameClientError {
    fn from(err: reqwest::Error) -> Self {
        GameClientError::Endpoint(err.to_string())
    }
}

impl From<serde_json::Error> for GameClientError {
    fn from(err: serde_json::Error) -> Self {
        GameClientError::Serialization(err.to_string())
    }
}
