#[derive(Debug)]
pub enum TokenServiceError {
    InvalidToken,
    ExpiredToken,
    WrongPurpose,
    JwtError(String),
}

impl std::fmt::Display for TokenServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenServiceError::InvalidToken => write!(f, "Invalid token"),
            TokenServiceError::ExpiredToken => write!(f, "Expired token"),
            TokenServiceError::WrongPurpose => write!(f, "Token purpose mismatch"),
            TokenServiceError::JwtError(msg) => write!(f, "JWT error: {}", msg),
        }
    }
}

impl std::error::Error for TokenServiceError {}
