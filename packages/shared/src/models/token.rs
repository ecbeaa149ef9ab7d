use serde::{Deserialize, Serialize};

/// What a signed token authorizes. Room tokens prove the right to join a
/// room for the first time; reconnect tokens prove an existing seat and are
/// rotated on every successful (re)join; access tokens identify a user at
/// the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    RoomToken,
    ReconnectToken,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::RoomToken => "room_token",
            TokenPurpose::ReconnectToken => "reconnect_token",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "access" => Some(TokenPurpose::Access),
            "room_token" => Some(TokenPurpose::RoomToken),
            "reconnect_token" => Some(TokenPurpose::ReconnectToken),
            _ => None,
        }
    }
}

/// Store-side mirror of an issued session token
/// (`session_token:{token}` hash, TTL matching the token's lifetime).
/// Deleting the record is how a rotated-out reconnect token is invalidated
/// before its signature expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenRecord {
    pub room_id: String,
    pub user_id: String,
    pub purpose: TokenPurpose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub purpose: TokenPurpose,
    pub exp: usize,
    pub iat: usize,
}
