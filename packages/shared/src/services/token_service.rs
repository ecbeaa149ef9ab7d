use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::{RECONNECT_TOKEN_TTL_SECONDS, ROOM_TOKEN_TTL_SECONDS};
use crate::models::token::{TokenClaims, TokenPurpose};
use crate::services::errors::token_service_errors::TokenServiceError;

const ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Mints and verifies the HS256 tokens used across the platform: player
/// access tokens, single-use room tokens handed out at match time, and
/// the reconnect tokens rotated on every successful rejoin.
pub struct TokenService {
    jwt_secret: String,
}

impl TokenService {
    pub fn new() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        Self { jwt_secret }
    }

    pub fn with_jwt_secret(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn mint_access_token(&self, user_id: &str) -> Result<String, TokenServiceError> {
        self.mint(user_id, None, TokenPurpose::Access, ACCESS_TOKEN_TTL_SECONDS)
    }

    pub fn mint_room_token(
        &self,
        user_id: &str,
        room_id: &str,
    ) -> Result<String, TokenServiceError> {
        self.mint(
            user_id,
            Some(room_id),
            TokenPurpose::RoomToken,
            ROOM_TOKEN_TTL_SECONDS,
        )
    }

    pub fn mint_reconnect_token(
        &self,
        user_id: &str,
        room_id: &str,
    ) -> Result<String, TokenServiceError> {
        self.mint(
            user_id,
            Some(room_id),
            TokenPurpose::ReconnectToken,
            RECONNECT_TOKEN_TTL_SECONDS,
        )
    }

    fn mint(
        &self,
        user_id: &str,
        room_id: Option<&str>,
        purpose: TokenPurpose,
        ttl_seconds: i64,
    ) -> Result<String, TokenServiceError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            room_id: room_id.map(|r| r.to_string()),
            purpose,
            iat: now as usize,
            exp: (now + ttl_seconds) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| TokenServiceError::JwtError(e.to_string()))
    }

    /// Verifies signature and expiry, then checks the embedded purpose.
    pub fn verify(
        &self,
        token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<TokenClaims, TokenServiceError> {
        let claims = self.verify_any(token)?;
        if claims.purpose != expected_purpose {
            return Err(TokenServiceError::WrongPurpose);
        }
        Ok(claims)
    }

    pub fn verify_any(&self, token: &str) -> Result<TokenClaims, TokenServiceError> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenServiceError::ExpiredToken,
            _ => TokenServiceError::InvalidToken,
        })
    }
}
