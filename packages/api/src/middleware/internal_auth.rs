use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, state::AppState};

const INTERNAL_API_KEY_HEADER: &str = "X-Internal-Api-Key";

/// Gate for the `/internal` surface: the game server authenticates with a
/// pre-shared key, not a user token.
#[derive(Debug, Clone)]
pub struct InternalAuth;

impl FromRequestParts<AppState> for InternalAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(INTERNAL_API_KEY_HEADER)
            .ok_or(ApiError::Unauthorized)?
            .to_str()
            .map_err(|_| ApiError::Unauthorized)?;

        if presented != state.internal_api_key {
            return Err(ApiError::Unauthorized);
        }

        Ok(InternalAuth)
    }
}
