use axum::{extract::State, routing::post, Json, Router};
use lambda_http::tracing::debug;

use crate::{error::ApiError, middleware::internal_auth::InternalAuth, state::AppState};
use shared::config::RECONNECT_TOKEN_TTL_SECONDS;
use shared::models::callbacks::{VerifyTokenRequest, VerifyTokenResponse};
use shared::models::token::{SessionTokenRecord, TokenPurpose};
use shared::repositories::session_token_repository::SessionTokenRepository;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/verify", post(verify_token))
}

fn rejected(reason: &str) -> VerifyTokenResponse {
    VerifyTokenResponse {
        valid: false,
        user_id: None,
        room_id: None,
        purpose: None,
        reconnect_token: None,
        reason: Some(reason.to_string()),
    }
}

/// The game server presents a player's room or reconnect token here before
/// seating them. A valid token is single-use: its store mirror is deleted
/// and a fresh reconnect token is minted in its place, so a replayed token
/// fails with `revoked` even while its signature is still good.
async fn verify_token(
    State(state): State<AppState>,
    _auth: InternalAuth,
    Json(payload): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let claims = match state.token_service.verify_any(&payload.token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Token rejected: {}", e);
            return Ok(Json(rejected("invalid_token")));
        }
    };

    if !matches!(
        claims.purpose,
        TokenPurpose::RoomToken | TokenPurpose::ReconnectToken
    ) {
        return Ok(Json(rejected("wrong_purpose")));
    }

    let room_id = match claims.room_id {
        Some(room_id) => room_id,
        None => return Ok(Json(rejected("invalid_token"))),
    };

    // No mirror means the token was already consumed or rotated out.
    if state
        .session_token_repository
        .get(&payload.token)
        .await?
        .is_none()
    {
        return Ok(Json(rejected("revoked")));
    }
    state.session_token_repository.delete(&payload.token).await?;

    let reconnect_token = state
        .token_service
        .mint_reconnect_token(&claims.sub, &room_id)?;
    state
        .session_token_repository
        .store(
            &reconnect_token,
            &SessionTokenRecord {
                room_id: room_id.clone(),
                user_id: claims.sub.clone(),
                purpose: TokenPurpose::ReconnectToken,
            },
            RECONNECT_TOKEN_TTL_SECONDS,
        )
        .await?;

    Ok(Json(VerifyTokenResponse {
        valid: true,
        user_id: Some(claims.sub),
        room_id: Some(room_id),
        purpose: Some(claims.purpose.as_str().to_string()),
        reconnect_token: Some(reconnect_token),
        reason: None,
    }))
}
