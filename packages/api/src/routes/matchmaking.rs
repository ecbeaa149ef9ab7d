use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use lambda_http::tracing::{debug, error};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::config::MATCHMAKING_QUEUE_TIMEOUT_SECONDS;
use shared::models::matchmaking::requests::{CancelRequest, JoinRequest};
use shared::models::matchmaking::responses::{CancelResponse, JoinResponse, StatusResponse};
use shared::models::matchmaking::{JoinOutcome, QueueStatusOutcome};
use shared::services::errors::matchmaking_service_errors::MatchmakingServiceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matchmaking/join", post(join_queue))
        .route("/matchmaking/status", get(queue_status))
        .route("/matchmaking/cancel", delete(cancel_queue))
}

async fn join_queue(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let user_id = authenticated_user.user_id;

    let outcome = state
        .matchmaking_service
        .join_queue(&user_id, &payload.game_type_id)
        .await
        .map_err(|e| {
            error!("Join failed for {}: {}", user_id, e);
            ApiError::from(e)
        })?;

    match outcome {
        JoinOutcome::Matched(data) => {
            let room_token = data.room_tokens.get(&user_id).cloned().ok_or_else(|| {
                ApiError::from(MatchmakingServiceError::RoomCreationError(
                    "room token missing for matched player".to_string(),
                ))
            })?;
            debug!("User {} matched into room {}", user_id, data.room.room_id);
            Ok((
                StatusCode::OK,
                Json(JoinResponse::Matched {
                    room_id: data.room.room_id,
                    room_token,
                    ws_url: data.ws_url,
                }),
            ))
        }
        JoinOutcome::Queued {
            queued_at,
            timeout_seconds,
            ..
        } => Ok((
            StatusCode::OK,
            Json(JoinResponse::Queued {
                queued_at: queued_at.to_rfc3339(),
                timeout_seconds,
            }),
        )),
        JoinOutcome::AlreadyInGame(active) => Ok((
            StatusCode::CONFLICT,
            Json(JoinResponse::AlreadyInGame {
                room_id: active.room_id,
                room_token: active.room_token,
                ws_url: active.ws_url,
            }),
        )),
        JoinOutcome::AlreadyQueued { queued_at } => Ok((
            StatusCode::CONFLICT,
            Json(JoinResponse::AlreadyQueued {
                queued_at: queued_at.to_rfc3339(),
            }),
        )),
    }
}

async fn queue_status(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<StatusResponse>, ApiError> {
    let outcome = state
        .matchmaking_service
        .queue_status(&authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!(
                "Status poll failed for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;

    let response = match outcome {
        QueueStatusOutcome::Matched(active) => StatusResponse::Matched {
            room_id: active.room_id,
            room_token: active.room_token,
            ws_url: active.ws_url,
        },
        QueueStatusOutcome::Queued {
            game_type_id,
            queued_at,
        } => StatusResponse::Queued {
            game_type_id,
            queued_at: queued_at.to_rfc3339(),
        },
        QueueStatusOutcome::Timeout { .. } => StatusResponse::Timeout {
            message: format!(
                "No match found within {} seconds",
                MATCHMAKING_QUEUE_TIMEOUT_SECONDS
            ),
        },
        QueueStatusOutcome::NotQueued => StatusResponse::NotQueued,
    };

    Ok(Json(response))
}

async fn cancel_queue(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    payload: Option<Json<CancelRequest>>,
) -> Result<Json<CancelResponse>, ApiError> {
    let user_id = authenticated_user.user_id;
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    state
        .matchmaking_service
        .cancel_queue(&user_id, payload.game_type_id.as_deref())
        .await
        .map_err(|e| {
            error!("Cancel failed for {}: {}", user_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(CancelResponse {
        status: "cancelled".to_string(),
        user_id,
    }))
}
