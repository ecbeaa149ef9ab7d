use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use lambda_http::tracing::error;

use crate::{error::ApiError, middleware::internal_auth::InternalAuth, state::AppState};
use shared::models::callbacks::{
    GameAbortedResponse, GameFinishedRequest, GameFinishedResponse, GameStartedRequest,
    GameStartedResponse, RoomReadyRequest, RoomReadyResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(room_ready))
        .route("/rooms/{room_id}/started", put(game_started))
        .route("/rooms/{room_id}/finished", put(game_finished))
        .route("/rooms/{room_id}/aborted", put(game_aborted))
}

async fn room_ready(
    State(state): State<AppState>,
    _auth: InternalAuth,
    Json(payload): Json<RoomReadyRequest>,
) -> Result<Json<RoomReadyResponse>, ApiError> {
    let room = state
        .room_lifecycle_service
        .room_ready(&payload.room_id, &payload.node_name)
        .await
        .map_err(|e| {
            error!("room_ready failed for {}: {}", payload.room_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(RoomReadyResponse {
        acknowledged: true,
        room_id: room.room_id,
        room_status: room.status.as_str().to_string(),
    }))
}

async fn game_started(
    State(state): State<AppState>,
    _auth: InternalAuth,
    Path(room_id): Path<String>,
    Json(payload): Json<GameStartedRequest>,
) -> Result<Json<GameStartedResponse>, ApiError> {
    let room = state
        .room_lifecycle_service
        .game_started(&room_id, &payload.player_ids)
        .await
        .map_err(|e| {
            error!("game_started failed for {}: {}", room_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(GameStartedResponse {
        acknowledged: true,
        room_status: room.status.as_str().to_string(),
    }))
}

async fn game_finished(
    State(state): State<AppState>,
    _auth: InternalAuth,
    Path(room_id): Path<String>,
    Json(payload): Json<GameFinishedRequest>,
) -> Result<Json<GameFinishedResponse>, ApiError> {
    let result = state
        .room_lifecycle_service
        .game_finished(&room_id, &payload)
        .await
        .map_err(|e| {
            error!("game_finished failed for {}: {}", room_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(GameFinishedResponse {
        acknowledged: true,
        game_result_id: result.game_result_id,
    }))
}

async fn game_aborted(
    State(state): State<AppState>,
    _auth: InternalAuth,
    Path(room_id): Path<String>,
) -> Result<Json<GameAbortedResponse>, ApiError> {
    let room = state
        .room_lifecycle_service
        .game_aborted(&room_id)
        .await
        .map_err(|e| {
            error!("game_aborted failed for {}: {}", room_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(GameAbortedResponse {
        acknowledged: true,
        room_status: room.status.as_str().to_string(),
    }))
}
