use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::config::{game_server_ws_url, DEFAULT_GAME_SERVER_WS_PORT};
use shared::models::matchmaking::responses::{ErrorResponse, WsEndpointResponse};
use shared::repositories::room_repository::RoomRepository;
use shared::services::errors::room_service_errors::RoomServiceError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/rooms/{room_id}/ws_endpoint", get(ws_endpoint))
}

/// Where to (re)connect for a room. Only seated players may ask; a room in
/// a terminal state has no endpoint any more.
async fn ws_endpoint(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(room_id): Path<String>,
) -> Result<Response, ApiError> {
    let room = state
        .room_repository
        .get_room(&room_id)
        .await
        .map_err(RoomServiceError::from)
        .map_err(ApiError::from)?
        .ok_or(ApiError::Room(RoomServiceError::RoomNotFound))?;

    if !room.is_seated(&authenticated_user.user_id) {
        return Err(ApiError::Room(RoomServiceError::RoomNotFound));
    }

    if room.status.is_terminal() {
        let body = ErrorResponse {
            error: "room_not_active".to_string(),
            message: format!("Room is {}", room.status.as_str()),
        };
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    }

    let ws_url = match &room.node_name {
        Some(node_name) => format!(
            "ws://{}:{}/socket",
            node_name, DEFAULT_GAME_SERVER_WS_PORT
        ),
        None => game_server_ws_url(),
    };

    Ok(Json(WsEndpointResponse {
        ws_url,
        node_name: room.node_name.clone(),
        room_status: room.status.as_str().to_string(),
    })
    .into_response())
}
