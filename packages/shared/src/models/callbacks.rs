//! Typed payloads for the internal callback API. The game server reports
//! room progress through these; anything that does not deserialize into one
//! of them is rejected at the boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomReadyRequest {
    pub room_id: String,
    pub node_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartedRequest {
    pub player_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFinishedRequest {
    pub winner_id: Option<String>,
    #[serde(default)]
    pub turns_played: u32,
    #[serde(default)]
    pub duration_seconds: u32,
    /// user_id -> result string ("winner", "loser", "draw", ...). Unknown
    /// ids and unknown values are dropped, not rejected.
    #[serde(default)]
    pub player_results: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomReadyResponse {
    pub acknowledged: bool,
    pub room_id: String,
    pub room_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartedResponse {
    pub acknowledged: bool,
    pub room_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFinishedResponse {
    pub acknowledged: bool,
    pub game_result_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAbortedResponse {
    pub acknowledged: bool,
    pub room_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Fresh reconnect token minted on every successful verification; the
    /// game server hands it to the player in the join acknowledgement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnect_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
