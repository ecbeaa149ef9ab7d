use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JoinResponse {
    Matched {
        room_id: String,
        room_token: String,
        ws_url: String,
    },
    Queued {
        queued_at: String,
        timeout_seconds: i64,
    },
    AlreadyInGame {
        room_id: String,
        room_token: String,
        ws_url: String,
    },
    AlreadyQueued {
        queued_at: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusResponse {
    Matched {
        room_id: String,
        room_token: String,
        ws_url: String,
    },
    Queued {
        game_type_id: String,
        queued_at: String,
    },
    Timeout {
        message: String,
    },
    NotQueued,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub status: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEndpointResponse {
    pub ws_url: String,
    pub node_name: Option<String>,
    pub room_status: String,
}
