use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCommandConfig {
    pub player_count: u32,
    pub turn_time_limit: u32,
}

/// Command pushed onto `room_creation_queue` for the game server to pick
/// up. One per created room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreationCommand {
    pub room_id: String,
    pub game_type_id: String,
    pub player_ids: Vec<String>,
    pub config: RoomCommandConfig,
    pub enqueued_at: DateTime<Utc>,
}
