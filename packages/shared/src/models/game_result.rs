use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable record of a finished game. At most one exists per room; the
/// store enforces uniqueness on `room_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub game_result_id: String,
    pub room_id: String,
    pub winner_id: Option<String>,
    pub turns_played: u32,
    pub duration_seconds: u32,
    pub created_at: DateTime<Utc>,
}

impl GameResult {
    pub fn new(
        room_id: &str,
        winner_id: Option<String>,
        turns_played: u32,
        duration_seconds: u32,
    ) -> Self {
        GameResult {
            game_result_id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            winner_id,
            turns_played,
            duration_seconds,
            created_at: Utc::now(),
        }
    }
}
