pub mod requests;
pub mod responses;

use chrono::{DateTime, Utc};

use crate::models::active_game::ActiveGameRecord;
use crate::models::room::Room;
use std::collections::HashMap;

/// Everything a freshly created room hands back to the matched players.
#[derive(Debug, Clone)]
pub struct RoomData {
    pub room: Room,
    /// user_id -> room token.
    pub room_tokens: HashMap<String, String>,
    pub ws_url: String,
}

/// Outcome of a join attempt.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    Matched(RoomData),
    Queued {
        game_type_id: String,
        queued_at: DateTime<Utc>,
        timeout_seconds: i64,
    },
    AlreadyInGame(ActiveGameRecord),
    AlreadyQueued {
        queued_at: DateTime<Utc>,
    },
}

/// Outcome of a status poll.
#[derive(Debug, Clone)]
pub enum QueueStatusOutcome {
    Matched(ActiveGameRecord),
    Queued {
        game_type_id: String,
        queued_at: DateTime<Utc>,
    },
    Timeout {
        queued_at: DateTime<Utc>,
    },
    NotQueued,
}
