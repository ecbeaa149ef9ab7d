use serde::{Deserialize, Serialize};

/// Fast-lookup pointer from a user to their current room
/// (`active_game:{user_id}` hash). Has no TTL; it lives exactly as long as
/// the room and is deleted on every terminal transition. If the referenced
/// room turns out to be missing or terminal the record is stale and must be
/// purged before any new matchmaking action is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGameRecord {
    pub room_id: String,
    pub room_token: String,
    pub ws_url: String,
    pub game_type_id: String,
    pub status: String,
}
